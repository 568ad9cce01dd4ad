use anyhow::{Context, Result};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_WIDTH: u32 = 800;
pub const MAX_HEIGHT: u32 = 600;
pub const JPEG_QUALITY: u8 = 85;

pub fn save_normalized(images_dir: &Path, event_id: &str, bytes: &[u8]) -> Result<PathBuf> {
    let decoded = image::load_from_memory(bytes).context("decode image")?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    // Downscale only; small photos keep their size.
    let rgb = if width > MAX_WIDTH || height > MAX_HEIGHT {
        DynamicImage::ImageRgb8(rgb)
            .thumbnail(MAX_WIDTH, MAX_HEIGHT)
            .to_rgb8()
    } else {
        rgb
    };

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
    rgb.write_with_encoder(encoder).context("encode jpeg")?;

    fs::create_dir_all(images_dir)
        .with_context(|| format!("create images dir {}", images_dir.display()))?;
    let path = images_dir.join(format!("{event_id}.jpg"));
    fs::write(&path, &encoded).with_context(|| format!("write image {}", path.display()))?;
    Ok(path)
}
