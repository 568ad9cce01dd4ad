use crate::records::TableRow;
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

// A missing file is an empty table, not an error.
pub fn read_table<R>(path: &Path) -> Result<Vec<R>>
where
    R: TableRow + DeserializeOwned,
{
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("open table {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.with_context(|| format!("parse row in {}", path.display()))?);
    }
    Ok(rows)
}

pub fn write_table<R>(path: &Path, rows: &[R]) -> Result<()>
where
    R: TableRow + Serialize,
{
    let data = to_csv_bytes(rows)?;
    write_atomic(path, &data)
}

pub fn to_csv_string<R>(rows: &[R]) -> Result<String>
where
    R: TableRow + Serialize,
{
    let data = to_csv_bytes(rows)?;
    String::from_utf8(data).context("render csv")
}

fn to_csv_bytes<R>(rows: &[R]) -> Result<Vec<u8>>
where
    R: TableRow + Serialize,
{
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        // The header goes out even when there are no rows.
        writer.write_record(R::columns())?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create table dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp-{}", std::process::id()));
    fs::write(&tmp, content).with_context(|| format!("write temp table {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename temp table {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
