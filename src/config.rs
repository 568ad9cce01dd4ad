use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SITE_CONFIG_FILE: &str = "upkeep.toml";

// A `upkeep.toml` in the data directory overrides any subset of the
// built-in catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub version: u32,
    pub locations: Vec<String>,
    pub elements: Vec<ElementConfig>,
    pub personnel: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementConfig {
    pub name: String,
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSiteConfig {
    version: Option<u32>,
    locations: Option<Vec<String>>,
    elements: Option<Vec<RawElementConfig>>,
    personnel: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawElementConfig {
    name: Option<String>,
    prompts: Option<Vec<String>>,
}

impl SiteConfig {
    pub fn builtin() -> Self {
        Self {
            version: 1,
            locations: to_strings(&[
                "Admin indoor",
                "QC lab & Sampling room",
                "Processing",
                "Receiving area & Reject room",
                "Technical corridor",
                "Packaging",
                "Warehouse",
                "Utilities & Area Surround",
                "Outdoor & security gates",
                "Electric rooms",
                "Waste WTP & Incinerator",
                "Service Building & Garden Store",
                "Pumps & Gas Rooms",
            ]),
            elements: builtin_elements(),
            personnel: to_strings(&[
                "Shehab Ayman",
                "sameh",
                "Kaleed",
                "Yasser Hassan",
                "Mohamed El masry",
                "Zeinab Mobarak",
            ]),
        }
    }

    // Exact match; the roster gate for repair-date edits.
    pub fn has_person(&self, name: &str) -> bool {
        self.personnel.iter().any(|p| p == name)
    }
}

pub fn site_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SITE_CONFIG_FILE)
}

pub fn load_site_config(data_dir: &Path) -> Result<Option<SiteConfig>> {
    let path = site_config_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read site config {}", path.display()))?;
    let parsed: RawSiteConfig =
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(validate_site_config(parsed, &path)?))
}

pub fn load_or_builtin(data_dir: &Path) -> Result<SiteConfig> {
    Ok(load_site_config(data_dir)?.unwrap_or_else(SiteConfig::builtin))
}

fn validate_site_config(raw: RawSiteConfig, path: &Path) -> Result<SiteConfig> {
    let version = raw
        .version
        .ok_or_else(|| anyhow::anyhow!("{} missing required `version`", path.display()))?;
    if version != 1 {
        bail!(
            "{} has unsupported version {version}; expected version = 1",
            path.display()
        );
    }

    let builtin = SiteConfig::builtin();

    let locations = match raw.locations {
        None => builtin.locations,
        Some(locations) => {
            let locations = sanitize_names(locations);
            if locations.is_empty() {
                bail!("{} has empty `locations`", path.display());
            }
            locations
        }
    };

    let personnel = match raw.personnel {
        None => builtin.personnel,
        Some(personnel) => {
            let personnel = sanitize_names(personnel);
            if personnel.is_empty() {
                bail!("{} has empty `personnel`", path.display());
            }
            personnel
        }
    };

    let elements = match raw.elements {
        None => builtin.elements,
        Some(elements) => {
            let mut validated: Vec<ElementConfig> = Vec::new();
            for (idx, element) in elements.into_iter().enumerate() {
                let element = validate_element(element, path, idx)?;
                if validated.iter().any(|e| e.name == element.name) {
                    bail!(
                        "{} has duplicate `[[elements]]` name `{}`",
                        path.display(),
                        element.name
                    );
                }
                validated.push(element);
            }
            if validated.is_empty() {
                bail!("{} has empty `[[elements]]`", path.display());
            }
            validated
        }
    };

    Ok(SiteConfig {
        version,
        locations,
        elements,
        personnel,
    })
}

fn validate_element(raw: RawElementConfig, path: &Path, idx: usize) -> Result<ElementConfig> {
    let name = raw
        .name
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{} missing `name` for `[[elements]]` at index {idx}",
                path.display()
            )
        })?;
    Ok(ElementConfig {
        name,
        prompts: sanitize_names(raw.prompts.unwrap_or_default()),
    })
}

fn sanitize_names(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn builtin_elements() -> Vec<ElementConfig> {
    let items: &[(&str, &[&str])] = &[
        ("Floors", &["Inspect floors for visible damage and stains"]),
        ("Lights", &["Ensure all light fixtures are operational."]),
        (
            "Electrical Outlets",
            &[
                "Inspect all electrical outlets for visible damage",
                "Ensure all outlet covers are installed properly and not damaged.",
                "Verify all electrical outlets are labeled",
            ],
        ),
        (
            "Doors",
            &[
                "Inspect door for visible damage and paint chipping",
                "Check door hardware for proper operation (badge access, door handles)",
                "Ensure doors close and latch properly",
                "Inspect door seals",
            ],
        ),
        (
            "Ceilings",
            &[
                "Inspect ceilings for visible damage (including cracks, dings, dents, holes) and paint chipping",
                "Inspect ceiling penetrations around piping and ducting to ensure seals fully cover any gaps",
                "Sealing material is not dry or cracked",
            ],
        ),
        (
            "Walls",
            &[
                "Inspect walls for visible damage (including cracks, dings, dents, holes) and paint chipping",
                "Inspect all wall penetrations around piping to ensure seals fully cover any gaps and holes",
                "Sealing material is not dry or cracked.",
            ],
        ),
        (
            "Windows",
            &[
                "Inspect windows for visible damage and cracks",
                "Inspect exterior window seals for cracking, holes, and gaps",
                "Inspect curtains for visible damage and standardize",
            ],
        ),
        (
            "Visuals",
            &[
                "Inspect visuals for visible damage or fading",
                "Ensure visuals are updated",
            ],
        ),
        (
            "Fixtures and fittings",
            &[
                "Inspect fixtures such as faucets, WC bowls, bathroom sinks, mirrors, etc.",
                "Inspect cafeteria & coffee corner fittings (coffee machines, kettles, Bain Marie, etc.)",
                "Inspect fixture and fitting condition for visible damage",
            ],
        ),
        (
            "Furniture",
            &[
                "Inspect movable office furniture, desks, chairs, sofas, tables, cabinets, etc.",
                "Inspect furniture condition for visible damage",
            ],
        ),
    ];
    items
        .iter()
        .map(|(name, prompts)| ElementConfig {
            name: name.to_string(),
            prompts: to_strings(prompts),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_catalog_covers_the_standard_walkthrough() {
        let cfg = SiteConfig::builtin();
        assert_eq!(cfg.locations.len(), 13);
        assert_eq!(cfg.elements.len(), 10);
        assert_eq!(cfg.personnel.len(), 6);
        assert_eq!(cfg.elements[3].name, "Doors");
        assert_eq!(cfg.elements[3].prompts.len(), 4);
        assert!(cfg.has_person("sameh"));
        assert!(!cfg.has_person("Sameh"));
    }

    #[test]
    fn missing_file_loads_builtin() {
        let tmp = tempdir().unwrap();
        assert!(load_site_config(tmp.path()).unwrap().is_none());
        let cfg = load_or_builtin(tmp.path()).unwrap();
        assert_eq!(cfg.locations, SiteConfig::builtin().locations);
    }

    #[test]
    fn config_overrides_only_the_sections_present() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            site_config_path(tmp.path()),
            r#"
version = 1
personnel = ["nour", "  hany  ", ""]
"#,
        )
        .unwrap();

        let cfg = load_or_builtin(tmp.path()).unwrap();
        assert_eq!(cfg.personnel, vec!["nour".to_string(), "hany".to_string()]);
        assert_eq!(cfg.locations, SiteConfig::builtin().locations);
        assert_eq!(cfg.elements, SiteConfig::builtin().elements);
    }

    #[test]
    fn parses_custom_elements() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            site_config_path(tmp.path()),
            r#"
version = 1

[[elements]]
name = "Roofs"
prompts = ["Check membrane for ponding"]

[[elements]]
name = "Drains"
"#,
        )
        .unwrap();

        let cfg = load_or_builtin(tmp.path()).unwrap();
        assert_eq!(cfg.elements.len(), 2);
        assert_eq!(cfg.elements[0].name, "Roofs");
        assert_eq!(
            cfg.elements[0].prompts,
            vec!["Check membrane for ponding".to_string()]
        );
        assert_eq!(cfg.elements[1].name, "Drains");
        assert!(cfg.elements[1].prompts.is_empty());
    }

    #[test]
    fn rejects_invalid_version() {
        let tmp = tempdir().unwrap();
        std::fs::write(site_config_path(tmp.path()), "version = 9").unwrap();
        let err = load_site_config(tmp.path()).unwrap_err();
        assert!(format!("{err}").contains("unsupported version"));
    }

    #[test]
    fn rejects_empty_personnel_list() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            site_config_path(tmp.path()),
            r#"
version = 1
personnel = ["", "   "]
"#,
        )
        .unwrap();
        let err = load_site_config(tmp.path()).unwrap_err();
        assert!(format!("{err}").contains("empty `personnel`"));
    }

    #[test]
    fn rejects_duplicate_element_names() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            site_config_path(tmp.path()),
            r#"
version = 1

[[elements]]
name = "Doors"

[[elements]]
name = "Doors"
"#,
        )
        .unwrap();
        let err = load_site_config(tmp.path()).unwrap_err();
        assert!(format!("{err}").contains("duplicate `[[elements]]`"));
    }

    #[test]
    fn rejects_unnamed_element() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            site_config_path(tmp.path()),
            r#"
version = 1

[[elements]]
prompts = ["orphan prompt"]
"#,
        )
        .unwrap();
        let err = load_site_config(tmp.path()).unwrap_err();
        assert!(format!("{err}").contains("missing `name`"));
    }
}
