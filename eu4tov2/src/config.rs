use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

/// Which landless countries to drop before country mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveType {
    None,
    Dead,
    All,
}

impl RemoveType {
    fn from_value(value: &str) -> Self {
        match value {
            "dead" => RemoveType::Dead,
            "all" => RemoveType::All,
            "none" | "" => RemoveType::None,
            other => {
                log::warn!("unknown remove type {:?}, keeping all countries", other);
                RemoveType::None
            }
        }
    }
}

/// Run configuration, passed by value into the pipeline stages.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub v2_path: PathBuf,
    pub eu4_path: PathBuf,
    pub remove_type: RemoveType,
    pub literacy_weight: f64,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let root = pdxtxt::parse_file(path)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        let Some(node) = root.values("configuration").first().copied() else {
            bail!("{} has no configuration block", path.display());
        };

        let dir = |key: &str| -> Result<PathBuf> {
            let value = node
                .leaf_of(key)
                .with_context(|| format!("configuration is missing {}", key))?;
            let dir = PathBuf::from(value);
            if !dir.is_dir() {
                bail!("configured {} {} is not a directory", key, dir.display());
            }
            Ok(dir)
        };

        Ok(Config {
            v2_path: dir("v2_path")?,
            eu4_path: dir("eu4_path")?,
            remove_type: RemoveType::from_value(node.leaf_of("remove_type").unwrap_or("none")),
            literacy_weight: node
                .leaf_of("literacy_weight")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0),
        })
    }
}

/// Output name derived from the save file name; dashes and spaces become
/// underscores so the name is usable as a mod directory.
pub fn output_name(save: &Path) -> String {
    let stem = save
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    stem.replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_paths_and_options() {
        let v2 = tempfile::tempdir().unwrap();
        let eu4 = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            configuration = {{
                v2_path = "{}"
                eu4_path = "{}"
                remove_type = dead
                literacy_weight = 0.5
            }}
            "#,
            v2.path().display(),
            eu4.path().display()
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.v2_path, v2.path());
        assert_eq!(config.remove_type, RemoveType::Dead);
        assert!((config.literacy_weight - 0.5).abs() < 1e-9);
    }

    #[test]
    fn invalid_install_path_is_fatal() {
        let eu4 = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            configuration = {{
                v2_path = "/does/not/exist"
                eu4_path = "{}"
            }}
            "#,
            eu4.path().display()
        )
        .unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn output_name_folds_separators() {
        assert_eq!(
            output_name(Path::new("/saves/Sweden-1821 Ironman.eu4")),
            "Sweden_1821_Ironman"
        );
    }
}
