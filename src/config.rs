use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk configuration, TOML:
///
/// ```toml
/// root = "/mnt/btrfs"
/// exclude = ["lost+found"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory per installation.
    pub root: PathBuf,
    /// Directory names under `root` that are never treated as installations.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root = \"/mnt/btrfs\"\nexclude = [\"lost+found\"]").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.root, PathBuf::from("/mnt/btrfs"));
        assert_eq!(config.exclude, vec!["lost+found".to_string()]);
    }

    #[test]
    fn exclude_defaults_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root = \"/mnt/btrfs\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exclude = []").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Path::new("/nonexistent/snapper-rollback.toml")).is_err());
    }
}
