use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub protocol: String,
    pub domain: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            protocol: "https://".to_string(),
            domain: "localhost".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BankomatConfig {
    /// Only list cash machines the partner has enabled.
    #[serde(default)]
    pub only_active: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Dataset file backing the in-memory store.
    pub data_path: Option<String>,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub bankomats: BankomatConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "exagg", "exagg")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn dataset_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "exagg", "exagg")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("dataset.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Relative dataset paths are resolved against the config file location
        if let (Some(data_path), Some(parent)) = (&config.data_path, path.as_ref().parent()) {
            if Path::new(data_path).is_relative() {
                config.data_path = Some(parent.join(data_path).to_string_lossy().into_owned());
            }
        }
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
data_path: "/var/lib/exagg/dataset.yaml"
site:
  protocol: "https://"
  domain: "rates.example.com"
bankomats:
  only_active: true
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.data_path.as_deref(),
            Some("/var/lib/exagg/dataset.yaml")
        );
        assert_eq!(config.site.domain, "rates.example.com");
        assert!(config.bankomats.only_active);
        assert_eq!(
            config.dataset_path().unwrap(),
            PathBuf::from("/var/lib/exagg/dataset.yaml")
        );
    }

    #[test]
    fn test_relative_data_path_follows_config_file() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "data_path: \"dataset.yaml\"\n")?;

        let config = AppConfig::load_from_path(&config_path)?;
        assert_eq!(config.dataset_path()?, temp_dir.path().join("dataset.yaml"));
        Ok(())
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: ~\n").unwrap();
        assert!(config.data_path.is_none());
        assert_eq!(config.site.protocol, "https://");
        assert!(!config.bankomats.only_active);
    }
}
