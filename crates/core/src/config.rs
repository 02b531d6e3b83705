use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

pub const DEFAULT_FILENAME: &str = "webpack-assets.json";
pub const DEFAULT_HOT_UPDATE_PATTERN: &str = r"\.hot-update\.(js|json)$";
pub const DEFAULT_SOURCE_MAP_PATTERN: &str = r"\.map$";

/// What to do when the target file exists but is not a valid manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseablePolicy {
    /// Report a parse error to the request and leave the file alone.
    #[default]
    Fail,
    /// Treat the file as empty and replace it.
    Overwrite,
}

/// Static configuration, fixed when the plugin is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub path: PathBuf,
    pub filename: String,
    pub pretty_print: bool,
    /// Merge into the existing file instead of replacing it.
    pub update: bool,
    /// Prefix asset URLs with the build's public path.
    pub full_path: bool,
    pub hosts: Vec<String>,
    pub hot_update_pattern: String,
    pub source_map_pattern: String,
    pub include_source_maps: bool,
    pub on_unparseable: UnparseablePolicy,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            filename: DEFAULT_FILENAME.to_string(),
            pretty_print: false,
            update: true,
            full_path: true,
            hosts: Vec::new(),
            hot_update_pattern: DEFAULT_HOT_UPDATE_PATTERN.to_string(),
            source_map_pattern: DEFAULT_SOURCE_MAP_PATTERN.to_string(),
            include_source_maps: false,
            on_unparseable: UnparseablePolicy::Fail,
        }
    }
}

impl ManifestConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(ManifestError::Config("filename must not be empty".to_string()));
        }
        if let Some(host) = self.hosts.iter().find(|h| h.trim().is_empty()) {
            return Err(ManifestError::Config(format!(
                "host pool contains an empty entry: {host:?}"
            )));
        }
        Ok(())
    }

    /// Full path of the manifest file.
    pub fn output_path(&self) -> PathBuf {
        self.path.join(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ManifestConfig =
            serde_json::from_str(r#"{"pretty_print": true, "hosts": ["cdn1", "cdn2"]}"#).unwrap();

        assert!(config.pretty_print);
        assert_eq!(config.hosts, vec!["cdn1", "cdn2"]);
        assert_eq!(config.filename, DEFAULT_FILENAME);
        assert!(config.full_path);
        assert!(config.update);
        assert_eq!(config.on_unparseable, UnparseablePolicy::Fail);
        assert_eq!(config.output_path(), PathBuf::from("./webpack-assets.json"));
    }

    #[test]
    fn test_policy_parses_lowercase() {
        let config: ManifestConfig =
            serde_json::from_str(r#"{"on_unparseable": "overwrite"}"#).unwrap();
        assert_eq!(config.on_unparseable, UnparseablePolicy::Overwrite);
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let config = ManifestConfig {
            filename: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ManifestError::Config(_))));

        let config = ManifestConfig {
            hosts: vec!["cdn1".to_string(), String::new()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ManifestError::Config(_))));
    }
}
