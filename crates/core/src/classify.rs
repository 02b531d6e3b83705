//! Per-file classification: keep as a typed asset, or discard.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{DEFAULT_HOT_UPDATE_PATTERN, DEFAULT_SOURCE_MAP_PATTERN, ManifestConfig};
use crate::error::{ManifestError, Result};

/// Kind used when a file has no extension.
pub const UNKNOWN_KIND: &str = "unknown";

static DEFAULT_HOT_UPDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_HOT_UPDATE_PATTERN).expect("default hot-update pattern must compile")
});

static DEFAULT_SOURCE_MAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_SOURCE_MAP_PATTERN).expect("default source-map pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    HotUpdate,
    SourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Asset(String),
    Discard(DiscardReason),
}

#[derive(Debug, Clone)]
pub struct AssetClassifier {
    hot_update: Regex,
    source_map: Regex,
    include_source_maps: bool,
}

impl Default for AssetClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_HOT_UPDATE.clone(), DEFAULT_SOURCE_MAP.clone(), false)
    }
}

impl AssetClassifier {
    pub fn new(hot_update: Regex, source_map: Regex, include_source_maps: bool) -> Self {
        Self {
            hot_update,
            source_map,
            include_source_maps,
        }
    }

    pub fn from_config(config: &ManifestConfig) -> Result<Self> {
        let hot_update = Regex::new(&config.hot_update_pattern).map_err(|source| {
            ManifestError::Pattern {
                name: "hot_update_pattern",
                source,
            }
        })?;
        let source_map = Regex::new(&config.source_map_pattern).map_err(|source| {
            ManifestError::Pattern {
                name: "source_map_pattern",
                source,
            }
        })?;

        Ok(Self::new(hot_update, source_map, config.include_source_maps))
    }

    pub fn classify(&self, file: &str) -> Classification {
        if self.hot_update.is_match(file) {
            return Classification::Discard(DiscardReason::HotUpdate);
        }
        if !self.include_source_maps && self.source_map.is_match(file) {
            return Classification::Discard(DiscardReason::SourceMap);
        }
        Classification::Asset(asset_kind(file).to_string())
    }
}

/// Extension of the last path segment, ignoring any query string or
/// fragment. Dotfiles and extensionless names are [`UNKNOWN_KIND`].
pub fn asset_kind(file: &str) -> &str {
    let path = file.split(['?', '#']).next().unwrap_or(file);
    let name = path.rsplit('/').next().unwrap_or(path);

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
        _ => UNKNOWN_KIND,
    }
}
