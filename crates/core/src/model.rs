//! Data shapes exchanged with the build tool and persisted to disk.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind (e.g. `js`, `css`) to public URL, for one chunk.
pub type KindMap = IndexMap<String, String>;

/// Chunk name to its kind map. This is the persisted file's top level.
pub type Manifest = IndexMap<String, KindMap>;

/// Raw chunk listing as emitted by the build tool, in listing order.
pub type RawChunkListing = IndexMap<String, ChunkFiles>;

/// A chunk's output: either a bare file name or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkFiles {
    One(String),
    Many(Vec<String>),
}

impl ChunkFiles {
    pub fn files(&self) -> &[String] {
        match self {
            ChunkFiles::One(file) => std::slice::from_ref(file),
            ChunkFiles::Many(files) => files,
        }
    }
}

impl From<&str> for ChunkFiles {
    fn from(file: &str) -> Self {
        ChunkFiles::One(file.to_string())
    }
}

impl From<Vec<&str>> for ChunkFiles {
    fn from(files: Vec<&str>) -> Self {
        ChunkFiles::Many(files.into_iter().map(str::to_string).collect())
    }
}

/// The part of a webpack stats document consumed per build completion.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    #[serde(rename = "assetsByChunkName", default)]
    pub assets_by_chunk_name: RawChunkListing,
    /// Public path with placeholders already resolved.
    #[serde(rename = "publicPath", default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

impl BuildStats {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accepts_bare_and_listed_files() {
        let stats = BuildStats::from_json(
            r#"{
                "hash": "42b6e1ec4fa8c5f0303e",
                "publicPath": "/static/",
                "assetsByChunkName": {
                    "one": "one-bundle.js",
                    "main": ["index-bundle.js", "index-bundle.js.map"]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(stats.public_path.as_deref(), Some("/static/"));
        assert_eq!(stats.assets_by_chunk_name["one"].files(), ["one-bundle.js"]);
        assert_eq!(
            stats.assets_by_chunk_name["main"].files(),
            ["index-bundle.js", "index-bundle.js.map"]
        );
        let names: Vec<&String> = stats.assets_by_chunk_name.keys().collect();
        assert_eq!(names, ["one", "main"]);
    }

    #[test]
    fn test_stats_without_public_path() {
        let stats = BuildStats::from_json(r#"{"assetsByChunkName": {}}"#).unwrap();
        assert!(stats.public_path.is_none());
        assert!(stats.assets_by_chunk_name.is_empty());
    }
}
