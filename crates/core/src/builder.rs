use tracing::trace;

use crate::classify::{AssetClassifier, Classification};
use crate::config::ManifestConfig;
use crate::error::Result;
use crate::model::{KindMap, Manifest, RawChunkListing};
use crate::shard::HostSharder;

/// Turns a build's raw chunk listing into a manifest fragment.
#[derive(Debug, Clone)]
pub struct AssetMapBuilder {
    classifier: AssetClassifier,
    sharder: HostSharder,
    full_path: bool,
}

impl AssetMapBuilder {
    pub fn new(classifier: AssetClassifier, sharder: HostSharder, full_path: bool) -> Self {
        Self {
            classifier,
            sharder,
            full_path,
        }
    }

    pub fn from_config(config: &ManifestConfig) -> Result<Self> {
        Ok(Self::new(
            AssetClassifier::from_config(config)?,
            HostSharder::new(config.hosts.clone()),
            config.full_path,
        ))
    }

    /// Every chunk in `listing` gets an entry, possibly empty. Within a
    /// chunk, a later file of the same kind replaces an earlier one.
    pub fn build(&self, listing: &RawChunkListing, public_path: Option<&str>) -> Manifest {
        let prefix = match public_path {
            Some(path) if self.full_path => path,
            _ => "",
        };

        listing
            .iter()
            .map(|(chunk, files)| {
                let mut kinds = KindMap::new();
                for file in files.files() {
                    let Classification::Asset(kind) = self.classifier.classify(file) else {
                        trace!(chunk = %chunk, file = %file, "discarded");
                        continue;
                    };
                    kinds.insert(kind, self.url_for(prefix, file));
                }
                (chunk.clone(), kinds)
            })
            .collect()
    }

    fn url_for(&self, prefix: &str, file: &str) -> String {
        let path = format!("{prefix}{file}");
        match self.sharder.assign(file) {
            // Exactly one slash between host and path.
            Some(host) if path.starts_with('/') => format!("//{host}{path}"),
            Some(host) => format!("//{host}/{path}"),
            None => path,
        }
    }
}
