//! Merge-and-persist of manifest fragments against one target file.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use assetmap_queue::FragmentSink;
use tracing::{debug, warn};

use crate::config::{ManifestConfig, UnparseablePolicy};
use crate::error::{ManifestError, Result};
use crate::model::Manifest;

/// Writes manifest fragments to a single file.
///
/// Not safe to call concurrently for the same target; drive it through a
/// [`QueuedWriter`](assetmap_queue::QueuedWriter).
#[derive(Debug, Clone)]
pub struct ManifestFileWriter {
    target: PathBuf,
    pretty_print: bool,
    update: bool,
    on_unparseable: UnparseablePolicy,
}

impl ManifestFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            pretty_print: false,
            update: true,
            on_unparseable: UnparseablePolicy::Fail,
        }
    }

    pub fn from_config(config: &ManifestConfig) -> Self {
        Self {
            target: config.output_path(),
            pretty_print: config.pretty_print,
            update: config.update,
            on_unparseable: config.on_unparseable,
        }
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn with_unparseable_policy(mut self, policy: UnparseablePolicy) -> Self {
        self.on_unparseable = policy;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Current on-disk manifest. A missing file is an empty manifest.
    pub fn read_existing(&self) -> Result<Manifest> {
        let content = match fs::read_to_string(&self.target) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Manifest::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Manifest>(&content) {
            Ok(manifest) => Ok(manifest),
            Err(source) => match self.on_unparseable {
                UnparseablePolicy::Fail => Err(ManifestError::Parse {
                    path: self.target.clone(),
                    source,
                }),
                UnparseablePolicy::Overwrite => {
                    warn!(
                        "Replacing unparseable manifest at {}: {}",
                        self.target.display(),
                        source
                    );
                    Ok(Manifest::new())
                }
            },
        }
    }

    /// Merges `fragment` over the existing file (when updating) and writes
    /// the result in one unit.
    pub fn persist_fragment(&self, fragment: Manifest) -> Result<()> {
        let manifest = if self.update {
            let mut existing = self.read_existing()?;
            merge_chunks(&mut existing, fragment);
            existing
        } else {
            fragment
        };

        let bytes = if self.pretty_print {
            serde_json::to_vec_pretty(&manifest)?
        } else {
            serde_json::to_vec(&manifest)?
        };

        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)?;
        }

        replace_via_temp(&self.temp_path(), &self.target, |file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })?;

        debug!(
            "Saved manifest with {} chunks to {}",
            manifest.len(),
            self.target.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.target.with_file_name(format!(".{name}.tmp"))
    }
}

impl FragmentSink<Manifest> for ManifestFileWriter {
    type Error = ManifestError;

    fn persist(&self, fragment: Manifest) -> Result<()> {
        self.persist_fragment(fragment)
    }
}

/// Writes `temp` with `fill`, then renames it over `target`. The temp file
/// is removed on any failure once it exists.
fn replace_via_temp<W>(temp: &Path, target: &Path, fill: W) -> std::io::Result<()>
where
    W: FnOnce(&mut File) -> std::io::Result<()>,
{
    let mut file = File::create(temp)?;
    let result = fill(&mut file).and_then(|()| {
        drop(file);
        fs::rename(temp, target)
    });
    if result.is_err() {
        let _ = fs::remove_file(temp);
    }
    result
}

/// Chunk-level merge: each chunk in `fragment` replaces the same-named chunk
/// in `existing`; other chunks are untouched.
pub fn merge_chunks(existing: &mut Manifest, fragment: Manifest) {
    for (chunk, kinds) in fragment {
        existing.insert(chunk, kinds);
    }
}
