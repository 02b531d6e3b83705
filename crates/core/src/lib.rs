pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod plugin;
pub mod shard;

pub use builder::AssetMapBuilder;
pub use classify::{AssetClassifier, Classification, DiscardReason};
pub use config::{ManifestConfig, UnparseablePolicy};
pub use error::{ManifestError, Result};
pub use model::{BuildStats, ChunkFiles, KindMap, Manifest, RawChunkListing};
pub use output::ManifestFileWriter;
pub use plugin::ManifestPlugin;
pub use shard::HostSharder;
