mod classify;
mod emit;
mod show;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "assetmap",
    version,
    about = "Writes a chunk/kind/URL manifest of build outputs",
    long_about = "Assetmap reads webpack-style build stats and maintains a JSON manifest mapping each \
                  chunk's assets, grouped by kind, to their public URLs. Several builds can share one \
                  manifest file; their entries are merged rather than overwritten."
)]
pub struct Cli {
    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge one or more build stats files into the manifest
    #[command(
        long_about = "Each stats file is treated as one completed build. All builds are queued \
                            against the same manifest file and written one after another in the \
                            order given."
    )]
    Emit {
        /// Stats JSON files (as produced by `webpack --json`)
        #[arg(value_name = "STATS_JSON", required = true)]
        stats: Vec<PathBuf>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Print a manifest as a table
    Show {
        /// Manifest file. Defaults to ./webpack-assets.json
        #[arg(value_name = "MANIFEST")]
        path: Option<PathBuf>,
    },
    /// Show how file names would be classified
    Classify {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// JSON config file; flags below take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the manifest is written to
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Manifest file name
    #[arg(long)]
    pub filename: Option<String>,

    /// Indent the written JSON
    #[arg(long)]
    pub pretty: bool,

    /// Do not prefix URLs with the public path
    #[arg(long)]
    pub no_full_path: bool,

    /// Replace the manifest instead of merging into it
    #[arg(long)]
    pub replace: bool,

    /// Keep source maps as `map` assets
    #[arg(long)]
    pub include_source_maps: bool,

    /// CDN host for sharding; repeat for a pool
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Public path used when a stats file has none
    #[arg(long, value_name = "PREFIX")]
    pub public_path: Option<String>,
}

impl ConfigOverrides {
    pub fn resolve(&self) -> assetmap_core::Result<assetmap_core::ManifestConfig> {
        let mut config = match &self.config {
            Some(path) => assetmap_core::ManifestConfig::load(path)?,
            None => assetmap_core::ManifestConfig::default(),
        };

        if let Some(path) = &self.path {
            config.path = path.clone();
        }
        if let Some(filename) = &self.filename {
            config.filename = filename.clone();
        }
        if self.pretty {
            config.pretty_print = true;
        }
        if self.no_full_path {
            config.full_path = false;
        }
        if self.replace {
            config.update = false;
        }
        if self.include_source_maps {
            config.include_source_maps = true;
        }
        if !self.hosts.is_empty() {
            config.hosts = self.hosts.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = assetmap_core::logging::init_logging("cli", cli.verbose);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Emit { stats, overrides } => rt.block_on(emit::run(stats, overrides)),
        Commands::Show { path } => show::run(path),
        Commands::Classify { files, overrides } => classify::run(files, overrides),
    }
}
