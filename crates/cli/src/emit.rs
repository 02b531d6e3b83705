use std::path::PathBuf;

use assetmap_core::{BuildStats, ManifestPlugin};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::ConfigOverrides;

pub async fn run(
    stats_files: Vec<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = overrides.resolve()?;
    let target = config.output_path();
    let plugin = ManifestPlugin::new(config)?;

    let total = stats_files.len();
    let mut failed = 0usize;
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    for path in stats_files {
        let label = path.display().to_string();
        let mut stats = match BuildStats::from_path(&path) {
            Ok(stats) => stats,
            Err(e) => {
                error!("Failed to read stats from {}: {}", label, e);
                eprintln!("error: {label}: {e}");
                failed += 1;
                continue;
            }
        };
        if stats.public_path.is_none() {
            stats.public_path = overrides.public_path.clone();
        }

        let done_tx = done_tx.clone();
        plugin.after_emit(&stats, move |err| {
            let _ = done_tx.send((label, err));
        });
    }
    drop(done_tx);
    debug!(
        state = ?plugin.state(),
        waiting = plugin.pending(),
        "All builds queued"
    );

    while let Some((label, err)) = done_rx.recv().await {
        match err {
            None => info!("Merged {} into {}", label, target.display()),
            Some(e) => {
                error!("Failed to write manifest for {}: {}", label, e);
                eprintln!("error: {label}: {e}");
                failed += 1;
            }
        }
    }

    let totals = plugin.shutdown().await?;
    println!(
        "{}: {} written, {} failed",
        target.display(),
        totals.completed_writes,
        failed
    );

    if failed > 0 {
        return Err(format!("{failed} of {total} builds failed").into());
    }
    Ok(())
}
