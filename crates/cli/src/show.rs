use std::path::PathBuf;

use assetmap_core::Manifest;
use assetmap_core::config::DEFAULT_FILENAME;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Chunk")]
    chunk: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "URL")]
    url: String,
}

fn rows(manifest: &Manifest) -> Vec<AssetRow> {
    let mut rows = Vec::new();
    for (chunk, kinds) in manifest {
        if kinds.is_empty() {
            rows.push(AssetRow {
                chunk: chunk.clone(),
                kind: "-".to_string(),
                url: "-".to_string(),
            });
        }
        for (kind, url) in kinds {
            rows.push(AssetRow {
                chunk: chunk.clone(),
                kind: kind.clone(),
                url: url.clone(),
            });
        }
    }
    rows
}

pub fn run(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME));
    let content = std::fs::read_to_string(&path)?;
    let manifest: Manifest = serde_json::from_str(&content)?;

    let rows = rows(&manifest);
    if rows.is_empty() {
        println!("No chunks in {}.", path.display());
    } else {
        println!("{}", Table::new(rows));
    }

    Ok(())
}
