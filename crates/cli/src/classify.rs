use assetmap_core::{AssetClassifier, Classification, DiscardReason};

use crate::ConfigOverrides;

pub fn run(files: Vec<String>, overrides: ConfigOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = overrides.resolve()?;
    let classifier = AssetClassifier::from_config(&config)?;

    for file in files {
        let verdict = match classifier.classify(&file) {
            Classification::Asset(kind) => kind,
            Classification::Discard(DiscardReason::HotUpdate) => "discard (hot update)".to_string(),
            Classification::Discard(DiscardReason::SourceMap) => "discard (source map)".to_string(),
        };
        println!("{file}\t{verdict}");
    }

    Ok(())
}
