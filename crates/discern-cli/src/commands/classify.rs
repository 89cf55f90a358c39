use anyhow::{Context, Result};
use std::path::Path;

use discern_core::classify::BatchClassification;
use discern_core::{CatalogRecord, ClassificationHints, ClassificationPipeline};

/// Classify catalog records read from a JSON file.
pub async fn run_classify(path: &Path, whitelist: Vec<String>, json: bool) -> Result<()> {
    let records = read_records(path)?;
    log::info!("Classifying {} records from {}", records.len(), path.display());

    let pipeline = ClassificationPipeline::new();
    let hints = ClassificationHints::with_whitelist(whitelist);
    let classified = pipeline.classify_batch(&records, &hints).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
        return Ok(());
    }

    for (record, result) in records.iter().zip(&classified) {
        println!("  {:<13} {}{}", result.label.as_str(), record.title, flags(result));
    }

    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<CatalogRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of catalog records", path.display()))
}

fn flags(result: &BatchClassification) -> &'static str {
    if result.is_studio_album {
        "  ★"
    } else {
        ""
    }
}
