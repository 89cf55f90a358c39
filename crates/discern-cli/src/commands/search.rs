use anyhow::Result;
use discern_core::ScoreOptions;
use discern_resolve::{Config, SearchOptions, SearchOrchestrator};

use super::describe;

/// Flags for `discern search`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchArgs {
    pub limit: Option<usize>,
    pub min_confidence: Option<f64>,
    pub prefer_standard: bool,
    pub allow_live: bool,
    pub json: bool,
}

impl SearchArgs {
    /// Command-line flags override configured defaults.
    fn options(self, config: &Config) -> SearchOptions {
        let defaults = SearchOptions::from_config(config);
        SearchOptions {
            limit: self.limit.unwrap_or(defaults.limit),
            min_confidence: self.min_confidence.unwrap_or(defaults.min_confidence),
            score: ScoreOptions {
                prefer_standard: self.prefer_standard,
                allow_live: self.allow_live,
            },
        }
    }
}

pub async fn run_search(config: &Config, artist: &str, title: &str, args: SearchArgs) -> Result<()> {
    let orchestrator = SearchOrchestrator::from_config(config)?;
    let results = orchestrator
        .search(artist, title, args.options(config))
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No matches for {} - {}", artist, title);
        return Ok(());
    }

    println!("\n🔎 {} matches for {} - {}\n", results.len(), artist, title);
    for result in &results {
        println!(
            "  {:>5.1}%  {}  [{}]",
            result.confidence * 100.0,
            describe(result),
            result.id
        );
    }

    Ok(())
}
