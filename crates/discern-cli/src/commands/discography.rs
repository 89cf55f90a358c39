use anyhow::Result;
use discern_core::{ActiveFilters, EditionFilter, EditionKind, VariantGroup};
use discern_resolve::{Config, SearchOrchestrator};

use super::describe;

pub async fn run_discography(
    config: &Config,
    artist: &str,
    editions: Vec<EditionKind>,
    json: bool,
) -> Result<()> {
    let orchestrator = SearchOrchestrator::from_config(config)?;
    let groups = orchestrator.get_artist_discography(artist).await?;
    let groups = EditionFilter::apply(groups, &ActiveFilters::editions(editions));

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No releases found for {}", artist);
        return Ok(());
    }

    println!("\n💿 {}: {} releases\n", artist, groups.len());
    for group in &groups {
        println!("  {}", format_group(group));
    }

    Ok(())
}

fn format_group(group: &VariantGroup) -> String {
    let label = group.release_type.map_or("?", |t| t.as_str());
    let line = format!("{:<13} {}", label, describe(group.header()));
    if group.has_multiple() {
        format!("{line}  (+{} editions)", group.variants().len() - 1)
    } else {
        line
    }
}
