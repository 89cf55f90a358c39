use anyhow::{bail, Result};
use discern_core::{AlbumIdentity, Query, ResolvedAlbum};
use discern_resolve::{Config, SearchOptions, SearchOrchestrator};

/// Flags for `discern identity`.
#[derive(Debug, Clone, Default)]
pub struct IdentityArgs {
    pub query: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub apple_id: Option<String>,
    pub spotify_id: Option<String>,
    pub query_apple_id: Option<String>,
}

impl IdentityArgs {
    fn original_query(&self) -> Query {
        let query = Query::text(self.query.as_str());
        match &self.query_apple_id {
            Some(id) => query.with_apple_id(id.as_str()),
            None => query,
        }
    }

    /// The resolution given on the command line, if any.
    fn given_resolution(&self) -> Option<ResolvedAlbum> {
        let (Some(title), Some(artist)) = (&self.title, &self.artist) else {
            return None;
        };
        let mut resolved = ResolvedAlbum::new(title.as_str(), artist.as_str());
        if let Some(id) = &self.apple_id {
            resolved = resolved.with_apple_id(id.as_str());
        }
        if let Some(id) = &self.spotify_id {
            resolved = resolved.with_spotify_id(id.as_str());
        }
        Some(resolved)
    }
}

pub async fn run_identity(config: &Config, args: IdentityArgs) -> Result<()> {
    let query = args.original_query();

    let resolved = match args.given_resolution() {
        Some(resolved) => resolved,
        None => {
            let orchestrator = SearchOrchestrator::from_config(config)?;
            let results = orchestrator
                .search(
                    query.expected_artist(),
                    query.expected_album(),
                    SearchOptions::from_config(config),
                )
                .await?;
            let Some(best) = results.first() else {
                bail!("No catalog match for '{}'", query);
            };
            ResolvedAlbum::from(best)
        }
    };

    let identity = AlbumIdentity::new(query, resolved);
    println!("{}", serde_json::to_string_pretty(&identity.to_json()?)?);
    log::info!(
        "Identity {} has confidence {:.3} ({})",
        identity.cache_key(),
        identity.match_confidence(),
        if identity.is_valid() { "valid" } else { "invalid" }
    );

    Ok(())
}
