//! Multi-strategy album search and discography resolution.
//!
//! [`SearchOrchestrator::search`] tries the normalized artist first and only
//! falls back to alternative spellings when nothing scored convincingly.
//! [`SearchOrchestrator::get_artist_discography`] fetches an artist's
//! catalog alongside the studio-album whitelist, classifies every release,
//! and groups editions together.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use discern_core::{
    group_variants, ArtistNormalizer, CatalogRecord, ClassificationHints,
    ClassificationPipeline, ScoreCalculator, ScoreOptions, ScoredResult, VariantGroup,
};

use crate::cache::ResultCache;
use crate::catalog::apple_music::AppleMusicClient;
use crate::catalog::CatalogSearch;
use crate::config::Config;
use crate::error::ResolveResult;
use crate::studio_albums::{StudioAlbumClient, StudioAlbumSource};

/// A top score above this ends the search early.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Per-search knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Catalog result limit for the first query. Fallback queries use half.
    pub limit: usize,
    /// Results below this confidence are dropped.
    pub min_confidence: f64,
    pub score: ScoreOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            min_confidence: 0.35,
            score: ScoreOptions::default(),
        }
    }
}

impl SearchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            limit: config.search_limit,
            min_confidence: config.min_confidence,
            score: ScoreOptions::default(),
        }
    }
}

#[derive(Debug)]
pub struct SearchOrchestrator {
    catalog: Arc<dyn CatalogSearch>,
    studio_albums: Option<Arc<dyn StudioAlbumSource>>,
    normalizer: ArtistNormalizer,
    scorer: ScoreCalculator,
    pipeline: ClassificationPipeline,
    cache: Mutex<ResultCache>,
}

impl SearchOrchestrator {
    /// An orchestrator over `catalog` with an unbounded cache and no
    /// studio-album source.
    pub fn new(catalog: Arc<dyn CatalogSearch>) -> Self {
        Self {
            catalog,
            studio_albums: None,
            normalizer: ArtistNormalizer::new(),
            scorer: ScoreCalculator::new(),
            pipeline: ClassificationPipeline::new(),
            cache: Mutex::new(ResultCache::new()),
        }
    }

    /// Build the production wiring: Apple Music plus the optional
    /// studio-album service.
    ///
    /// # Errors
    ///
    /// Fails when no Apple Music token is configured or an HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> ResolveResult<Self> {
        let token = config.require_apple_music_token()?;
        let catalog = AppleMusicClient::new(
            token,
            config.storefront.as_str(),
            config.requests_per_second,
        )?;

        let mut orchestrator = Self::new(Arc::new(catalog))
            .with_cache(ResultCache::with_capacity(config.cache_capacity));
        if let Some(endpoint) = &config.studio_albums_endpoint {
            let studio_albums = StudioAlbumClient::new(endpoint.as_str())?;
            orchestrator = orchestrator.with_studio_albums(Arc::new(studio_albums));
        }
        Ok(orchestrator)
    }

    #[must_use]
    pub fn with_studio_albums(mut self, source: Arc<dyn StudioAlbumSource>) -> Self {
        self.studio_albums = Some(source);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = Mutex::new(cache);
        self
    }

    #[must_use]
    pub fn with_pipeline(mut self, pipeline: ClassificationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn pipeline(&self) -> &ClassificationPipeline {
        &self.pipeline
    }

    /// Number of searches currently cached.
    pub async fn cached_searches(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Search for an album, best match first.
    ///
    /// Results are filtered by `options.min_confidence` and cached under
    /// the exact `artist|title` the caller passed. A repeated call is served
    /// from the cache without touching the catalog, whatever its options.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the primary catalog query. Failures of
    /// fallback queries are logged and skipped.
    pub async fn search(
        &self,
        artist: &str,
        title: &str,
        options: SearchOptions,
    ) -> ResolveResult<Vec<ScoredResult>> {
        let key = ResultCache::key(artist, title);
        if let Some(hit) = self.cache.lock().await.get(&key) {
            log::debug!("Cache hit for '{key}'");
            return Ok(hit.clone());
        }

        let normalized = self.normalizer.normalize(artist);
        let records = self
            .catalog
            .search_albums(&normalized, title, options.limit)
            .await?;
        let mut results = self.score_all(records, &normalized, title, options.score);
        sort_by_confidence(&mut results);

        if top_confidence(&results) > HIGH_CONFIDENCE {
            log::debug!("Primary search for '{normalized}' is conclusive");
            return Ok(self.finish(key, results, options.min_confidence).await);
        }

        let fallback_limit = (options.limit / 2).max(1);
        for alternative in self.normalizer.alternatives(artist) {
            if alternative == normalized {
                continue;
            }
            log::debug!("Retrying search with alternative artist '{alternative}'");
            match self
                .catalog
                .search_albums(&alternative, title, fallback_limit)
                .await
            {
                Ok(records) => {
                    let scored = self.score_all(records, &alternative, title, options.score);
                    merge_by_id(&mut results, scored);
                    sort_by_confidence(&mut results);
                }
                Err(e) => {
                    log::warn!("Alternative search for '{alternative}' failed: {e}");
                }
            }
            if top_confidence(&results) > HIGH_CONFIDENCE {
                break;
            }
        }

        // No loose, title-only pass exists; what the spellings found is final.
        log::debug!(
            "Search for '{artist}' / '{title}' finished with {} candidates",
            results.len()
        );
        Ok(self.finish(key, results, options.min_confidence).await)
    }

    /// An artist's catalog, classified and grouped into editions.
    ///
    /// The catalog and the studio-album whitelist are fetched concurrently.
    /// A failing whitelist is logged and treated as empty. When the catalog
    /// knows nothing under the normalized name, the second alternative
    /// spelling is tried once.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures.
    pub async fn get_artist_discography(&self, artist: &str) -> ResolveResult<Vec<VariantGroup>> {
        let normalized = self.normalizer.normalize(artist);
        let (albums, whitelist) = tokio::join!(
            self.catalog.get_artist_albums(&normalized),
            self.fetch_whitelist(&normalized)
        );
        let mut albums = albums?;

        if albums.is_empty() {
            if let Some(alternative) = self.normalizer.alternatives(artist).into_iter().nth(1) {
                log::info!("No albums for '{normalized}', retrying as '{alternative}'");
                albums = self.catalog.get_artist_albums(&alternative).await?;
            }
        }

        if albums.is_empty() {
            log::info!("No discography found for '{artist}'");
            return Ok(Vec::new());
        }

        let hints = ClassificationHints::with_whitelist(whitelist);
        let mut classified = Vec::with_capacity(albums.len());
        for album in albums {
            let label = self.pipeline.classify(&album, &hints).await;
            classified.push(ScoredResult::from_record(album, 1.0).with_release_type(label));
        }

        let groups = group_variants(classified);
        log::info!("Discography for '{artist}': {} releases", groups.len());
        Ok(groups)
    }

    async fn fetch_whitelist(&self, artist: &str) -> Vec<String> {
        let Some(source) = &self.studio_albums else {
            return Vec::new();
        };
        match source.studio_albums(artist).await {
            Ok(albums) => albums,
            Err(e) => {
                log::warn!("Studio album whitelist unavailable for '{artist}': {e}");
                Vec::new()
            }
        }
    }

    fn score_all(
        &self,
        records: Vec<CatalogRecord>,
        artist: &str,
        title: &str,
        options: ScoreOptions,
    ) -> Vec<ScoredResult> {
        records
            .into_iter()
            .map(|record| {
                let confidence = self.scorer.calculate(&record, artist, title, options);
                ScoredResult::from_record(record, confidence)
            })
            .collect()
    }

    async fn finish(
        &self,
        key: String,
        mut results: Vec<ScoredResult>,
        min_confidence: f64,
    ) -> Vec<ScoredResult> {
        results.retain(|r| r.confidence >= min_confidence);
        log::info!("Search '{key}' returned {} results", results.len());
        self.cache.lock().await.insert(key, results.clone());
        results
    }
}

/// Stable descending sort; ties keep catalog order.
fn sort_by_confidence(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

fn top_confidence(results: &[ScoredResult]) -> f64 {
    results.first().map_or(0.0, |r| r.confidence)
}

/// Append results whose id is not already present.
fn merge_by_id(results: &mut Vec<ScoredResult>, incoming: Vec<ScoredResult>) {
    let mut seen: HashSet<String> = results.iter().map(|r| r.id.clone()).collect();
    for result in incoming {
        if seen.insert(result.id.clone()) {
            results.push(result);
        }
    }
}
