//! Release-type classification.
//!
//! A [`ClassificationPipeline`] runs an ordered list of strategies over an
//! album. Each strategy either names a [`Classification`] or abstains; the
//! first answer wins and an album nobody claims is `Uncategorized`. Later
//! strategies only run when every earlier one abstained, so order is part of
//! the contract and strategies never run concurrently.
//!
//! A strategy that returns an error is logged and counted as an abstention.

pub mod strategies;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{CatalogRecord, Classification};

pub use strategies::{
    AiWhitelistStrategy, AppleMetadataStrategy, RemixTracksStrategy, TitleKeywordStrategy,
    TrackCountStrategy,
};

/// Genres whose catalog metadata is unreliable enough to defer to the AI
/// whitelist.
const ELECTRONIC_GENRES: &[&str] = &[
    "electronic",
    "electronica",
    "dance",
    "house",
    "techno",
    "trance",
    "drum & bass",
    "dubstep",
    "edm",
    "idm",
];

/// Caller-supplied context for a classification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationHints {
    /// Canonical studio album titles for the artist, if known.
    #[serde(default)]
    pub ai_whitelist: Vec<String>,
}

impl ClassificationHints {
    #[must_use]
    pub fn with_whitelist(ai_whitelist: Vec<String>) -> Self {
        Self { ai_whitelist }
    }
}

/// Everything a strategy may consult, computed once per album.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationContext {
    /// Lowercased genre names.
    pub genres: Vec<String>,
    pub track_count: u32,
    /// Total running time in minutes, when known.
    pub duration_minutes: Option<f64>,
    pub release_year: Option<i32>,
    pub ai_whitelist: Vec<String>,
}

impl ClassificationContext {
    pub fn for_album(album: &CatalogRecord, hints: &ClassificationHints) -> Self {
        Self {
            genres: album.genres.iter().map(|g| g.to_lowercase()).collect(),
            track_count: album.effective_track_count(),
            duration_minutes: album
                .total_duration_millis()
                .map(|millis| millis as f64 / 60_000.0),
            release_year: album.release_year(),
            ai_whitelist: hints.ai_whitelist.clone(),
        }
    }

    pub fn is_electronic(&self) -> bool {
        self.genres
            .iter()
            .any(|g| ELECTRONIC_GENRES.iter().any(|e| g.contains(e)))
    }
}

/// One stage of the pipeline.
#[async_trait]
pub trait ClassificationStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means "no opinion, ask the next strategy".
    async fn execute(
        &self,
        album: &CatalogRecord,
        ctx: &ClassificationContext,
    ) -> Result<Option<Classification>>;
}

/// Label plus the derived flags used by list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchClassification {
    pub id: String,
    pub label: Classification,
    pub is_studio_album: bool,
    pub is_single_or_ep: bool,
    pub is_live: bool,
    pub is_compilation: bool,
}

impl BatchClassification {
    fn from_label(id: &str, label: Classification) -> Self {
        Self {
            id: id.to_string(),
            label,
            is_studio_album: label == Classification::Album,
            is_single_or_ep: matches!(label, Classification::Single | Classification::Ep),
            is_live: label == Classification::Live,
            is_compilation: label == Classification::Compilation,
        }
    }
}

#[derive(Debug)]
pub struct ClassificationPipeline {
    strategies: Vec<Box<dyn ClassificationStrategy>>,
}

impl Default for ClassificationPipeline {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(AppleMetadataStrategy),
            Box::new(TitleKeywordStrategy),
            Box::new(RemixTracksStrategy),
            Box::new(TrackCountStrategy),
            Box::new(AiWhitelistStrategy),
        ])
    }
}

impl ClassificationPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline with a custom strategy order.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ClassificationStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Classify one album. Always returns a label.
    pub async fn classify(
        &self,
        album: &CatalogRecord,
        hints: &ClassificationHints,
    ) -> Classification {
        let ctx = ClassificationContext::for_album(album, hints);
        self.classify_with_context(album, &ctx).await
    }

    /// Classify with a precomputed context.
    pub async fn classify_with_context(
        &self,
        album: &CatalogRecord,
        ctx: &ClassificationContext,
    ) -> Classification {
        for strategy in &self.strategies {
            match strategy.execute(album, ctx).await {
                Ok(Some(label)) => {
                    log::debug!(
                        "{} classified '{}' as {}",
                        strategy.name(),
                        album.title,
                        label
                    );
                    return label;
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!(
                        "Classification strategy {} failed for '{}': {}",
                        strategy.name(),
                        album.title,
                        e
                    );
                }
            }
        }
        Classification::Uncategorized
    }

    /// Classify a list of albums, one pipeline run per album.
    pub async fn classify_batch(
        &self,
        albums: &[CatalogRecord],
        hints: &ClassificationHints,
    ) -> Vec<BatchClassification> {
        let mut out = Vec::with_capacity(albums.len());
        for album in albums {
            let label = self.classify(album, hints).await;
            out.push(BatchClassification::from_label(&album.id, label));
        }
        out
    }
}
