//! Match confidence scoring.
//!
//! A candidate's confidence is a weighted blend of title and artist
//! similarity, followed by contextual penalties for editions and live
//! recordings the user did not ask for. Results are always in `[0, 1]`.

use serde::{Deserialize, Serialize};

use crate::keywords;
use crate::model::CatalogRecord;

const TITLE_WEIGHT: f64 = 0.6;
const ARTIST_WEIGHT: f64 = 0.4;
const EDITION_PENALTY: f64 = 0.15;
const LIVE_PENALTY: f64 = 0.4;

/// Normalized Levenshtein similarity of two strings, case-insensitive.
///
/// `1 - distance / max(len)`, measured in characters. Two empty strings are
/// identical (1.0); an empty string against a non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Per-call scoring switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOptions {
    /// Skip all penalties.
    #[serde(default)]
    pub prefer_standard: bool,
    /// Do not penalize live recordings.
    #[serde(default)]
    pub allow_live: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator;

impl ScoreCalculator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Confidence that `record` is the album the user asked for.
    pub fn calculate(
        &self,
        record: &CatalogRecord,
        query_artist: &str,
        query_title: &str,
        options: ScoreOptions,
    ) -> f64 {
        let title_sim = similarity(query_title, &record.title);
        let artist_sim = similarity(query_artist, &record.artist_name);
        let mut score = title_sim * TITLE_WEIGHT + artist_sim * ARTIST_WEIGHT;

        if !options.prefer_standard {
            if keywords::has_edition_marker(&record.title)
                && !keywords::has_edition_marker(query_title)
            {
                score -= EDITION_PENALTY;
            }
            if !options.allow_live
                && keywords::is_live(&record.title)
                && !keywords::is_live(query_title)
            {
                score -= LIVE_PENALTY;
            }
        }

        score.clamp(0.0, 1.0)
    }
}
