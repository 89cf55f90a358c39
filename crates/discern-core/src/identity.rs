//! Durable binding between a user's query and the album it resolved to.
//!
//! An [`AlbumIdentity`] is created once per resolution and often outlives
//! the request: it is serialized into caches and reloaded later. Its match
//! confidence is computed lazily, at most once per instance, and travels
//! with the serialized record so a reloaded identity reports the same
//! confidence even if the similarity function has since changed.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Query, ScoredResult};
use crate::score::similarity;

/// Minimum confidence for an identity to count as a match.
pub const DEFAULT_VALIDITY_THRESHOLD: f64 = 0.35;

const TITLE_WEIGHT: f64 = 0.6;
const ARTIST_WEIGHT: f64 = 0.4;

/// The catalog side of an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAlbum {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub apple_id: Option<String>,
    #[serde(default)]
    pub spotify_id: Option<String>,
}

impl ResolvedAlbum {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            apple_id: None,
            spotify_id: None,
        }
    }

    #[must_use]
    pub fn with_apple_id(mut self, id: impl Into<String>) -> Self {
        self.apple_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_spotify_id(mut self, id: impl Into<String>) -> Self {
        self.spotify_id = Some(id.into());
        self
    }
}

impl From<&ScoredResult> for ResolvedAlbum {
    fn from(result: &ScoredResult) -> Self {
        Self::new(result.title.clone(), result.artist.clone()).with_apple_id(result.id.clone())
    }
}

/// Plain storage form of an [`AlbumIdentity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumIdentityRecord {
    pub original_query: Query,
    pub resolved_title: String,
    pub resolved_artist: String,
    #[serde(default)]
    pub apple_id: Option<String>,
    #[serde(default)]
    pub spotify_id: Option<String>,
    #[serde(default)]
    pub match_confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "AlbumIdentityRecord", from = "AlbumIdentityRecord")]
pub struct AlbumIdentity {
    original_query: Query,
    resolved_title: String,
    resolved_artist: String,
    apple_id: Option<String>,
    spotify_id: Option<String>,
    match_confidence: OnceLock<f64>,
    created_at: DateTime<Utc>,
}

impl AlbumIdentity {
    #[must_use]
    pub fn new(original_query: Query, resolved: ResolvedAlbum) -> Self {
        Self {
            original_query,
            resolved_title: resolved.title,
            resolved_artist: resolved.artist,
            apple_id: resolved.apple_id,
            spotify_id: resolved.spotify_id,
            match_confidence: OnceLock::new(),
            created_at: Utc::now(),
        }
    }

    pub fn original_query(&self) -> &Query {
        &self.original_query
    }

    pub fn resolved_title(&self) -> &str {
        &self.resolved_title
    }

    pub fn resolved_artist(&self) -> &str {
        &self.resolved_artist
    }

    pub fn apple_id(&self) -> Option<&str> {
        self.apple_id.as_deref()
    }

    pub fn spotify_id(&self) -> Option<&str> {
        self.spotify_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Confidence that the resolved album is what the query asked for.
    ///
    /// Computed on first access and memoized for the life of the instance.
    pub fn match_confidence(&self) -> f64 {
        *self.match_confidence.get_or_init(|| self.compute_confidence())
    }

    /// Valid at the default threshold of 0.35.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(DEFAULT_VALIDITY_THRESHOLD)
    }

    /// Valid when confidence is at or above `threshold`.
    pub fn is_valid_at(&self, threshold: f64) -> bool {
        self.match_confidence() >= threshold
    }

    /// Stable key for the original query: `artist|album`, lowercased.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}",
            self.original_query.expected_artist().to_lowercase(),
            self.original_query.expected_album().to_lowercase()
        )
    }

    /// Storage form, with the confidence computed if it was not already.
    pub fn to_record(&self) -> AlbumIdentityRecord {
        AlbumIdentityRecord {
            original_query: self.original_query.clone(),
            resolved_title: self.resolved_title.clone(),
            resolved_artist: self.resolved_artist.clone(),
            apple_id: self.apple_id.clone(),
            spotify_id: self.spotify_id.clone(),
            match_confidence: Some(self.match_confidence()),
            created_at: self.created_at,
        }
    }

    /// Rebuild from storage. A stored confidence is reused verbatim.
    #[must_use]
    pub fn from_record(record: AlbumIdentityRecord) -> Self {
        let match_confidence = record
            .match_confidence
            .map(OnceLock::from)
            .unwrap_or_default();
        Self {
            original_query: record.original_query,
            resolved_title: record.resolved_title,
            resolved_artist: record.resolved_artist,
            apple_id: record.apple_id,
            spotify_id: record.spotify_id,
            match_confidence,
            created_at: record.created_at,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_record())?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let record: AlbumIdentityRecord = serde_json::from_value(value)?;
        Ok(Self::from_record(record))
    }

    fn compute_confidence(&self) -> f64 {
        if let (Some(wanted), Some(found)) = (self.original_query.apple_id(), self.apple_id()) {
            if wanted == found {
                return 1.0;
            }
        }

        let title_sim = similarity(
            &clean(self.original_query.expected_album()),
            &clean(&self.resolved_title),
        );
        let artist = clean(self.original_query.expected_artist());
        if artist.is_empty() {
            return title_sim.clamp(0.0, 1.0);
        }
        let artist_sim = similarity(&artist, &clean(&self.resolved_artist));
        (title_sim * TITLE_WEIGHT + artist_sim * ARTIST_WEIGHT).clamp(0.0, 1.0)
    }
}

impl From<AlbumIdentity> for AlbumIdentityRecord {
    fn from(identity: AlbumIdentity) -> Self {
        identity.to_record()
    }
}

impl From<AlbumIdentityRecord> for AlbumIdentity {
    fn from(record: AlbumIdentityRecord) -> Self {
        Self::from_record(record)
    }
}

/// Lowercase, drop bracketed segments, and collapse punctuation to spaces.
fn clean(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.to_lowercase().chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            c if c.is_alphanumeric() => out.push(c),
            _ => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
