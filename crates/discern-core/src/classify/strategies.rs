//! The built-in classification strategies, in pipeline order.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{ClassificationContext, ClassificationStrategy};
use crate::error::Result;
use crate::grouping::normalize_title_for_grouping;
use crate::keywords;
use crate::model::{CatalogRecord, Classification};

const SINGLE_MAX_TRACKS: u32 = 3;
const SINGLE_MAX_MINUTES: f64 = 15.0;
const EP_MAX_TRACKS: u32 = 6;
const EP_MAX_MINUTES: f64 = 30.0;
const ALBUM_MIN_TRACKS: u32 = 7;
const ALBUM_MIN_MINUTES: f64 = 30.0;

struct TitlePatterns {
    single: Regex,
    ep: Regex,
    compilation: Regex,
}

#[allow(clippy::expect_used)]
static TITLE_PATTERNS: LazyLock<TitlePatterns> = LazyLock::new(|| {
    // Static patterns; compilation cannot fail.
    TitlePatterns {
        single: Regex::new(r"(?:-\s*single\s*$|[\(\[]single[\)\]])").expect("single pattern"),
        ep: Regex::new(r"(?:-\s*ep\s*$|[\(\[]ep[\)\]]|\bep\s*$)").expect("ep pattern"),
        compilation: Regex::new(
            r"\b(?:greatest hits|best of|the essential|anthology|the very best|the collection|the singles|hits collection)\b",
        )
        .expect("compilation pattern"),
    }
});

// ---------------------------------------------------------------------------
// 1. First-party catalog flags
// ---------------------------------------------------------------------------

/// Trusts the catalog's own `isSingle` / `isCompilation` flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleMetadataStrategy;

#[async_trait]
impl ClassificationStrategy for AppleMetadataStrategy {
    fn name(&self) -> &'static str {
        "apple_metadata"
    }

    async fn execute(
        &self,
        album: &CatalogRecord,
        _ctx: &ClassificationContext,
    ) -> Result<Option<Classification>> {
        let attrs = &album.attributes;
        if attrs.is_single == Some(true) {
            return Ok(Some(Classification::Single));
        }
        if attrs.is_compilation == Some(true) {
            return Ok(Some(Classification::Compilation));
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// 2. Title keywords
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct TitleKeywordStrategy;

#[async_trait]
impl ClassificationStrategy for TitleKeywordStrategy {
    fn name(&self) -> &'static str {
        "title_keyword"
    }

    async fn execute(
        &self,
        album: &CatalogRecord,
        _ctx: &ClassificationContext,
    ) -> Result<Option<Classification>> {
        let title = album.title.to_lowercase();
        let patterns = &*TITLE_PATTERNS;

        if patterns.single.is_match(&title) {
            return Ok(Some(Classification::Single));
        }
        if patterns.ep.is_match(&title) {
            return Ok(Some(Classification::Ep));
        }
        if keywords::is_live(&title) || title.contains("unplugged") {
            return Ok(Some(Classification::Live));
        }
        if patterns.compilation.is_match(&title) {
            return Ok(Some(Classification::Compilation));
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// 3. Remix-heavy track listings
// ---------------------------------------------------------------------------

/// Flags releases whose track list is mostly remixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemixTracksStrategy;

#[async_trait]
impl ClassificationStrategy for RemixTracksStrategy {
    fn name(&self) -> &'static str {
        "remix_tracks"
    }

    async fn execute(
        &self,
        album: &CatalogRecord,
        _ctx: &ClassificationContext,
    ) -> Result<Option<Classification>> {
        let total = album.tracks.len();
        if total < 2 {
            return Ok(None);
        }
        let remixes = album
            .tracks
            .iter()
            .filter(|t| t.title.to_lowercase().contains("remix"))
            .count();
        if remixes * 2 <= total {
            return Ok(None);
        }
        if total <= EP_MAX_TRACKS as usize {
            Ok(Some(Classification::Ep))
        } else {
            Ok(Some(Classification::Compilation))
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Track count and duration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackCountStrategy;

#[async_trait]
impl ClassificationStrategy for TrackCountStrategy {
    fn name(&self) -> &'static str {
        "track_count"
    }

    async fn execute(
        &self,
        _album: &CatalogRecord,
        ctx: &ClassificationContext,
    ) -> Result<Option<Classification>> {
        let tracks = ctx.track_count;
        if tracks == 0 {
            return Ok(None);
        }
        let minutes = ctx.duration_minutes;

        if tracks <= SINGLE_MAX_TRACKS && minutes.map_or(true, |m| m < SINGLE_MAX_MINUTES) {
            return Ok(Some(Classification::Single));
        }
        if tracks <= EP_MAX_TRACKS && minutes.map_or(true, |m| m < EP_MAX_MINUTES) {
            return Ok(Some(Classification::Ep));
        }
        // Long electronic releases are often DJ mixes; let the whitelist decide.
        if ctx.is_electronic() && !ctx.ai_whitelist.is_empty() {
            return Ok(None);
        }
        if tracks >= ALBUM_MIN_TRACKS || minutes.is_some_and(|m| m >= ALBUM_MIN_MINUTES) {
            return Ok(Some(Classification::Album));
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// 5. AI-suggested studio album whitelist
// ---------------------------------------------------------------------------

/// Last resort: compare against the externally supplied studio album list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AiWhitelistStrategy;

#[async_trait]
impl ClassificationStrategy for AiWhitelistStrategy {
    fn name(&self) -> &'static str {
        "ai_whitelist"
    }

    async fn execute(
        &self,
        album: &CatalogRecord,
        ctx: &ClassificationContext,
    ) -> Result<Option<Classification>> {
        if ctx.ai_whitelist.is_empty() {
            return Ok(None);
        }
        let title = normalize_title_for_grouping(&album.title);
        if title.is_empty() {
            return Ok(None);
        }
        let listed = ctx
            .ai_whitelist
            .iter()
            .any(|entry| normalize_title_for_grouping(entry) == title);

        if listed {
            Ok(Some(Classification::Album))
        } else if ctx.is_electronic() {
            Ok(Some(Classification::Compilation))
        } else {
            Ok(None)
        }
    }
}
