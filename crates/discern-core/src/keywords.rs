//! Title keyword sets shared by the scorer, the edition filter, and the
//! classification strategies.
//!
//! All matching is done on lowercased titles. Multi-word keywords match as
//! plain substrings; the live set matches whole words only so that titles
//! such as "Alive" or "Detour" are not mistaken for concert recordings.

use std::sync::LazyLock;

use regex::Regex;

/// Re-release markers that lower a match unless the query asked for them.
pub const EDITION_PENALTY: &[&str] = &["deluxe", "expanded", "edition", "remaster"];

/// Markers that put a title in the deluxe bucket of the edition filter.
pub const DELUXE: &[&str] = &["deluxe", "expanded", "edition", "bonus tracks"];

pub const REMASTER: &[&str] = &["remaster"];

/// Whole-word live markers.
pub const LIVE: &[&str] = &["live", "concert", "tour"];

/// Keywords stripped from titles before variant grouping.
pub const GROUPING_NOISE: &[&str] = &["deluxe", "remaster", "edition", "expanded", "version"];

#[allow(clippy::expect_used)]
static LIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Static pattern; compilation cannot fail.
    Regex::new(r"\b(?:live|concert|tour)\b").expect("live keyword pattern")
});

/// Whether a lowercased title contains any of `keywords` as a substring.
pub fn contains_any(title_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| title_lower.contains(k))
}

/// Whether a title looks like a live recording.
pub fn is_live(title: &str) -> bool {
    LIVE_PATTERN.is_match(&title.to_lowercase())
}

pub fn is_deluxe(title: &str) -> bool {
    contains_any(&title.to_lowercase(), DELUXE)
}

pub fn is_remaster(title: &str) -> bool {
    contains_any(&title.to_lowercase(), REMASTER)
}

pub fn has_edition_marker(title: &str) -> bool {
    contains_any(&title.to_lowercase(), EDITION_PENALTY)
}
