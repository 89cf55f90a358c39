//! Artist name normalization.
//!
//! Catalogs disagree about how collaborations, abbreviations, and leading
//! articles are spelled. [`ArtistNormalizer`] maps common aliases to a
//! canonical spelling and produces spelling variants to retry a search with.

/// Known aliases, keyed by lowercased user spelling.
const ALIASES: &[(&str, &str)] = &[
    ("led zep", "led zeppelin"),
    ("page & plant", "robert plant & jimmy page"),
    ("page and plant", "robert plant & jimmy page"),
    ("gnr", "guns n' roses"),
    ("guns n roses", "guns n' roses"),
    ("guns and roses", "guns n' roses"),
    ("rhcp", "red hot chili peppers"),
    ("ccr", "creedence clearwater revival"),
    ("elo", "electric light orchestra"),
    ("csn", "crosby, stills & nash"),
    ("csny", "crosby, stills, nash & young"),
    ("s&g", "simon & garfunkel"),
    ("simon and garfunkel", "simon & garfunkel"),
    ("ratm", "rage against the machine"),
    ("qotsa", "queens of the stone age"),
    ("botdf", "blood on the dance floor"),
    ("floyd", "pink floyd"),
    ("the floyd", "pink floyd"),
    ("acdc", "ac/dc"),
    ("ac dc", "ac/dc"),
    ("bts", "bangtan boys"),
    ("mbv", "my bloody valentine"),
    ("gybe", "godspeed you! black emperor"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ArtistNormalizer;

impl ArtistNormalizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Canonical spelling for a known alias, otherwise the trimmed input.
    pub fn normalize(&self, artist: &str) -> String {
        let trimmed = artist.trim();
        let key = trimmed.to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, canonical)| (*canonical).to_string())
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// Spellings worth searching for, canonical form first.
    ///
    /// For `a & b` adds `a and b` and `b & a`; for `the x` adds `x`.
    /// Never empty and free of duplicates.
    pub fn alternatives(&self, artist: &str) -> Vec<String> {
        let normalized = self.normalize(artist);
        let mut out = vec![normalized.clone()];

        if let Some((left, right)) = normalized.split_once('&') {
            let (left, right) = (left.trim(), right.trim());
            push_unique(&mut out, format!("{left} and {right}"));
            push_unique(&mut out, format!("{right} & {left}"));
        }

        let has_article = normalized
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("the "));
        if has_article {
            push_unique(&mut out, normalized[4..].trim_start().to_string());
        }

        out
    }
}

fn push_unique(out: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !out.contains(&candidate) {
        out.push(candidate);
    }
}
