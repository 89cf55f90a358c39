//! Music catalog access.
//!
//! The orchestrator only depends on [`CatalogSearch`]; the Apple Music
//! client is the production implementation and tests supply their own.

pub mod apple_music;

use std::fmt;

use async_trait::async_trait;

use discern_core::CatalogRecord;

use crate::error::ResolveResult;

/// Search and discography lookups against a music catalog.
#[async_trait]
pub trait CatalogSearch: fmt::Debug + Send + Sync {
    /// Search albums matching an artist and title, at most `limit` results.
    async fn search_albums(
        &self,
        artist: &str,
        title: &str,
        limit: usize,
    ) -> ResolveResult<Vec<CatalogRecord>>;

    /// Every album the catalog lists for an artist. An unknown artist
    /// yields an empty list rather than an error.
    async fn get_artist_albums(&self, artist: &str) -> ResolveResult<Vec<CatalogRecord>>;
}

/// Fill an artwork URL template to a square image of `size` pixels.
///
/// Catalog artwork references carry `{w}` and `{h}` placeholders, and
/// sometimes `{c}` (crop) and `{f}` (format).
pub fn resolve_artwork(template: &str, size: u32) -> String {
    let size = size.to_string();
    template
        .replace("{w}", &size)
        .replace("{h}", &size)
        .replace("{c}", "bb")
        .replace("{f}", "jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_artwork() {
        assert_eq!(
            resolve_artwork("https://is1.mzstatic.com/image/thumb/x/{w}x{h}bb.jpg", 600),
            "https://is1.mzstatic.com/image/thumb/x/600x600bb.jpg"
        );
        assert_eq!(
            resolve_artwork("https://a/{w}x{h}{c}.{f}", 100),
            "https://a/100x100bb.jpg"
        );
    }

    #[test]
    fn test_resolve_artwork_without_placeholders() {
        assert_eq!(resolve_artwork("https://a/cover.png", 300), "https://a/cover.png");
    }
}
