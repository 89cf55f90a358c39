//! Integration tests for search orchestration and discography resolution.
//!
//! The catalog and studio-album collaborators are replaced by in-memory
//! fakes so the tests exercise the real scoring, classification and
//! grouping without network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use discern_core::{CatalogRecord, Classification, ScoreOptions};
use discern_resolve::{
    CatalogSearch, ResolveError, ResolveResult, ResultCache, SearchOptions, SearchOrchestrator,
    StudioAlbumSource,
};

#[derive(Debug, Default)]
struct FakeCatalog {
    searches: HashMap<String, Vec<CatalogRecord>>,
    discographies: HashMap<String, Vec<CatalogRecord>>,
    failing: Vec<String>,
    search_calls: Mutex<Vec<(String, usize)>>,
    discography_calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn with_search(mut self, artist: &str, records: Vec<CatalogRecord>) -> Self {
        self.searches.insert(artist.to_string(), records);
        self
    }

    fn with_discography(mut self, artist: &str, records: Vec<CatalogRecord>) -> Self {
        self.discographies.insert(artist.to_string(), records);
        self
    }

    fn failing_for(mut self, artist: &str) -> Self {
        self.failing.push(artist.to_string());
        self
    }

    fn unavailable(artist: &str) -> ResolveError {
        ResolveError::Http {
            source_name: "fake".to_string(),
            message: format!("503 for {artist}"),
        }
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search_albums(
        &self,
        artist: &str,
        _title: &str,
        limit: usize,
    ) -> ResolveResult<Vec<CatalogRecord>> {
        self.search_calls
            .lock()
            .unwrap()
            .push((artist.to_string(), limit));
        if self.failing.iter().any(|a| a == artist) {
            return Err(Self::unavailable(artist));
        }
        Ok(self.searches.get(artist).cloned().unwrap_or_default())
    }

    async fn get_artist_albums(&self, artist: &str) -> ResolveResult<Vec<CatalogRecord>> {
        self.discography_calls
            .lock()
            .unwrap()
            .push(artist.to_string());
        if self.failing.iter().any(|a| a == artist) {
            return Err(Self::unavailable(artist));
        }
        Ok(self.discographies.get(artist).cloned().unwrap_or_default())
    }
}

#[derive(Debug)]
struct FixedWhitelist(Vec<&'static str>);

#[async_trait]
impl StudioAlbumSource for FixedWhitelist {
    async fn studio_albums(&self, _artist: &str) -> ResolveResult<Vec<String>> {
        Ok(self.0.iter().map(|s| (*s).to_string()).collect())
    }
}

#[derive(Debug)]
struct BrokenWhitelist;

#[async_trait]
impl StudioAlbumSource for BrokenWhitelist {
    async fn studio_albums(&self, _artist: &str) -> ResolveResult<Vec<String>> {
        Err(ResolveError::Parse {
            source_name: "studio albums".to_string(),
            message: "not json".to_string(),
        })
    }
}

#[derive(Debug, Default)]
struct RecordingWhitelist {
    artists: Mutex<Vec<String>>,
}

#[async_trait]
impl StudioAlbumSource for RecordingWhitelist {
    async fn studio_albums(&self, artist: &str) -> ResolveResult<Vec<String>> {
        self.artists.lock().unwrap().push(artist.to_string());
        Ok(Vec::new())
    }
}

fn album(id: &str, title: &str, artist: &str) -> CatalogRecord {
    CatalogRecord::new(id, title, artist)
}

fn search_calls(catalog: &FakeCatalog) -> Vec<(String, usize)> {
    catalog.search_calls.lock().unwrap().clone()
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_conclusive_primary_search_skips_alternatives() {
    let catalog = Arc::new(FakeCatalog::default().with_search(
        "led zeppelin",
        vec![album("1", "Led Zeppelin IV", "Led Zeppelin")],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let results = orchestrator
        .search("Led Zep", "Led Zeppelin IV", SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].confidence > 0.99);
    assert_eq!(search_calls(&catalog), vec![("led zeppelin".to_string(), 50)]);
}

#[tokio::test]
async fn test_repeated_search_is_served_from_cache() {
    let catalog = Arc::new(FakeCatalog::default().with_search(
        "Radiohead",
        vec![album("1", "OK Computer", "Radiohead")],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let first = orchestrator
        .search("Radiohead", "OK Computer", SearchOptions::default())
        .await
        .unwrap();
    let second = orchestrator
        .search("Radiohead", "OK Computer", SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(search_calls(&catalog).len(), 1);
    assert_eq!(orchestrator.cached_searches().await, 1);
}

#[tokio::test]
async fn test_cache_key_is_not_normalized() {
    let catalog = Arc::new(FakeCatalog::default().with_search(
        "led zeppelin",
        vec![album("1", "Led Zeppelin IV", "Led Zeppelin")],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    for artist in ["Led Zep", "led zeppelin"] {
        orchestrator
            .search(artist, "Led Zeppelin IV", SearchOptions::default())
            .await
            .unwrap();
    }

    assert_eq!(search_calls(&catalog).len(), 2);
    assert_eq!(orchestrator.cached_searches().await, 2);
}

#[tokio::test]
async fn test_weak_primary_falls_back_with_half_limit() {
    let catalog = Arc::new(
        FakeCatalog::default()
            .with_search(
                "The Smiths",
                vec![album("1", "Hatful of Hollow", "The Smiths")],
            )
            .with_search("Smiths", vec![album("2", "Meat Is Murder", "The Smiths")]),
    );
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let results = orchestrator
        .search("The Smiths", "Meat Is Murder", SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(
        search_calls(&catalog),
        vec![("The Smiths".to_string(), 50), ("Smiths".to_string(), 25)]
    );
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
    assert!(results[0].confidence > 0.8);
}

#[tokio::test]
async fn test_failing_alternative_is_skipped() {
    let catalog = Arc::new(
        FakeCatalog::default()
            .with_search(
                "Simon & Garfunkel",
                vec![album("1", "Bridge", "Simon & Garfunkel")],
            )
            .failing_for("Simon and Garfunkel")
            .with_search(
                "Garfunkel & Simon",
                vec![
                    album("2", "Bookends", "Simon & Garfunkel"),
                    album("1", "Bridge", "Simon & Garfunkel"),
                ],
            ),
    );
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let results = orchestrator
        .search("Simon & Garfunkel", "Bookends", SearchOptions::default())
        .await
        .unwrap();

    let artists: Vec<String> = search_calls(&catalog).into_iter().map(|(a, _)| a).collect();
    assert_eq!(
        artists,
        vec!["Simon & Garfunkel", "Simon and Garfunkel", "Garfunkel & Simon"]
    );
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
}

#[tokio::test]
async fn test_primary_failure_propagates() {
    let catalog = Arc::new(FakeCatalog::default().failing_for("Radiohead"));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let err = orchestrator
        .search("Radiohead", "OK Computer", SearchOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert_eq!(orchestrator.cached_searches().await, 0);
}

#[tokio::test]
async fn test_results_below_min_confidence_are_dropped() {
    let catalog = Arc::new(FakeCatalog::default().with_search(
        "Radiohead",
        vec![album("1", "Thriller", "Michael Jackson")],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let results = orchestrator
        .search("Radiohead", "OK Computer", SearchOptions::default())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(orchestrator.cached_searches().await, 1);
}

#[tokio::test]
async fn test_live_results_rank_below_studio() {
    let catalog = Arc::new(FakeCatalog::default().with_search(
        "Nirvana",
        vec![
            album("live", "Nevermind (Live)", "Nirvana"),
            album("studio", "Nevermind", "Nirvana"),
        ],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let results = orchestrator
        .search(
            "Nirvana",
            "Nevermind",
            SearchOptions {
                score: ScoreOptions::default(),
                min_confidence: 0.0,
                ..SearchOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(results[0].id, "studio");
    assert!(results.windows(2).all(|w| w[0].confidence >= w[1].confidence));
}

#[tokio::test]
async fn test_bounded_cache_evicts_oldest_search() {
    let catalog = Arc::new(FakeCatalog::default());
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>)
        .with_cache(ResultCache::with_capacity(1));

    orchestrator
        .search("A", "x", SearchOptions::default())
        .await
        .unwrap();
    orchestrator
        .search("B", "y", SearchOptions::default())
        .await
        .unwrap();
    orchestrator
        .search("A", "x", SearchOptions::default())
        .await
        .unwrap();

    assert_eq!(orchestrator.cached_searches().await, 1);
    // "A" was evicted by "B", so it hit the catalog again.
    let artists: Vec<String> = search_calls(&catalog).into_iter().map(|(a, _)| a).collect();
    assert_eq!(artists, vec!["A", "B", "A"]);
}

// ---------------------------------------------------------------------------
// discography
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_discography_groups_editions_and_classifies() {
    let catalog = Arc::new(FakeCatalog::default().with_discography(
        "Pink Floyd",
        vec![
            album("1", "Dark Side of the Moon", "Pink Floyd").with_track_count(10),
            album("2", "Dark Side Of The Moon (2011 Remaster)", "Pink Floyd").with_track_count(10),
            album("3", "Live at Pompeii", "Pink Floyd").with_track_count(12),
        ],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let groups = orchestrator
        .get_artist_discography("Pink Floyd")
        .await
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert!(groups[0].has_multiple());
    assert_eq!(groups[0].variants().len(), 2);
    assert_eq!(groups[0].header().release_type, Some(Classification::Album));
    assert!((groups[0].header().confidence - 1.0).abs() < f64::EPSILON);
    assert_eq!(groups[1].header().release_type, Some(Classification::Live));
    assert!(!groups[1].has_multiple());
}

#[tokio::test]
async fn test_discography_uses_whitelist_for_electronic_artists() {
    let catalog = Arc::new(FakeCatalog::default().with_discography(
        "Daft Punk",
        vec![
            album("1", "Homework", "Daft Punk")
                .with_genres(["Electronic"])
                .with_track_count(16),
            album("2", "Alive 2007", "Daft Punk")
                .with_genres(["Electronic", "Dance"])
                .with_track_count(13),
        ],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>)
        .with_studio_albums(Arc::new(FixedWhitelist(vec!["Homework", "Discovery"])));

    let groups = orchestrator.get_artist_discography("Daft Punk").await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].header().release_type, Some(Classification::Album));
    assert_eq!(
        groups[1].header().release_type,
        Some(Classification::Compilation)
    );
}

#[tokio::test]
async fn test_whitelist_failure_does_not_fail_discography() {
    let catalog = Arc::new(FakeCatalog::default().with_discography(
        "Daft Punk",
        vec![album("1", "Homework", "Daft Punk")
            .with_genres(["Electronic"])
            .with_track_count(16)],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>)
        .with_studio_albums(Arc::new(BrokenWhitelist));

    let groups = orchestrator.get_artist_discography("Daft Punk").await.unwrap();

    assert_eq!(groups.len(), 1);
    // Without a whitelist the track count decides.
    assert_eq!(groups[0].header().release_type, Some(Classification::Album));
}

#[tokio::test]
async fn test_whitelist_is_asked_with_normalized_artist() {
    let catalog = Arc::new(FakeCatalog::default().with_discography(
        "led zeppelin",
        vec![album("1", "Led Zeppelin IV", "Led Zeppelin").with_track_count(8)],
    ));
    let whitelist = Arc::new(RecordingWhitelist::default());
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>)
        .with_studio_albums(Arc::clone(&whitelist) as Arc<dyn StudioAlbumSource>);

    let groups = orchestrator.get_artist_discography("Led Zep").await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        whitelist.artists.lock().unwrap().clone(),
        vec!["led zeppelin"]
    );
}

#[tokio::test]
async fn test_empty_discography_retries_second_alternative() {
    let catalog = Arc::new(FakeCatalog::default().with_discography(
        "robert plant and jimmy page",
        vec![album("1", "No Quarter", "Jimmy Page & Robert Plant").with_track_count(14)],
    ));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let groups = orchestrator
        .get_artist_discography("Page & Plant")
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        catalog.discography_calls.lock().unwrap().clone(),
        vec!["robert plant & jimmy page", "robert plant and jimmy page"]
    );
}

#[tokio::test]
async fn test_unknown_artist_has_empty_discography() {
    let catalog = Arc::new(FakeCatalog::default());
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>);

    let groups = orchestrator.get_artist_discography("Nobody").await.unwrap();

    assert!(groups.is_empty());
    // A single-spelling artist has no second alternative to try.
    assert_eq!(catalog.discography_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_discography_catalog_failure_propagates() {
    let catalog = Arc::new(FakeCatalog::default().failing_for("Pink Floyd"));
    let orchestrator = SearchOrchestrator::new(Arc::clone(&catalog) as Arc<dyn CatalogSearch>)
        .with_studio_albums(Arc::new(FixedWhitelist(vec!["Animals"])));

    assert!(orchestrator
        .get_artist_discography("Pink Floyd")
        .await
        .is_err());
}
