//! Apple Music catalog client.
//!
//! Talks to the Apple Music API with a developer token. Album search uses
//! the catalog search endpoint; discographies resolve the artist by search,
//! page through the artist's albums relationship, and then fetch the album
//! resources again with their tracks so track titles and durations are
//! available to classification.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use discern_core::model::{CatalogAttributes, CatalogTrack};
use discern_core::CatalogRecord;

use crate::catalog::CatalogSearch;
use crate::error::{ResolveError, ResolveResult};
use crate::throttle::Throttle;

const APPLE_MUSIC_HOST: &str = "https://api.music.apple.com";
const SOURCE_NAME: &str = "Apple Music";

/// The search endpoint rejects limits above this.
const MAX_SEARCH_LIMIT: usize = 25;
const ALBUM_PAGE_SIZE: usize = 100;
const MAX_ALBUM_PAGES: usize = 10;
/// Album ids per multi-fetch request.
const ALBUM_DETAIL_BATCH: usize = 25;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: SearchResults,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    albums: Option<Page<AppleAlbum>>,
    artists: Option<Page<AppleArtist>>,
}

/// One page of a paginated resource collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Path of the next page, relative to the API host.
    pub next: Option<String>,
}

/// An album resource.
#[derive(Debug, Clone, Deserialize)]
pub struct AppleAlbum {
    pub id: String,
    pub attributes: AppleAlbumAttributes,
    /// Present when the album was fetched with `include=tracks`.
    pub relationships: Option<AppleAlbumRelationships>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppleAlbumRelationships {
    pub tracks: Option<Page<AppleTrack>>,
}

/// A song or music video on an album.
#[derive(Debug, Clone, Deserialize)]
pub struct AppleTrack {
    #[serde(default)]
    pub attributes: AppleTrackAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleTrackAttributes {
    #[serde(default)]
    pub name: String,
    pub duration_in_millis: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleAlbumAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub release_date: Option<String>,
    pub artwork: Option<AppleArtwork>,
    pub track_count: Option<u32>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    pub is_single: Option<bool>,
    pub is_compilation: Option<bool>,
    pub is_complete: Option<bool>,
    pub content_rating: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppleArtwork {
    /// Template with `{w}` and `{h}` placeholders.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AppleArtist {
    id: String,
}

impl From<AppleAlbum> for CatalogRecord {
    fn from(album: AppleAlbum) -> Self {
        let attrs = album.attributes;
        let tracks: Vec<CatalogTrack> = album
            .relationships
            .and_then(|r| r.tracks)
            .map(|page| {
                page.data
                    .into_iter()
                    .map(|t| CatalogTrack {
                        title: t.attributes.name,
                        duration_millis: t.attributes.duration_in_millis,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let duration_millis = total_duration(&tracks);
        Self {
            id: album.id,
            title: attrs.name,
            artist_name: attrs.artist_name,
            release_date: attrs.release_date,
            artwork_ref: attrs.artwork.map(|a| a.url),
            track_count: attrs.track_count.unwrap_or(0),
            genres: attrs.genre_names,
            attributes: CatalogAttributes {
                is_single: attrs.is_single,
                is_compilation: attrs.is_compilation,
                is_complete: attrs.is_complete,
                content_rating: attrs.content_rating,
            },
            tracks,
            duration_millis,
        }
    }
}

/// Sum of track durations, only when every track reports one.
fn total_duration(tracks: &[CatalogTrack]) -> Option<u64> {
    if tracks.is_empty() {
        return None;
    }
    tracks.iter().map(|t| t.duration_millis).sum()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Apple Music API client.
///
/// Requests are paced by a shared [`Throttle`]; clones share both the
/// connection pool and the schedule.
#[derive(Debug, Clone)]
pub struct AppleMusicClient {
    http: Client,
    token: String,
    storefront: String,
    host: String,
    throttle: Throttle,
}

impl AppleMusicClient {
    /// Create a client for a storefront such as `"us"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        token: impl Into<String>,
        storefront: impl Into<String>,
        requests_per_second: u32,
    ) -> ResolveResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("discern/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            token: token.into(),
            storefront: storefront.into(),
            host: APPLE_MUSIC_HOST.to_string(),
            throttle: Throttle::new(requests_per_second),
        })
    }

    /// Point the client at a different host, e.g. a local mock server.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn storefront(&self) -> &str {
        &self.storefront
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ResolveResult<T> {
        self.throttle.acquire().await;

        let response = self
            .http
            .get(format!("{}{path}", self.host))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ResolveError::RateLimited {
                source_name: SOURCE_NAME.to_string(),
            });
        }

        let response = response.error_for_status().map_err(|e| ResolveError::Http {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        response.json().await.map_err(|e| ResolveError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }

    /// Refetch albums with their tracks included. A batch that fails keeps
    /// its listing records, which classify without track data.
    async fn with_tracks(&self, listing: Vec<AppleAlbum>) -> Vec<AppleAlbum> {
        let path = format!("/v1/catalog/{}/albums", self.storefront);
        let mut out = Vec::with_capacity(listing.len());

        for batch in listing.chunks(ALBUM_DETAIL_BATCH) {
            let ids = batch
                .iter()
                .map(|a| a.id.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let query = [("ids", ids), ("include", "tracks".to_string())];
            match self.get_json::<Page<AppleAlbum>>(&path, &query).await {
                Ok(page) => out.extend(merge_details(batch, page.data)),
                Err(e) => {
                    log::warn!("Could not fetch tracks for {} albums: {e}", batch.len());
                    out.extend_from_slice(batch);
                }
            }
        }
        out
    }

    async fn find_artist_id(&self, artist: &str) -> ResolveResult<Option<String>> {
        let path = format!("/v1/catalog/{}/search", self.storefront);
        let response: SearchResponse = self
            .get_json(
                &path,
                &[
                    ("term", artist.to_string()),
                    ("types", "artists".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(response
            .results
            .artists
            .and_then(|page| page.data.into_iter().next())
            .map(|a| a.id))
    }
}

/// Replace listing entries with their detailed resources, keeping listing
/// order. Albums missing from the detail response stay as listed.
fn merge_details(listing: &[AppleAlbum], details: Vec<AppleAlbum>) -> Vec<AppleAlbum> {
    let mut details: HashMap<String, AppleAlbum> =
        details.into_iter().map(|a| (a.id.clone(), a)).collect();
    listing
        .iter()
        .map(|a| details.remove(&a.id).unwrap_or_else(|| a.clone()))
        .collect()
}

#[async_trait]
impl CatalogSearch for AppleMusicClient {
    async fn search_albums(
        &self,
        artist: &str,
        title: &str,
        limit: usize,
    ) -> ResolveResult<Vec<CatalogRecord>> {
        let term = format!("{artist} {title}").trim().to_string();
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        log::debug!("Apple Music album search: '{term}' (limit {limit})");

        let path = format!("/v1/catalog/{}/search", self.storefront);
        let response: SearchResponse = self
            .get_json(
                &path,
                &[
                    ("term", term),
                    ("types", "albums".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .albums
            .map(|page| page.data.into_iter().map(CatalogRecord::from).collect())
            .unwrap_or_default())
    }

    async fn get_artist_albums(&self, artist: &str) -> ResolveResult<Vec<CatalogRecord>> {
        let Some(artist_id) = self.find_artist_id(artist).await? else {
            log::info!("Apple Music has no artist matching '{artist}'");
            return Ok(Vec::new());
        };

        let mut albums = Vec::new();
        let mut next = Some(format!(
            "/v1/catalog/{}/artists/{artist_id}/albums",
            self.storefront
        ));
        let mut pages = 0;

        while let Some(path) = next.take() {
            let query = if pages == 0 {
                vec![("limit", ALBUM_PAGE_SIZE.to_string())]
            } else {
                Vec::new()
            };
            let page: Page<AppleAlbum> = self.get_json(&path, &query).await?;
            albums.extend(page.data);
            pages += 1;

            if pages >= MAX_ALBUM_PAGES {
                log::warn!("Stopping discography paging for '{artist}' after {pages} pages");
                break;
            }
            next = page.next;
        }

        let albums = self.with_tracks(albums).await;
        log::debug!("Apple Music returned {} albums for '{artist}'", albums.len());
        Ok(albums.into_iter().map(CatalogRecord::from).collect())
    }
}
