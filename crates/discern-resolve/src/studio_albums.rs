//! AI-backed studio album whitelist.
//!
//! An external service answers "which of this artist's releases are
//! canonical studio albums". The classification pipeline uses the answer as
//! a hint for catalogs whose metadata is unreliable, so failures here are
//! never fatal to the caller.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

const SOURCE_NAME: &str = "studio albums";
const STUDIO_ALBUMS_PATH: &str = "/api/ai/studio-albums";

/// Source of canonical studio album titles for an artist.
#[async_trait]
pub trait StudioAlbumSource: fmt::Debug + Send + Sync {
    async fn studio_albums(&self, artist: &str) -> ResolveResult<Vec<String>>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StudioAlbumsRequest<'a> {
    artist_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct StudioAlbumsResponse {
    #[serde(default)]
    albums: Vec<String>,
}

/// HTTP client for the studio-album endpoint.
#[derive(Debug, Clone)]
pub struct StudioAlbumClient {
    http: Client,
    base_url: String,
}

impl StudioAlbumClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> ResolveResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("discern/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{STUDIO_ALBUMS_PATH}", self.base_url)
    }
}

#[async_trait]
impl StudioAlbumSource for StudioAlbumClient {
    async fn studio_albums(&self, artist: &str) -> ResolveResult<Vec<String>> {
        let response = self
            .http
            .post(self.endpoint())
            .json(&StudioAlbumsRequest {
                artist_name: artist,
            })
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ResolveError::Http {
                source_name: SOURCE_NAME.to_string(),
                message: e.to_string(),
            })?;

        let body: StudioAlbumsResponse =
            response.json().await.map_err(|e| ResolveError::Parse {
                source_name: SOURCE_NAME.to_string(),
                message: e.to_string(),
            })?;

        log::debug!(
            "Studio album whitelist for '{artist}': {} titles",
            body.albums.len()
        );
        Ok(body.albums)
    }
}
