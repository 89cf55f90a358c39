//! Catalog search orchestration for discern.
//!
//! Wires the pure scoring and classification engine from `discern-core` to
//! the network: an Apple Music catalog client, the AI studio-album
//! endpoint, request throttling, an owned result cache, and the
//! [`SearchOrchestrator`] that runs the multi-strategy search and the
//! discography pipeline.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod studio_albums;
pub mod throttle;

pub use cache::ResultCache;
pub use catalog::apple_music::AppleMusicClient;
pub use catalog::{resolve_artwork, CatalogSearch};
pub use config::Config;
pub use error::{ResolveError, ResolveResult};
pub use orchestrator::{SearchOptions, SearchOrchestrator};
pub use studio_albums::{StudioAlbumClient, StudioAlbumSource};
pub use throttle::Throttle;
