//! Core matching and classification engine for discern.
//!
//! This crate defines the album data model (catalog records, scored
//! results, variant groups, queries), the string-similarity scorer, artist
//! name normalization, edition filtering, the release-type classification
//! pipeline, and the durable [`AlbumIdentity`] record. Nothing here touches
//! the network; collaborators live in `discern-resolve`.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod classify;
pub mod edition;
pub mod error;
pub mod grouping;
pub mod identity;
pub mod keywords;
pub mod model;
pub mod normalize;
pub mod score;

pub use classify::{ClassificationHints, ClassificationPipeline};
pub use edition::{ActiveFilters, EditionFilter, EditionKind};
pub use error::{Error, Result};
pub use grouping::{group_variants, normalize_title_for_grouping};
pub use identity::{AlbumIdentity, AlbumIdentityRecord, ResolvedAlbum};
pub use model::{
    CatalogRecord, Classification, Query, ScoredResult, Titled, VariantGroup,
};
pub use normalize::ArtistNormalizer;
pub use score::{similarity, ScoreCalculator, ScoreOptions};
