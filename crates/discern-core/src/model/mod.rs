pub mod catalog;
pub mod classification;
pub mod query;
pub mod scored;

pub use catalog::{CatalogAttributes, CatalogRecord, CatalogTrack};
pub use classification::Classification;
pub use query::{Query, StructuredQuery};
pub use scored::{ScoredResult, Titled, VariantGroup};
