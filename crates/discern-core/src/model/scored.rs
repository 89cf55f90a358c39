use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::model::catalog::CatalogRecord;
use crate::model::classification::Classification;

/// Anything that carries an album title.
pub trait Titled {
    fn title(&self) -> &str;
}

/// A catalog record scored against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub cover_ref: Option<String>,
    /// Match confidence in `[0, 1]`.
    pub confidence: f64,
    /// Release type, set for discography entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_type: Option<Classification>,
    pub raw: CatalogRecord,
}

impl ScoredResult {
    #[must_use]
    pub fn from_record(record: CatalogRecord, confidence: f64) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            artist: record.artist_name.clone(),
            year: record.release_year(),
            cover_ref: record.artwork_ref.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            release_type: None,
            raw: record,
        }
    }

    #[must_use]
    pub fn with_release_type(mut self, release_type: Classification) -> Self {
        self.release_type = Some(release_type);
        self
    }
}

impl Titled for ScoredResult {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for CatalogRecord {
    fn title(&self) -> &str {
        &self.title
    }
}

/// A cluster of editions believed to be the same release.
///
/// The header is the best-scoring edition seen so far and is always present
/// in `variants`. Dereferences to the header so a group reads like a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantGroup {
    #[serde(flatten)]
    header: ScoredResult,
    variants: Vec<ScoredResult>,
    has_multiple: bool,
}

impl VariantGroup {
    /// Start a group whose header and only variant is `first`.
    #[must_use]
    pub fn seed(first: ScoredResult) -> Self {
        Self {
            header: first.clone(),
            variants: vec![first],
            has_multiple: false,
        }
    }

    /// Add an edition to the group, promoting it to header when it scores
    /// strictly higher than the current header.
    pub fn absorb(&mut self, result: ScoredResult) {
        if result.confidence > self.header.confidence {
            self.replace_header(result.clone());
        }
        self.variants.push(result);
        self.has_multiple = self.variants.len() > 1;
    }

    /// Swap the display record without touching accumulated variants.
    pub fn replace_header(&mut self, header: ScoredResult) {
        self.header = header;
    }

    /// Order variants shortest title first.
    pub fn sort_variants_by_title_length(&mut self) {
        self.variants.sort_by_key(|v| v.title.chars().count());
    }

    pub fn header(&self) -> &ScoredResult {
        &self.header
    }

    pub fn variants(&self) -> &[ScoredResult] {
        &self.variants
    }

    pub fn has_multiple(&self) -> bool {
        self.has_multiple
    }

    #[must_use]
    pub fn into_variants(self) -> Vec<ScoredResult> {
        self.variants
    }
}

impl Deref for VariantGroup {
    type Target = ScoredResult;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

impl Titled for VariantGroup {
    fn title(&self) -> &str {
        &self.header.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, title: &str, confidence: f64) -> ScoredResult {
        ScoredResult::from_record(CatalogRecord::new(id, title, "Pink Floyd"), confidence)
    }

    #[test]
    fn test_from_record_copies_display_fields() {
        let record = CatalogRecord::new("7", "Animals", "Pink Floyd")
            .with_release_date("1977-01-23")
            .with_artwork_ref("https://img/{w}x{h}.jpg");
        let scored = ScoredResult::from_record(record, 1.7);
        assert_eq!(scored.year, Some(1977));
        assert_eq!(scored.cover_ref.as_deref(), Some("https://img/{w}x{h}.jpg"));
        assert!((scored.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_contains_header() {
        let group = VariantGroup::seed(result("1", "Meddle", 0.5));
        assert_eq!(group.variants().len(), 1);
        assert_eq!(group.variants()[0].id, group.header().id);
        assert!(!group.has_multiple());
    }

    #[test]
    fn test_absorb_upgrades_header_and_keeps_variants() {
        let mut group = VariantGroup::seed(result("1", "Meddle (Remastered)", 0.6));
        group.absorb(result("2", "Meddle", 0.9));
        group.absorb(result("3", "Meddle (Live)", 0.4));

        assert_eq!(group.header().id, "2");
        assert_eq!(group.variants().len(), 3);
        assert!(group.has_multiple());
    }

    #[test]
    fn test_absorb_ties_keep_existing_header() {
        let mut group = VariantGroup::seed(result("1", "Meddle", 0.7));
        group.absorb(result("2", "Meddle [Japan]", 0.7));
        assert_eq!(group.header().id, "1");
    }

    #[test]
    fn test_group_serializes_flat_header() {
        let group = VariantGroup::seed(result("1", "Meddle", 0.7));
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["hasMultiple"], false);
        assert_eq!(json["variants"].as_array().map(Vec::len), Some(1));
    }
}
