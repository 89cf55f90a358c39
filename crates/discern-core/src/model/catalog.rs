use serde::{Deserialize, Serialize};

/// First-party flags attached to a catalog album.
///
/// Every flag is optional; catalogs routinely omit them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAttributes {
    #[serde(default)]
    pub is_single: Option<bool>,
    #[serde(default)]
    pub is_compilation: Option<bool>,
    #[serde(default)]
    pub is_complete: Option<bool>,
    #[serde(default)]
    pub content_rating: Option<String>,
}

/// A single track on a catalog album, when the catalog returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTrack {
    pub title: String,
    #[serde(default)]
    pub duration_millis: Option<u64>,
}

/// A raw album record as returned by the catalog search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist_name: String,
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Artwork URL template with `{w}`/`{h}` placeholders.
    #[serde(default)]
    pub artwork_ref: Option<String>,
    #[serde(default)]
    pub track_count: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub attributes: CatalogAttributes,
    #[serde(default)]
    pub tracks: Vec<CatalogTrack>,
    /// Total running time, if the catalog reported it.
    #[serde(default)]
    pub duration_millis: Option<u64>,
}

impl CatalogRecord {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist_name: artist_name.into(),
            release_date: None,
            artwork_ref: None,
            track_count: 0,
            genres: Vec::new(),
            attributes: CatalogAttributes::default(),
            tracks: Vec::new(),
            duration_millis: None,
        }
    }

    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_track_count(mut self, count: u32) -> Self {
        self.track_count = count;
        self
    }

    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: CatalogAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_tracks(mut self, tracks: Vec<CatalogTrack>) -> Self {
        self.tracks = tracks;
        self
    }

    #[must_use]
    pub fn with_duration_millis(mut self, millis: u64) -> Self {
        self.duration_millis = Some(millis);
        self
    }

    #[must_use]
    pub fn with_artwork_ref(mut self, template: impl Into<String>) -> Self {
        self.artwork_ref = Some(template.into());
        self
    }

    /// Release year parsed from the leading four digits of the release date.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    /// Number of tracks, preferring the explicit count over the track list.
    pub fn effective_track_count(&self) -> u32 {
        if self.track_count > 0 {
            self.track_count
        } else {
            u32::try_from(self.tracks.len()).unwrap_or(u32::MAX)
        }
    }

    /// Total running time in milliseconds.
    ///
    /// Falls back to summing the track list when the album-level duration is
    /// missing. Returns `None` when neither is known.
    pub fn total_duration_millis(&self) -> Option<u64> {
        if let Some(millis) = self.duration_millis {
            return Some(millis);
        }
        let summed: u64 = self.tracks.iter().filter_map(|t| t.duration_millis).sum();
        (summed > 0).then_some(summed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_full_date() {
        let record = CatalogRecord::new("1", "Kid A", "Radiohead").with_release_date("2000-10-02");
        assert_eq!(record.release_year(), Some(2000));
    }

    #[test]
    fn test_release_year_missing_or_garbage() {
        let record = CatalogRecord::new("1", "Kid A", "Radiohead");
        assert!(record.release_year().is_none());

        let record = record.with_release_date("n/a");
        assert!(record.release_year().is_none());
    }

    #[test]
    fn test_effective_track_count_falls_back_to_tracks() {
        let record = CatalogRecord::new("1", "EP", "Band").with_tracks(vec![
            CatalogTrack {
                title: "One".to_string(),
                duration_millis: Some(180_000),
            },
            CatalogTrack {
                title: "Two".to_string(),
                duration_millis: Some(200_000),
            },
        ]);
        assert_eq!(record.effective_track_count(), 2);
        assert_eq!(record.total_duration_millis(), Some(380_000));
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{"id": "1440857781"}"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "1440857781");
        assert!(record.title.is_empty());
        assert!(record.genres.is_empty());
        assert!(record.attributes.is_single.is_none());
    }

    #[test]
    fn test_deserialize_camel_case_attributes() {
        let json = r#"{
            "id": "42",
            "title": "Paranoid Android - Single",
            "artistName": "Radiohead",
            "trackCount": 1,
            "attributes": {"isSingle": true, "isCompilation": false}
        }"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.artist_name, "Radiohead");
        assert_eq!(record.track_count, 1);
        assert_eq!(record.attributes.is_single, Some(true));
        assert_eq!(record.attributes.is_compilation, Some(false));
    }
}
