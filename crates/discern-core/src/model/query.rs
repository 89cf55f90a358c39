use std::fmt;

use serde::{Deserialize, Serialize};

const TEXT_SEPARATOR: &str = " - ";

/// A user's album query.
///
/// Stored either as the raw `"Artist - Album"` text the user typed or as a
/// structured record. Accessors normalize both shapes so callers never inspect
/// fields directly; absent fields read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Query {
    Text(String),
    Structured(StructuredQuery),
}

/// Structured query fields. `album` is accepted as an alias of `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub apple_id: Option<String>,
}

impl Query {
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }

    #[must_use]
    pub fn structured(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Structured(StructuredQuery {
            artist: Some(artist.into()),
            title: Some(title.into()),
            ..StructuredQuery::default()
        })
    }

    #[must_use]
    pub fn with_apple_id(self, apple_id: impl Into<String>) -> Self {
        let mut fields = match self {
            Self::Structured(fields) => fields,
            Self::Text(raw) => {
                let (artist, album) = split_text(&raw);
                StructuredQuery {
                    artist: Some(artist.to_string()),
                    title: Some(album.to_string()),
                    ..StructuredQuery::default()
                }
            }
        };
        fields.apple_id = Some(apple_id.into());
        Self::Structured(fields)
    }

    /// The artist the user asked for.
    pub fn expected_artist(&self) -> &str {
        match self {
            Self::Text(raw) => split_text(raw).0,
            Self::Structured(fields) => fields.artist.as_deref().unwrap_or("").trim(),
        }
    }

    /// The album title the user asked for.
    pub fn expected_album(&self) -> &str {
        match self {
            Self::Text(raw) => split_text(raw).1,
            Self::Structured(fields) => fields
                .title
                .as_deref()
                .filter(|title| !title.trim().is_empty())
                .or(fields.album.as_deref())
                .unwrap_or("")
                .trim(),
        }
    }

    pub fn apple_id(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Structured(fields) => fields.apple_id.as_deref(),
        }
    }
}

/// Split `"Artist - Album"` on the first separator. Without one, the whole
/// text is the album and the artist is empty.
fn split_text(raw: &str) -> (&str, &str) {
    match raw.split_once(TEXT_SEPARATOR) {
        Some((artist, album)) => (artist.trim(), album.trim()),
        None => ("", raw.trim()),
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let artist = self.expected_artist();
        if artist.is_empty() {
            write!(f, "{}", self.expected_album())
        } else {
            write!(f, "{}{}{}", artist, TEXT_SEPARATOR, self.expected_album())
        }
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::text(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_query_splits_on_first_separator() {
        let query = Query::text("Sigur Rós - ( ) - Remaster");
        assert_eq!(query.expected_artist(), "Sigur Rós");
        assert_eq!(query.expected_album(), "( ) - Remaster");
    }

    #[test]
    fn test_text_query_without_separator_is_album_only() {
        let query = Query::text("  Blue Train ");
        assert_eq!(query.expected_artist(), "");
        assert_eq!(query.expected_album(), "Blue Train");
    }

    #[test]
    fn test_structured_query_prefers_title_over_album() {
        let query = Query::Structured(StructuredQuery {
            artist: Some("Björk".to_string()),
            title: Some("Homogenic".to_string()),
            album: Some("Post".to_string()),
            apple_id: None,
        });
        assert_eq!(query.expected_album(), "Homogenic");
    }

    #[test]
    fn test_blank_title_falls_back_to_album() {
        let query = Query::Structured(StructuredQuery {
            artist: Some("Björk".to_string()),
            title: Some("  ".to_string()),
            album: Some("Vespertine".to_string()),
            apple_id: None,
        });
        assert_eq!(query.expected_album(), "Vespertine");
    }

    #[test]
    fn test_structured_query_missing_fields_default_to_empty() {
        let query: Query = serde_json::from_str(r#"{"album": "Vespertine"}"#).unwrap();
        assert_eq!(query.expected_artist(), "");
        assert_eq!(query.expected_album(), "Vespertine");
        assert!(query.apple_id().is_none());
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let text: Query = serde_json::from_str(r#""Can - Tago Mago""#).unwrap();
        assert!(matches!(text, Query::Text(_)));

        let structured: Query =
            serde_json::from_str(r#"{"artist": "Can", "title": "Tago Mago", "appleId": "99"}"#)
                .unwrap();
        assert_eq!(structured.apple_id(), Some("99"));
        assert_eq!(structured.expected_artist(), "Can");
    }

    #[test]
    fn test_with_apple_id_promotes_text_query() {
        let query = Query::text("Can - Ege Bamyasi").with_apple_id("123");
        assert_eq!(query.expected_artist(), "Can");
        assert_eq!(query.expected_album(), "Ege Bamyasi");
        assert_eq!(query.apple_id(), Some("123"));
    }

    #[test]
    fn test_display_round_trips_text_form() {
        let query = Query::structured("Can", "Future Days");
        assert_eq!(query.to_string(), "Can - Future Days");
    }
}
