//! Edition bucketing and filtering.
//!
//! Titles are bucketed as standard, deluxe, or remaster by keyword. A
//! remaster can also be standard; a deluxe edition never is.

use serde::{Deserialize, Serialize};

use crate::keywords;
use crate::model::Titled;

/// An edition bucket a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditionKind {
    Standard,
    Deluxe,
    Remaster,
}

impl std::str::FromStr for EditionKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "deluxe" => Ok(Self::Deluxe),
            "remaster" | "remastered" => Ok(Self::Remaster),
            other => Err(crate::Error::InvalidData(format!(
                "unknown edition filter: {other}"
            ))),
        }
    }
}

/// Filters currently selected by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilters {
    #[serde(default)]
    pub editions: Vec<EditionKind>,
}

impl ActiveFilters {
    #[must_use]
    pub fn editions(editions: impl IntoIterator<Item = EditionKind>) -> Self {
        Self {
            editions: editions.into_iter().collect(),
        }
    }
}

/// Edition flags derived from a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionFlags {
    pub is_standard: bool,
    pub is_deluxe: bool,
    pub is_remaster: bool,
}

impl EditionFlags {
    pub fn of(title: &str) -> Self {
        let is_deluxe = keywords::is_deluxe(title);
        let is_live = keywords::is_live(title);
        Self {
            is_standard: !is_deluxe && !is_live,
            is_deluxe,
            is_remaster: keywords::is_remaster(title),
        }
    }

    pub fn matches(self, kind: EditionKind) -> bool {
        match kind {
            EditionKind::Standard => self.is_standard,
            EditionKind::Deluxe => self.is_deluxe,
            EditionKind::Remaster => self.is_remaster,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EditionFilter;

impl EditionFilter {
    /// Keep albums matching at least one active edition filter.
    ///
    /// With no edition filters selected everything passes through.
    pub fn apply<T: Titled>(albums: Vec<T>, active: &ActiveFilters) -> Vec<T> {
        if active.editions.is_empty() {
            return albums;
        }
        albums
            .into_iter()
            .filter(|album| {
                let flags = EditionFlags::of(album.title());
                active.editions.iter().any(|kind| flags.matches(*kind))
            })
            .collect()
    }
}
