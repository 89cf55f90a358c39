use std::fmt;

use serde::{Deserialize, Serialize};

/// Release type assigned by the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Album,
    Single,
    #[serde(rename = "EP")]
    Ep,
    Compilation,
    Live,
    Uncategorized,
}

impl Classification {
    pub const ALL: [Self; 6] = [
        Self::Album,
        Self::Single,
        Self::Ep,
        Self::Compilation,
        Self::Live,
        Self::Uncategorized,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Single => "Single",
            Self::Ep => "EP",
            Self::Compilation => "Compilation",
            Self::Live => "Live",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
