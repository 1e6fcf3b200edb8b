use crate::domain::MediaEntryId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One watched title on the user's list. The cast is never embedded here; it
/// is only reachable through connection join records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: MediaEntryId,
    pub media_id: i64,
    pub status: WatchStatus,
    pub score: f64,
    pub title: MediaTitle,
    pub cover_image: CoverImage,
}

impl MediaEntry {
    /// Title shown in pickers and graph labels.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.title
            .preferred()
            .unwrap_or("Unknown media")
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

impl MediaTitle {
    /// English, then romaji, then native.
    #[must_use]
    pub fn preferred(&self) -> Option<&str> {
        self.variants().next()
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        [&self.english, &self.romaji, &self.native]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub medium: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
    #[serde(other)]
    Unknown,
}

impl WatchStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "CURRENT",
            Self::Planning => "PLANNING",
            Self::Completed => "COMPLETED",
            Self::Dropped => "DROPPED",
            Self::Paused => "PAUSED",
            Self::Repeating => "REPEATING",
            Self::Unknown => "UNKNOWN",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "CURRENT" => Self::Current,
            "PLANNING" => Self::Planning,
            "COMPLETED" => Self::Completed,
            "DROPPED" => Self::Dropped,
            "PAUSED" => Self::Paused,
            "REPEATING" => Self::Repeating,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
