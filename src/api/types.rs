use serde::{Deserialize, Serialize};

use crate::graph::ResolveOptions;
use crate::models::MediaEntry;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Picker row for one media entry.
#[derive(Debug, Serialize)]
pub struct MediaDto {
    pub id: i64,
    pub media_id: i64,
    pub title: String,
    pub status: String,
    pub score: f64,
    pub cover_image: Option<String>,
    pub cover_color: Option<String>,
}

impl From<MediaEntry> for MediaDto {
    fn from(entry: MediaEntry) -> Self {
        Self {
            id: entry.id.value(),
            media_id: entry.media_id,
            title: entry.display_title(),
            status: entry.status.to_string(),
            score: entry.score,
            cover_image: entry.cover_image.medium,
            cover_color: entry.cover_image.color,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub hide_root: bool,
    #[serde(default)]
    pub hide_media: bool,
}

impl From<GraphQuery> for ResolveOptions {
    fn from(query: GraphQuery) -> Self {
        Self {
            hide_root: query.hide_root,
            hide_media: query.hide_media,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub hide_root: bool,
    #[serde(default)]
    pub hide_media: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResultDto {
    pub query: String,
    pub ids: Vec<String>,
}
