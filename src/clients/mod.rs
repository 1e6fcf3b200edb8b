pub mod anilist;

use anilist::MediaListPage;
use thiserror::Error;

/// A remote fetch failed. Never retried; surfaces to whoever started the sync.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AniList returned HTTP {0}")]
    Status(u16),

    #[error("AniList GraphQL error (HTTP {status}): {message}")]
    GraphQL { status: u16, message: String },

    #[error("AniList response contained no page data")]
    MissingData,
}

/// Coordinates of one page in the two-dimensional pagination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub username: String,
    /// Outer page over the user's media-list entries, 1-based.
    pub media_page: u32,
    /// Inner page over each entry's character edges, 1-based.
    pub characters_page: u32,
}

impl PageRequest {
    pub fn new(username: impl Into<String>, media_page: u32, characters_page: u32) -> Self {
        Self {
            username: username.into(),
            media_page,
            characters_page,
        }
    }
}

/// Where media-list pages come from. `AnilistClient` in production; tests
/// plug in canned pages.
#[async_trait::async_trait]
pub trait MediaListSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<MediaListPage, TransportError>;
}
