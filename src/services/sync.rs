//! Ingestion pipeline: wipe the store, then crawl every page of the user's
//! list through one bounded queue, writing each page as it arrives.

use super::normalize::{max_characters_page, normalize_page};
use super::task_queue::{QueueHandle, TaskQueue};
use crate::clients::{MediaListSource, PageRequest, TransportError};
use crate::constants::sync::PARALLEL_FETCH_TASKS;
use crate::db::{LastSync, Store, StoreCounts};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub username: String,
    pub pages_fetched: u64,
    pub counts: StoreCounts,
    pub finished_at: String,
}

/// State shared by every page task of one sync.
struct Crawl {
    source: Arc<dyn MediaListSource>,
    store: Store,
    username: String,
    queue: QueueHandle<SyncError>,
    pages_fetched: AtomicU64,
}

#[derive(Clone)]
pub struct SyncService {
    source: Arc<dyn MediaListSource>,
    store: Store,
    concurrency: usize,
}

impl SyncService {
    pub fn new(source: Arc<dyn MediaListSource>, store: Store) -> Self {
        Self {
            source,
            store,
            concurrency: PARALLEL_FETCH_TASKS,
        }
    }

    /// Fully repopulates the store for `username`.
    ///
    /// Fails with [`SyncError::Transport`] if the first page cannot be
    /// fetched; otherwise runs every discovered page before returning. A
    /// failing later page aborts the rest of the crawl; rows already written
    /// stay in place.
    pub async fn sync(&self, username: &str) -> Result<SyncReport, SyncError> {
        info!(username, "Starting sync");

        self.store.clear_all().await?;

        let queue: TaskQueue<SyncError> = TaskQueue::new(self.concurrency);
        let crawl = Arc::new(Crawl {
            source: self.source.clone(),
            store: self.store.clone(),
            username: username.to_string(),
            queue: queue.handle(),
            pages_fetched: AtomicU64::new(0),
        });

        // Page (1, 1) discovers every other page, so it is the only seed.
        queue.handle().submit(request_page(crawl.clone(), 1, 1));

        if let Err(e) = queue.drain().await {
            metrics::counter!("seiyuu_sync_failures_total").increment(1);
            warn!(username, error = %e, "Sync failed");
            return Err(e);
        }
        debug!("Fetch queue drained");

        let pages_fetched = crawl.pages_fetched.load(Ordering::SeqCst);
        let finished_at = chrono::Utc::now().to_rfc3339();

        self.store
            .record_sync(&LastSync {
                username: username.to_string(),
                synced_at: finished_at.clone(),
                pages_fetched: i64::try_from(pages_fetched).unwrap_or(i64::MAX),
            })
            .await?;

        let counts = self.store.counts().await?;
        info!(
            username,
            pages_fetched,
            media = counts.media,
            characters = counts.characters,
            voice_actors = counts.voice_actors,
            "Sync complete"
        );

        Ok(SyncReport {
            username: username.to_string(),
            pages_fetched,
            counts,
            finished_at,
        })
    }
}

/// Fetches and stores one page, then queues whatever it revealed:
/// every first characters page queues the remaining characters pages of its
/// media page, and the very first page also queues the remaining media pages.
fn request_page(
    crawl: Arc<Crawl>,
    media_page: u32,
    characters_page: u32,
) -> BoxFuture<'static, Result<(), SyncError>> {
    async move {
        let request = PageRequest::new(crawl.username.clone(), media_page, characters_page);
        let page = crawl.source.fetch_page(&request).await?;
        crawl.pages_fetched.fetch_add(1, Ordering::SeqCst);
        metrics::counter!("seiyuu_pages_fetched_total").increment(1);

        let batch = normalize_page(&page, characters_page == 1);
        crawl.store.write_batch(&batch).await?;

        debug!(
            media_page,
            characters_page,
            connections = batch.connections.len(),
            "Stored page"
        );

        if characters_page == 1 {
            let last_characters_page = max_characters_page(&page);
            crawl.queue.submit_all(
                (2..=last_characters_page)
                    .map(|p| request_page(crawl.clone(), media_page, p)),
            );

            if media_page == 1 {
                let last_media_page = page.page_info.last_page_or_first();
                crawl
                    .queue
                    .submit_all((2..=last_media_page).map(|p| request_page(crawl.clone(), p, 1)));
            }
        }

        Ok(())
    }
    .boxed()
}
