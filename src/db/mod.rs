use crate::domain::{CharacterId, ConnectionId, MediaEntryId, VoiceActorId};
use crate::models::{
    Character, CharacterConnection, ConnectionMedia, ConnectionVoiceActor, MediaEntry, PageBatch,
    VoiceActor,
};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::media::natural_cmp;
pub use repositories::sync_state::LastSync;

/// Row counts shown to the user after a sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub media: u64,
    pub characters: u64,
    pub voice_actors: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Private in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every pooled connection to `:memory:` would open its own empty
        // database, so keep exactly one alive for the pool's lifetime.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn media_repo(&self) -> repositories::media::MediaRepository {
        repositories::media::MediaRepository::new(self.conn.clone())
    }

    fn cast_repo(&self) -> repositories::cast::CastRepository {
        repositories::cast::CastRepository::new(self.conn.clone())
    }

    fn join_repo(&self) -> repositories::joins::JoinRepository {
        repositories::joins::JoinRepository::new(self.conn.clone())
    }

    fn ingest_repo(&self) -> repositories::ingest::IngestRepository {
        repositories::ingest::IngestRepository::new(self.conn.clone())
    }

    fn sync_state_repo(&self) -> repositories::sync_state::SyncStateRepository {
        repositories::sync_state::SyncStateRepository::new(self.conn.clone())
    }

    // ---- ingestion ----

    /// Empties all six data tables. The last-sync record is kept.
    pub async fn clear_all(&self) -> Result<()> {
        self.ingest_repo().clear_all().await
    }

    pub async fn write_batch(&self, batch: &PageBatch) -> Result<()> {
        self.ingest_repo().write_batch(batch).await
    }

    pub async fn record_sync(&self, last: &LastSync) -> Result<()> {
        self.sync_state_repo().record(last).await
    }

    pub async fn last_sync(&self) -> Result<Option<LastSync>> {
        self.sync_state_repo().last().await
    }

    pub async fn count_dangling_joins(&self) -> Result<u64> {
        self.ingest_repo().count_dangling_joins().await
    }

    // ---- entities ----

    pub async fn get_media(&self, id: MediaEntryId) -> Result<Option<MediaEntry>> {
        self.media_repo().get(id).await
    }

    pub async fn get_media_many(&self, ids: &[MediaEntryId]) -> Result<Vec<MediaEntry>> {
        self.media_repo().get_many(ids).await
    }

    pub async fn list_media_by_title(&self) -> Result<Vec<MediaEntry>> {
        self.media_repo().list_by_title().await
    }

    pub async fn get_characters(&self, ids: &[CharacterId]) -> Result<Vec<Character>> {
        self.cast_repo().get_characters(ids).await
    }

    pub async fn get_voice_actors(&self, ids: &[VoiceActorId]) -> Result<Vec<VoiceActor>> {
        self.cast_repo().get_voice_actors(ids).await
    }

    pub async fn get_connections(&self, ids: &[ConnectionId]) -> Result<Vec<CharacterConnection>> {
        self.cast_repo().get_connections(ids).await
    }

    pub async fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            media: self.media_repo().count().await?,
            characters: self.cast_repo().count_characters().await?,
            voice_actors: self.cast_repo().count_voice_actors().await?,
        })
    }

    pub async fn count_connections(&self) -> Result<u64> {
        self.cast_repo().count_connections().await
    }

    // ---- joins ----

    pub async fn media_joins_for_media(&self, media_id: MediaEntryId) -> Result<Vec<ConnectionMedia>> {
        self.join_repo().media_joins_for_media(media_id).await
    }

    pub async fn media_joins_for_connections(
        &self,
        ids: &[ConnectionId],
    ) -> Result<Vec<ConnectionMedia>> {
        self.join_repo().media_joins_for_connections(ids).await
    }

    pub async fn voice_actor_joins_for_connections(
        &self,
        ids: &[ConnectionId],
    ) -> Result<Vec<ConnectionVoiceActor>> {
        self.join_repo().voice_actor_joins_for_connections(ids).await
    }

    pub async fn voice_actor_joins_for_voice_actors(
        &self,
        ids: &[VoiceActorId],
    ) -> Result<Vec<ConnectionVoiceActor>> {
        self.join_repo().voice_actor_joins_for_voice_actors(ids).await
    }
}
