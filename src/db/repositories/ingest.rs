use super::cast::CastRepository;
use super::media::MediaRepository;
use crate::constants::db::WRITE_CHUNK_SIZE;
use crate::entities::{
    character_connections, characters, connection_media, connection_voice_actors, media_entries,
    prelude::*, voice_actors,
};
use crate::models::PageBatch;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set, Statement,
    TransactionTrait,
};
use tracing::debug;

/// Write side of the store: wiping the six data tables and bulk-upserting
/// normalized pages.
pub struct IngestRepository {
    conn: DatabaseConnection,
}

impl IngestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn clear_all(&self) -> anyhow::Result<()> {
        let txn = self.conn.begin().await?;

        ConnectionVoiceActors::delete_many().exec(&txn).await?;
        ConnectionMedia::delete_many().exec(&txn).await?;
        CharacterConnections::delete_many().exec(&txn).await?;
        VoiceActors::delete_many().exec(&txn).await?;
        Characters::delete_many().exec(&txn).await?;
        MediaEntries::delete_many().exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Upserts one page atomically. Entities are written before the joins that
    /// reference them.
    pub async fn write_batch(&self, batch: &PageBatch) -> anyhow::Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let txn = self.conn.begin().await?;

        Self::upsert_media(&txn, batch).await?;
        Self::upsert_characters(&txn, batch).await?;
        Self::upsert_voice_actors(&txn, batch).await?;
        Self::upsert_connections(&txn, batch).await?;
        Self::insert_joins(&txn, batch).await?;

        txn.commit().await?;

        debug!(
            media = batch.media.len(),
            characters = batch.characters.len(),
            voice_actors = batch.voice_actors.len(),
            connections = batch.connections.len(),
            connection_media = batch.connection_media.len(),
            connection_voice_actors = batch.connection_voice_actors.len(),
            "Wrote page batch"
        );
        Ok(())
    }

    async fn upsert_media(txn: &DatabaseTransaction, batch: &PageBatch) -> anyhow::Result<()> {
        for chunk in batch.media.chunks(WRITE_CHUNK_SIZE) {
            MediaEntries::insert_many(chunk.iter().map(MediaRepository::to_active_model))
                .on_conflict(
                    OnConflict::column(media_entries::Column::Id)
                        .update_columns([
                            media_entries::Column::MediaId,
                            media_entries::Column::Status,
                            media_entries::Column::Score,
                            media_entries::Column::TitleRomaji,
                            media_entries::Column::TitleEnglish,
                            media_entries::Column::TitleNative,
                            media_entries::Column::CoverImage,
                            media_entries::Column::CoverColor,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
        }
        Ok(())
    }

    async fn upsert_characters(txn: &DatabaseTransaction, batch: &PageBatch) -> anyhow::Result<()> {
        for chunk in batch.characters.chunks(WRITE_CHUNK_SIZE) {
            Characters::insert_many(chunk.iter().map(CastRepository::character_active_model))
                .on_conflict(
                    OnConflict::column(characters::Column::Id)
                        .update_columns([
                            characters::Column::NameFirst,
                            characters::Column::NameLast,
                            characters::Column::NameFull,
                            characters::Column::NameNative,
                            characters::Column::NameAlternative,
                            characters::Column::Image,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
        }
        Ok(())
    }

    async fn upsert_voice_actors(
        txn: &DatabaseTransaction,
        batch: &PageBatch,
    ) -> anyhow::Result<()> {
        for chunk in batch.voice_actors.chunks(WRITE_CHUNK_SIZE) {
            VoiceActors::insert_many(chunk.iter().map(CastRepository::voice_actor_active_model))
                .on_conflict(
                    OnConflict::column(voice_actors::Column::Id)
                        .update_columns([
                            voice_actors::Column::NameFirst,
                            voice_actors::Column::NameLast,
                            voice_actors::Column::NameFull,
                            voice_actors::Column::NameNative,
                            voice_actors::Column::NameAlternative,
                            voice_actors::Column::Image,
                            voice_actors::Column::Language,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
        }
        Ok(())
    }

    async fn upsert_connections(
        txn: &DatabaseTransaction,
        batch: &PageBatch,
    ) -> anyhow::Result<()> {
        for chunk in batch.connections.chunks(WRITE_CHUNK_SIZE) {
            CharacterConnections::insert_many(
                chunk.iter().map(CastRepository::connection_active_model),
            )
            .on_conflict(
                OnConflict::column(character_connections::Column::Id)
                    .update_columns([
                        character_connections::Column::Role,
                        character_connections::Column::CharacterId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await?;
        }
        Ok(())
    }

    // A join row carries no data beyond its key, so a repeat is simply ignored.
    async fn insert_joins(txn: &DatabaseTransaction, batch: &PageBatch) -> anyhow::Result<()> {
        for chunk in batch.connection_media.chunks(WRITE_CHUNK_SIZE) {
            let rows = chunk.iter().map(|j| connection_media::ActiveModel {
                connection_id: Set(j.connection_id.value()),
                media_id: Set(j.media_id.value()),
            });
            ConnectionMedia::insert_many(rows)
                .on_conflict(
                    OnConflict::columns([
                        connection_media::Column::ConnectionId,
                        connection_media::Column::MediaId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
        }

        for chunk in batch.connection_voice_actors.chunks(WRITE_CHUNK_SIZE) {
            let rows = chunk.iter().map(|j| connection_voice_actors::ActiveModel {
                connection_id: Set(j.connection_id.value()),
                voice_actor_id: Set(j.voice_actor_id.value()),
            });
            ConnectionVoiceActors::insert_many(rows)
                .on_conflict(
                    OnConflict::columns([
                        connection_voice_actors::Column::ConnectionId,
                        connection_voice_actors::Column::VoiceActorId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(txn)
                .await?;
        }

        Ok(())
    }

    /// Join rows whose foreign ids have no matching entity row.
    pub async fn count_dangling_joins(&self) -> anyhow::Result<u64> {
        let sql = r"
            SELECT
                (SELECT COUNT(*) FROM connection_media j
                    WHERE NOT EXISTS (SELECT 1 FROM character_connections c WHERE c.id = j.connection_id)
                       OR NOT EXISTS (SELECT 1 FROM media_entries m WHERE m.id = j.media_id))
              + (SELECT COUNT(*) FROM connection_voice_actors j
                    WHERE NOT EXISTS (SELECT 1 FROM character_connections c WHERE c.id = j.connection_id)
                       OR NOT EXISTS (SELECT 1 FROM voice_actors v WHERE v.id = j.voice_actor_id))
              + (SELECT COUNT(*) FROM character_connections c
                    WHERE NOT EXISTS (SELECT 1 FROM characters ch WHERE ch.id = c.character_id))
                AS dangling
        ";

        let backend = self.conn.get_database_backend();
        let row = self
            .conn
            .query_one(Statement::from_string(backend, sql.to_string()))
            .await?;

        let dangling: i64 = match row {
            Some(row) => row.try_get("", "dangling")?,
            None => 0,
        };
        Ok(u64::try_from(dangling).unwrap_or(0))
    }
}
