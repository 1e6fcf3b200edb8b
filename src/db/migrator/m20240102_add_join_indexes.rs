use crate::entities::{character_connections, connection_media, connection_voice_actors, prelude::*};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// The composite primary keys already cover lookups by connection id; these
// cover the reverse direction.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_connection_media_media_id")
                    .table(ConnectionMedia)
                    .col(connection_media::Column::MediaId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_connection_voice_actors_voice_actor_id")
                    .table(ConnectionVoiceActors)
                    .col(connection_voice_actors::Column::VoiceActorId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_character_connections_character_id")
                    .table(CharacterConnections)
                    .col(character_connections::Column::CharacterId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_character_connections_character_id")
                    .table(CharacterConnections)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_connection_voice_actors_voice_actor_id")
                    .table(ConnectionVoiceActors)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_connection_media_media_id")
                    .table(ConnectionMedia)
                    .to_owned(),
            )
            .await
    }
}
