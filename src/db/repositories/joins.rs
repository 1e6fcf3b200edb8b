use super::find_where_in;
use crate::domain::{ConnectionId, MediaEntryId, VoiceActorId, raw_ids};
use crate::entities::{connection_media, connection_voice_actors, prelude::*};
use crate::models::{ConnectionMedia as MediaJoin, ConnectionVoiceActor as VoiceActorJoin};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Lookups over the two many-to-many join tables.
///
/// Results are ordered by the key that was looked up, then by the other side,
/// so repeated traversals see the same sequence.
pub struct JoinRepository {
    conn: DatabaseConnection,
}

impl JoinRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    const fn map_media_join(model: &connection_media::Model) -> MediaJoin {
        MediaJoin {
            connection_id: ConnectionId::new(model.connection_id),
            media_id: MediaEntryId::new(model.media_id),
        }
    }

    const fn map_voice_actor_join(model: &connection_voice_actors::Model) -> VoiceActorJoin {
        VoiceActorJoin {
            connection_id: ConnectionId::new(model.connection_id),
            voice_actor_id: VoiceActorId::new(model.voice_actor_id),
        }
    }

    pub async fn media_joins_for_media(&self, media_id: MediaEntryId) -> anyhow::Result<Vec<MediaJoin>> {
        let rows = ConnectionMedia::find()
            .filter(connection_media::Column::MediaId.eq(media_id.value()))
            .order_by_asc(connection_media::Column::ConnectionId)
            .all(&self.conn)
            .await?;

        Ok(rows.iter().map(Self::map_media_join).collect())
    }

    pub async fn media_joins_for_connections(
        &self,
        ids: &[ConnectionId],
    ) -> anyhow::Result<Vec<MediaJoin>> {
        let mut rows = find_where_in::<ConnectionMedia>(
            &self.conn,
            connection_media::Column::ConnectionId,
            &raw_ids(ids),
        )
        .await?;
        rows.sort_by_key(|r| (r.connection_id, r.media_id));

        Ok(rows.iter().map(Self::map_media_join).collect())
    }

    pub async fn voice_actor_joins_for_connections(
        &self,
        ids: &[ConnectionId],
    ) -> anyhow::Result<Vec<VoiceActorJoin>> {
        let mut rows = find_where_in::<ConnectionVoiceActors>(
            &self.conn,
            connection_voice_actors::Column::ConnectionId,
            &raw_ids(ids),
        )
        .await?;
        rows.sort_by_key(|r| (r.connection_id, r.voice_actor_id));

        Ok(rows.iter().map(Self::map_voice_actor_join).collect())
    }

    pub async fn voice_actor_joins_for_voice_actors(
        &self,
        ids: &[VoiceActorId],
    ) -> anyhow::Result<Vec<VoiceActorJoin>> {
        let mut rows = find_where_in::<ConnectionVoiceActors>(
            &self.conn,
            connection_voice_actors::Column::VoiceActorId,
            &raw_ids(ids),
        )
        .await?;
        rows.sort_by_key(|r| (r.voice_actor_id, r.connection_id));

        Ok(rows.iter().map(Self::map_voice_actor_join).collect())
    }
}
