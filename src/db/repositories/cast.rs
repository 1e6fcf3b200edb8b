use super::{find_where_in, in_request_order};
use crate::domain::{CharacterId, ConnectionId, VoiceActorId, raw_ids};
use crate::entities::{character_connections, characters, prelude::*, voice_actors};
use crate::models::{Character, CharacterConnection, CharacterRole, PersonName, VoiceActor};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};

/// Characters, voice actors and the connections between characters and media.
pub struct CastRepository {
    conn: DatabaseConnection,
}

impl CastRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_name(
        first: Option<String>,
        last: Option<String>,
        full: Option<String>,
        native: Option<String>,
        alternative: &str,
    ) -> PersonName {
        PersonName {
            first,
            last,
            full,
            native,
            alternative: serde_json::from_str(alternative).unwrap_or_default(),
        }
    }

    fn alternative_json(name: &PersonName) -> String {
        serde_json::to_string(&name.alternative).unwrap_or_else(|_| "[]".to_string())
    }

    pub(crate) fn map_character(model: characters::Model) -> Character {
        Character {
            id: CharacterId::new(model.id),
            name: Self::map_name(
                model.name_first,
                model.name_last,
                model.name_full,
                model.name_native,
                &model.name_alternative,
            ),
            image: model.image,
        }
    }

    pub(crate) fn character_active_model(character: &Character) -> characters::ActiveModel {
        characters::ActiveModel {
            id: Set(character.id.value()),
            name_first: Set(character.name.first.clone()),
            name_last: Set(character.name.last.clone()),
            name_full: Set(character.name.full.clone()),
            name_native: Set(character.name.native.clone()),
            name_alternative: Set(Self::alternative_json(&character.name)),
            image: Set(character.image.clone()),
        }
    }

    pub(crate) fn map_voice_actor(model: voice_actors::Model) -> VoiceActor {
        VoiceActor {
            id: VoiceActorId::new(model.id),
            name: Self::map_name(
                model.name_first,
                model.name_last,
                model.name_full,
                model.name_native,
                &model.name_alternative,
            ),
            image: model.image,
            language: model.language,
        }
    }

    pub(crate) fn voice_actor_active_model(actor: &VoiceActor) -> voice_actors::ActiveModel {
        voice_actors::ActiveModel {
            id: Set(actor.id.value()),
            name_first: Set(actor.name.first.clone()),
            name_last: Set(actor.name.last.clone()),
            name_full: Set(actor.name.full.clone()),
            name_native: Set(actor.name.native.clone()),
            name_alternative: Set(Self::alternative_json(&actor.name)),
            image: Set(actor.image.clone()),
            language: Set(actor.language.clone()),
        }
    }

    pub(crate) fn map_connection(model: character_connections::Model) -> CharacterConnection {
        CharacterConnection {
            id: ConnectionId::new(model.id),
            role: CharacterRole::parse(&model.role),
            character_id: CharacterId::new(model.character_id),
        }
    }

    pub(crate) fn connection_active_model(
        connection: &CharacterConnection,
    ) -> character_connections::ActiveModel {
        character_connections::ActiveModel {
            id: Set(connection.id.value()),
            role: Set(connection.role.as_str().to_string()),
            character_id: Set(connection.character_id.value()),
        }
    }

    pub async fn get_characters(&self, ids: &[CharacterId]) -> anyhow::Result<Vec<Character>> {
        let ids = raw_ids(ids);
        let rows = find_where_in::<Characters>(&self.conn, characters::Column::Id, &ids).await?;

        Ok(in_request_order(&ids, rows, |m| m.id)
            .into_iter()
            .map(Self::map_character)
            .collect())
    }

    pub async fn get_voice_actors(&self, ids: &[VoiceActorId]) -> anyhow::Result<Vec<VoiceActor>> {
        let ids = raw_ids(ids);
        let rows =
            find_where_in::<VoiceActors>(&self.conn, voice_actors::Column::Id, &ids).await?;

        Ok(in_request_order(&ids, rows, |m| m.id)
            .into_iter()
            .map(Self::map_voice_actor)
            .collect())
    }

    pub async fn get_connections(
        &self,
        ids: &[ConnectionId],
    ) -> anyhow::Result<Vec<CharacterConnection>> {
        let ids = raw_ids(ids);
        let rows = find_where_in::<CharacterConnections>(
            &self.conn,
            character_connections::Column::Id,
            &ids,
        )
        .await?;

        Ok(in_request_order(&ids, rows, |m| m.id)
            .into_iter()
            .map(Self::map_connection)
            .collect())
    }

    pub async fn count_characters(&self) -> anyhow::Result<u64> {
        Ok(Characters::find().count(&self.conn).await?)
    }

    pub async fn count_voice_actors(&self) -> anyhow::Result<u64> {
        Ok(VoiceActors::find().count(&self.conn).await?)
    }

    pub async fn count_connections(&self) -> anyhow::Result<u64> {
        Ok(CharacterConnections::find().count(&self.conn).await?)
    }
}
