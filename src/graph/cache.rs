use crate::db::Store;
use crate::domain::{CharacterId, ConnectionId, MediaEntryId, VoiceActorId};
use crate::models::{Character, CharacterConnection, MediaEntry, VoiceActor};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Lookup tables and emission bookkeeping for one resolution.
///
/// Kept by the caller between resolutions to merge further roots into the
/// same graph without refetching rows or re-emitting nodes.
#[derive(Debug, Default, Clone)]
pub struct ResolutionCache {
    media: HashMap<MediaEntryId, MediaEntry>,
    characters: HashMap<CharacterId, Character>,
    voice_actors: HashMap<VoiceActorId, VoiceActor>,
    connections: HashMap<ConnectionId, CharacterConnection>,
    seen_characters: HashSet<CharacterId>,
    seen_voice_actors: HashSet<VoiceActorId>,
}

/// Ids from `wanted` that are not already keys of `cached`, deduplicated.
fn missing<K: Copy + Eq + Hash, V>(cached: &HashMap<K, V>, wanted: &[K]) -> Vec<K> {
    let mut seen = HashSet::new();
    wanted
        .iter()
        .copied()
        .filter(|id| !cached.contains_key(id) && seen.insert(*id))
        .collect()
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cache_media(&mut self, store: &Store, ids: &[MediaEntryId]) -> Result<()> {
        let ids = missing(&self.media, ids);
        if ids.is_empty() {
            return Ok(());
        }
        for entry in store.get_media_many(&ids).await? {
            self.media.insert(entry.id, entry);
        }
        Ok(())
    }

    pub async fn cache_characters(&mut self, store: &Store, ids: &[CharacterId]) -> Result<()> {
        let ids = missing(&self.characters, ids);
        if ids.is_empty() {
            return Ok(());
        }
        for character in store.get_characters(&ids).await? {
            self.characters.insert(character.id, character);
        }
        Ok(())
    }

    pub async fn cache_voice_actors(&mut self, store: &Store, ids: &[VoiceActorId]) -> Result<()> {
        let ids = missing(&self.voice_actors, ids);
        if ids.is_empty() {
            return Ok(());
        }
        for actor in store.get_voice_actors(&ids).await? {
            self.voice_actors.insert(actor.id, actor);
        }
        Ok(())
    }

    /// Caches the connections and then the characters they reference.
    pub async fn cache_connections(&mut self, store: &Store, ids: &[ConnectionId]) -> Result<()> {
        let ids = missing(&self.connections, ids);
        if !ids.is_empty() {
            for connection in store.get_connections(&ids).await? {
                self.connections.insert(connection.id, connection);
            }
        }

        let character_ids: Vec<CharacterId> = ids
            .iter()
            .filter_map(|id| self.connections.get(id))
            .map(|c| c.character_id)
            .collect();
        self.cache_characters(store, &character_ids).await
    }

    #[must_use]
    pub fn media(&self, id: MediaEntryId) -> Option<&MediaEntry> {
        self.media.get(&id)
    }

    #[must_use]
    pub fn voice_actor(&self, id: VoiceActorId) -> Option<&VoiceActor> {
        self.voice_actors.get(&id)
    }

    #[must_use]
    pub fn connection(&self, id: ConnectionId) -> Option<&CharacterConnection> {
        self.connections.get(&id)
    }

    /// The connection's character, if both rows were found.
    #[must_use]
    pub fn connection_character(&self, id: ConnectionId) -> Option<&Character> {
        self.connection(id)
            .and_then(|c| self.characters.get(&c.character_id))
    }

    /// Returns `true` the first time a character is marked as emitted.
    pub fn mark_character(&mut self, id: CharacterId) -> bool {
        self.seen_characters.insert(id)
    }

    /// Returns `true` the first time a voice actor is marked as emitted.
    pub fn mark_voice_actor(&mut self, id: VoiceActorId) -> bool {
        self.seen_voice_actors.insert(id)
    }
}
