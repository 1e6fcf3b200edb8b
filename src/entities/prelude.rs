pub use super::character_connections::Entity as CharacterConnections;
pub use super::characters::Entity as Characters;
pub use super::connection_media::Entity as ConnectionMedia;
pub use super::connection_voice_actors::Entity as ConnectionVoiceActors;
pub use super::media_entries::Entity as MediaEntries;
pub use super::sync_state::Entity as SyncState;
pub use super::voice_actors::Entity as VoiceActors;
