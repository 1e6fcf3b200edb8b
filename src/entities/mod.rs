pub mod prelude;

pub mod character_connections;
pub mod characters;
pub mod connection_media;
pub mod connection_voice_actors;
pub mod media_entries;
pub mod sync_state;
pub mod voice_actors;
