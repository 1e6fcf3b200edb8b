pub mod batch;
pub mod cast;
pub mod media;

pub use batch::PageBatch;
pub use cast::{
    Character, CharacterConnection, CharacterRole, ConnectionMedia, ConnectionVoiceActor,
    PersonName, VoiceActor,
};
pub use media::{CoverImage, MediaEntry, MediaTitle, WatchStatus};
