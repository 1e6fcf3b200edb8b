use super::{
    Character, CharacterConnection, ConnectionMedia, ConnectionVoiceActor, MediaEntry, VoiceActor,
};

/// Everything normalized out of one page response, written in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBatch {
    pub media: Vec<MediaEntry>,
    pub characters: Vec<Character>,
    pub voice_actors: Vec<VoiceActor>,
    pub connections: Vec<CharacterConnection>,
    pub connection_media: Vec<ConnectionMedia>,
    pub connection_voice_actors: Vec<ConnectionVoiceActor>,
}

impl PageBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
            && self.characters.is_empty()
            && self.voice_actors.is_empty()
            && self.connections.is_empty()
            && self.connection_media.is_empty()
            && self.connection_voice_actors.is_empty()
    }
}
