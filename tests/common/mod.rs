#![allow(dead_code)]

use seiyuu::clients::anilist::{
    ApiCharacter, ApiMedia, ApiName, ApiStaff, ApiTitle, CharacterEdge, CharacterPage,
    MediaListEntry, MediaListPage, PageInfo,
};
use seiyuu::clients::{MediaListSource, PageRequest, TransportError};
use seiyuu::db::Store;
use seiyuu::domain::{CharacterId, ConnectionId, MediaEntryId, VoiceActorId};
use seiyuu::models::{
    Character, CharacterConnection, CharacterRole, ConnectionMedia, ConnectionVoiceActor,
    CoverImage, MediaEntry, MediaTitle, PageBatch, PersonName, VoiceActor, WatchStatus,
};
use std::sync::Mutex;
use std::time::Duration;

/// Voice actor shared by every generated edge.
pub const SHARED_VOICE_ACTOR: i64 = 500;

/// Serves a synthetic list. `layout[m - 1]` holds, for every entry on outer
/// page `m`, how many inner characters pages that entry has. Each inner page
/// carries one edge.
pub struct FakeSource {
    pub layout: Vec<Vec<u32>>,
    pub fail_on: Option<(u32, u32)>,
    pub delay: Option<Duration>,
    pub requests: Mutex<Vec<(u32, u32)>>,
}

impl FakeSource {
    /// `media_pages` outer pages of one entry each, every entry with
    /// `characters_pages` inner pages.
    pub fn new(media_pages: u32, characters_pages: u32) -> Self {
        let layout = (0..media_pages).map(|_| vec![characters_pages]).collect();
        Self::with_layout(layout)
    }

    pub fn with_layout(layout: Vec<Vec<u32>>) -> Self {
        Self {
            layout,
            fail_on: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, media_page: u32, characters_page: u32) -> Self {
        self.fail_on = Some((media_page, characters_page));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<(u32, u32)> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort_unstable();
        requests
    }

    fn page(&self, media_page: u32, characters_page: u32) -> MediaListPage {
        let media_pages = u32::try_from(self.layout.len()).unwrap();
        let entries = self.layout[media_page as usize - 1]
            .iter()
            .enumerate()
            .map(|(slot, &characters_pages)| {
                let slot = i64::try_from(slot).unwrap();
                entry(media_page, slot, characters_page, characters_pages)
            })
            .collect();

        MediaListPage {
            page_info: PageInfo {
                current_page: Some(media_page),
                last_page: Some(media_pages),
                ..PageInfo::default()
            },
            entries,
        }
    }
}

/// Entry ids are `m * 10 + slot`; edge and character ids encode the outer
/// page, the slot and the inner page.
fn entry(media_page: u32, slot: i64, characters_page: u32, characters_pages: u32) -> MediaListEntry {
    let m = i64::from(media_page);
    let c = i64::from(characters_page);
    let entry_id = m * 10 + slot;
    let edge_id = m * 1000 + slot * 100 + c;
    let character_id = m * 100 + slot * 10 + c;

    let edges = if characters_page <= characters_pages {
        vec![CharacterEdge {
            id: edge_id,
            role: Some(CharacterRole::Supporting),
            voice_actors: vec![ApiStaff {
                id: SHARED_VOICE_ACTOR,
                name: Some(api_name("Shared Actor")),
                image: None,
                language: Some("Japanese".to_string()),
            }],
            node: Some(ApiCharacter {
                id: character_id,
                name: Some(api_name(&format!("Character {character_id}"))),
                image: None,
            }),
        }]
    } else {
        Vec::new()
    };

    MediaListEntry {
        id: entry_id,
        media_id: entry_id * 7,
        status: Some(WatchStatus::Completed),
        score: Some(8.0),
        media: ApiMedia {
            title: Some(ApiTitle {
                romaji: Some(format!("Show {entry_id}")),
                ..ApiTitle::default()
            }),
            cover_image: None,
            characters: Some(CharacterPage {
                page_info: PageInfo {
                    current_page: Some(characters_page),
                    last_page: Some(characters_pages),
                    ..PageInfo::default()
                },
                edges,
            }),
        },
    }
}

#[async_trait::async_trait]
impl MediaListSource for FakeSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<MediaListPage, TransportError> {
        let key = (request.media_page, request.characters_page);
        self.requests.lock().unwrap().push(key);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        if self.fail_on == Some(key) {
            return Err(TransportError::Status(500));
        }
        Ok(self.page(request.media_page, request.characters_page))
    }
}

fn api_name(full: &str) -> ApiName {
    ApiName {
        full: Some(full.to_string()),
        ..ApiName::default()
    }
}

pub fn name(full: &str) -> PersonName {
    PersonName {
        full: Some(full.to_string()),
        ..PersonName::default()
    }
}

pub fn media(id: i64, title: &str) -> MediaEntry {
    MediaEntry {
        id: MediaEntryId::new(id),
        media_id: id * 7,
        status: WatchStatus::Completed,
        score: 0.0,
        title: MediaTitle {
            english: Some(title.to_string()),
            ..MediaTitle::default()
        },
        cover_image: CoverImage::default(),
    }
}

pub fn character(id: i64, full: &str) -> Character {
    Character {
        id: CharacterId::new(id),
        name: name(full),
        image: None,
    }
}

pub fn voice_actor(id: i64, full: &str) -> VoiceActor {
    VoiceActor {
        id: VoiceActorId::new(id),
        name: name(full),
        image: None,
        language: Some("Japanese".to_string()),
    }
}

pub fn connection(id: i64, character_id: i64) -> CharacterConnection {
    CharacterConnection {
        id: ConnectionId::new(id),
        role: CharacterRole::Main,
        character_id: CharacterId::new(character_id),
    }
}

pub fn media_join(connection_id: i64, media_id: i64) -> ConnectionMedia {
    ConnectionMedia {
        connection_id: ConnectionId::new(connection_id),
        media_id: MediaEntryId::new(media_id),
    }
}

pub fn voice_join(connection_id: i64, voice_actor_id: i64) -> ConnectionVoiceActor {
    ConnectionVoiceActor {
        connection_id: ConnectionId::new(connection_id),
        voice_actor_id: VoiceActorId::new(voice_actor_id),
    }
}

/// Root media 10 with connection 100 (character 1) voiced by actor 50, who
/// also voices connection 200 (character 2) joined to media 10 and 20.
pub fn scenario_batch() -> PageBatch {
    PageBatch {
        media: vec![media(10, "Root Show"), media(20, "Other Show")],
        characters: vec![character(1, "Alice"), character(2, "Bob")],
        voice_actors: vec![voice_actor(50, "Kana Hanazawa")],
        connections: vec![connection(100, 1), connection(200, 2)],
        connection_media: vec![media_join(100, 10), media_join(200, 10), media_join(200, 20)],
        connection_voice_actors: vec![voice_join(100, 50), voice_join(200, 50)],
    }
}

pub async fn scenario_store() -> Store {
    let store = Store::in_memory().await.unwrap();
    store.write_batch(&scenario_batch()).await.unwrap();
    store
}
