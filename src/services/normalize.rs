//! Turns one AniList page response into relational rows.

use crate::clients::anilist::{MediaListEntry, MediaListPage};
use crate::domain::{CharacterId, ConnectionId, MediaEntryId, VoiceActorId};
use crate::models::{
    Character, CharacterConnection, CharacterRole, ConnectionMedia, ConnectionVoiceActor,
    CoverImage, MediaEntry, MediaTitle, PageBatch, VoiceActor, WatchStatus,
};
use std::collections::HashSet;

/// Normalizes a page. Media rows are only produced when `include_media` is
/// set: media data does not depend on the characters page, so only the first
/// characters page writes it.
#[must_use]
pub fn normalize_page(page: &MediaListPage, include_media: bool) -> PageBatch {
    let mut batch = PageBatch::default();
    let mut seen_characters: HashSet<CharacterId> = HashSet::new();
    let mut seen_voice_actors: HashSet<VoiceActorId> = HashSet::new();

    for entry in &page.entries {
        let media_id = MediaEntryId::new(entry.id);

        if include_media {
            batch.media.push(media_row(entry));
        }

        let Some(characters) = &entry.media.characters else {
            continue;
        };

        for edge in &characters.edges {
            // An edge whose character was deleted upstream has nothing to link.
            let Some(node) = &edge.node else {
                continue;
            };

            let connection_id = ConnectionId::new(edge.id);
            let character_id = CharacterId::new(node.id);

            if seen_characters.insert(character_id) {
                batch.characters.push(Character {
                    id: character_id,
                    name: node.name.clone().map(Into::into).unwrap_or_default(),
                    image: node.image.as_ref().and_then(|i| i.medium.clone()),
                });
            }

            batch.connections.push(CharacterConnection {
                id: connection_id,
                role: edge.role.unwrap_or(CharacterRole::Background),
                character_id,
            });

            batch.connection_media.push(ConnectionMedia {
                connection_id,
                media_id,
            });

            for actor in &edge.voice_actors {
                let voice_actor_id = VoiceActorId::new(actor.id);

                batch.connection_voice_actors.push(ConnectionVoiceActor {
                    connection_id,
                    voice_actor_id,
                });

                if seen_voice_actors.insert(voice_actor_id) {
                    batch.voice_actors.push(VoiceActor {
                        id: voice_actor_id,
                        name: actor.name.clone().map(Into::into).unwrap_or_default(),
                        image: actor.image.as_ref().and_then(|i| i.medium.clone()),
                        language: actor.language.clone(),
                    });
                }
            }
        }
    }

    batch
}

fn media_row(entry: &MediaListEntry) -> MediaEntry {
    let title = entry.media.title.clone().unwrap_or_default();
    let cover = entry.media.cover_image.clone().unwrap_or_default();

    MediaEntry {
        id: MediaEntryId::new(entry.id),
        media_id: entry.media_id,
        status: entry.status.unwrap_or(WatchStatus::Unknown),
        score: entry.score.unwrap_or_default(),
        title: MediaTitle {
            romaji: title.romaji,
            english: title.english,
            native: title.native,
        },
        cover_image: CoverImage {
            medium: cover.medium,
            color: cover.color,
        },
    }
}

/// Highest inner `lastPage` across the page's entries (at least 1).
#[must_use]
pub fn max_characters_page(page: &MediaListPage) -> u32 {
    page.entries
        .iter()
        .filter_map(|e| e.media.characters.as_ref())
        .map(|c| c.page_info.last_page_or_first())
        .fold(1, u32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::anilist::{
        ApiCharacter, ApiMedia, ApiName, ApiStaff, ApiTitle, CharacterEdge, CharacterPage,
        PageInfo,
    };

    fn name(full: &str) -> Option<ApiName> {
        Some(ApiName {
            full: Some(full.to_string()),
            ..ApiName::default()
        })
    }

    fn staff(id: i64) -> ApiStaff {
        ApiStaff {
            id,
            name: name(&format!("Actor {id}")),
            image: None,
            language: Some("Japanese".to_string()),
        }
    }

    fn edge(id: i64, character: i64, actors: &[i64]) -> CharacterEdge {
        CharacterEdge {
            id,
            role: Some(CharacterRole::Main),
            voice_actors: actors.iter().copied().map(staff).collect(),
            node: Some(ApiCharacter {
                id: character,
                name: name(&format!("Character {character}")),
                image: None,
            }),
        }
    }

    fn entry(id: i64, last_page: u32, edges: Vec<CharacterEdge>) -> MediaListEntry {
        MediaListEntry {
            id,
            media_id: id * 1000,
            status: Some(WatchStatus::Current),
            score: None,
            media: ApiMedia {
                title: Some(ApiTitle {
                    romaji: Some(format!("Show {id}")),
                    ..ApiTitle::default()
                }),
                cover_image: None,
                characters: Some(CharacterPage {
                    page_info: PageInfo {
                        last_page: Some(last_page),
                        ..PageInfo::default()
                    },
                    edges,
                }),
            },
        }
    }

    fn page(entries: Vec<MediaListEntry>) -> MediaListPage {
        MediaListPage {
            page_info: PageInfo::default(),
            entries,
        }
    }

    #[test]
    fn dedups_characters_and_voice_actors_within_page() {
        let page = page(vec![
            entry(10, 1, vec![edge(100, 1, &[50]), edge(101, 2, &[50, 51])]),
            entry(20, 1, vec![edge(200, 1, &[50])]),
        ]);

        let batch = normalize_page(&page, true);

        assert_eq!(batch.media.len(), 2);
        assert_eq!(batch.characters.len(), 2);
        assert_eq!(batch.voice_actors.len(), 2);
        // One connection per appearance, even for the same character.
        assert_eq!(batch.connections.len(), 3);
        assert_eq!(batch.connection_media.len(), 3);
        assert_eq!(batch.connection_voice_actors.len(), 4);
        assert_eq!(batch.connection_media[2].media_id, MediaEntryId::new(20));
    }

    #[test]
    fn later_character_pages_skip_media_rows() {
        let page = page(vec![entry(10, 2, vec![edge(100, 1, &[])])]);

        let batch = normalize_page(&page, false);

        assert!(batch.media.is_empty());
        assert_eq!(batch.characters.len(), 1);
        assert!(batch.voice_actors.is_empty());
    }

    #[test]
    fn edges_without_character_are_dropped() {
        let mut orphan = edge(100, 1, &[50]);
        orphan.node = None;
        let page = page(vec![entry(10, 1, vec![orphan])]);

        let batch = normalize_page(&page, true);

        assert_eq!(batch.media.len(), 1);
        assert!(batch.connections.is_empty());
        assert!(batch.connection_voice_actors.is_empty());
    }

    #[test]
    fn max_characters_page_takes_largest_entry() {
        let page = page(vec![entry(1, 2, vec![]), entry(2, 5, vec![]), entry(3, 1, vec![])]);
        assert_eq!(max_characters_page(&page), 5);
        assert_eq!(max_characters_page(&MediaListPage::default()), 1);
    }
}
