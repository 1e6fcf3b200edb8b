use super::{find_where_in, in_request_order};
use crate::domain::{MediaEntryId, raw_ids};
use crate::entities::{media_entries, prelude::*};
use crate::models::{CoverImage, MediaEntry, MediaTitle, WatchStatus};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use std::cmp::Ordering;

pub struct MediaRepository {
    conn: DatabaseConnection,
}

impl MediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub(crate) fn map_model(model: media_entries::Model) -> MediaEntry {
        MediaEntry {
            id: MediaEntryId::new(model.id),
            media_id: model.media_id,
            status: WatchStatus::parse(&model.status),
            score: model.score,
            title: MediaTitle {
                romaji: model.title_romaji,
                english: model.title_english,
                native: model.title_native,
            },
            cover_image: CoverImage {
                medium: model.cover_image,
                color: model.cover_color,
            },
        }
    }

    pub(crate) fn to_active_model(entry: &MediaEntry) -> media_entries::ActiveModel {
        media_entries::ActiveModel {
            id: Set(entry.id.value()),
            media_id: Set(entry.media_id),
            status: Set(entry.status.as_str().to_string()),
            score: Set(entry.score),
            title_romaji: Set(entry.title.romaji.clone()),
            title_english: Set(entry.title.english.clone()),
            title_native: Set(entry.title.native.clone()),
            cover_image: Set(entry.cover_image.medium.clone()),
            cover_color: Set(entry.cover_image.color.clone()),
        }
    }

    pub async fn get(&self, id: MediaEntryId) -> anyhow::Result<Option<MediaEntry>> {
        let row = MediaEntries::find_by_id(id.value()).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn get_many(&self, ids: &[MediaEntryId]) -> anyhow::Result<Vec<MediaEntry>> {
        let ids = raw_ids(ids);
        let rows =
            find_where_in::<MediaEntries>(&self.conn, media_entries::Column::Id, &ids).await?;

        Ok(in_request_order(&ids, rows, |m| m.id)
            .into_iter()
            .map(Self::map_model)
            .collect())
    }

    /// All entries, ordered by display title the way a picker lists them.
    pub async fn list_by_title(&self) -> anyhow::Result<Vec<MediaEntry>> {
        let mut entries: Vec<MediaEntry> = MediaEntries::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Self::map_model)
            .collect();

        entries.sort_by(|a, b| {
            natural_cmp(&a.display_title(), &b.display_title()).then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        Ok(MediaEntries::find().count(&self.conn).await?)
    }
}

/// Case-insensitive comparison that orders digit runs by value, so
/// "Season 2" sorts before "Season 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().flat_map(char::to_lowercase).peekable();
    let mut right = b.chars().flat_map(char::to_lowercase).peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_number(&mut left);
                let rn = take_number(&mut right);
                let (ln, rn) = (ln.trim_start_matches('0'), rn.trim_start_matches('0'));
                let ord = ln.len().cmp(&rn.len()).then_with(|| ln.cmp(rn));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<impl Iterator<Item = char>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
