//! Store counts command handler

use crate::config::Config;
use crate::db::{Store, StoreCounts};

pub async fn cmd_counts(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let counts = store.counts().await?;

    println!("{}", format_counts(&counts));

    if let Some(last) = store.last_sync().await? {
        println!(
            "Last synced {} for {} ({} pages)",
            last.synced_at,
            last.username,
            last.pages_fetched
        );
    }

    Ok(())
}

/// "12 shows, 1 character, 40 voice actors", or "No data yet!" when empty.
#[must_use]
pub fn format_counts(counts: &StoreCounts) -> String {
    if *counts == StoreCounts::default() {
        return "No data yet!".to_string();
    }

    [
        pluralize(counts.media, "show", "shows"),
        pluralize(counts.characters, "character", "characters"),
        pluralize(counts.voice_actors, "voice actor", "voice actors"),
    ]
    .join(", ")
}

#[must_use]
pub fn pluralize(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralizes_by_count() {
        assert_eq!(pluralize(1, "show", "shows"), "1 show");
        assert_eq!(pluralize(0, "show", "shows"), "0 shows");
        assert_eq!(pluralize(3, "character", "characters"), "3 characters");
    }

    #[test]
    fn empty_store_has_placeholder() {
        assert_eq!(format_counts(&StoreCounts::default()), "No data yet!");

        let counts = StoreCounts {
            media: 1,
            characters: 3,
            voice_actors: 2,
        };
        assert_eq!(
            format_counts(&counts),
            "1 show, 3 characters, 2 voice actors"
        );
    }
}
