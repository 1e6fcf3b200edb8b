//! Sync command handler

use crate::cli::{format_counts, pluralize};
use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_sync(config: &Config, username: Option<&str>) -> anyhow::Result<()> {
    let username = config.resolve_username(username)?;
    let state = SharedState::new(config.clone()).await?;

    println!("Syncing AniList list for {username}...");

    let report = state.sync_service.sync(&username).await?;

    println!(
        "Done: {} from {}.",
        format_counts(&report.counts),
        pluralize(report.pages_fetched, "page", "pages"),
    );

    Ok(())
}
