//! List media command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_media(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let media = store.list_media_by_title().await?;

    if media.is_empty() {
        println!("No media stored.");
        println!();
        println!("Import a list with: seiyuu sync <username>");
        return Ok(());
    }

    println!("Media ({} total)", media.len());
    println!("{:-<70}", "");

    for entry in media {
        println!("{:>10}  {}", entry.id, entry.display_title());
        println!("            {} | score {}", entry.status, entry.score);
    }

    Ok(())
}
