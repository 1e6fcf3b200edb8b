//! CLI module - Command-line interface for Seiyuu
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Seiyuu - voice actor overlap explorer for your AniList watch history
#[derive(Parser)]
#[command(name = "seiyuu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wipe the local store and import a user's anime list from AniList
    Sync {
        /// AniList username (defaults to [anilist].username)
        username: Option<String>,
    },

    /// Show how many shows, characters and voice actors are stored
    #[command(alias = "stats")]
    Counts,

    /// List stored media entries by title
    #[command(alias = "ls")]
    Media,

    /// Resolve the voice actor graph around one media entry
    #[command(alias = "g")]
    Graph {
        /// Media list entry id
        root: String,
        /// Leave out the root node and its edges
        #[arg(long)]
        hide_root: bool,
        /// Leave out media nodes reached through voice actors
        #[arg(long)]
        hide_media: bool,
        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fuzzy-search names within a resolved graph
    #[command(alias = "s")]
    Search {
        /// Media list entry id
        root: String,
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Start the HTTP API server
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
