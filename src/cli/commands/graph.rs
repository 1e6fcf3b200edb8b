//! Graph and search command handlers

use crate::config::Config;
use crate::db::Store;
use crate::graph::{GraphData, GraphResolver, NodeType, ResolveOptions};

pub async fn cmd_graph(
    config: &Config,
    root: &str,
    options: ResolveOptions,
    json: bool,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let resolution = GraphResolver::new(store).resolve_str(root, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution.graph)?);
        return Ok(());
    }

    if resolution.graph.is_empty() {
        println!("Nothing to show for '{root}'.");
        println!();
        println!("List media ids with: seiyuu media");
        return Ok(());
    }

    print_graph(&resolution.graph);
    Ok(())
}

pub async fn cmd_search(config: &Config, root: &str, query: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let resolution = GraphResolver::new(store)
        .resolve_str(root, ResolveOptions::default())
        .await?;

    let hits = resolution.search(query);
    if hits.is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }

    for id in hits {
        if let Some(node) = resolution.graph.node(&id) {
            println!("{:<24} {}", node.id, node.label);
        }
    }

    Ok(())
}

fn print_graph(graph: &GraphData) {
    let count = |t: NodeType| graph.nodes.iter().filter(|n| n.node_type == t).count();

    println!(
        "{} media, {} characters, {} voice actors, {} links",
        count(NodeType::Media),
        count(NodeType::Character),
        count(NodeType::VoiceActor),
        graph.links.len()
    );
    println!("{:-<70}", "");

    for node in &graph.nodes {
        let marker = if node.root {
            "*"
        } else if node.root_character {
            "+"
        } else {
            " "
        };
        println!("{marker} {:<24} {}", node.id, node.label);
    }

    println!();
    for link in &graph.links {
        println!("  {} -> {}", link.source, link.target);
    }

    println!();
    println!("Legend: * root | + root character");
}
