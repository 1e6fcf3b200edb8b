//! Two-hop expansion from a root media entry.
//!
//! Hop 1 walks root → characters → voice actors. Hop 2 walks those voice
//! actors to every other role they have voiced, anchoring each such role on a
//! single representative media entry.

use super::cache::ResolutionCache;
use super::search::SearchIndex;
use super::{
    GraphData, NodeDatum, NodeType, Position, character_node_id, link, media_node_id,
    voice_actor_node_id,
};
use crate::db::Store;
use crate::domain::{ConnectionId, MediaEntryId, VoiceActorId};
use crate::models::{Character, ConnectionMedia, MediaEntry, VoiceActor};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Leave out the root node and every edge into it.
    #[serde(default)]
    pub hide_root: bool,
    /// Leave out hop-2 media nodes and the edges into them.
    #[serde(default)]
    pub hide_media: bool,
}

/// A resolved graph with its search index and the lookups that produced it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    #[serde(flatten)]
    pub graph: GraphData,
    #[serde(skip)]
    pub index: SearchIndex,
    #[serde(skip)]
    pub cache: ResolutionCache,
}

impl Resolution {
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<String> {
        self.index.search(query)
    }
}

#[derive(Clone)]
pub struct GraphResolver {
    store: Store,
}

impl GraphResolver {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, root: MediaEntryId, options: ResolveOptions) -> Result<Resolution> {
        let mut resolution = Resolution::default();
        self.expand(&mut resolution, root, options).await?;
        Ok(resolution)
    }

    /// Resolves a root given as text. Anything that is not a media id yields
    /// an empty graph.
    pub async fn resolve_str(&self, root: &str, options: ResolveOptions) -> Result<Resolution> {
        match root.parse::<MediaEntryId>() {
            Ok(id) => self.resolve(id, options).await,
            Err(_) => {
                debug!(root, "Ignoring non-numeric graph root");
                Ok(Resolution::default())
            }
        }
    }

    /// Merges the expansion of another root into an existing resolution and
    /// rebuilds its search index.
    pub async fn expand(
        &self,
        resolution: &mut Resolution,
        root: MediaEntryId,
        options: ResolveOptions,
    ) -> Result<()> {
        let started = Instant::now();

        self.resolve_into(&mut resolution.graph, &mut resolution.cache, root, options)
            .await?;
        resolution.index.rebuild_from(&resolution.graph);

        metrics::histogram!("seiyuu_graph_resolve_seconds").record(started.elapsed().as_secs_f64());
        debug!(
            %root,
            nodes = resolution.graph.nodes.len(),
            links = resolution.graph.links.len(),
            "Resolved graph"
        );
        Ok(())
    }

    /// Appends the two-hop expansion of `root` to `graph`. Rows that cannot be
    /// found are skipped; only store failures are errors.
    pub async fn resolve_into(
        &self,
        graph: &mut GraphData,
        cache: &mut ResolutionCache,
        root: MediaEntryId,
        options: ResolveOptions,
    ) -> Result<()> {
        let store = &self.store;

        // Hop 0
        cache.cache_media(store, &[root]).await?;
        let Some(root_media) = cache.media(root) else {
            debug!(%root, "Graph root not found");
            return Ok(());
        };
        let root_id = media_node_id(root);

        if !options.hide_root {
            let mut node = media_node(root_media);
            node.root = true;
            node.position = Some(Position { x: 0.0, y: 0.0 });
            graph.nodes.push(node);
        }

        // Hop 1: root -> characters. Every root-joined role is a root
        // character, but a role anchored on another media entry gets its media
        // edge in hop 2 instead of an edge to the root.
        let root_connections: Vec<ConnectionId> = store
            .media_joins_for_media(root)
            .await?
            .into_iter()
            .map(|j| j.connection_id)
            .collect();
        let anchors = representative_media(
            &store
                .media_joins_for_connections(&root_connections)
                .await?,
        );
        cache.cache_connections(store, &root_connections).await?;

        for &connection_id in &root_connections {
            let Some(character) = cache.connection_character(connection_id).cloned() else {
                continue;
            };
            let target = character_node_id(character.id);

            if cache.mark_character(character.id) {
                let mut node = character_node(&character);
                node.root_character = true;
                graph.nodes.push(node);
            }
            let anchored_on_root = anchors.get(&connection_id).is_none_or(|m| *m == root);
            if !options.hide_root && anchored_on_root {
                graph.links.push(link(target, root_id.clone(), true));
            }
        }

        // Hop 1: characters -> voice actors
        let voice_joins = store
            .voice_actor_joins_for_connections(&root_connections)
            .await?;
        let voice_actor_ids: Vec<VoiceActorId> =
            voice_joins.iter().map(|j| j.voice_actor_id).collect();
        cache.cache_voice_actors(store, &voice_actor_ids).await?;

        let mut hop_one_actors: Vec<VoiceActorId> = Vec::new();
        for join in &voice_joins {
            let Some(actor) = cache.voice_actor(join.voice_actor_id).cloned() else {
                continue;
            };
            let Some(character_id) = cache.connection_character(join.connection_id).map(|c| c.id)
            else {
                continue;
            };
            let source = voice_actor_node_id(actor.id);
            let target = character_node_id(character_id);

            if !hop_one_actors.contains(&actor.id) {
                hop_one_actors.push(actor.id);
            }
            if cache.mark_voice_actor(actor.id) {
                graph.nodes.push(voice_actor_node(&actor));
            }
            graph.links.push(link(source, target, false));
        }

        // Hop 2: voice actors -> their other roles
        let other_roles = store
            .voice_actor_joins_for_voice_actors(&hop_one_actors)
            .await?;
        let mut seen: HashSet<ConnectionId> = HashSet::new();
        let hop_two_connections: Vec<ConnectionId> = other_roles
            .iter()
            .map(|j| j.connection_id)
            .filter(|id| seen.insert(*id))
            .collect();
        cache.cache_connections(store, &hop_two_connections).await?;

        let representatives =
            representative_media(&store.media_joins_for_connections(&hop_two_connections).await?);

        let mut new_media: Vec<MediaEntryId> = Vec::new();
        for connection_id in &hop_two_connections {
            if let Some(&media_id) = representatives.get(connection_id)
                && media_id != root
                && !new_media.contains(&media_id)
            {
                new_media.push(media_id);
            }
        }

        let mut shown_media: HashSet<MediaEntryId> = HashSet::new();
        if !options.hide_media {
            cache.cache_media(store, &new_media).await?;
            for &media_id in &new_media {
                if let Some(entry) = cache.media(media_id) {
                    graph.nodes.push(media_node(entry));
                    shown_media.insert(media_id);
                }
            }
        }

        for join in &other_roles {
            let representative = representatives.get(&join.connection_id).copied();
            if representative == Some(root) {
                continue;
            }
            let Some(character) = cache.connection_character(join.connection_id).cloned() else {
                continue;
            };
            if cache.voice_actor(join.voice_actor_id).is_none() {
                continue;
            }
            let source = voice_actor_node_id(join.voice_actor_id);
            let target = character_node_id(character.id);

            if cache.mark_character(character.id) {
                graph.nodes.push(character_node(&character));
            }
            if let Some(media_id) = representative
                && shown_media.contains(&media_id)
            {
                graph
                    .links
                    .push(link(target.clone(), media_node_id(media_id), false));
            }
            graph.links.push(link(source, target, false));
        }

        graph.dedup();
        Ok(())
    }
}

/// Picks one media entry per connection: the highest media id wins.
#[must_use]
pub fn representative_media(joins: &[ConnectionMedia]) -> HashMap<ConnectionId, MediaEntryId> {
    let mut out: HashMap<ConnectionId, MediaEntryId> = HashMap::new();
    for join in joins {
        out.entry(join.connection_id)
            .and_modify(|m| *m = (*m).max(join.media_id))
            .or_insert(join.media_id);
    }
    out
}

fn media_node(entry: &MediaEntry) -> NodeDatum {
    let label = entry
        .title
        .preferred()
        .map_or_else(|| format!("Media {}", entry.id), str::to_string);

    NodeDatum {
        id: media_node_id(entry.id),
        node_type: NodeType::Media,
        names: names_or_label(entry.title.variants().map(str::to_string).collect(), &label),
        label,
        image: entry.cover_image.medium.clone(),
        position: None,
        root: false,
        root_character: false,
    }
}

fn character_node(character: &Character) -> NodeDatum {
    let label = character
        .name
        .preferred()
        .map_or_else(|| format!("Character {}", character.id), str::to_string);

    NodeDatum {
        id: character_node_id(character.id),
        node_type: NodeType::Character,
        names: names_or_label(character.name.variants(), &label),
        label,
        image: character.image.clone(),
        position: None,
        root: false,
        root_character: false,
    }
}

fn voice_actor_node(actor: &VoiceActor) -> NodeDatum {
    let label = actor
        .name
        .preferred()
        .map_or_else(|| format!("Voice actor {}", actor.id), str::to_string);

    NodeDatum {
        id: voice_actor_node_id(actor.id),
        node_type: NodeType::VoiceActor,
        names: names_or_label(actor.name.variants(), &label),
        label,
        image: actor.image.clone(),
        position: None,
        root: false,
        root_character: false,
    }
}

/// Nameless rows stay searchable by their placeholder label.
fn names_or_label(names: Vec<String>, label: &str) -> Vec<String> {
    if names.is_empty() {
        vec![label.to_string()]
    } else {
        names
    }
}
