//! Two-hop visualisation graph built from the store.

pub mod cache;
pub mod resolver;
pub mod search;

pub use cache::ResolutionCache;
pub use resolver::{GraphResolver, Resolution, ResolveOptions};
pub use search::SearchIndex;

use crate::domain::{CharacterId, MediaEntryId, VoiceActorId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Media,
    Character,
    VoiceActor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDatum {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub root: bool,
    #[serde(default)]
    pub root_character: bool,
    /// Every spelling the search index should match on.
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDatum {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub root_edge: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<NodeDatum>,
    pub links: Vec<LinkDatum>,
}

impl GraphData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Drops repeated node and link ids. The first occurrence wins and order
    /// is otherwise preserved.
    pub fn dedup(&mut self) {
        let mut seen: HashSet<String> = HashSet::new();
        self.nodes.retain(|n| seen.insert(n.id.clone()));

        seen.clear();
        self.links.retain(|l| seen.insert(l.id.clone()));
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&NodeDatum> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn contains_link(&self, source: &str, target: &str) -> bool {
        self.links
            .iter()
            .any(|l| l.source == source && l.target == target)
    }
}

#[must_use]
pub fn media_node_id(id: MediaEntryId) -> String {
    format!("media-{id}")
}

#[must_use]
pub fn character_node_id(id: CharacterId) -> String {
    format!("character-{id}")
}

#[must_use]
pub fn voice_actor_node_id(id: VoiceActorId) -> String {
    format!("voice_actor-{id}")
}

pub(crate) fn link(source: String, target: String, root_edge: bool) -> LinkDatum {
    LinkDatum {
        id: format!("{source}-{target}"),
        source,
        target,
        root_edge,
    }
}
