use super::GraphData;
use nucleo_matcher::{
    Config, Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub id: String,
    pub names: Vec<String>,
}

/// Fuzzy lookup from a name fragment to graph node ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchIndex {
    items: Vec<SearchItem>,
}

impl SearchIndex {
    pub fn set_collection(&mut self, items: Vec<SearchItem>) {
        self.items = items;
    }

    /// Replaces the collection with every node's name variants.
    pub fn rebuild_from(&mut self, graph: &GraphData) {
        self.set_collection(
            graph
                .nodes
                .iter()
                .filter(|n| !n.names.is_empty())
                .map(|n| SearchItem {
                    id: n.id.clone(),
                    names: n.names.clone(),
                })
                .collect(),
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Node ids whose names match `query`, best match first. Ties keep
    /// collection order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<String> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();

        let mut scored: Vec<(&str, u32)> = self
            .items
            .iter()
            .filter_map(|item| {
                item.names
                    .iter()
                    .filter_map(|name| {
                        pattern.score(Utf32Str::new(name, &mut buf), &mut matcher)
                    })
                    .max()
                    .map(|score| (item.id.as_str(), score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(id, _)| id.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SearchIndex {
        let mut index = SearchIndex::default();
        index.set_collection(vec![
            SearchItem {
                id: "character-1".into(),
                names: vec!["Frieren".into(), "フリーレン".into()],
            },
            SearchItem {
                id: "character-2".into(),
                names: vec!["Fern".into()],
            },
            SearchItem {
                id: "voice_actor-50".into(),
                names: vec!["Atsumi Tanezaki".into(), "種﨑敦美".into()],
            },
        ]);
        index
    }

    #[test]
    fn finds_by_any_name_variant() {
        let index = index();
        assert_eq!(index.search("tanezaki"), vec!["voice_actor-50".to_string()]);
        assert_eq!(index.search("フリーレン"), vec!["character-1".to_string()]);
    }

    #[test]
    fn best_match_comes_first() {
        let hits = index().search("fern");
        assert_eq!(hits.first().map(String::as_str), Some("character-2"));
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(index().search("   ").is_empty());
        assert!(index().search("zzzz").is_empty());
    }
}
