use crate::domain::{CharacterId, ConnectionId, MediaEntryId, VoiceActorId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name variants shared by characters and staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first: Option<String>,
    pub last: Option<String>,
    pub full: Option<String>,
    pub native: Option<String>,
    #[serde(default)]
    pub alternative: Vec<String>,
}

impl PersonName {
    /// Full name, falling back to the native spelling.
    #[must_use]
    pub fn preferred(&self) -> Option<&str> {
        [&self.full, &self.native]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .find(|n| !n.trim().is_empty())
    }

    /// Every non-blank spelling, without duplicates.
    #[must_use]
    pub fn variants(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let candidates = [&self.full, &self.native, &self.first, &self.last]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .chain(self.alternative.iter().map(String::as_str));

        for name in candidates {
            let name = name.trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: PersonName,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceActor {
    pub id: VoiceActorId,
    pub name: PersonName,
    pub image: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterRole {
    Main,
    Supporting,
    Background,
}

impl CharacterRole {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Supporting => "SUPPORTING",
            Self::Background => "BACKGROUND",
        }
    }

    /// Unrecognised roles are stored as background characters.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "MAIN" => Self::Main,
            "SUPPORTING" => Self::Supporting,
            _ => Self::Background,
        }
    }
}

impl fmt::Display for CharacterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One appearance of a character in one media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterConnection {
    pub id: ConnectionId,
    pub role: CharacterRole,
    pub character_id: CharacterId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionMedia {
    pub connection_id: ConnectionId,
    pub media_id: MediaEntryId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionVoiceActor {
    pub connection_id: ConnectionId,
    pub voice_actor_id: VoiceActorId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_are_unique_and_non_blank() {
        let name = PersonName {
            first: Some("Frieren".to_string()),
            last: None,
            full: Some("Frieren".to_string()),
            native: Some("フリーレン".to_string()),
            alternative: vec![String::new(), "The Slayer".to_string()],
        };
        assert_eq!(name.variants(), vec!["Frieren", "フリーレン", "The Slayer"]);
        assert_eq!(name.preferred(), Some("Frieren"));
    }

    #[test]
    fn preferred_falls_back_to_native() {
        let name = PersonName {
            native: Some("種﨑敦美".to_string()),
            ..PersonName::default()
        };
        assert_eq!(name.preferred(), Some("種﨑敦美"));
    }
}
