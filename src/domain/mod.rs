//! Strongly typed identifiers for the four entity collections.
//!
//! AniList assigns every id, and ids only have to be unique within their own
//! collection: a character and a voice actor may share the same number. Each
//! collection therefore gets its own newtype so the compiler refuses to mix
//! them up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

entity_id!(
    /// Id of a media-list entry (one watched title on the user's list).
    ///
    /// ```rust
    /// use seiyuu::domain::MediaEntryId;
    ///
    /// let id: MediaEntryId = "42".parse().unwrap();
    /// assert_eq!(id.value(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    MediaEntryId
);

entity_id!(
    /// Id of a character.
    CharacterId
);

entity_id!(
    /// Id of a voice actor (AniList staff member).
    VoiceActorId
);

entity_id!(
    /// Id of a character edge: one appearance of a character in one media.
    ConnectionId
);

/// Converts a slice of typed ids to raw values for query building.
pub fn raw_ids<T: Copy + Into<i64>>(ids: &[T]) -> Vec<i64> {
    ids.iter().map(|&id| id.into()).collect()
}
