//! Participant identification.
//!
//! ## PlayerId
//!
//! Stable identifier assigned by the external account system. The core
//! never invents player ids; it only checks them against the match roster.
//!
//! ## Player
//!
//! Explicit tagged record for a match participant: id, color, display name.
//! Roster order inside a match is join order, which is also turn order.

use serde::{Deserialize, Serialize};

use crate::board::Color;

/// Stable participant identifier from the external account system.
///
/// ```
/// use ludo_core::core::PlayerId;
///
/// let id = PlayerId::new(42);
/// assert_eq!(id.raw(), 42);
/// assert_eq!(format!("{}", id), "player 42");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// A match participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Account id of the participant.
    pub id: PlayerId,

    /// The color this participant plays.
    pub color: Color,

    /// Display name, relayed as-is to other participants.
    pub name: String,
}

impl Player {
    /// Create a new participant record.
    #[must_use]
    pub fn new(id: PlayerId, color: Color, name: impl Into<String>) -> Self {
        Self {
            id,
            color,
            name: name.into(),
        }
    }
}
