//! Full-state snapshots for the external cache.
//!
//! The session layer caches a serialized snapshot after each mutation and
//! rebuilds an equivalent [`LudoMatch`](crate::game::LudoMatch) with
//! [`LudoMatch::restore`](crate::game::LudoMatch::restore) on a cache hit.
//! Unlike a [`StateView`](crate::game::StateView), nothing is redacted:
//! snapshots never leave the server side.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::BoardConfig;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::DiceRngState;
use crate::game::moves::{LastRoll, MoveRecord};
use crate::game::rules::Pieces;
use crate::game::state::{MatchId, MatchStatus};

/// Complete serializable state of one match.
///
/// Round-trips everything needed to reconstruct an equivalent state
/// machine: roster with stable ids and colors, turn pointer, status,
/// winner, every piece position, the pending roll, the move log, and the
/// dice generator state (so the restored match continues the same roll
/// sequence).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// The match id.
    pub match_id: MatchId,
    /// The board the match is played on.
    pub board: BoardConfig,
    /// Lifecycle status at capture time.
    pub status: MatchStatus,
    /// Roster in turn order.
    pub players: Vec<Player>,
    /// Index of the player holding the turn.
    pub turn_index: usize,
    /// Every player's piece positions.
    pub pieces: FxHashMap<PlayerId, Pieces>,
    /// The pending roll, if one is unconsumed.
    pub last_roll: Option<LastRoll>,
    /// The winner, once finished.
    pub winner: Option<PlayerId>,
    /// The full move log.
    pub history: Vector<MoveRecord>,
    /// Dice generator state.
    pub rng: DiceRngState,
}

impl MatchSnapshot {
    /// Serialize to compact bytes for the cache.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from cached bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
