//! Read-only projections of a match for one recipient.
//!
//! A `StateView` is what the broadcast layer sends to a participant after
//! every mutation. It is complete except for one redaction: the pending
//! roll is visible only to the player who rolled it, so no recipient can
//! learn another player's unconsumed roll.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::BoardConfig;
use crate::core::player::{Player, PlayerId};
use crate::game::moves::{LastRoll, MoveRecord};
use crate::game::rules::Pieces;
use crate::game::state::{MatchId, MatchStatus};

/// Snapshot of a match prepared for one recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    /// The match this view describes.
    pub match_id: MatchId,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// Index of the player holding the turn.
    pub turn_index: usize,
    /// Roster in turn order.
    pub players: Vec<Player>,
    /// Every player's piece positions.
    pub pieces: FxHashMap<PlayerId, Pieces>,
    /// The winner, once finished.
    pub winner: Option<PlayerId>,
    /// The pending roll, present only in the roller's own view.
    pub last_roll: Option<LastRoll>,
    /// Tail of the move log, newest last.
    pub recent_moves: Vec<MoveRecord>,
    /// The board the match is played on.
    pub board: BoardConfig,
}

/// Derived per-player counts for the external result recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// The player these counts describe.
    pub player: PlayerId,
    /// Pieces still in the yard.
    pub pieces_at_yard: usize,
    /// Pieces on the track or in the stretch, not yet finished.
    pub pieces_in_transit: usize,
    /// Pieces on the finished slot.
    pub pieces_finished: usize,
    /// Moves this player has executed in the current match.
    pub moves_made: usize,
}
