//! Error kinds surfaced to the session layer.
//!
//! All failures are local, synchronous, and non-retryable: the caller
//! presents them to the acting user and moves on. Callers branch on the
//! variant, never on the message text. A failed operation leaves the match
//! completely unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::player::PlayerId;

/// Why a candidate move is not legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The piece index is outside the per-player piece range.
    NoSuchPiece,
    /// A piece in the yard may only enter the track on a 6.
    NeedsSixToEnter,
    /// The piece has already reached the finished slot.
    AlreadyFinished,
    /// The move would run past the finished slot.
    Overshoot,
    /// The destination holds another piece of the same player.
    SelfBlock,
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            MoveRejection::NoSuchPiece => "no such piece",
            MoveRejection::NeedsSixToEnter => "a 6 is required to leave the yard",
            MoveRejection::AlreadyFinished => "piece has already finished",
            MoveRejection::Overshoot => "move overshoots the finished slot",
            MoveRejection::SelfBlock => "destination is blocked by your own piece",
        };
        write!(f, "{}", reason)
    }
}

/// Error kinds raised by match and registry operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum GameError {
    /// Operation is not valid for the match's current status.
    #[error("operation not valid in the current match state: {reason}")]
    InvalidState {
        /// What the operation required, for presentation only.
        reason: String,
    },

    /// The acting player does not hold the turn.
    #[error("not your turn: it is {expected}'s turn")]
    NotYourTurn {
        /// Whose turn it is.
        expected: PlayerId,
    },

    /// The match already has the maximum number of players.
    #[error("match is full ({max} players)")]
    Full {
        /// The player capacity.
        max: usize,
    },

    /// No stored fresh roll matches the submitted move.
    #[error("no fresh roll of {dice} for {player}")]
    StaleRoll {
        /// The player who submitted the move.
        player: PlayerId,
        /// The dice value the move claimed.
        dice: u8,
    },

    /// The move violates the movement rules.
    #[error("illegal move: {reason}")]
    IllegalMove {
        /// The specific rule that rejected the move.
        reason: MoveRejection,
    },

    /// Unknown match or player.
    #[error("not found: {id}")]
    NotFound {
        /// The id that failed to resolve.
        id: String,
    },
}
