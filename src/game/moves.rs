//! Move and roll data carried between the core and the session layer.
//!
//! All of these are flat records with explicit optional fields. The
//! session layer serializes them onto the wire unchanged, and the
//! persistence layer replays `MoveRecord`s for audit.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Position;
use crate::core::player::PlayerId;

/// The pending roll awaiting its move.
///
/// Single-use: consumed by exactly one `move_piece`, or discarded when the
/// roll had no legal move and the turn passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRoll {
    /// The player who rolled.
    pub player: PlayerId,
    /// The rolled value, `1..=6`.
    pub value: u8,
}

/// An opposing piece sent back to its yard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPiece {
    /// Owner of the captured piece.
    pub player: PlayerId,
    /// Index of the captured piece within that player's four.
    pub piece_index: usize,
}

/// A legal move a piece could make with the current roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMove {
    /// Which of the mover's four pieces.
    pub piece_index: usize,
    /// Position before the move.
    pub from: Position,
    /// Position after the move.
    pub to: Position,
    /// The opposing piece this move would capture, if any.
    pub capture: Option<CapturedPiece>,
}

impl CandidateMove {
    /// Whether executing this move captures an opposing piece.
    #[must_use]
    pub fn can_capture(&self) -> bool {
        self.capture.is_some()
    }
}

/// Legal moves for one roll. At most one entry per piece.
pub type CandidateMoves = SmallVec<[CandidateMove; 4]>;

/// An executed move, as recorded in the match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The player who moved.
    pub player: PlayerId,
    /// Which piece moved.
    pub piece_index: usize,
    /// Position before the move.
    pub from: Position,
    /// Position after the move.
    pub to: Position,
    /// The consumed dice value.
    pub dice: u8,
    /// The captured piece, if the move captured one.
    pub capture: Option<CapturedPiece>,
}

/// Outcome of a successful `move_piece`, relayed to all participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// The mover.
    pub player: PlayerId,
    /// Which piece moved.
    pub piece_index: usize,
    /// Position before the move.
    pub from: Position,
    /// Position after the move.
    pub to: Position,
    /// The consumed dice value.
    pub dice: u8,
    /// The captured piece, if any.
    pub capture: Option<CapturedPiece>,
    /// Whether the mover keeps the turn (rolled a 6 or captured).
    pub extra_turn: bool,
    /// Whether this move won the match.
    pub game_ended: bool,
}

/// Outcome of a `roll_dice`, relayed to all participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// The roller.
    pub player: PlayerId,
    /// The rolled value, `1..=6`.
    pub value: u8,
    /// Moves the roller may now make. Empty iff `turn_passed`.
    pub legal_moves: CandidateMoves,
    /// The roll had no legal move, so the turn passed immediately.
    pub turn_passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_capture_flag() {
        let quiet = CandidateMove {
            piece_index: 0,
            from: 3,
            to: 7,
            capture: None,
        };
        assert!(!quiet.can_capture());

        let taking = CandidateMove {
            capture: Some(CapturedPiece {
                player: PlayerId::new(2),
                piece_index: 1,
            }),
            ..quiet
        };
        assert!(taking.can_capture());
    }

    #[test]
    fn test_move_result_serialization() {
        let result = MoveResult {
            player: PlayerId::new(1),
            piece_index: 2,
            from: 10,
            to: 16,
            dice: 6,
            capture: Some(CapturedPiece {
                player: PlayerId::new(4),
                piece_index: 0,
            }),
            extra_turn: true,
            game_ended: false,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: MoveResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
