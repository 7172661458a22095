//! The match state machine and its data surface.

pub mod moves;
pub mod rules;
pub mod snapshot;
pub mod state;
pub mod view;

pub use moves::{
    CandidateMove, CandidateMoves, CapturedPiece, LastRoll, MoveRecord, MoveResult, RollResult,
};
pub use rules::{Pieces, PIECES_PER_PLAYER};
pub use snapshot::MatchSnapshot;
pub use state::{LudoMatch, MatchId, MatchStatus, MAX_PLAYERS, MIN_PLAYERS, RECENT_MOVES};
pub use view::{PlayerStats, StateView};
