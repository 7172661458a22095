//! # ludo-core
//!
//! Authoritative Ludo match engine for real-time multiplayer servers.
//!
//! ## Design Principles
//!
//! 1. **Server-Authoritative**: Every rule (move legality, captures, safe
//!    squares, turn order, win detection) is enforced here. Clients submit
//!    intents; the dice never leave the server.
//!
//! 2. **Pure and Synchronous**: No I/O inside the core. Operations return
//!    result values (`RollResult`, `MoveResult`, `StateView`) for the
//!    session layer to relay, persist, or cache afterwards.
//!
//! 3. **All-or-Nothing Mutation**: Validation completes before the first
//!    field changes, so a rejected operation never leaves a half-applied
//!    move behind.
//!
//! 4. **One Actor Per Match**: A match instance is mutated under its own
//!    lock; matches are fully independent of each other.
//!
//! ## Modules
//!
//! - `board`: Board geometry: track, home stretches, safe squares
//! - `core`: Participants, error kinds, server-side dice
//! - `game`: The per-match state machine and its data surface
//! - `registry`: Live match instances keyed by match id

pub mod board;
pub mod core;
pub mod game;
pub mod registry;

// Re-export commonly used types
pub use crate::board::{BoardConfig, Color, Position, STANDARD_BOARD};

pub use crate::core::{DiceRng, DiceRngState, GameError, MoveRejection, Player, PlayerId};

pub use crate::game::{
    CandidateMove, CandidateMoves, CapturedPiece, LastRoll, LudoMatch, MatchId, MatchSnapshot,
    MatchStatus, MoveRecord, MoveResult, Pieces, PlayerStats, RollResult, StateView,
    MAX_PLAYERS, MIN_PLAYERS, PIECES_PER_PLAYER, RECENT_MOVES,
};

pub use crate::registry::{MatchRegistry, SharedMatch};
