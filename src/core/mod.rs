//! Core types shared across the crate: participants, errors, dice.

pub mod error;
pub mod player;
pub mod rng;

pub use error::{GameError, MoveRejection};
pub use player::{Player, PlayerId};
pub use rng::{DiceRng, DiceRngState};
