//! The per-match state machine.
//!
//! One `LudoMatch` per active match. All rule enforcement happens here,
//! synchronously and without I/O: the session layer calls an operation,
//! gets back a result value (or a [`GameError`]), and relays, persists, or
//! caches it afterwards.
//!
//! ## Status transitions
//!
//! ```text
//! Waiting --start()--> Playing --(win)--> Finished
//! ```
//!
//! `Waiting` accepts add/remove. `Playing` accepts roll/move/remove.
//! `Finished` is terminal; eviction is the registry's concern.
//!
//! ## All-or-nothing mutation
//!
//! Every operation validates completely before touching any field. The
//! commit step in [`LudoMatch::move_piece`] is the only place piece
//! positions, the history, and the turn pointer change together, so a
//! rejected call never leaves a half-applied move behind.

use std::time::{Duration, Instant};

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{BoardConfig, STANDARD_BOARD};
use crate::core::error::GameError;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::DiceRng;
use crate::game::moves::{
    CandidateMoves, LastRoll, MoveRecord, MoveResult, RollResult,
};
use crate::game::rules::{self, Pieces, PIECES_PER_PLAYER};
use crate::game::snapshot::MatchSnapshot;
use crate::game::view::{PlayerStats, StateView};

/// Minimum players required to start.
pub const MIN_PLAYERS: usize = 2;

/// Player capacity of a match.
pub const MAX_PLAYERS: usize = 4;

/// How many trailing history entries a state view carries.
pub const RECENT_MOVES: usize = 16;

/// Match identifier, assigned by the session layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(String);

impl MatchId {
    /// Create a new match ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Gathering players; pieces are not yet in play.
    Waiting,
    /// Turns are running.
    Playing,
    /// A player has won. Terminal.
    Finished,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchStatus::Waiting => "waiting",
            MatchStatus::Playing => "playing",
            MatchStatus::Finished => "finished",
        };
        write!(f, "{}", name)
    }
}

/// Authoritative state machine for one match.
pub struct LudoMatch {
    match_id: MatchId,
    board: BoardConfig,
    status: MatchStatus,
    /// Join order, which is also turn order.
    players: Vec<Player>,
    turn_index: usize,
    pieces: FxHashMap<PlayerId, Pieces>,
    last_roll: Option<LastRoll>,
    history: Vector<MoveRecord>,
    winner: Option<PlayerId>,
    rng: DiceRng,
    last_activity: Instant,
}

impl LudoMatch {
    /// Create an empty match on the standard board, dice seeded from
    /// process entropy.
    #[must_use]
    pub fn new(match_id: MatchId) -> Self {
        Self::with_rng(match_id, DiceRng::from_entropy())
    }

    /// Create a match with a deterministic dice seed (tests, replays).
    #[must_use]
    pub fn with_seed(match_id: MatchId, seed: u64) -> Self {
        Self::with_rng(match_id, DiceRng::new(seed))
    }

    fn with_rng(match_id: MatchId, rng: DiceRng) -> Self {
        Self {
            match_id,
            board: STANDARD_BOARD,
            status: MatchStatus::Waiting,
            players: Vec::new(),
            turn_index: 0,
            pieces: FxHashMap::default(),
            last_roll: None,
            history: Vector::new(),
            winner: None,
            rng,
            last_activity: Instant::now(),
        }
    }

    // === Accessors ===

    /// The match id.
    #[must_use]
    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    /// The board this match is played on.
    #[must_use]
    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Roster in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Index into the roster of the player holding the turn.
    #[must_use]
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// The player holding the turn, if the roster is non-empty.
    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        self.players.get(self.turn_index)
    }

    /// Piece positions of one player.
    #[must_use]
    pub fn pieces(&self, player: PlayerId) -> Option<&Pieces> {
        self.pieces.get(&player)
    }

    /// The winner, once the match is finished.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Whether the match has reached its terminal status.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Time since the last state-changing call.
    ///
    /// Idle-eviction policy (grace windows, timers) lives in the session
    /// layer; the core only reports the measurement.
    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    // === Lobby operations ===

    /// Add a participant while the match is waiting.
    ///
    /// Fails `Full` at capacity and `InvalidState` when the match has
    /// started or the id/color is already taken. The new player's four
    /// pieces start in the yard.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure_waiting("add a player")?;
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::Full { max: MAX_PLAYERS });
        }
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(GameError::InvalidState {
                reason: format!("{} already joined", player.id),
            });
        }
        if self.players.iter().any(|p| p.color == player.color) {
            return Err(GameError::InvalidState {
                reason: format!("color {} already taken", player.color),
            });
        }

        self.pieces.insert(player.id, [0; PIECES_PER_PLAYER]);
        self.players.push(player);
        self.touch();
        Ok(())
    }

    /// Remove a participant.
    ///
    /// Returns `false` when the player is not in the roster. Allowed in
    /// any status: during play this is disconnect bookkeeping, and the
    /// turn pointer is clamped so it stays valid for the remaining roster.
    pub fn remove_player(&mut self, player: PlayerId) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == player) else {
            return false;
        };

        self.players.remove(index);
        self.pieces.remove(&player);

        // A pending roll the leaver can no longer consume must not block
        // the next player.
        if self.last_roll.is_some_and(|r| r.player == player) {
            self.last_roll = None;
        }

        if self.players.is_empty() {
            self.turn_index = 0;
        } else {
            if index < self.turn_index {
                self.turn_index -= 1;
            }
            self.turn_index %= self.players.len();
        }
        self.touch();
        true
    }

    /// Start the match.
    ///
    /// Requires `Waiting` status and at least [`MIN_PLAYERS`] players.
    /// Turn goes to the first joiner; any stale roll/history is cleared.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.ensure_waiting("start the match")?;
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::InvalidState {
                reason: format!("need at least {} players to start", MIN_PLAYERS),
            });
        }

        self.status = MatchStatus::Playing;
        self.turn_index = 0;
        self.last_roll = None;
        self.history = Vector::new();
        self.touch();
        Ok(())
    }

    // === Turn operations ===

    /// Roll the dice for the active player.
    ///
    /// The single point of randomness: a roll value is never accepted from
    /// a client. Fails `InvalidState` outside of play or while a previous
    /// roll is still unconsumed, and `NotYourTurn` for anyone but the
    /// active player.
    ///
    /// When the roll yields no legal move the turn passes immediately and
    /// the roll is discarded; `RollResult::turn_passed` reports this.
    pub fn roll_dice(&mut self, player: PlayerId) -> Result<RollResult, GameError> {
        self.ensure_playing("roll the dice")?;
        self.ensure_active(player)?;
        if self.last_roll.is_some() {
            return Err(GameError::InvalidState {
                reason: "previous roll has not been played yet".to_string(),
            });
        }

        let value = self.rng.roll();
        let legal_moves = rules::legal_moves(&self.board, &self.players, &self.pieces, player, value);
        let turn_passed = legal_moves.is_empty();

        if turn_passed {
            self.advance_turn();
        } else {
            self.last_roll = Some(LastRoll { player, value });
        }
        self.touch();

        Ok(RollResult {
            player,
            value,
            legal_moves,
            turn_passed,
        })
    }

    /// Enumerate the legal moves `player` would have with `dice`.
    ///
    /// Pure: no mutation, callable for any player and value at any time.
    #[must_use]
    pub fn compute_legal_moves(&self, player: PlayerId, dice: u8) -> CandidateMoves {
        rules::legal_moves(&self.board, &self.players, &self.pieces, player, dice)
    }

    /// Execute a move with the pending roll.
    ///
    /// Fails `StaleRoll` unless a stored roll matches `(player, dice)`
    /// exactly, and `IllegalMove` when the chosen piece has no legal move.
    /// On success the roll is consumed, a capture (if any) sends that one
    /// opposing piece back to its yard, the move is appended to the
    /// history, and the win condition is evaluated before the turn
    /// advances. An extra turn (6 or capture) keeps the turn pointer in
    /// place.
    pub fn move_piece(
        &mut self,
        player: PlayerId,
        piece_index: usize,
        dice: u8,
    ) -> Result<MoveResult, GameError> {
        self.ensure_playing("move a piece")?;
        self.ensure_active(player)?;
        match self.last_roll {
            Some(roll) if roll.player == player && roll.value == dice => {}
            _ => return Err(GameError::StaleRoll { player, dice }),
        }

        let candidate = rules::evaluate_piece(
            &self.board,
            &self.players,
            &self.pieces,
            player,
            piece_index,
            dice,
        )
        .map_err(|reason| GameError::IllegalMove { reason })?;

        // Commit point: validation is complete, nothing below can fail.
        if let Some(captured) = candidate.capture {
            let pieces = self
                .pieces
                .get_mut(&captured.player)
                .expect("captured piece belongs to a rostered player");
            pieces[captured.piece_index] = 0;
        }

        let own = self
            .pieces
            .get_mut(&player)
            .expect("active player is rostered");
        own[piece_index] = candidate.to;

        self.history.push_back(MoveRecord {
            player,
            piece_index,
            from: candidate.from,
            to: candidate.to,
            dice,
            capture: candidate.capture,
        });
        self.last_roll = None;

        let game_ended = rules::all_finished(&self.board, &self.pieces[&player]);
        if game_ended {
            self.status = MatchStatus::Finished;
            self.winner = Some(player);
        }

        let extra_turn = !game_ended && (dice == 6 || candidate.capture.is_some());
        if !game_ended && !extra_turn {
            self.advance_turn();
        }
        self.touch();

        Ok(MoveResult {
            player,
            piece_index,
            from: candidate.from,
            to: candidate.to,
            dice,
            capture: candidate.capture,
            extra_turn,
            game_ended,
        })
    }

    // === Read surface ===

    /// Snapshot the match for one recipient.
    ///
    /// The pending roll is visible only to the player who rolled it;
    /// everyone else sees it redacted. Everything else is shared knowledge.
    #[must_use]
    pub fn state_view(&self, for_player: PlayerId) -> StateView {
        let skip = self.history.len().saturating_sub(RECENT_MOVES);
        StateView {
            match_id: self.match_id.clone(),
            status: self.status,
            turn_index: self.turn_index,
            players: self.players.clone(),
            pieces: self.pieces.clone(),
            winner: self.winner,
            last_roll: self.last_roll.filter(|r| r.player == for_player),
            recent_moves: self.history.iter().skip(skip).cloned().collect(),
            board: self.board,
        }
    }

    /// Derived per-player counts for result recording.
    pub fn player_stats(&self, player: PlayerId) -> Result<PlayerStats, GameError> {
        let pieces = self.pieces.get(&player).ok_or_else(|| GameError::NotFound {
            id: player.to_string(),
        })?;

        let finished_slot = self.board.finished_slot();
        let at_yard = pieces.iter().filter(|&&p| p == 0).count();
        let finished = pieces.iter().filter(|&&p| p == finished_slot).count();
        let moves_made = self.history.iter().filter(|m| m.player == player).count();

        Ok(PlayerStats {
            player,
            pieces_at_yard: at_yard,
            pieces_in_transit: PIECES_PER_PLAYER - at_yard - finished,
            pieces_finished: finished,
            moves_made,
        })
    }

    // === Snapshot round-trip ===

    /// Capture the full match state for the external cache.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.match_id.clone(),
            board: self.board,
            status: self.status,
            players: self.players.clone(),
            turn_index: self.turn_index,
            pieces: self.pieces.clone(),
            last_roll: self.last_roll,
            winner: self.winner,
            history: self.history.clone(),
            rng: self.rng.state(),
        }
    }

    /// Rebuild an equivalent match from a snapshot.
    ///
    /// The dice generator resumes its exact sequence; idle time restarts
    /// from the moment of restoration.
    #[must_use]
    pub fn restore(snapshot: MatchSnapshot) -> Self {
        Self {
            match_id: snapshot.match_id,
            board: snapshot.board,
            status: snapshot.status,
            players: snapshot.players,
            turn_index: snapshot.turn_index,
            pieces: snapshot.pieces,
            last_roll: snapshot.last_roll,
            history: snapshot.history,
            winner: snapshot.winner,
            rng: DiceRng::from_state(&snapshot.rng),
            last_activity: Instant::now(),
        }
    }

    // === Internals ===

    fn ensure_waiting(&self, attempted: &str) -> Result<(), GameError> {
        if self.status != MatchStatus::Waiting {
            return Err(GameError::InvalidState {
                reason: format!("cannot {} while {}", attempted, self.status),
            });
        }
        Ok(())
    }

    fn ensure_playing(&self, attempted: &str) -> Result<(), GameError> {
        if self.status != MatchStatus::Playing {
            return Err(GameError::InvalidState {
                reason: format!("cannot {} while {}", attempted, self.status),
            });
        }
        Ok(())
    }

    fn ensure_active(&self, player: PlayerId) -> Result<(), GameError> {
        let active = self.active_player().ok_or_else(|| GameError::InvalidState {
            reason: "match has no players".to_string(),
        })?;
        if active.id != player {
            return Err(GameError::NotYourTurn { expected: active.id });
        }
        Ok(())
    }

    fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.turn_index = (self.turn_index + 1) % self.players.len();
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}
