//! Movement legality as pure functions.
//!
//! Nothing in this module mutates: the match state machine validates with
//! these functions first and commits afterwards, so a rejected move never
//! leaves a half-applied state behind.
//!
//! ## Track movement
//!
//! A piece on the shared track diverts into its home stretch iff the
//! forward distance from its square to its color's home-entry square is
//! strictly less than the dice value; the remainder of the roll is spent
//! inside the stretch. Otherwise the destination stays on the shared loop,
//! wrapping past the last square. A single die (at most 6) can never lap
//! the 52-square track, so one crossing check is sufficient.

use rustc_hash::FxHashMap;

use crate::board::{BoardConfig, Color, Position};
use crate::core::error::MoveRejection;
use crate::core::player::{Player, PlayerId};
use crate::game::moves::{CandidateMove, CandidateMoves, CapturedPiece};

/// Pieces per player.
pub const PIECES_PER_PLAYER: usize = 4;

/// The four piece positions of one player.
pub type Pieces = [Position; PIECES_PER_PLAYER];

/// Where a piece of `color` at `from` lands with `dice`, ignoring occupancy.
///
/// Covers the yard-exit rule (a 6 is required, landing on the entry
/// square), home-entry diversion, and overshoot inside the stretch.
pub fn destination(
    board: &BoardConfig,
    color: Color,
    from: Position,
    dice: u8,
) -> Result<Position, MoveRejection> {
    debug_assert!((1..=6).contains(&dice));

    if from == 0 {
        return if dice == 6 {
            Ok(board.entry_square(color))
        } else {
            Err(MoveRejection::NeedsSixToEnter)
        };
    }

    if board.is_on_track(from) {
        let to_home_entry = board.track_distance(from, board.home_entry_square(color));
        if to_home_entry < dice {
            // Crossing home entry: the rest of the roll runs up the stretch.
            let slot = dice - to_home_entry;
            if slot > board.home_stretch_length {
                return Err(MoveRejection::Overshoot);
            }
            return Ok(board.track_length + slot);
        }

        let mut to = from + dice;
        if to > board.track_length {
            to -= board.track_length;
        }
        return Ok(to);
    }

    // Home stretch.
    if from == board.finished_slot() {
        return Err(MoveRejection::AlreadyFinished);
    }
    let slot = from - board.track_length + dice;
    if slot > board.home_stretch_length {
        return Err(MoveRejection::Overshoot);
    }
    Ok(board.track_length + slot)
}

/// Evaluate one piece of `mover` against `dice`.
///
/// Layers the occupancy rules on top of [`destination`]: rejects a
/// destination already holding one of the mover's own pieces (the finished
/// slot is exempt, all four pieces must end there), and marks a capture
/// when the destination is a shared non-safe square holding an opposing
/// piece. With several opposing pieces on the square, exactly one is
/// captured: the first found in roster order.
pub fn evaluate_piece(
    board: &BoardConfig,
    players: &[Player],
    positions: &FxHashMap<PlayerId, Pieces>,
    mover: PlayerId,
    piece_index: usize,
    dice: u8,
) -> Result<CandidateMove, MoveRejection> {
    if piece_index >= PIECES_PER_PLAYER {
        return Err(MoveRejection::NoSuchPiece);
    }
    let color = players
        .iter()
        .find(|p| p.id == mover)
        .map(|p| p.color)
        .ok_or(MoveRejection::NoSuchPiece)?;
    let own = positions.get(&mover).ok_or(MoveRejection::NoSuchPiece)?;

    let from = own[piece_index];
    let to = destination(board, color, from, dice)?;

    if to != board.finished_slot() {
        let blocked = own
            .iter()
            .enumerate()
            .any(|(i, &p)| i != piece_index && p == to);
        if blocked {
            return Err(MoveRejection::SelfBlock);
        }
    }

    let capture = capture_at(board, players, positions, mover, to);

    Ok(CandidateMove {
        piece_index,
        from,
        to,
        capture,
    })
}

/// All legal moves for `mover` with `dice`. Empty when none exist
/// (including when `mover` is not in the roster).
pub fn legal_moves(
    board: &BoardConfig,
    players: &[Player],
    positions: &FxHashMap<PlayerId, Pieces>,
    mover: PlayerId,
    dice: u8,
) -> CandidateMoves {
    (0..PIECES_PER_PLAYER)
        .filter_map(|i| evaluate_piece(board, players, positions, mover, i, dice).ok())
        .collect()
}

/// Whether every piece has reached the finished slot.
#[must_use]
pub fn all_finished(board: &BoardConfig, pieces: &Pieces) -> bool {
    pieces.iter().all(|&p| p == board.finished_slot())
}

/// The opposing piece captured by landing on `square`, if any.
fn capture_at(
    board: &BoardConfig,
    players: &[Player],
    positions: &FxHashMap<PlayerId, Pieces>,
    mover: PlayerId,
    square: Position,
) -> Option<CapturedPiece> {
    if !board.is_on_track(square) || board.is_safe(square) {
        return None;
    }
    for opponent in players.iter().filter(|p| p.id != mover) {
        let Some(pieces) = positions.get(&opponent.id) else {
            continue;
        };
        if let Some(piece_index) = pieces.iter().position(|&p| p == square) {
            return Some(CapturedPiece {
                player: opponent.id,
                piece_index,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STANDARD_BOARD;

    fn roster() -> (Vec<Player>, FxHashMap<PlayerId, Pieces>) {
        let players = vec![
            Player::new(PlayerId::new(1), Color::Red, "a"),
            Player::new(PlayerId::new(2), Color::Green, "b"),
        ];
        let mut positions = FxHashMap::default();
        positions.insert(PlayerId::new(1), [0; 4]);
        positions.insert(PlayerId::new(2), [0; 4]);
        (players, positions)
    }

    #[test]
    fn test_yard_exit_requires_six() {
        for dice in 1..=5 {
            assert_eq!(
                destination(&STANDARD_BOARD, Color::Red, 0, dice),
                Err(MoveRejection::NeedsSixToEnter)
            );
        }
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 0, 6), Ok(1));
        assert_eq!(destination(&STANDARD_BOARD, Color::Blue, 0, 6), Ok(40));
    }

    #[test]
    fn test_plain_track_movement() {
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 5, 3), Ok(8));
        assert_eq!(destination(&STANDARD_BOARD, Color::Green, 30, 6), Ok(36));
    }

    #[test]
    fn test_wrap_without_crossing_own_entry() {
        // Green's home entry is 12: wrapping past square 52 toward square 4
        // never touches it, so the piece stays on the shared loop.
        assert_eq!(destination(&STANDARD_BOARD, Color::Green, 50, 6), Ok(4));
        assert_eq!(destination(&STANDARD_BOARD, Color::Green, 52, 1), Ok(1));
    }

    #[test]
    fn test_crossing_diverts_into_stretch() {
        // Red's home entry is 51. From 49 a 4 crosses it with 2 left over.
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 49, 4), Ok(54));
        // Landing exactly on home entry does not divert.
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 49, 2), Ok(51));
    }

    #[test]
    fn test_on_home_entry_always_diverts() {
        // Distance zero: the whole roll is spent in the stretch.
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 51, 1), Ok(53));
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 51, 6), Ok(58));
        assert_eq!(destination(&STANDARD_BOARD, Color::Green, 12, 3), Ok(55));
    }

    #[test]
    fn test_crossing_cannot_overshoot_on_standard_board() {
        // A crossing spends at most the full die inside the stretch
        // (slot = dice - distance <= 6), so with a 6-slot stretch the
        // deepest crossing lands exactly on the finished slot.
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 50, 6), Ok(57));
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 51, 6), Ok(58));
    }

    #[test]
    fn test_crossing_overshoot_with_short_stretch() {
        let board = BoardConfig {
            home_stretch_length: 2,
            ..STANDARD_BOARD
        };
        // Two short of home entry, a 4 needs slot 2: the last legal move.
        assert_eq!(destination(&board, Color::Red, 49, 4), Ok(54));
        // A 5 needs slot 3 and overshoots the 2-slot stretch.
        assert_eq!(
            destination(&board, Color::Red, 49, 5),
            Err(MoveRejection::Overshoot)
        );
    }

    #[test]
    fn test_stretch_movement_and_overshoot() {
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 53, 5), Ok(58));
        assert_eq!(destination(&STANDARD_BOARD, Color::Red, 56, 2), Ok(58));
        assert_eq!(
            destination(&STANDARD_BOARD, Color::Red, 56, 3),
            Err(MoveRejection::Overshoot)
        );
        assert_eq!(
            destination(&STANDARD_BOARD, Color::Red, 58, 1),
            Err(MoveRejection::AlreadyFinished)
        );
    }

    #[test]
    fn test_self_block_rejected() {
        let (players, mut positions) = roster();
        positions.insert(PlayerId::new(1), [5, 8, 0, 0]);

        // Piece 0 moving 3 lands on own piece at 8.
        assert_eq!(
            evaluate_piece(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), 0, 3),
            Err(MoveRejection::SelfBlock)
        );
        // A different roll is fine.
        let mv = evaluate_piece(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), 0, 4)
            .unwrap();
        assert_eq!(mv.to, 9);
    }

    #[test]
    fn test_finished_slot_exempt_from_self_block() {
        let (players, mut positions) = roster();
        positions.insert(PlayerId::new(1), [58, 58, 56, 0]);

        let mv = evaluate_piece(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), 2, 2)
            .unwrap();
        assert_eq!(mv.to, 58);
    }

    #[test]
    fn test_capture_marked_on_shared_square() {
        let (players, mut positions) = roster();
        positions.insert(PlayerId::new(1), [4, 0, 0, 0]);
        positions.insert(PlayerId::new(2), [7, 0, 0, 0]);

        let mv = evaluate_piece(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), 0, 3)
            .unwrap();
        assert_eq!(
            mv.capture,
            Some(CapturedPiece {
                player: PlayerId::new(2),
                piece_index: 0
            })
        );
    }

    #[test]
    fn test_no_capture_on_safe_square() {
        let (players, mut positions) = roster();
        // Square 9 is safe.
        positions.insert(PlayerId::new(1), [4, 0, 0, 0]);
        positions.insert(PlayerId::new(2), [9, 0, 0, 0]);

        let mv = evaluate_piece(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), 0, 5)
            .unwrap();
        assert_eq!(mv.to, 9);
        assert_eq!(mv.capture, None);
    }

    #[test]
    fn test_no_moves_from_full_yard_without_six() {
        let (players, positions) = roster();
        for dice in 1..=5 {
            let moves = legal_moves(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), dice);
            assert!(moves.is_empty());
        }
        let moves = legal_moves(&STANDARD_BOARD, &players, &positions, PlayerId::new(1), 6);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.to == 1));
    }

    #[test]
    fn test_unknown_mover_has_no_moves() {
        let (players, positions) = roster();
        let moves = legal_moves(&STANDARD_BOARD, &players, &positions, PlayerId::new(99), 6);
        assert!(moves.is_empty());
    }

    #[test]
    fn test_all_finished() {
        assert!(all_finished(&STANDARD_BOARD, &[58, 58, 58, 58]));
        assert!(!all_finished(&STANDARD_BOARD, &[58, 58, 58, 57]));
    }
}
