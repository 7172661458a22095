//! Board geometry for the standard four-color Ludo board.
//!
//! ## Position Encoding
//!
//! Every piece position is a single `u8`:
//!
//! - `0`: the yard (piece has not entered play)
//! - `1..=52`: absolute square on the shared track
//! - `53..=58`: that color's private home stretch, where `58` is the
//!   finished slot
//!
//! The encoding is **absolute**, not relative to a color. What differs per
//! color is where a piece enters the track (`entry_squares`) and where it
//! turns off into its home stretch (`home_entry_squares`).
//!
//! ## Safe Squares
//!
//! Eight track squares are immune to capture: the four entry squares plus
//! four star squares. A piece landing on an occupied safe square simply
//! shares it.

use serde::{Deserialize, Serialize};

/// A piece position in the encoding described in the module docs.
pub type Position = u8;

/// The four player colors, in canonical board order.
///
/// Board order is fixed: entry and home-entry squares are looked up by
/// `Color::index()`. Turn order is a property of the match (join order),
/// not of the color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    /// All colors in board order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// Board index of this color (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a color by board index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Color> {
        match index {
            0 => Some(Color::Red),
            1 => Some(Color::Green),
            2 => Some(Color::Yellow),
            3 => Some(Color::Blue),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
        };
        write!(f, "{}", name)
    }
}

/// Static board configuration: pure data plus lookup helpers.
///
/// Constant for the process lifetime. Matches embed a copy so that state
/// views and snapshots are self-describing.
///
/// ## Example
///
/// ```
/// use ludo_core::board::{Color, STANDARD_BOARD};
///
/// assert_eq!(STANDARD_BOARD.entry_square(Color::Green), 14);
/// assert!(STANDARD_BOARD.is_safe(14));
/// assert_eq!(STANDARD_BOARD.finished_slot(), 58);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of squares on the shared loop.
    pub track_length: Position,

    /// Number of private squares per color, ending in the finished slot.
    pub home_stretch_length: Position,

    /// Track squares immune to capture.
    pub safe_squares: [Position; 8],

    /// Track square a piece lands on when leaving the yard, by color index.
    pub entry_squares: [Position; 4],

    /// Last shared square before turning into the home stretch, by color index.
    pub home_entry_squares: [Position; 4],
}

/// The standard 52-square board with a 6-square home stretch.
pub const STANDARD_BOARD: BoardConfig = BoardConfig {
    track_length: 52,
    home_stretch_length: 6,
    safe_squares: [1, 9, 14, 22, 27, 35, 40, 48],
    entry_squares: [1, 14, 27, 40],
    home_entry_squares: [51, 12, 25, 38],
};

impl BoardConfig {
    /// Whether a track square is immune to capture.
    #[must_use]
    pub fn is_safe(&self, square: Position) -> bool {
        self.safe_squares.contains(&square)
    }

    /// Track square a piece of `color` lands on when leaving the yard.
    #[must_use]
    pub const fn entry_square(&self, color: Color) -> Position {
        self.entry_squares[color.index()]
    }

    /// Last shared square a piece of `color` occupies before its stretch.
    #[must_use]
    pub const fn home_entry_square(&self, color: Color) -> Position {
        self.home_entry_squares[color.index()]
    }

    /// The terminal slot: `track_length + home_stretch_length`.
    #[must_use]
    pub const fn finished_slot(&self) -> Position {
        self.track_length + self.home_stretch_length
    }

    /// Whether a position is on the shared track.
    #[must_use]
    pub const fn is_on_track(&self, position: Position) -> bool {
        position >= 1 && position <= self.track_length
    }

    /// Whether a position is inside a home stretch (including finished).
    #[must_use]
    pub const fn is_in_home_stretch(&self, position: Position) -> bool {
        position > self.track_length && position <= self.finished_slot()
    }

    /// Forward distance along the track from `from` to `to`, in squares.
    ///
    /// Both arguments must be track squares. The result is in
    /// `0..track_length`; `0` means `from == to`.
    #[must_use]
    pub const fn track_distance(&self, from: Position, to: Position) -> Position {
        (to + self.track_length - from) % self.track_length
    }
}
