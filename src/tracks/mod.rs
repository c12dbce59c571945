use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;

use crate::common::D;

mod astar;
mod field;
mod generator;
mod io;
mod path;
mod progress;
mod solver;

pub use self::astar::*;
pub use self::field::*;
pub use self::generator::*;
pub use self::io::*;
pub use self::path::*;
pub use self::progress::*;
pub use self::solver::*;

/// A track segment occupying one cell. Every non-empty piece connects
/// exactly two of its four sides; corners are named after the pair of
/// compass directions they join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    Empty,
    Horizontal,
    Vertical,
    CornerNE,
    CornerNW,
    CornerSE,
    CornerSW,
}

/// The non-empty pieces, in enum order.
pub const PIECES: [Piece; 6] = [
    Piece::Horizontal,
    Piece::Vertical,
    Piece::CornerNE,
    Piece::CornerNW,
    Piece::CornerSE,
    Piece::CornerSW,
];

impl Piece {
    /// The unit directions (row-delta, col-delta) this piece connects to.
    pub fn connections(self) -> &'static [D] {
        match self {
            Piece::Empty => &[],
            Piece::Horizontal => &[D(0, -1), D(0, 1)],
            Piece::Vertical => &[D(-1, 0), D(1, 0)],
            Piece::CornerNE => &[D(-1, 0), D(0, 1)],
            Piece::CornerNW => &[D(-1, 0), D(0, -1)],
            Piece::CornerSE => &[D(1, 0), D(0, 1)],
            Piece::CornerSW => &[D(1, 0), D(0, -1)],
        }
    }

    pub fn connects_to(self, dir: D) -> bool {
        self.connections().contains(&dir)
    }

    /// The unique non-empty piece whose connection set is `{a, b}`,
    /// regardless of order. `None` when no piece joins the pair
    /// (equal directions, or vectors that are not unit steps).
    pub fn of_connections(a: D, b: D) -> Option<Piece> {
        PIECES.iter().copied().find(|p| {
            let c = p.connections();
            (c[0] == a && c[1] == b) || (c[0] == b && c[1] == a)
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Piece::Empty => "Empty",
            Piece::Horizontal => "Horizontal",
            Piece::Vertical => "Vertical",
            Piece::CornerNE => "CornerNE",
            Piece::CornerNW => "CornerNW",
            Piece::CornerSE => "CornerSE",
            Piece::CornerSW => "CornerSW",
        }
    }

    pub fn from_name(name: &str) -> Option<Piece> {
        match name {
            "Empty" => Some(Piece::Empty),
            "Horizontal" => Some(Piece::Horizontal),
            "Vertical" => Some(Piece::Vertical),
            "CornerNE" => Some(Piece::CornerNE),
            "CornerNW" => Some(Piece::CornerNW),
            "CornerSE" => Some(Piece::CornerSE),
            "CornerSW" => Some(Piece::CornerSW),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::Horizontal => '-',
            Piece::Vertical => '|',
            Piece::CornerNE => 'L',
            Piece::CornerNW => 'J',
            Piece::CornerSE => 'F',
            Piece::CornerSW => '7',
        }
    }
}

/// The structured puzzle input shape. `starting_grid` is row-major,
/// `horizontal_clues` are the per-row piece counts and `vertical_clues`
/// the per-column ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub grid_width: i32,
    pub grid_height: i32,
    pub vertical_clues: Vec<i32>,
    pub horizontal_clues: Vec<i32>,
    pub starting_grid: Vec<Piece>,
}

/// The type for errors occurring in constructing a `Field` from a `Puzzle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleError {
    /// A clue vector or the starting grid does not match the stated dimensions.
    SizeMismatch,
    /// A clue count is negative.
    NegativeClue,
    /// The row clues and the column clues sum to different totals.
    ClueSumMismatch,
    /// The starting pieces define this many entry/exit cells instead of two.
    EntryExitCount(usize),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PuzzleError::SizeMismatch => write!(f, "clues or grid do not match the dimensions"),
            PuzzleError::NegativeClue => write!(f, "negative clue count"),
            PuzzleError::ClueSumMismatch => write!(f, "row and column clues sum differently"),
            PuzzleError::EntryExitCount(n) => {
                write!(f, "expected exactly 2 entry/exit cells, found {}", n)
            }
        }
    }
}

impl error::Error for PuzzleError {}

#[cfg(test)]
pub mod testing {
    use super::*;

    pub const STRAIGHT_3X3: &str = "
ROWS: 1 1 1
COLS: 0 3 0
FIXED:
0,1: Vertical
2,1: Vertical
";

    pub const OUTER_L_5X5: &str = "
ROWS: 5 1 1 1 1
COLS: 1 1 1 1 5
FIXED:
0,0: CornerNE
4,4: CornerNE
";

    pub const LINE_10X10: &str = "
ROWS: 0 0 0 0 0 10 0 0 0 0
COLS: 1 1 1 1 1 1 1 1 1 1
FIXED:
5,0: Horizontal
5,9: Horizontal
";

    pub const ASYMMETRIC_7X9: &str = "
ROWS: 2 7 5 4 8 3 2
COLS: 1 1 5 6 5 4 3 4 2
FIXED:
0,6: CornerSW
3,4: CornerSW
4,4: Vertical
4,0: Horizontal
6,2: CornerSE
";

    pub const UNSOLVABLE_3X3: &str = "
ROWS: 1 1 1
COLS: 1 1 1
FIXED:
0,0: Horizontal
2,2: Horizontal
";

    pub fn puzzle_from_text(text: &str) -> Puzzle {
        read_tracks_problem(&mut text.as_bytes()).unwrap()
    }

    pub fn field_from_text(text: &str) -> Field {
        Field::from_puzzle(&puzzle_from_text(text)).unwrap()
    }

    /// Checks the full solution contract: exact counts, one connected
    /// component, and every connection either mutual or leaving the board
    /// at the entry/exit cells only.
    pub fn assert_solution(field: &Field) {
        use crate::common::P;

        assert!(field.track_counts_match(), "row/col counts not satisfied");
        assert!(field.is_single_connected_path(), "track is not one component");

        let entry = field.entry().unwrap();
        let exit = field.exit().unwrap();
        for r in 0..field.height() {
            for c in 0..field.width() {
                let pos = P(r, c);
                let piece = field.piece(pos);
                if piece == Piece::Empty {
                    continue;
                }
                for &d in piece.connections() {
                    let next = pos + d;
                    if !field.in_bounds(next) {
                        assert!(
                            pos == entry || pos == exit,
                            "dangling off-grid connection at {:?}",
                            pos
                        );
                    } else {
                        assert!(
                            field.piece(next).connects_to(-d),
                            "one-sided connection between {:?} and {:?}",
                            pos,
                            next
                        );
                    }
                }
            }
        }
    }
}
