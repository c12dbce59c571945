//! Solver engine for the Train Tracks puzzle: complete a single track
//! from one edge of a rectangular board to another, matching the required
//! piece count of every row and column and passing through every given
//! clue piece.
//!
//! Three cooperating solvers share one board model: a constrained
//! backtracker over the most constrained empty cells, a walker that grows
//! the track cell by cell from the entry, and a best-first search over
//! partial path states.

mod common;
mod io;
mod tracks;

pub use crate::common::{Grid, D, FOUR_NEIGHBOURS, P};
pub use crate::io::ReadError;
pub use crate::tracks::*;
