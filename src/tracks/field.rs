use std::fmt;

use super::{Piece, Puzzle, PuzzleError, PIECES};
use crate::common::{Grid, FOUR_NEIGHBOURS, P};

/// The board of a Train Tracks puzzle: placed pieces plus the per-row and
/// per-column required counts. Solvers mutate a `Field` through `place` /
/// `remove` or clone it when they branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    board: Grid<Piece>,
    row_counts: Vec<i32>,
    col_counts: Vec<i32>,
    placed_in_row: Vec<i32>,
    placed_in_col: Vec<i32>,
    total_count: i32,
    entry: Option<P>,
    exit: Option<P>,
}

impl Field {
    /// An empty board with the given required counts. The counts must sum
    /// to the same total.
    pub fn new(row_counts: Vec<i32>, col_counts: Vec<i32>) -> Field {
        let height = row_counts.len() as i32;
        let width = col_counts.len() as i32;
        let total: i32 = row_counts.iter().sum();
        assert_eq!(total, col_counts.iter().sum::<i32>());

        Field {
            board: Grid::new(height, width, Piece::Empty),
            placed_in_row: vec![0; row_counts.len()],
            placed_in_col: vec![0; col_counts.len()],
            row_counts,
            col_counts,
            total_count: total,
            entry: None,
            exit: None,
        }
    }

    /// Builds the board from a puzzle: validates the clues, places the
    /// starting pieces and derives the entry and exit cells.
    pub fn from_puzzle(puzzle: &Puzzle) -> Result<Field, PuzzleError> {
        let height = puzzle.grid_height;
        let width = puzzle.grid_width;
        if puzzle.horizontal_clues.len() as i32 != height
            || puzzle.vertical_clues.len() as i32 != width
            || puzzle.starting_grid.len() as i32 != height * width
        {
            return Err(PuzzleError::SizeMismatch);
        }
        if puzzle
            .horizontal_clues
            .iter()
            .chain(puzzle.vertical_clues.iter())
            .any(|&n| n < 0)
        {
            return Err(PuzzleError::NegativeClue);
        }
        if puzzle.horizontal_clues.iter().sum::<i32>() != puzzle.vertical_clues.iter().sum::<i32>()
        {
            return Err(PuzzleError::ClueSumMismatch);
        }

        let mut field = Field::new(
            puzzle.horizontal_clues.clone(),
            puzzle.vertical_clues.clone(),
        );
        for (i, &piece) in puzzle.starting_grid.iter().enumerate() {
            if piece != Piece::Empty {
                let pos = P(i as i32 / width, i as i32 % width);
                field.place(pos, piece);
            }
        }

        let ends = field.find_entry_exit();
        if ends.len() != 2 {
            return Err(PuzzleError::EntryExitCount(ends.len()));
        }
        field.entry = Some(ends[0]);
        field.exit = Some(ends[1]);
        Ok(field)
    }

    pub fn height(&self) -> i32 {
        self.board.height()
    }
    pub fn width(&self) -> i32 {
        self.board.width()
    }
    pub fn total_count(&self) -> i32 {
        self.total_count
    }
    pub fn entry(&self) -> Option<P> {
        self.entry
    }
    pub fn exit(&self) -> Option<P> {
        self.exit
    }

    pub fn in_bounds(&self, pos: P) -> bool {
        self.board.is_valid_p(pos)
    }
    pub fn on_edge(&self, pos: P) -> bool {
        pos.0 == 0 || pos.0 == self.height() - 1 || pos.1 == 0 || pos.1 == self.width() - 1
    }
    pub fn piece(&self, pos: P) -> Piece {
        self.board[pos]
    }
    pub fn is_empty(&self, pos: P) -> bool {
        self.board[pos] == Piece::Empty
    }
    pub fn is_filled(&self, pos: P) -> bool {
        self.board[pos] != Piece::Empty
    }

    pub fn row_count(&self, r: i32) -> i32 {
        self.row_counts[r as usize]
    }
    pub fn col_count(&self, c: i32) -> i32 {
        self.col_counts[c as usize]
    }
    pub fn track_count_in_row(&self, r: i32) -> i32 {
        self.placed_in_row[r as usize]
    }
    pub fn track_count_in_col(&self, c: i32) -> i32 {
        self.placed_in_col[c as usize]
    }

    /// Whether `piece` may legally go at `pos` in the current state.
    /// Checks bounds and emptiness, row/column capacity, that no connection
    /// leaves the board, reciprocal alignment with every settled neighbour,
    /// and that each empty cell the piece runs into still has room for its
    /// own future piece once this placement is counted.
    pub fn can_place(&self, pos: P, piece: Piece) -> bool {
        if piece == Piece::Empty || !self.in_bounds(pos) || self.is_filled(pos) {
            return false;
        }
        let P(r, c) = pos;
        if self.placed_in_row[r as usize] >= self.row_counts[r as usize]
            || self.placed_in_col[c as usize] >= self.col_counts[c as usize]
        {
            return false;
        }

        for &d in piece.connections() {
            let next = pos + d;
            if !self.in_bounds(next) {
                return false;
            }
            if self.is_empty(next) {
                let shared_row = if next.0 == r { 1 } else { 0 };
                if self.placed_in_row[next.0 as usize] + shared_row
                    >= self.row_counts[next.0 as usize]
                {
                    return false;
                }
                let shared_col = if next.1 == c { 1 } else { 0 };
                if self.placed_in_col[next.1 as usize] + shared_col
                    >= self.col_counts[next.1 as usize]
                {
                    return false;
                }
            }
        }

        let mut has_neighbour = false;
        let mut has_match = false;
        for &d in &FOUR_NEIGHBOURS {
            let next = pos + d;
            if !self.in_bounds(next) || self.is_empty(next) {
                continue;
            }
            has_neighbour = true;
            let out = piece.connects_to(d);
            let back = self.board[next].connects_to(-d);
            if out != back {
                return false;
            }
            if out {
                has_match = true;
            }
        }
        !has_neighbour || has_match
    }

    pub fn place(&mut self, pos: P, piece: Piece) {
        assert!(piece != Piece::Empty);
        assert!(self.in_bounds(pos));
        assert!(self.is_empty(pos));
        self.board[pos] = piece;
        self.placed_in_row[pos.0 as usize] += 1;
        self.placed_in_col[pos.1 as usize] += 1;
    }

    pub fn remove(&mut self, pos: P) {
        if self.is_empty(pos) {
            return;
        }
        self.board[pos] = Piece::Empty;
        self.placed_in_row[pos.0 as usize] -= 1;
        self.placed_in_col[pos.1 as usize] -= 1;
    }

    /// The non-empty pieces accepted by `can_place` at `pos`, in the fixed
    /// enum order.
    pub fn legal_pieces(&self, pos: P) -> Vec<Piece> {
        PIECES
            .iter()
            .copied()
            .filter(|&p| self.can_place(pos, p))
            .collect()
    }

    /// Whether every row and column can still reach its required count:
    /// `placed <= required <= placed + empty cells`.
    pub fn can_still_satisfy(&self) -> bool {
        let height = self.height();
        let width = self.width();
        let mut empty_in_row = vec![0; height as usize];
        let mut empty_in_col = vec![0; width as usize];
        for r in 0..height {
            for c in 0..width {
                if self.is_empty(P(r, c)) {
                    empty_in_row[r as usize] += 1;
                    empty_in_col[c as usize] += 1;
                }
            }
        }
        for r in 0..height as usize {
            if self.row_counts[r] < self.placed_in_row[r]
                || self.row_counts[r] > self.placed_in_row[r] + empty_in_row[r]
            {
                return false;
            }
        }
        for c in 0..width as usize {
            if self.col_counts[c] < self.placed_in_col[c]
                || self.col_counts[c] > self.placed_in_col[c] + empty_in_col[c]
            {
                return false;
            }
        }
        true
    }

    pub fn track_counts_match(&self) -> bool {
        self.placed_in_row
            .iter()
            .zip(self.row_counts.iter())
            .all(|(a, b)| a == b)
            && self
                .placed_in_col
                .iter()
                .zip(self.col_counts.iter())
                .all(|(a, b)| a == b)
    }

    /// Whether there is at least one placed piece and the placed pieces
    /// form one connected component under mutual connection. A closed loop
    /// counts as connected even though it is not a valid puzzle solution.
    pub fn is_single_connected_path(&self) -> bool {
        let total: i32 = self.placed_in_row.iter().sum();
        if total == 0 {
            return false;
        }

        let seed = match self.first_filled() {
            Some(pos) => pos,
            None => return false,
        };
        let mut seen = Grid::new(self.height(), self.width(), false);
        let mut stack = vec![seed];
        seen[seed] = true;
        let mut reached = 0;
        while let Some(pos) = stack.pop() {
            reached += 1;
            let piece = self.board[pos];
            for &d in piece.connections() {
                let next = pos + d;
                if !self.in_bounds(next) || seen[next] || self.is_empty(next) {
                    continue;
                }
                if self.board[next].connects_to(-d) {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        reached == total
    }

    fn first_filled(&self) -> Option<P> {
        for r in 0..self.height() {
            for c in 0..self.width() {
                if self.is_filled(P(r, c)) {
                    return Some(P(r, c));
                }
            }
        }
        None
    }

    /// Overwrites this board and its counters with `src`. The dimensions
    /// must match.
    pub fn copy_from(&mut self, src: &Field) {
        self.board.copy_from(&src.board);
        self.row_counts.copy_from_slice(&src.row_counts);
        self.col_counts.copy_from_slice(&src.col_counts);
        self.placed_in_row.copy_from_slice(&src.placed_in_row);
        self.placed_in_col.copy_from_slice(&src.placed_in_col);
        self.total_count = src.total_count;
        self.entry = src.entry;
        self.exit = src.exit;
    }

    /// All currently non-empty cells, row-major.
    pub fn fixed_points(&self) -> Vec<P> {
        let mut ret = vec![];
        for r in 0..self.height() {
            for c in 0..self.width() {
                if self.is_filled(P(r, c)) {
                    ret.push(P(r, c));
                }
            }
        }
        ret
    }

    /// Edge cells holding a piece exactly one of whose connections leaves
    /// the board, row-major. A well-formed puzzle has exactly two.
    pub fn find_entry_exit(&self) -> Vec<P> {
        let mut ret = vec![];
        for r in 0..self.height() {
            for c in 0..self.width() {
                let pos = P(r, c);
                if !self.on_edge(pos) || self.is_empty(pos) {
                    continue;
                }
                let off_grid = self.board[pos]
                    .connections()
                    .iter()
                    .filter(|&&d| !self.in_bounds(pos + d))
                    .count();
                if off_grid == 1 {
                    ret.push(pos);
                }
            }
        }
        ret
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for r in 0..self.height() {
            for c in 0..self.width() {
                write!(f, "{}", self.board[P(r, c)].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
