use std::collections::HashSet;

use super::progress::tick;
use super::{Field, Piece, Progress, SolveDetail, PIECES};
use crate::common::{D, P};

/// Grows a single chain of track from the entry cell, placing or
/// confirming one piece per step along the outgoing connection. The walk
/// must pass through every pre-placed piece and satisfy all counts.
pub fn solve_path(field: &mut Field, progress: &mut dyn Progress) -> SolveDetail {
    let mut n_steps = 0u64;

    let start = field.entry().and_then(|entry| {
        // the walk arrives at the entry from outside the board
        off_grid_connection(field, entry).map(|d| (entry, -d))
    });
    let (entry, incoming) = match start {
        Some(start) => start,
        None => {
            return SolveDetail {
                solved: false,
                n_steps,
            }
        }
    };

    let fixed = field.fixed_points();
    let mut walker = Walker {
        field,
        progress,
        n_steps: &mut n_steps,
        fixed,
        visited: HashSet::new(),
    };
    let solved = walker.walk(entry, incoming, 0);
    SolveDetail { solved, n_steps }
}

fn off_grid_connection(field: &Field, pos: P) -> Option<D> {
    field
        .piece(pos)
        .connections()
        .iter()
        .copied()
        .find(|&d| !field.in_bounds(pos + d))
}

struct Walker<'a> {
    field: &'a mut Field,
    progress: &'a mut dyn Progress,
    n_steps: &'a mut u64,
    fixed: Vec<P>,
    visited: HashSet<P>,
}

impl Walker<'_> {
    fn walk(&mut self, pos: P, incoming: D, fixed_hit: usize) -> bool {
        tick(self.n_steps, self.progress, self.field);

        if !self.field.in_bounds(pos) || self.visited.contains(&pos) {
            return false;
        }
        if self.visited.len() as i32 >= self.field.total_count() {
            return false;
        }

        let existing = self.field.piece(pos);
        let mut fixed_hit = fixed_hit;
        if existing != Piece::Empty {
            if !existing.connects_to(-incoming) {
                return false;
            }
            fixed_hit += 1;
        }
        self.visited.insert(pos);

        if fixed_hit == self.fixed.len()
            && self.field.track_counts_match()
            && self.field.is_single_connected_path()
        {
            return true;
        }

        let remaining: Vec<P> = self
            .fixed
            .iter()
            .copied()
            .filter(|p| !self.visited.contains(p))
            .collect();

        // corners first so the walk prefers to turn towards its clues
        let candidates: Vec<Piece> = if existing != Piece::Empty {
            vec![existing]
        } else {
            PIECES
                .iter()
                .rev()
                .copied()
                .filter(|&p| p.connects_to(-incoming) && self.field.can_place(pos, p))
                .collect()
        };

        for piece in candidates {
            let placed = existing == Piece::Empty;
            if placed {
                self.field.place(pos, piece);
            }

            let mut outgoing: Vec<D> = piece
                .connections()
                .iter()
                .copied()
                .filter(|&d| d != -incoming)
                .collect();
            outgoing.sort_by_key(|&d| nearest_distance(pos + d, &remaining));

            for d in outgoing {
                if self.walk(pos + d, d, fixed_hit) {
                    return true;
                }
            }

            if placed {
                self.field.remove(pos);
            }
        }

        self.visited.remove(&pos);
        false
    }
}

fn nearest_distance(pos: P, remaining: &[P]) -> i32 {
    remaining.iter().map(|&p| pos.manhattan(p)).min().unwrap_or(0)
}
