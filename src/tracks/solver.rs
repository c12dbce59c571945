use super::progress::tick;
use super::{Field, Piece, Progress, SolveDetail};
use crate::common::{FOUR_NEIGHBOURS, P};

/// Depth-first search that repeatedly fills the most constrained empty
/// cell. The board is mutated in place; on failure every placement has
/// been undone.
pub fn solve_backtrack(field: &mut Field, progress: &mut dyn Progress) -> SolveDetail {
    let mut n_steps = 0u64;
    let solved = search(field, progress, &mut n_steps);
    SolveDetail { solved, n_steps }
}

fn search(field: &mut Field, progress: &mut dyn Progress, n_steps: &mut u64) -> bool {
    tick(n_steps, progress, field);

    if !field.can_still_satisfy() {
        return false;
    }
    if field.track_counts_match() && field.is_single_connected_path() {
        return true;
    }

    let (pos, pieces) = match most_constrained_cell(field) {
        Some(choice) => choice,
        None => return false,
    };

    for piece in pieces {
        field.place(pos, piece);
        if search(field, progress, n_steps) {
            return true;
        }
        field.remove(pos);
    }
    false
}

/// Picks the empty cell with the fewest legal pieces, preferring cells
/// adjacent to existing track; ties go to scan order. `None` when every
/// candidate cell has zero options.
fn most_constrained_cell(field: &Field) -> Option<(P, Vec<Piece>)> {
    let mut cells = vec![];
    for r in 0..field.height() {
        for c in 0..field.width() {
            let pos = P(r, c);
            if !field.is_empty(pos) {
                continue;
            }
            let frontier = FOUR_NEIGHBOURS.iter().any(|&d| {
                let next = pos + d;
                field.in_bounds(next) && field.is_filled(next)
            });
            if frontier {
                cells.push(pos);
            }
        }
    }
    if cells.is_empty() {
        for r in 0..field.height() {
            for c in 0..field.width() {
                if field.is_empty(P(r, c)) {
                    cells.push(P(r, c));
                }
            }
        }
    }

    let mut best: Option<(P, Vec<Piece>)> = None;
    for &pos in &cells {
        let pieces = field.legal_pieces(pos);
        if pieces.is_empty() {
            continue;
        }
        let better = match best {
            Some((_, ref b)) => pieces.len() < b.len(),
            None => true,
        };
        if better {
            best = Some((pos, pieces));
        }
    }
    best
}
