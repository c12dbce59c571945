use rand::Rng;

use super::{Piece, Puzzle};
use crate::common::{Grid, D, FOUR_NEIGHBOURS, P};

/// Generates a puzzle by walking a self-avoiding random path between two
/// edge cells, deriving the row/column counts from it and keeping the two
/// terminal pieces plus up to `extra_clues` interior pieces as clues.
/// The generating path is a witness that the puzzle is solvable.
pub fn generate<R: Rng>(height: i32, width: i32, extra_clues: usize, rng: &mut R) -> Puzzle {
    assert!(height >= 2 && width >= 2);
    loop {
        if let Some(puzzle) = generate_once(height, width, extra_clues, rng) {
            return puzzle;
        }
    }
}

fn generate_once<R: Rng>(
    height: i32,
    width: i32,
    extra_clues: usize,
    rng: &mut R,
) -> Option<Puzzle> {
    let (start, entry_dir) = random_edge_cell(height, width, rng);
    let min_len = ((height + width) / 2) as usize;

    let mut on_path = Grid::new(height, width, false);
    let mut path = vec![start];
    on_path[start] = true;
    let mut pos = start;
    let exit_dir;

    loop {
        let off_dirs: Vec<D> = FOUR_NEIGHBOURS
            .iter()
            .copied()
            .filter(|&d| !in_bounds(height, width, pos + d))
            .collect();
        let steps: Vec<D> = FOUR_NEIGHBOURS
            .iter()
            .copied()
            .filter(|&d| {
                let next = pos + d;
                in_bounds(height, width, next) && !on_path[next]
            })
            .collect();

        // leave the board once the walk is long enough, or when stuck
        let may_exit = !off_dirs.is_empty() && path.len() >= 2;
        if may_exit && (steps.is_empty() || (path.len() >= min_len && rng.gen_bool(0.3))) {
            exit_dir = off_dirs[rng.gen_range(0..off_dirs.len())];
            break;
        }
        if steps.is_empty() {
            return None;
        }

        let d = steps[rng.gen_range(0..steps.len())];
        pos = pos + d;
        on_path[pos] = true;
        path.push(pos);
    }

    // turn the walk into pieces
    let mut pieces = Grid::new(height, width, Piece::Empty);
    for (i, &p) in path.iter().enumerate() {
        let before = if i == 0 { entry_dir } else { path[i - 1] - p };
        let after = if i == path.len() - 1 {
            exit_dir
        } else {
            path[i + 1] - p
        };
        pieces[p] = Piece::of_connections(before, after)?;
    }

    let mut horizontal_clues = vec![0; height as usize];
    let mut vertical_clues = vec![0; width as usize];
    for &p in &path {
        horizontal_clues[p.0 as usize] += 1;
        vertical_clues[p.1 as usize] += 1;
    }

    let mut starting_grid = vec![Piece::Empty; (height * width) as usize];
    let mut keep = vec![*path.first()?, *path.last()?];
    if path.len() > 2 {
        for _ in 0..extra_clues {
            keep.push(path[rng.gen_range(1..path.len() - 1)]);
        }
    }
    for p in keep {
        starting_grid[(p.0 * width + p.1) as usize] = pieces[p];
    }

    Some(Puzzle {
        grid_width: width,
        grid_height: height,
        vertical_clues,
        horizontal_clues,
        starting_grid,
    })
}

fn in_bounds(height: i32, width: i32, pos: P) -> bool {
    0 <= pos.0 && pos.0 < height && 0 <= pos.1 && pos.1 < width
}

fn random_edge_cell<R: Rng>(height: i32, width: i32, rng: &mut R) -> (P, D) {
    match rng.gen_range(0..4) {
        0 => (P(0, rng.gen_range(0..width)), D(-1, 0)),
        1 => (P(height - 1, rng.gen_range(0..width)), D(1, 0)),
        2 => (P(rng.gen_range(0..height), 0), D(0, -1)),
        _ => (P(rng.gen_range(0..height), width - 1), D(0, 1)),
    }
}
