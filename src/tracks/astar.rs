use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use super::progress::tick;
use super::{Field, Piece, Progress, SolveDetail, PIECES};
use crate::common::{D, FOUR_NEIGHBOURS, P};

/// One partial path: the walk has been decided up to but excluding `pos`,
/// and each state owns the board those decisions produced.
struct Node {
    priority: i32,
    g: i32,
    field: Field,
    pos: P,
    incoming: D,
    visited: HashSet<P>,
    fixed_hit: usize,
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        self.priority == other.priority
    }
}
impl Eq for Node {}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Node) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Node {
    fn cmp(&self, other: &Node) -> Ordering {
        // reversed so the BinaryHeap pops the cheapest state first
        other.priority.cmp(&self.priority)
    }
}

/// Best-first search over partial path states ordered by path length plus
/// a clue-spanning-tree heuristic. On success the winning clone is copied
/// back into the caller's board.
pub fn solve_astar(field: &mut Field, progress: &mut dyn Progress) -> SolveDetail {
    let mut n_steps = 0u64;
    let failed = SolveDetail {
        solved: false,
        n_steps: 0,
    };

    let (entry, exit) = match (field.entry(), field.exit()) {
        (Some(entry), Some(exit)) => (entry, exit),
        _ => return failed,
    };
    let incoming = match field
        .piece(entry)
        .connections()
        .iter()
        .copied()
        .find(|&d| !field.in_bounds(entry + d))
    {
        Some(d) => -d,
        None => return failed,
    };

    let fixed = field.fixed_points();
    let total_fixed = fixed.len();

    let mut open = BinaryHeap::new();
    let mut closed: HashMap<(P, D, usize, u64), i32> = HashMap::new();
    open.push(Node {
        priority: heuristic(field, entry, &HashSet::new(), &fixed, exit),
        g: 0,
        field: field.clone(),
        pos: entry,
        incoming,
        visited: HashSet::new(),
        fixed_hit: 0,
    });

    while let Some(node) = open.pop() {
        tick(&mut n_steps, progress, &node.field);

        let signature = (
            node.pos,
            node.incoming,
            node.fixed_hit,
            visited_hash(&node.visited),
        );
        if closed.get(&signature).map_or(false, |&best| best <= node.g) {
            continue;
        }
        closed.insert(signature, node.g);

        let existing = node.field.piece(node.pos);
        let candidates: Vec<Piece> = if existing != Piece::Empty {
            if existing.connects_to(-node.incoming) {
                vec![existing]
            } else {
                vec![]
            }
        } else {
            PIECES
                .iter()
                .copied()
                .filter(|&p| node.field.can_place(node.pos, p))
                .collect()
        };

        for piece in candidates {
            let mut next_field = node.field.clone();
            if existing == Piece::Empty {
                next_field.place(node.pos, piece);
            }
            let fixed_hit = node.fixed_hit + if existing != Piece::Empty { 1 } else { 0 };
            let mut visited = node.visited.clone();
            visited.insert(node.pos);

            if fixed_hit == total_fixed
                && next_field.on_edge(node.pos)
                && next_field.track_counts_match()
                && next_field.is_single_connected_path()
            {
                field.copy_from(&next_field);
                return SolveDetail {
                    solved: true,
                    n_steps,
                };
            }

            if !next_field.can_still_satisfy() {
                continue;
            }

            for &d in piece.connections() {
                if d == -node.incoming {
                    continue;
                }
                let next = node.pos + d;
                if !next_field.in_bounds(next) || visited.contains(&next) {
                    continue;
                }
                if !can_reach_all_fixed(&next_field, next, &visited, &fixed) {
                    continue;
                }
                let g = node.g + 1;
                open.push(Node {
                    priority: g + heuristic(&next_field, next, &visited, &fixed, exit),
                    g,
                    field: next_field.clone(),
                    pos: next,
                    incoming: d,
                    visited: visited.clone(),
                    fixed_hit,
                });
            }
        }
    }

    SolveDetail {
        solved: false,
        n_steps,
    }
}

/// Stable hash of the visited set: points are sorted before folding so the
/// value does not depend on set iteration order.
fn visited_hash(visited: &HashSet<P>) -> u64 {
    let mut points: Vec<P> = visited.iter().copied().collect();
    points.sort();
    let mut hasher = DefaultHasher::new();
    for p in points {
        p.hash(&mut hasher);
    }
    hasher.finish()
}

/// Flood fill from `pos` that may not re-enter the walked chain; every
/// clue the walk has not yet collected must still be reachable.
fn can_reach_all_fixed(field: &Field, pos: P, visited: &HashSet<P>, fixed: &[P]) -> bool {
    if fixed.iter().all(|p| visited.contains(p)) {
        return true;
    }
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(pos);
    queue.push_back(pos);
    while let Some(p) = queue.pop_front() {
        for &d in &FOUR_NEIGHBOURS {
            let next = p + d;
            if field.in_bounds(next) && !visited.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    fixed
        .iter()
        .all(|p| visited.contains(p) || seen.contains(p))
}

/// Lower-ish bound on the work left: a greedy spanning tree over the
/// uncollected clues, the distance from them (or from `pos`) to the exit,
/// and the outstanding count mismatch. Not provably admissible, so the
/// search is best-effort rather than guaranteed-optimal.
fn heuristic(field: &Field, pos: P, visited: &HashSet<P>, fixed: &[P], exit: P) -> i32 {
    let remaining: Vec<P> = fixed
        .iter()
        .copied()
        .filter(|p| !visited.contains(p))
        .collect();

    let mst = mst_cost(pos, &remaining);

    let exit_dist = remaining
        .iter()
        .map(|&p| p.manhattan(exit))
        .min()
        .unwrap_or_else(|| pos.manhattan(exit));

    let mut mismatch = 0;
    for r in 0..field.height() {
        mismatch += (field.row_count(r) - field.track_count_in_row(r)).abs();
    }
    for c in 0..field.width() {
        mismatch += (field.col_count(c) - field.track_count_in_col(c)).abs();
    }

    mst + exit_dist + mismatch
}

/// Prim-style nearest-in-tree spanning tree cost over `pos` and `points`
/// under Manhattan distance.
fn mst_cost(pos: P, points: &[P]) -> i32 {
    let mut in_tree = vec![false; points.len()];
    let mut dist: Vec<i32> = points.iter().map(|&p| pos.manhattan(p)).collect();
    let mut total = 0;
    for _ in 0..points.len() {
        let mut best = None;
        for i in 0..points.len() {
            if !in_tree[i] && best.map_or(true, |b: usize| dist[i] < dist[b]) {
                best = Some(i);
            }
        }
        let best = match best {
            Some(i) => i,
            None => break,
        };
        in_tree[best] = true;
        total += dist[best];
        for i in 0..points.len() {
            if !in_tree[i] {
                dist[i] = dist[i].min(points[best].manhattan(points[i]));
            }
        }
    }
    total
}
