//! The A* search engine.
//!
//! One [`AStar`] instance owns the bookkeeping for one run at a time: a
//! node arena keyed by location, an open priority queue, and the closed
//! markers on the nodes themselves. World access goes through the
//! configured [`Querier`]; cost-to-go estimation through the configured
//! [`Heuristic`] (admissible by default).

use std::collections::{BinaryHeap, HashMap};

use gyre_core::Location;
use log::{debug, trace};
use thiserror::Error;

use crate::heuristic::{Admissible, Heuristic};
use crate::node::{NO_PARENT, NodeState, SearchNode};
use crate::query::{Querier, RunId};

/// A failed run. Finding no path is *not* an error — it is an absent
/// path in [`SearchResult`]. Errors mean the querier broke its contract
/// or the configured expansion limit was hit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The querier reported a negative or non-finite neighbour distance.
    #[error("querier returned invalid distance {distance} toward {to}")]
    InvalidDistance { to: Location, distance: f32 },
    /// The querier reported a negative or non-finite edge penalty.
    #[error("querier returned invalid penalty {penalty} toward {to}")]
    InvalidPenalty { to: Location, penalty: f32 },
    /// More nodes were expanded than the configured limit allows.
    #[error("expansion limit of {limit} nodes exceeded")]
    ExpansionLimit { limit: usize },
}

/// Outcome of one completed run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Ordered locations from start to target inclusive, or `None` when
    /// the target is unreachable.
    pub path: Option<Vec<Location>>,
    /// Reserved for a corner-simplified version of `path`. The base
    /// engine never populates it.
    pub waypoints: Option<Vec<Location>>,
}

impl SearchResult {
    fn found(path: Vec<Location>) -> Self {
        Self {
            path: Some(path),
            waypoints: None,
        }
    }

    fn not_found() -> Self {
        Self::default()
    }

    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// Open-queue ticket: a node index with the `f = g + h` it was pushed
/// under. Ordered min-first by exact float comparison; stale tickets are
/// discarded on pop (lazy deletion) instead of updating the heap in
/// place.
#[derive(Copy, Clone)]
struct OpenEntry {
    f: f32,
    idx: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f.total_cmp(&other.f).is_eq()
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The search engine: orchestrates one run at a time over a querier.
///
/// Construction fixes the run id, the querier and the heuristic; each
/// [`run`](Self::run) call is then a single deterministic attempt whose
/// state (node arena, open queue, closed markers) is exclusive to that
/// call. Engines with distinct ids may share one querier concurrently;
/// the querier is responsible for the thread-safety of any caching it
/// performs.
pub struct AStar<Q> {
    id: RunId,
    querier: Q,
    heuristic: Box<dyn Heuristic>,
    nodes: Vec<SearchNode>,
    table: HashMap<Location, usize>,
    expansion_limit: Option<usize>,
}

impl<Q: Querier> AStar<Q> {
    /// Engine with the default admissible heuristic.
    pub fn new(id: RunId, querier: Q) -> Self {
        Self::with_heuristic(id, querier, Box::new(Admissible))
    }

    /// Engine with an explicit heuristic strategy.
    pub fn with_heuristic(id: RunId, querier: Q, heuristic: Box<dyn Heuristic>) -> Self {
        Self {
            id,
            querier,
            heuristic,
            nodes: Vec::new(),
            table: HashMap::new(),
            expansion_limit: None,
        }
    }

    /// Fail any run that expands more than `limit` nodes. Off by
    /// default; this is the caller-imposed bound on search effort.
    pub fn expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    /// The engine's run id, as passed to every collaborator call.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// The configured querier.
    pub fn querier(&self) -> &Q {
        &self.querier
    }

    fn insert(&mut self, node: SearchNode) -> usize {
        let idx = self.nodes.len();
        self.table.insert(node.location, idx);
        self.nodes.push(node);
        idx
    }

    /// Search for a shortest path from `start` to `target`.
    ///
    /// Returns the full path (both endpoints inclusive) in the result, or
    /// an absent path if the target is unreachable. Errors only on
    /// querier contract violations or a hit expansion limit.
    pub fn run(
        &mut self,
        start: Location,
        target: Location,
    ) -> Result<SearchResult, SearchError> {
        debug!("run {}: {start} -> {target}", self.id);
        self.nodes.clear();
        self.table.clear();

        if start == target {
            return Ok(SearchResult::found(vec![start]));
        }

        let target_idx = self.insert(SearchNode::new(target, 0.0));
        let d2e = self.querier.heuristic(self.id, start, target);
        let start_idx = self.insert(SearchNode::new(start, d2e));
        self.nodes[start_idx].state = NodeState::Open;

        self.heuristic.set_state(
            self.id,
            &self.nodes[start_idx],
            &self.nodes[target_idx],
            &self.querier,
        );

        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            f: self.heuristic.estimate(&self.nodes[start_idx]),
            idx: start_idx,
        });

        let mut expanded = 0usize;
        let mut success = false;

        while let Some(ticket) = open.pop() {
            let ci = ticket.idx;
            // Lazy deletion: tickets for already-closed nodes are no-ops.
            if self.nodes[ci].state != NodeState::Open {
                continue;
            }
            self.nodes[ci].state = NodeState::Closed;

            // Identity match on the pre-created target node.
            if ci == target_idx {
                success = true;
                break;
            }

            expanded += 1;
            if let Some(limit) = self.expansion_limit {
                if expanded > limit {
                    debug!("run {}: expansion limit {limit} exceeded", self.id);
                    return Err(SearchError::ExpansionLimit { limit });
                }
            }

            let current = self.nodes[ci].location;
            let current_g = self.nodes[ci].g;
            let current_depth = self.nodes[ci].depth;
            trace!("expand {current} g={current_g}");

            let neighbours = self.querier.neighbours(self.id, current);
            for (loc, distance) in neighbours.iter() {
                if !distance.is_finite() || distance < 0.0 {
                    return Err(SearchError::InvalidDistance { to: loc, distance });
                }

                if let Some(&ni) = self.table.get(&loc) {
                    if self.nodes[ni].state == NodeState::Closed {
                        continue;
                    }
                }

                let conditions = self.querier.query(self.id, loc, current);
                if !conditions.walkable {
                    continue;
                }
                let penalty = conditions.penalty;
                if !penalty.is_finite() || penalty < 0.0 {
                    return Err(SearchError::InvalidPenalty { to: loc, penalty });
                }

                let ni = match self.table.get(&loc).copied() {
                    Some(ni) => ni,
                    None => {
                        let d2e = self.querier.heuristic(self.id, loc, target);
                        self.insert(SearchNode::new(loc, d2e))
                    }
                };

                let candidate = current_g + penalty + distance;
                let n = &mut self.nodes[ni];
                if n.state == NodeState::Open && candidate >= n.g {
                    continue;
                }

                n.g = candidate;
                n.state = NodeState::Open;
                n.parent = ci;
                n.depth = current_depth + 1;

                open.push(OpenEntry {
                    f: candidate + self.heuristic.estimate(&self.nodes[ni]),
                    idx: ni,
                });
            }
        }

        if !success {
            debug!("run {}: no path after {expanded} expansions", self.id);
            return Ok(SearchResult::not_found());
        }

        let mut path = Vec::with_capacity(self.nodes[target_idx].depth as usize + 1);
        let mut ci = target_idx;
        while ci != NO_PARENT {
            path.push(self.nodes[ci].location);
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        debug!(
            "run {}: path of {} cells after {expanded} expansions",
            self.id,
            path.len()
        );
        Ok(SearchResult::found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{SQRT_2, octile};
    use crate::grid::{ArrayGrid, BoundedGrid, InfiniteGrid};
    use crate::heuristic::DynamicWeighting;
    use crate::query::QueryAnswer;
    use gyre_core::{ChunkSize, Point};

    fn loc(x: i32, y: i32) -> Location {
        Location::from_point(Point::new(x, y))
    }

    fn all_open(_id: RunId, _to: Location, _from: Location) -> QueryAnswer {
        QueryAnswer::open(0.0)
    }

    fn bad_penalty(_id: RunId, _to: Location, _from: Location) -> QueryAnswer {
        QueryAnswer::open(-1.0)
    }

    /// Build a single-chunk ArrayGrid from character rows: `#` is
    /// blocked, `.` is open at no penalty, digits are open with that
    /// penalty.
    fn grid_from_rows(rows: &[&str]) -> ArrayGrid {
        let height = rows.len();
        let width = rows[0].len();
        let cells: Vec<Vec<QueryAnswer>> = (0..width)
            .map(|x| {
                (0..height)
                    .map(|y| match rows[y].as_bytes()[x] {
                        b'#' => QueryAnswer::blocked(),
                        b'.' => QueryAnswer::open(0.0),
                        d @ b'1'..=b'9' => QueryAnswer::open((d - b'0') as f32),
                        c => panic!("bad map cell {c:?}"),
                    })
                    .collect()
            })
            .collect();
        ArrayGrid::new(vec![vec![cells]]).unwrap()
    }

    /// Total cost of a path under a grid whose penalties come from the
    /// querier itself.
    fn path_cost(path: &[Location], grid: &impl Querier) -> f32 {
        path.windows(2)
            .map(|w| {
                let (from, to) = (w[0], w[1]);
                octile(from.to_point(), to.to_point()) + grid.query(0, to, from).penalty
            })
            .sum()
    }

    #[test]
    fn open_grid_goes_diagonally() {
        let grid = grid_from_rows(&[".....", ".....", ".....", ".....", "....."]);
        let mut engine = AStar::new(0, grid);
        let result = engine.run(loc(0, 0), loc(4, 4)).unwrap();

        let path = result.path.expect("path exists");
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], loc(0, 0));
        assert_eq!(path[4], loc(4, 4));
        let cost = path_cost(&path, engine.querier());
        assert!((cost - 4.0 * SQRT_2).abs() < 1e-5, "cost {cost}");
        assert!(result.waypoints.is_none());
    }

    #[test]
    fn wall_row_funnels_through_opening() {
        let grid = grid_from_rows(&[".....", ".....", "##.##", ".....", "....."]);
        let mut engine = AStar::new(0, grid);
        let result = engine.run(loc(0, 0), loc(4, 4)).unwrap();

        let path = result.path.expect("path exists");
        assert!(path.contains(&loc(2, 2)), "path must use the opening");
        assert_eq!(path[0], loc(0, 0));
        assert_eq!(*path.last().unwrap(), loc(4, 4));
    }

    #[test]
    fn impenetrable_wall_yields_no_path() {
        let grid = grid_from_rows(&[".....", ".....", "#####", ".....", "....."]);
        let mut engine = AStar::new(0, grid).expansion_limit(1000);
        let result = engine.run(loc(0, 0), loc(4, 4)).unwrap();

        assert!(!result.is_found());
        assert_eq!(result, SearchResult::not_found());
    }

    #[test]
    fn expansion_limit_fails_the_run() {
        let grid = BoundedGrid::from_chunks(10, 10, ChunkSize::new(10, 10), all_open);
        let mut engine = AStar::new(0, grid).expansion_limit(5);
        let err = engine.run(loc(0, 0), loc(99, 99)).unwrap_err();
        assert_eq!(err, SearchError::ExpansionLimit { limit: 5 });
    }

    #[test]
    fn start_equals_target() {
        let grid = grid_from_rows(&["...", "...", "..."]);
        let mut engine = AStar::new(0, grid);
        let result = engine.run(loc(1, 1), loc(1, 1)).unwrap();
        assert_eq!(result.path, Some(vec![loc(1, 1)]));
    }

    #[test]
    fn negative_penalty_is_a_contract_violation() {
        let grid = InfiniteGrid::new(bad_penalty);
        let mut engine = AStar::new(7, grid);
        let err = engine.run(loc(0, 0), loc(3, 0)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPenalty { .. }));
    }

    /// Exhaustive shortest-path cost by Bellman-Ford style relaxation,
    /// for cross-checking optimality on small grids.
    fn brute_force_cost(grid: &ArrayGrid, start: Point, target: Point) -> f32 {
        let b = grid.bounds();
        let w = (b.max.x - b.min.x + 1) as usize;
        let h = (b.max.y - b.min.y + 1) as usize;
        let idx = |p: Point| (p.y - b.min.y) as usize * w + (p.x - b.min.x) as usize;

        let mut dist = vec![f32::INFINITY; w * h];
        dist[idx(start)] = 0.0;
        for _ in 0..w * h {
            let mut changed = false;
            for y in b.min.y..=b.max.y {
                for x in b.min.x..=b.max.x {
                    let from = Point::new(x, y);
                    if dist[idx(from)].is_infinite() {
                        continue;
                    }
                    for to in from.neighbors_8() {
                        if !b.contains(to) {
                            continue;
                        }
                        let answer =
                            grid.query(0, Location::from_point(to), Location::from_point(from));
                        if !answer.walkable {
                            continue;
                        }
                        let cand = dist[idx(from)] + octile(from, to) + answer.penalty;
                        if cand < dist[idx(to)] {
                            dist[idx(to)] = cand;
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }
        dist[idx(target)]
    }

    #[test]
    fn admissible_heuristic_is_optimal() {
        // Penalties make the geometric diagonal the wrong choice.
        let grid = grid_from_rows(&[".9998", ".9...", ".9.9.", ".9.9.", "...9."]);
        let mut engine = AStar::new(0, grid);
        let result = engine.run(loc(0, 0), loc(4, 4)).unwrap();

        let path = result.path.expect("path exists");
        let cost = path_cost(&path, engine.querier());
        let best = brute_force_cost(engine.querier(), Point::new(0, 0), Point::new(4, 4));
        assert!((cost - best).abs() < 1e-4, "cost {cost} vs best {best}");
    }

    #[test]
    fn dynamic_weighting_converges_to_admissible() {
        let rows = [".....", ".###.", ".....", ".###.", "....."];

        let mut exact = AStar::new(0, grid_from_rows(&rows));
        let exact_path = exact.run(loc(0, 0), loc(4, 4)).unwrap().path.unwrap();
        let exact_cost = path_cost(&exact_path, exact.querier());

        // Weighted search overshoots the optimum by at most a factor of
        // 1 + epsilon, so the cost converges to the admissible one as
        // epsilon shrinks.
        for epsilon in [0.0, 1e-3, 1e-2] {
            let mut engine = AStar::with_heuristic(
                0,
                grid_from_rows(&rows),
                Box::new(DynamicWeighting::new(epsilon)),
            );
            let path = engine.run(loc(0, 0), loc(4, 4)).unwrap().path.unwrap();
            let cost = path_cost(&path, engine.querier());
            assert!(
                cost >= exact_cost - 1e-4,
                "epsilon {epsilon}: cost {cost} below exact {exact_cost}"
            );
            assert!(
                cost <= exact_cost * (1.0 + epsilon) + 1e-4,
                "epsilon {epsilon}: cost {cost} vs exact {exact_cost}"
            );
        }

        // Large epsilon may trade optimality away but still finds a path.
        let mut greedy = AStar::with_heuristic(
            0,
            grid_from_rows(&rows),
            Box::new(DynamicWeighting::new(5.0)),
        );
        let path = greedy.run(loc(0, 0), loc(4, 4)).unwrap().path.unwrap();
        let cost = path_cost(&path, greedy.querier());
        assert!(cost >= exact_cost - 1e-4);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use gyre_core::Point;

    #[test]
    fn search_result_round_trip() {
        let result = SearchResult {
            path: Some(vec![
                Location::from_point(Point::ZERO),
                Location::from_point(Point::new(1, 1)),
            ]),
            waypoints: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
