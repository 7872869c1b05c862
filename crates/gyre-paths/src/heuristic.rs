//! Cost-to-go estimation strategies.
//!
//! The engine is generic over a [`Heuristic`]: [`Admissible`] guarantees
//! minimum-cost paths, [`DynamicWeighting`] trades optimality for faster
//! expansion by inflating the estimate early in the search.

use crate::node::SearchNode;
use crate::query::{Querier, RunId};

/// A pluggable cost-to-go estimator.
///
/// [`set_state`](Self::set_state) is called exactly once at the start of
/// a run, before any [`estimate`](Self::estimate) call, so a strategy can
/// precompute run-scoped constants. `estimate` must be deterministic
/// given the node and the state set by the most recent `set_state`.
pub trait Heuristic {
    /// Prepare for a run from `start` to `target`.
    fn set_state(
        &mut self,
        id: RunId,
        start: &SearchNode,
        target: &SearchNode,
        querier: &dyn Querier,
    );

    /// Estimated remaining cost from `node` to the target.
    fn estimate(&self, node: &SearchNode) -> f32;
}

/// The exact geometric distance to the target.
///
/// Never overestimates the true remaining cost under the grid metric, so
/// the engine finds a minimum-cost path (given non-negative edge costs
/// and a consistent base metric). Every equally meritorious frontier must
/// be examined, which makes this the slower, exact option.
#[derive(Copy, Clone, Debug, Default)]
pub struct Admissible;

impl Heuristic for Admissible {
    fn set_state(
        &mut self,
        _id: RunId,
        _start: &SearchNode,
        _target: &SearchNode,
        _querier: &dyn Querier,
    ) {
    }

    fn estimate(&self, node: &SearchNode) -> f32 {
        node.distance_to_end()
    }
}

/// Depth-scaled heuristic inflation: faster search, suboptimal paths.
///
/// At the start of a run the expected total depth `n` is taken as the
/// default heuristic distance from start to target. A node at depth `d`
/// gets weight `w = max(0, 1 − d/n)` and estimate
/// `(1 + ε·w)·distance_to_end`: early in the search the estimate is
/// inflated by up to a factor of `1 + ε`, biasing expansion toward the
/// target greedily; as the frontier approaches the expected depth the
/// weight decays to zero and the estimate becomes admissible again.
///
/// **Not admissible** for any `ε > 0`: returned paths may cost more than
/// the optimum. This is the speed-versus-optimality knob; as `ε`
/// approaches 0 results converge to the admissible ones.
#[derive(Copy, Clone, Debug)]
pub struct DynamicWeighting {
    epsilon: f32,
    expected_depth: f32,
    inv_expected: f32,
}

impl DynamicWeighting {
    /// Create a dynamically weighted heuristic with inflation factor
    /// `epsilon` (typically > 1).
    pub fn new(epsilon: f32) -> Self {
        Self {
            epsilon,
            expected_depth: 0.0,
            inv_expected: 0.0,
        }
    }
}

impl Heuristic for DynamicWeighting {
    fn set_state(
        &mut self,
        id: RunId,
        start: &SearchNode,
        target: &SearchNode,
        querier: &dyn Querier,
    ) {
        let n = querier.heuristic(id, start.location(), target.location());
        self.expected_depth = n;
        // Degenerate runs (start at target) get no weighting at all.
        self.inv_expected = if n > 0.0 { 1.0 / n } else { 0.0 };
    }

    fn estimate(&self, node: &SearchNode) -> f32 {
        let d = node.depth() as f32;
        let w = if d > self.expected_depth {
            0.0
        } else {
            1.0 - d * self.inv_expected
        };
        (1.0 + self.epsilon * w) * node.distance_to_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{NeighbourAnswer, QueryAnswer};
    use gyre_core::{Location, Point};

    /// Pure-geometry querier for exercising `set_state`.
    struct Geometry;

    impl Querier for Geometry {
        fn query(&self, _id: RunId, _to: Location, _from: Location) -> QueryAnswer {
            QueryAnswer::open(0.0)
        }

        fn heuristic(&self, _id: RunId, from: Location, to: Location) -> f32 {
            crate::distance::octile(from.to_point(), to.to_point())
        }

        fn neighbours(&self, _id: RunId, _from: Location) -> NeighbourAnswer {
            NeighbourAnswer::new()
        }
    }

    fn node_at_depth(p: Point, distance_to_end: f32, depth: u32) -> SearchNode {
        let mut n = SearchNode::new(Location::from_point(p), distance_to_end);
        n.depth = depth;
        n
    }

    #[test]
    fn admissible_returns_baseline() {
        let h = Admissible;
        let n = node_at_depth(Point::new(3, 3), 7.25, 4);
        assert_eq!(h.estimate(&n), 7.25);
    }

    #[test]
    fn weighting_decays_with_depth() {
        let start = SearchNode::new(Location::from_point(Point::ZERO), 10.0);
        let target = SearchNode::new(Location::from_point(Point::new(10, 0)), 0.0);
        let mut h = DynamicWeighting::new(2.0);
        h.set_state(0, &start, &target, &Geometry);

        let shallow = node_at_depth(Point::new(1, 0), 9.0, 1);
        let deep = node_at_depth(Point::new(8, 0), 9.0, 8);
        let past = node_at_depth(Point::new(12, 0), 9.0, 15);

        assert!(h.estimate(&shallow) > h.estimate(&deep));
        // Beyond the expected depth the weight clamps to zero.
        assert_eq!(h.estimate(&past), 9.0);
    }

    #[test]
    fn zero_epsilon_is_admissible() {
        let start = SearchNode::new(Location::from_point(Point::ZERO), 5.0);
        let target = SearchNode::new(Location::from_point(Point::new(5, 0)), 0.0);
        let mut h = DynamicWeighting::new(0.0);
        h.set_state(0, &start, &target, &Geometry);

        let n = node_at_depth(Point::new(2, 0), 3.0, 2);
        assert_eq!(h.estimate(&n), Admissible.estimate(&n));
    }

    #[test]
    fn degenerate_run_has_no_weight() {
        let start = SearchNode::new(Location::from_point(Point::ZERO), 0.0);
        let mut h = DynamicWeighting::new(3.0);
        h.set_state(0, &start, &start, &Geometry);
        let n = node_at_depth(Point::new(1, 1), 2.0, 1);
        // n = 0 disables weighting entirely rather than dividing by zero.
        assert_eq!(h.estimate(&n), 2.0);
    }
}
