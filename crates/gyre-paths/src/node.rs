//! Per-location bookkeeping for one search run.

use gyre_core::Location;

/// Parent sentinel: the start node has no predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Which set a node currently belongs to within a run.
///
/// A location is in exactly one of these at any time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
    /// Not yet discovered (or discovered but never relaxed).
    #[default]
    Unseen,
    /// On the frontier, awaiting expansion.
    Open,
    /// Expanded; its cost is final for the rest of the run.
    Closed,
}

/// Algorithm bookkeeping for one location during one engine run.
///
/// Created lazily the first time a location is discovered; the whole
/// table is cleared at the start of the next run. `parent` is an index
/// into the run's node arena (the arena is the sole owner — parent links
/// form a tree rooted at the start node, never a cycle).
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub(crate) location: Location,
    pub(crate) distance_to_end: f32,
    pub(crate) state: NodeState,
    pub(crate) g: f32,
    pub(crate) parent: usize,
    pub(crate) depth: u32,
}

impl SearchNode {
    pub(crate) fn new(location: Location, distance_to_end: f32) -> Self {
        Self {
            location,
            distance_to_end,
            state: NodeState::Unseen,
            g: 0.0,
            parent: NO_PARENT,
            depth: 0,
        }
    }

    /// The location this node books for.
    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Best known accumulated cost from the start node.
    #[inline]
    pub fn g(&self) -> f32 {
        self.g
    }

    /// Heuristic baseline: geometric distance to the target, fixed at
    /// node creation.
    #[inline]
    pub fn distance_to_end(&self) -> f32 {
        self.distance_to_end
    }

    /// Path length from start to this node along parent links.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Current open/closed/unseen state.
    #[inline]
    pub fn state(&self) -> NodeState {
        self.state
    }
}
