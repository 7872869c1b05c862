//! The world-access abstraction: the [`Querier`] trait and its answer
//! types.
//!
//! A `Querier` decouples the search engine from any concrete world
//! representation. Implementations may compute answers on the fly, clip
//! to a boundary, or serve them from a pre-baked table — the engine only
//! sees locations, distances and [`QueryAnswer`]s.

use std::collections::HashMap;

use gyre_core::Location;

/// Identifies one engine instance across collaborator calls.
///
/// Threaded through every [`Querier`] and heuristic call so that a single
/// shared querier can disambiguate or cache per-run state when several
/// engines search concurrently.
pub type RunId = u64;

/// Walkability and edge penalty for entering a location.
///
/// `penalty` is additive cost on top of the default geometric distance;
/// it is meaningless when `walkable` is false.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryAnswer {
    pub walkable: bool,
    pub penalty: f32,
}

impl QueryAnswer {
    /// A walkable cell with the given additive penalty.
    #[inline]
    pub const fn open(penalty: f32) -> Self {
        Self {
            walkable: true,
            penalty,
        }
    }

    /// A non-walkable cell.
    #[inline]
    pub const fn blocked() -> Self {
        Self {
            walkable: false,
            penalty: 0.0,
        }
    }
}

/// The neighbours of a location, each with its default "as the crow
/// flies" distance from the queried location.
///
/// The distance is the baseline additive term of cost relaxation and
/// should match [`Querier::heuristic`] for the same pair of locations.
/// Keys are unique; insertion order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighbourAnswer {
    neighbours: HashMap<Location, f32>,
}

impl NeighbourAnswer {
    /// An empty answer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a set of locations, each at the uniform distance 1.
    pub fn uniform(locations: impl IntoIterator<Item = Location>) -> Self {
        Self {
            neighbours: locations.into_iter().map(|l| (l, 1.0)).collect(),
        }
    }

    /// Add a neighbour with its default distance. Replaces any previous
    /// distance for the same location.
    pub fn insert(&mut self, location: Location, distance: f32) {
        self.neighbours.insert(location, distance);
    }

    /// The default distance to a neighbour, if present.
    pub fn get(&self, location: Location) -> Option<f32> {
        self.neighbours.get(&location).copied()
    }

    /// Iterate over (neighbour, default distance) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Location, f32)> + '_ {
        self.neighbours.iter().map(|(&l, &d)| (l, d))
    }

    /// Number of neighbours.
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Whether there are no neighbours.
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }
}

/// World access for the search engine.
///
/// Implementations must be deterministic within one run: the engine makes
/// a single pass and performs no retries, so two calls with the same
/// arguments during a run must agree.
pub trait Querier {
    /// Conditions for entering `to` coming from the adjacent `from`.
    fn query(&self, id: RunId, to: Location, from: Location) -> QueryAnswer;

    /// Default heuristic distance between two locations.
    ///
    /// Must agree with the per-neighbour distances reported by
    /// [`neighbours`](Self::neighbours) for adjacent pairs.
    fn heuristic(&self, id: RunId, from: Location, to: Location) -> f32;

    /// The neighbours of `from` with their default distances.
    fn neighbours(&self, id: RunId, from: Location) -> NeighbourAnswer;
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyre_core::Point;

    fn loc(x: i32, y: i32) -> Location {
        Location::from_point(Point::new(x, y))
    }

    #[test]
    fn uniform_assigns_distance_one() {
        let a = NeighbourAnswer::uniform([loc(0, 0), loc(1, 0), loc(0, 1)]);
        assert_eq!(a.len(), 3);
        assert_eq!(a.get(loc(1, 0)), Some(1.0));
        assert_eq!(a.get(loc(5, 5)), None);
    }

    #[test]
    fn insert_replaces() {
        let mut a = NeighbourAnswer::new();
        assert!(a.is_empty());
        a.insert(loc(2, 2), 1.5);
        a.insert(loc(2, 2), 2.5);
        assert_eq!(a.len(), 1);
        assert_eq!(a.get(loc(2, 2)), Some(2.5));
    }

    #[test]
    fn answer_constructors() {
        assert!(QueryAnswer::open(0.5).walkable);
        assert!(!QueryAnswer::blocked().walkable);
    }
}
