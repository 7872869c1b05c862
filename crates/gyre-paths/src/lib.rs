//! **gyre-paths** — pluggable A* shortest-path search over spiral-keyed
//! grids.
//!
//! The engine ([`AStar`]) knows nothing about any concrete world: it asks
//! a [`Querier`] for neighbours, edge walkability/penalty, and heuristic
//! distances, and relaxes the answers through an open priority queue.
//! Worlds are addressed by opaque [`Location`](gyre_core::Location) keys,
//! so the same engine serves finite pre-baked grids, infinite
//! procedurally-queried grids, and array-backed chunk caches.
//!
//! # Pieces
//!
//! - [`Querier`] — the world-access abstraction (three-method contract)
//! - [`InfiniteGrid`], [`BoundedGrid`], [`ArrayGrid`] — 8-connected grid
//!   queriers of increasing concreteness
//! - [`Admissible`], [`DynamicWeighting`] — pluggable cost-to-go
//!   estimators; only the former guarantees optimal paths
//! - [`AStar`] — the engine; one run per call, results as
//!   [`SearchResult`]

pub mod astar;
pub mod distance;
pub mod grid;
pub mod heuristic;
pub mod node;
pub mod query;

pub use astar::{AStar, SearchError, SearchResult};
pub use distance::{SQRT_2, octile};
pub use grid::{ArrayGrid, BoundedGrid, Bounds, EdgeQuery, GridError, InfiniteGrid};
pub use heuristic::{Admissible, DynamicWeighting, Heuristic};
pub use node::{NodeState, SearchNode};
pub use query::{NeighbourAnswer, Querier, QueryAnswer, RunId};
