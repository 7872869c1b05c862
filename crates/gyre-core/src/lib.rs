//! **gyre-core** — core types for the gyre pathfinding ecosystem.
//!
//! This crate provides the foundational value types shared across gyre:
//! signed 2D geometry, the spiral coordinate codec that maps the whole
//! integer plane onto dense scalar keys, and chunked addressing for grids
//! organised as fixed-size blocks of cells.

pub mod chunk;
pub mod geom;
pub mod spiral;

pub use chunk::{ChunkPos, ChunkSize};
pub use geom::Point;
pub use spiral::{Location, decode, encode};
