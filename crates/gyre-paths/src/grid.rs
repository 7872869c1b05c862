//! The grid querier family: 8-connected adjacency over the spiral-keyed
//! plane.
//!
//! Three concrete queriers of increasing concreteness share one set of
//! geometry helpers (neighbour enumeration, octile heuristic, chunked
//! addressing):
//!
//! - [`InfiniteGrid`] — unbounded plane, edge conditions supplied by an
//!   [`EdgeQuery`] collaborator (typically procedural terrain);
//! - [`BoundedGrid`] — as above, with neighbours clipped to an inclusive
//!   rectangular [`Bounds`] expressed directly or in chunked form;
//! - [`ArrayGrid`] — finite grid whose edge conditions are baked once
//!   into a 4D table `[cx][cy][lx][ly]` and served by O(1) lookup. This
//!   is the intended caching pattern for static terrain, and it is
//!   read-only after construction, so it can be shared freely across
//!   concurrently running engines.

use gyre_core::{ChunkPos, ChunkSize, Location, Point};
use thiserror::Error;

use crate::distance::octile;
use crate::query::{NeighbourAnswer, Querier, QueryAnswer, RunId};

/// Inclusive rectangular boundary on the plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Boundary between two corner points, both inclusive.
    /// Panics if `min` exceeds `max` on either axis.
    pub fn new(min: Point, max: Point) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y,
            "bounds corners out of order"
        );
        Self { min, max }
    }

    /// Boundary covering `chunks_x × chunks_y` chunks with the origin at
    /// chunk (0, 0).
    pub fn from_chunks(chunks_x: u32, chunks_y: u32, size: ChunkSize) -> Self {
        assert!(chunks_x >= 1 && chunks_y >= 1, "empty chunk span");
        Self::new(
            Point::ZERO,
            Point::new(
                (chunks_x * size.width()) as i32 - 1,
                (chunks_y * size.height()) as i32 - 1,
            ),
        )
    }

    /// Boundary between two chunked corner cells, both inclusive.
    pub fn from_chunk_corners(tl: ChunkPos, br: ChunkPos, size: ChunkSize) -> Self {
        Self::new(size.join(tl), size.join(br))
    }

    /// Whether a point lies within the boundary.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }
}

/// Edge-condition source for grid queriers.
///
/// This is the one piece of [`Querier`] the shared grid geometry cannot
/// answer by itself; closures with the matching signature implement it
/// directly.
pub trait EdgeQuery {
    /// Conditions for entering `to` coming from the adjacent `from`.
    fn query(&self, id: RunId, to: Location, from: Location) -> QueryAnswer;
}

impl<F> EdgeQuery for F
where
    F: Fn(RunId, Location, Location) -> QueryAnswer,
{
    fn query(&self, id: RunId, to: Location, from: Location) -> QueryAnswer {
        self(id, to, from)
    }
}

/// The 8 surrounding cells with octile default distances, optionally
/// clipped to a boundary. Shared by every grid querier variant.
fn grid_neighbours(from: Location, clip: Option<&Bounds>) -> NeighbourAnswer {
    let p = from.to_point();
    let mut answer = NeighbourAnswer::new();
    for n in p.neighbors_8() {
        if let Some(b) = clip {
            if !b.contains(n) {
                continue;
            }
        }
        answer.insert(Location::from_point(n), octile(p, n));
    }
    answer
}

#[inline]
fn grid_heuristic(from: Location, to: Location) -> f32 {
    octile(from.to_point(), to.to_point())
}

// ---------------------------------------------------------------------------
// InfiniteGrid
// ---------------------------------------------------------------------------

/// Unbounded 8-connected grid; edge conditions delegated to `E`.
pub struct InfiniteGrid<E> {
    edges: E,
}

impl<E: EdgeQuery> InfiniteGrid<E> {
    /// Wrap an edge-condition source into an unbounded grid querier.
    pub fn new(edges: E) -> Self {
        Self { edges }
    }
}

impl<E: EdgeQuery> Querier for InfiniteGrid<E> {
    fn query(&self, id: RunId, to: Location, from: Location) -> QueryAnswer {
        self.edges.query(id, to, from)
    }

    fn heuristic(&self, _id: RunId, from: Location, to: Location) -> f32 {
        grid_heuristic(from, to)
    }

    fn neighbours(&self, _id: RunId, from: Location) -> NeighbourAnswer {
        grid_neighbours(from, None)
    }
}

// ---------------------------------------------------------------------------
// BoundedGrid
// ---------------------------------------------------------------------------

/// 8-connected grid clipped to an inclusive boundary; edge conditions
/// delegated to `E`.
pub struct BoundedGrid<E> {
    bounds: Bounds,
    chunk: ChunkSize,
    edges: E,
}

impl<E: EdgeQuery> BoundedGrid<E> {
    /// Grid over an explicit boundary, with `chunk` fixing the chunked
    /// addressing used by [`Bounds::from_chunk_corners`]-style callers.
    pub fn new(bounds: Bounds, chunk: ChunkSize, edges: E) -> Self {
        Self {
            bounds,
            chunk,
            edges,
        }
    }

    /// Grid over `chunks_x × chunks_y` chunks starting at chunk (0, 0).
    pub fn from_chunks(chunks_x: u32, chunks_y: u32, chunk: ChunkSize, edges: E) -> Self {
        Self::new(Bounds::from_chunks(chunks_x, chunks_y, chunk), chunk, edges)
    }

    /// The inclusive boundary.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The chunked addressing in use.
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk
    }
}

impl<E: EdgeQuery> Querier for BoundedGrid<E> {
    fn query(&self, id: RunId, to: Location, from: Location) -> QueryAnswer {
        self.edges.query(id, to, from)
    }

    fn heuristic(&self, _id: RunId, from: Location, to: Location) -> f32 {
        grid_heuristic(from, to)
    }

    fn neighbours(&self, _id: RunId, from: Location) -> NeighbourAnswer {
        grid_neighbours(from, Some(&self.bounds))
    }
}

// ---------------------------------------------------------------------------
// ArrayGrid
// ---------------------------------------------------------------------------

/// Rejected [`ArrayGrid`] construction input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The table has a zero-length dimension.
    #[error("array grid table has an empty dimension")]
    Empty,
    /// Inner vectors disagree on length.
    #[error("array grid table is ragged at chunk ({0}, {1})")]
    Ragged(usize, usize),
}

/// Finite 8-connected grid answering `query` by table lookup.
///
/// Built from a caller-supplied 4D table indexed `[cx][cy][lx][ly]`;
/// bounds and chunk size are derived from the table's own dimensions.
/// The table is flattened once at construction and never mutated, so a
/// shared reference is safe across concurrently running engines.
#[derive(Debug)]
pub struct ArrayGrid {
    chunk: ChunkSize,
    bounds: Bounds,
    chunks_x: usize,
    chunks_y: usize,
    table: Vec<QueryAnswer>,
}

impl ArrayGrid {
    /// Build from a 4D answer table. The table must be rectangular and
    /// non-empty in every dimension.
    pub fn new(table: Vec<Vec<Vec<Vec<QueryAnswer>>>>) -> Result<Self, GridError> {
        let chunks_x = table.len();
        let chunks_y = table.first().map_or(0, Vec::len);
        let width = table
            .first()
            .and_then(|c| c.first())
            .map_or(0, Vec::len);
        let height = table
            .first()
            .and_then(|c| c.first())
            .and_then(|c| c.first())
            .map_or(0, Vec::len);
        if chunks_x == 0 || chunks_y == 0 || width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        let mut flat = Vec::with_capacity(chunks_x * chunks_y * width * height);
        for (cx, column) in table.iter().enumerate() {
            if column.len() != chunks_y {
                return Err(GridError::Ragged(cx, 0));
            }
            for (cy, cells) in column.iter().enumerate() {
                if cells.len() != width || cells.iter().any(|col| col.len() != height) {
                    return Err(GridError::Ragged(cx, cy));
                }
                for col in cells {
                    flat.extend_from_slice(col);
                }
            }
        }

        let chunk = ChunkSize::new(width as u32, height as u32);
        Ok(Self {
            chunk,
            bounds: Bounds::from_chunks(chunks_x as u32, chunks_y as u32, chunk),
            chunks_x,
            chunks_y,
            table: flat,
        })
    }

    /// The inclusive boundary derived from the table dimensions.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The chunk size derived from the table dimensions.
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk
    }

    /// The baked answer for a chunked cell address, if in range.
    pub fn get(&self, c: ChunkPos) -> Option<QueryAnswer> {
        let w = self.chunk.width() as usize;
        let h = self.chunk.height() as usize;
        if c.cx < 0 || c.cy < 0 || c.lx < 0 || c.ly < 0 {
            return None;
        }
        let (cx, cy) = (c.cx as usize, c.cy as usize);
        let (lx, ly) = (c.lx as usize, c.ly as usize);
        if cx >= self.chunks_x || cy >= self.chunks_y || lx >= w || ly >= h {
            return None;
        }
        let idx = ((cx * self.chunks_y + cy) * w + lx) * h + ly;
        Some(self.table[idx])
    }
}

impl Querier for ArrayGrid {
    fn query(&self, _id: RunId, to: Location, _from: Location) -> QueryAnswer {
        self.get(self.chunk.split_location(to))
            .unwrap_or_else(QueryAnswer::blocked)
    }

    fn heuristic(&self, _id: RunId, from: Location, to: Location) -> f32 {
        grid_heuristic(from, to)
    }

    fn neighbours(&self, _id: RunId, from: Location) -> NeighbourAnswer {
        grid_neighbours(from, Some(&self.bounds))
    }
}
