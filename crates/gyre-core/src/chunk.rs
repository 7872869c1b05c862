//! Chunked addressing: viewing the plane as fixed-size blocks of cells.
//!
//! A [`ChunkSize`] fixes how many cells make up one chunk along each axis;
//! with it, any plane [`Point`] splits into a chunk coordinate plus a
//! cell-within-chunk offset ([`ChunkPos`]), and back. Conversions use
//! Euclidean div/mod so they round-trip exactly for negative coordinates
//! too (cell offsets are always non-negative).

use std::fmt;

use crate::geom::Point;
use crate::spiral::Location;

/// Cells per chunk along each axis. Both dimensions are at least 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkSize {
    width: u32,
    height: u32,
}

impl ChunkSize {
    /// Create a chunk size. Panics if either dimension is zero.
    pub const fn new(width: u32, height: u32) -> Self {
        assert!(width >= 1 && height >= 1, "chunk dimensions must be >= 1");
        Self { width, height }
    }

    /// Cell width of a chunk.
    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Cell height of a chunk.
    #[inline]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Split a plane point into chunk + cell-within-chunk coordinates.
    #[inline]
    pub fn split(self, p: Point) -> ChunkPos {
        let w = self.width as i32;
        let h = self.height as i32;
        ChunkPos {
            cx: p.x.div_euclid(w),
            cy: p.y.div_euclid(h),
            lx: p.x.rem_euclid(w),
            ly: p.y.rem_euclid(h),
        }
    }

    /// Rejoin chunk + cell coordinates into a plane point.
    /// Exact inverse of [`split`](Self::split).
    #[inline]
    pub fn join(self, c: ChunkPos) -> Point {
        Point::new(
            c.cx * self.width as i32 + c.lx,
            c.cy * self.height as i32 + c.ly,
        )
    }

    /// Split a [`Location`] into chunked coordinates via the spiral codec.
    #[inline]
    pub fn split_location(self, loc: Location) -> ChunkPos {
        self.split(loc.to_point())
    }

    /// Rejoin chunked coordinates into a [`Location`] via the spiral codec.
    #[inline]
    pub fn join_location(self, c: ChunkPos) -> Location {
        Location::from_point(self.join(c))
    }
}

/// A cell address as chunk coordinate `(cx, cy)` plus cell-within-chunk
/// offset `(lx, ly)`.
///
/// Offsets produced by [`ChunkSize::split`] always satisfy
/// `0 <= lx < width` and `0 <= ly < height`, including for negative plane
/// coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPos {
    pub cx: i32,
    pub cy: i32,
    pub lx: i32,
    pub ly: i32,
}

impl ChunkPos {
    /// Create a chunked cell address.
    #[inline]
    pub const fn new(cx: i32, cy: i32, lx: i32, ly: i32) -> Self {
        Self { cx, cy, lx, ly }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunk ({}, {}) cell ({}, {})",
            self.cx, self.cy, self.lx, self.ly
        )
    }
}
