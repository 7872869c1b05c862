//! Spiral coordinate codec: a bijection between the integer plane and
//! dense scalar keys.
//!
//! Points are enumerated in concentric square rings around the origin, so
//! the whole (unbounded) plane is addressable with a single positive
//! integer. Nearby points get nearby-ish keys, and the rest of the system
//! can treat cells as opaque hashable scalars instead of coordinate pairs.
//!
//! Ring `r = max(|x|, |y|)` occupies the key interval
//! `((2r-1)², (2r+1)²]`, with `encode(ORIGIN) == 1`. [`encode`] and
//! [`decode`] are exact inverses of each other for every point and every
//! key produced by `encode`.

use std::fmt;

use crate::geom::Point;

/// Opaque identity of a grid cell: its key on the spiral.
///
/// Two locations are equal iff their keys are equal. Produced from a
/// [`Point`] via the codec; algorithms never build one from raw
/// coordinates directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location(u64);

impl Location {
    /// Wrap an existing spiral key. Keys are 1-based.
    #[inline]
    pub fn new(key: u64) -> Self {
        debug_assert!(key >= 1, "spiral keys are 1-based");
        Self(key)
    }

    /// The location of a point on the spiral.
    #[inline]
    pub fn from_point(p: Point) -> Self {
        Self(encode(p))
    }

    /// The underlying spiral key.
    #[inline]
    pub fn key(self) -> u64 {
        self.0
    }

    /// Decode back to plane coordinates.
    #[inline]
    pub fn to_point(self) -> Point {
        decode(self.0)
    }
}

impl From<Point> for Location {
    fn from(p: Point) -> Self {
        Self::from_point(p)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Map a point to its 1-based spiral key.
///
/// `encode(Point::ZERO) == 1`; every other point gets a distinct key > 1.
/// The extreme coordinate `i32::MIN` is not representable (its ring would
/// overflow the key space); every other i32 coordinate is.
pub fn encode(p: Point) -> u64 {
    debug_assert!(
        p.x != i32::MIN && p.y != i32::MIN,
        "coordinate out of codec range"
    );
    let x = p.x as i64;
    let y = p.y as i64;
    let r = x.abs().max(y.abs());
    if r == 0 {
        return 1;
    }
    let t = 2 * r as u64;
    let m = (t + 1) * (t + 1); // last key of ring r

    // The four sides of the ring, highest keys first. Corner cells belong
    // to the first side that matches, matching decode's branch order.
    if x == -r {
        m - (r - y) as u64
    } else if y == -r {
        m - t - (x + r) as u64
    } else if x == r {
        m - 2 * t - (y + r) as u64
    } else {
        m - 3 * t - (r - x) as u64
    }
}

/// Map a 1-based spiral key back to its point. Exact inverse of [`encode`].
pub fn decode(key: u64) -> Point {
    debug_assert!(key >= 1, "spiral keys are 1-based");
    // Ring index: smallest r with (2r+1)^2 >= key.
    let sq = key.isqrt();
    let o = if sq * sq == key { sq } else { sq + 1 };
    let o = if o % 2 == 0 { o + 1 } else { o };
    let r = ((o - 1) / 2) as i64;

    let t = 2 * r as u64;
    let mut m = o * o;

    // Walk the four sides of the ring, highest keys first.
    if key >= m - t {
        return pt(-r, r - (m - key) as i64);
    }
    m -= t;
    if key >= m - t {
        return pt(-r + (m - key) as i64, -r);
    }
    m -= t;
    if key >= m - t {
        return pt(r, -r + (m - key) as i64);
    }
    pt(r - (m - key - t) as i64, r)
}

#[inline]
fn pt(x: i64, y: i64) -> Point {
    Point::new(x as i32, y as i32)
}
