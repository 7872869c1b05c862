//! Distance metric for 8-connected grid movement.

use gyre_core::Point;

/// Cost of one diagonal step.
pub const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Octile distance between two points: `√2·min(ax, ay) + |ax − ay|`
/// where `ax = |a.x − b.x|`, `ay = |a.y − b.y|`.
///
/// Exact for single-step 8-connected moves (1 for axis-aligned, √2 for
/// diagonal) and admissible + consistent as a heuristic for 8-connected
/// movement in general.
#[inline]
pub fn octile(a: Point, b: Point) -> f32 {
    let ax = (a.x as i64 - b.x as i64).abs();
    let ay = (a.y as i64 - b.y as i64).abs();
    let (min, max) = if ax < ay { (ax, ay) } else { (ay, ax) };
    SQRT_2 * min as f32 + (max - min) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_zero() {
        let p = Point::new(-7, 13);
        assert_eq!(octile(p, p), 0.0);
    }

    #[test]
    fn single_steps() {
        let o = Point::ZERO;
        assert_eq!(octile(o, Point::new(1, 0)), 1.0);
        assert_eq!(octile(o, Point::new(0, -1)), 1.0);
        assert_eq!(octile(o, Point::new(1, 1)), SQRT_2);
        assert_eq!(octile(o, Point::new(-1, 1)), SQRT_2);
    }

    #[test]
    fn general_form() {
        // 1 diagonal + 2 straight steps.
        assert!((octile(Point::ZERO, Point::new(3, 1)) - (SQRT_2 + 2.0)).abs() < 1e-6);
        // 4 diagonals.
        assert!((octile(Point::new(1, 1), Point::new(5, 5)) - 4.0 * SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn symmetry() {
        let pairs = [
            (Point::new(0, 0), Point::new(4, 9)),
            (Point::new(-3, 2), Point::new(7, -8)),
            (Point::new(100, -100), Point::new(-100, 100)),
        ];
        for (a, b) in pairs {
            assert_eq!(octile(a, b), octile(b, a));
        }
    }
}
