//! Utilities for generating examples, benchmarks, and test cases.

use crate::{Paths, Point};

/// Generate a bunch of squares, arranged in a grid.
///
/// The top-left of the first square is at (x0, y0). Each square has size `size
/// x size`, and the distance between squares (both horizontally and vertically)
/// is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated down by `slant`.
fn squares((x0, y0): (i64, i64), size: i64, offset: i64, slant: i64, count: usize) -> Paths {
    let mut ret = Vec::new();
    for i in 0..count as i64 {
        let x = x0 + i * offset;
        for j in 0..count as i64 {
            let y = y0 + j * offset;
            ret.push(vec![
                Point::new(x, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size + slant),
                Point::new(x + size, y + slant),
            ]);
        }
    }

    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// ┌────┐ ┌────┐ ┌────┐
/// │    │ │    │ │    │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │    │ │    │ │    │
/// └────┘ └────┘ └────┘
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares.
pub fn checkerboard(n: usize) -> (Paths, Paths) {
    (
        squares((0, 0), 30, 40, 0, n),
        squares((20, 20), 30, 40, 0, n.saturating_sub(1)),
    )
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
///
/// Horizontal edges have special handling in the sweep, so their presence or
/// absence can affect performance.
pub fn slanted_checkerboard(n: usize) -> (Paths, Paths) {
    (
        squares((0, 0), 30, 40, 1, n),
        squares((20, 20), 30, 40, 1, n.saturating_sub(1)),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from top-left
/// to bottom-right. The "odds" go from top-right to bottom-left.
///
/// Every even crosses every odd, so this has quadratically many intersections.
pub fn slanties(n: usize) -> (Paths, Paths) {
    let h = 20 * n as i64;

    let mut even = Vec::new();
    let mut odd = Vec::new();
    for i in 0..n as i64 {
        let x_off = 20 * i;
        even.push(vec![
            Point::new(x_off, 0),
            Point::new(x_off + h, h),
            Point::new(x_off + h + 10, h),
            Point::new(x_off + 10, 0),
        ]);

        odd.push(vec![
            Point::new(x_off + h, 0),
            Point::new(x_off, h),
            Point::new(x_off + 10, h),
            Point::new(x_off + h + 10, 0),
        ]);
    }

    (even, odd)
}

/// A self-intersecting star with `points` spikes, centered at `center`.
///
/// The vertices are on a circle of the given radius, and each one is joined to
/// the vertex `skip` places further around. With `points = 5` and `skip = 2`,
/// that's the usual pentagram.
pub fn star(center: (i64, i64), radius: f64, points: usize, skip: usize) -> Vec<Point> {
    let vertex = |k: usize| {
        let theta = std::f64::consts::TAU * k as f64 / points as f64;
        Point::new(
            center.0 + (radius * theta.sin()).round() as i64,
            center.1 - (radius * theta.cos()).round() as i64,
        )
    };
    (0..points).map(|i| vertex(i * skip % points.max(1))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_sizes() {
        let (outer, inner) = checkerboard(3);
        assert_eq!(outer.len(), 9);
        assert_eq!(inner.len(), 4);

        let (outer, inner) = checkerboard(0);
        assert!(outer.is_empty() && inner.is_empty());
    }

    #[test]
    fn pentagram() {
        let s = star((0, 0), 100.0, 5, 2);
        assert_eq!(s.len(), 5);
        assert_eq!(s[0], Point::new(0, -100));
        assert_eq!(s[1], Point::new(59, 81));
    }
}
