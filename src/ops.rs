//! Operations built on top of the clipper: simplification and Minkowski sums.

use arrayvec::ArrayVec;

use crate::{
    geom::{orientation, translate_path, Path, Paths, Point},
    BinaryOp, ClipOptions, Clipper, Error, FillRule, PolyType,
};

/// Removes self-intersections from a polygon.
///
/// The output covers the same region as `path` (as interpreted by `fill_rule`),
/// but consists of strictly simple contours.
pub fn simplify_polygon(path: &[Point], fill_rule: FillRule) -> Result<Paths, Error> {
    let mut clipper = simplifier();
    clipper.add_path(path, PolyType::Subject, true)?;
    clipper.execute(BinaryOp::Union, fill_rule, fill_rule)
}

/// Removes self-intersections from a collection of polygons.
///
/// Overlapping polygons get merged, according to `fill_rule`.
pub fn simplify_polygons(paths: &[Path], fill_rule: FillRule) -> Result<Paths, Error> {
    let mut clipper = simplifier();
    clipper.add_paths(paths, PolyType::Subject, true)?;
    clipper.execute(BinaryOp::Union, fill_rule, fill_rule)
}

fn simplifier() -> Clipper {
    Clipper::new(ClipOptions {
        strictly_simple: true,
        ..ClipOptions::default()
    })
}

/// Sweeps `pattern` along `path`, returning one quadrilateral per pair of
/// (path segment, pattern segment). The union of the quads is the sum.
fn minkowski(pattern: &[Point], path: &[Point], is_sum: bool, closed: bool) -> Paths {
    let placed: Vec<Path> = path
        .iter()
        .map(|&base| {
            pattern
                .iter()
                .map(|&q| {
                    if is_sum {
                        Point::new(base.x.saturating_add(q.x), base.y.saturating_add(q.y))
                    } else {
                        Point::new(base.x.saturating_sub(q.x), base.y.saturating_sub(q.y))
                    }
                })
                .collect()
        })
        .collect();

    if placed.len() == 1 {
        // A single point just moves the pattern around.
        let mut p = placed[0].clone();
        if !orientation(&p) {
            p.reverse();
        }
        return vec![p];
    }

    let n = placed.len();
    let m = pattern.len();
    let segments = if closed { n } else { n.saturating_sub(1) };
    let mut quads = Vec::with_capacity(segments * m);
    for i in 0..segments {
        let (a, b) = (&placed[i], &placed[(i + 1) % n]);
        for j in 0..m {
            let k = (j + 1) % m;
            let mut quad: ArrayVec<Point, 4> = [a[j], b[j], b[k], a[k]].into();
            if !orientation(&quad) {
                quad.reverse();
            }
            quads.push(quad.to_vec());
        }
    }
    quads
}

fn union_nonzero(subject: &[Path], clip: &[Path]) -> Result<Paths, Error> {
    let mut clipper = Clipper::default();
    clipper.add_paths(subject, PolyType::Subject, true)?;
    clipper.add_paths(clip, PolyType::Clip, true)?;
    clipper.execute(BinaryOp::Union, FillRule::NonZero, FillRule::NonZero)
}

/// The Minkowski sum of `pattern` and `path`: the region swept out by
/// `pattern` as its origin moves along `path`.
///
/// If `closed` is true, `path` is treated as a closed polygon and the segment
/// from its last point back to its first point is swept too. Note that the
/// interior of a closed `path` isn't filled in: only its outline is swept.
pub fn minkowski_sum(pattern: &[Point], path: &[Point], closed: bool) -> Result<Paths, Error> {
    if pattern.is_empty() || path.is_empty() {
        return Ok(Vec::new());
    }
    let quads = minkowski(pattern, path, true, closed);
    union_nonzero(&quads, &[])
}

/// The union of the Minkowski sums of `pattern` with each of `paths`.
///
/// Unlike [`minkowski_sum`], closed paths are treated as filled polygons:
/// each one's interior (translated by the pattern's first point) is included
/// in the output.
pub fn minkowski_sum_paths(
    pattern: &[Point],
    paths: &[Path],
    closed: bool,
) -> Result<Paths, Error> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let mut subject = Vec::new();
    let mut clip = Vec::new();
    for path in paths.iter().filter(|p| !p.is_empty()) {
        subject.extend(minkowski(pattern, path, true, closed));
        if closed {
            clip.push(translate_path(path, pattern[0]));
        }
    }
    union_nonzero(&subject, &clip)
}

/// The Minkowski difference of two closed polygons.
///
/// This is the set of all `b - a` with `a` on `poly1`'s outline and `b` on
/// `poly2`'s outline. In particular, the polygons touch or overlap exactly
/// when the origin is in the (filled-in) difference.
pub fn minkowski_diff(poly1: &[Point], poly2: &[Point]) -> Result<Paths, Error> {
    if poly1.is_empty() || poly2.is_empty() {
        return Ok(Vec::new());
    }
    let quads = minkowski(poly1, poly2, false, true);
    union_nonzero(&quads, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{
        area, point_in_polygon,
        tests::{p, square},
        PointLocation, MAX_COORD,
    };
    use assert_matches::assert_matches;

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p)).sum()
    }

    #[test]
    fn bowtie_splits_in_two() {
        let bowtie = vec![p(0, 0), p(10, 10), p(10, 0), p(0, 10)];
        let out = simplify_polygon(&bowtie, FillRule::NonZero).unwrap();
        assert_eq!(out.len(), 2);
        for tri in &out {
            assert_eq!(tri.len(), 3);
            assert_eq!(area(tri), 25.0);
        }
    }

    #[test]
    fn overlapping_polygons_merge() {
        let squares = [square(0, 0, 10), square(5, 0, 10)];
        let out = simplify_polygons(&squares, FillRule::NonZero).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 150.0);

        // With even-odd filling, the overlap is a hole between two pieces.
        let out = simplify_polygons(&squares, FillRule::EvenOdd).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(total_area(&out), 100.0);
    }

    #[test]
    fn sum_with_point_translates() {
        let out = minkowski_sum(&square(0, 0, 10), &[p(100, 50)], true).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 100.0);
        for corner in [p(100, 50), p(110, 50), p(110, 60), p(100, 60)] {
            assert!(out[0].contains(&corner));
        }
    }

    #[test]
    fn sum_along_segment() {
        // A 2x2 square swept along a horizontal segment of length 10.
        let out = minkowski_sum(&square(-1, -1, 2), &[p(0, 0), p(10, 0)], false).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 24.0);
    }

    #[test]
    fn sum_around_outline() {
        // Sweeping around the outline of a big square leaves a hole in the middle.
        let out = minkowski_sum(&square(-1, -1, 2), &square(0, 0, 20), true).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(total_area(&out), 22.0 * 22.0 - 18.0 * 18.0);
        assert_eq!(out.iter().filter(|path| area(path) < 0.0).count(), 1);
    }

    #[test]
    fn sum_paths_fills_interiors() {
        let out = minkowski_sum_paths(&square(-1, -1, 2), &[square(0, 0, 20)], true).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 22.0 * 22.0);

        // Open paths are only swept.
        let line = vec![p(0, 0), p(10, 0)];
        let out = minkowski_sum_paths(&square(-1, -1, 2), &[line], false).unwrap();
        assert_eq!(total_area(&out), 24.0);
    }

    #[test]
    fn diff_detects_overlap() {
        let a = square(0, 0, 10);
        let overlapping = square(5, 5, 10);
        let far = square(50, 50, 10);

        let contains_origin = |paths: &Paths| {
            let inside: i32 = paths
                .iter()
                .map(|path| match point_in_polygon(p(0, 0), path) {
                    PointLocation::Inside => 1,
                    _ => 0,
                })
                .sum();
            inside % 2 == 1
                || paths
                    .iter()
                    .any(|path| point_in_polygon(p(0, 0), path) == PointLocation::OnBoundary)
        };

        assert!(contains_origin(&minkowski_diff(&a, &overlapping).unwrap()));
        assert!(!contains_origin(&minkowski_diff(&a, &far).unwrap()));
    }

    #[test]
    fn empty_and_invalid() {
        assert!(minkowski_sum(&[], &square(0, 0, 10), true).unwrap().is_empty());
        assert!(minkowski_diff(&square(0, 0, 10), &[]).unwrap().is_empty());
        assert_matches!(
            minkowski_sum(&square(0, 0, 10), &[p(MAX_COORD, 0)], true),
            Err(Error::CoordinateOutOfRange(_))
        );
    }
}
