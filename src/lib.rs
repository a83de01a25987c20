#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod edges;
mod geom;
mod ops;
mod output;
pub mod sweep;
pub mod tree;

#[cfg(feature = "generators")]
pub mod generators;

pub use geom::{
    area, clean_polygon, clean_polygons, horz_segments_overlap, orientation, path_to_bez,
    point_in_polygon, pt2_is_between_pt1_and_pt3, reverse_path, reverse_paths, slopes_equal3,
    slopes_equal4, translate_path, Path, Paths, Point, PointLocation, MAX_COORD,
};
pub use ops::{
    minkowski_diff, minkowski_sum, minkowski_sum_paths, simplify_polygon, simplify_polygons,
};
pub use sweep::{ClipOptions, Clipper};
pub use tree::{NodeIdx, PolyNode, PolyTree};

/// A fill rule tells us how to decide whether a point is "inside" a collection of polygons.
///
/// Every point not on a boundary has a winding number: the number of times
/// the polygons wind around it, counted with sign according to the
/// polygons' directions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize)]
pub enum FillRule {
    /// The point is "inside" if its winding number is odd.
    #[default]
    EvenOdd,
    /// The point is "inside" if its winding number is non-zero.
    NonZero,
    /// The point is "inside" if its winding number is positive.
    Positive,
    /// The point is "inside" if its winding number is negative.
    Negative,
}

/// Binary operations between sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize)]
pub enum BinaryOp {
    /// A point is in the intersection of two sets if it is in both.
    Intersection,
    /// A point is in the union of two sets if it is in either one.
    Union,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor,
}

/// Which of the two operands a path belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize)]
pub enum PolyType {
    /// The first operand. Only subject paths may be open.
    Subject,
    /// The second operand.
    Clip,
}

impl PolyType {
    /// The other operand.
    pub fn other(self) -> PolyType {
        match self {
            PolyType::Subject => PolyType::Clip,
            PolyType::Clip => PolyType::Subject,
        }
    }
}

/// Something went wrong while building the input or running an operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// Open paths were added, but the output was requested as a flat list.
    ///
    /// Use [`Clipper::execute_tree`] instead; only a tree can tell open and
    /// closed output apart.
    OpenPathsNeedTree,
    /// An open path was added as a clip path. Only subject paths may be open.
    OpenClipPath,
    /// An input point was outside of the supported coordinate range.
    ///
    /// See [`MAX_COORD`].
    CoordinateOutOfRange(Point),
    /// The intersections within a scanbeam could not be put in an order in
    /// which every intersection happens between adjacent edges.
    IntersectionOrder,
    /// An internal invariant was violated.
    Invariant(&'static str),
}

impl Error {
    /// Is this an internal failure, as opposed to a problem with the input or configuration?
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OpenPathsNeedTree => {
                write!(f, "open paths require tree output")
            }
            Error::OpenClipPath => write!(f, "open paths can only be subject paths"),
            Error::CoordinateOutOfRange(p) => {
                write!(f, "coordinate out of range: {p:?}")
            }
            Error::IntersectionOrder => {
                write!(f, "could not find a valid order for intersections")
            }
            Error::Invariant(what) => write!(f, "internal invariant violated: {what}"),
        }
    }
}

impl std::error::Error for Error {}

/// Computes a boolean operation between two sets, each of which is described
/// as a collection of closed polygons.
///
/// Both sets are interpreted with the same fill rule. For finer control (different
/// fill rules, open paths, tree output, or options), use [`Clipper`] directly.
pub fn binary_op(
    subject: &[Path],
    clip: &[Path],
    op: BinaryOp,
    fill_rule: FillRule,
) -> Result<Paths, Error> {
    let mut clipper = Clipper::default();
    clipper.add_paths(subject, PolyType::Subject, true)?;
    clipper.add_paths(clip, PolyType::Clip, true)?;
    let output = clipper.execute(op, fill_rule, fill_rule)?;

    #[cfg(feature = "debug-svg")]
    {
        if let Err(e) = svg::save("out.svg", &tree::paths_svg(&output)) {
            tracing::warn!("failed to save debug svg: {e}");
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::{p, square};
    use assert_matches::assert_matches;

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p)).sum()
    }

    #[test]
    fn two_squares() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(5, 5, 10)];

        let output = binary_op(&a, &b, BinaryOp::Intersection, FillRule::EvenOdd).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(total_area(&output).abs(), 25.0);
        for pt in &output[0] {
            assert!((5..=10).contains(&pt.x) && (5..=10).contains(&pt.y));
        }

        let output = binary_op(&a, &b, BinaryOp::Union, FillRule::EvenOdd).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(total_area(&output).abs(), 175.0);

        let output = binary_op(&a, &b, BinaryOp::Difference, FillRule::NonZero).unwrap();
        assert_eq!(total_area(&output).abs(), 75.0);

        let output = binary_op(&a, &b, BinaryOp::Xor, FillRule::NonZero).unwrap();
        assert_eq!(total_area(&output).abs(), 150.0);
    }

    #[test]
    fn empty_inputs() {
        let output = binary_op(&[], &[], BinaryOp::Union, FillRule::NonZero).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn errors() {
        let huge = vec![p(0, 0), p(MAX_COORD + 1, 0), p(0, 10)];
        assert_matches!(
            binary_op(&[huge], &[], BinaryOp::Union, FillRule::NonZero),
            Err(Error::CoordinateOutOfRange(_))
        );
        assert!(!Error::IntersectionOrder.is_fatal());
        assert!(Error::Invariant("test").is_fatal());
        assert_eq!(
            Error::OpenClipPath.to_string(),
            "open paths can only be subject paths"
        );
    }

    #[test]
    fn arbitrary_inputs() {
        arbtest::arbtest(|u| {
            let input: crate::arbitrary::ClipInput = u.arbitrary()?;
            let mut clipper = Clipper::new(input.options);
            clipper.add_paths(&input.subject, PolyType::Subject, true).unwrap();
            clipper.add_paths(&input.clip, PolyType::Clip, true).unwrap();
            match clipper.execute(input.op, input.subject_fill, input.clip_fill) {
                // Flat output keeps degenerate two-point contours.
                Ok(out) => assert!(out.iter().all(|path| path.len() >= 2)),
                Err(e) => assert!(!e.is_fatal(), "{e}"),
            }
            Ok(())
        });
    }
}
