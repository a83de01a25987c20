//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! Random coordinates almost never line up, but the interesting cases for a
//! clipper are the ones where they do: shared vertices, collinear edges,
//! horizontal edges. So most of the points generated here come from a small
//! grid, with an occasional wide-ranging coordinate mixed in.

use arbitrary::{Arbitrary, Unstructured};

use crate::{BinaryOp, ClipOptions, FillRule, Path, Paths, Point, PolyType};

/// The largest coordinate produced by [`coord`], when it isn't on the small grid.
const WIDE: i64 = 1 << 40;

/// Generate an arbitrary coordinate in some range.
pub fn coord_in_range(
    start: i64,
    end: i64,
    u: &mut Unstructured<'_>,
) -> Result<i64, arbitrary::Error> {
    u.int_in_range(start..=end)
}

/// Generate an arbitrary coordinate, usually on a small grid.
pub fn coord(u: &mut Unstructured<'_>) -> Result<i64, arbitrary::Error> {
    let wide: u8 = u.arbitrary()?;
    if wide < 16 {
        coord_in_range(-WIDE, WIDE, u)
    } else {
        coord_in_range(-8, 8, u)
    }
}

/// Generate an arbitrary point, possibly reusing one of `previous`.
fn point(previous: &[Point], u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    if !previous.is_empty() && u.ratio(1u8, 4u8)? {
        let p = *u.choose(previous)?;
        // Sharing a single coordinate makes horizontal and vertical edges.
        return Ok(match u.int_in_range(0u8..=2)? {
            0 => p,
            1 => Point::new(p.x, coord(u)?),
            _ => Point::new(coord(u)?, p.y),
        });
    }
    Ok(Point::new(coord(u)?, coord(u)?))
}

/// Generate an arbitrary closed polygon, with between three and `max_len` vertices.
///
/// The polygon may be degenerate or self-intersecting. Its vertices have a
/// good chance of coinciding with the vertices in `previous`.
pub fn polygon(
    previous: &[Point],
    max_len: usize,
    u: &mut Unstructured<'_>,
) -> Result<Path, arbitrary::Error> {
    let len = u.int_in_range(3..=max_len.max(3))?;
    let mut pool = previous.to_vec();
    let mut ret = Vec::with_capacity(len);
    for _ in 0..len {
        let p = point(&pool, u)?;
        pool.push(p);
        ret.push(p);
    }
    Ok(ret)
}

/// Generate a collection of polygons.
pub fn polygons(
    previous: &[Point],
    max_count: usize,
    max_len: usize,
    u: &mut Unstructured<'_>,
) -> Result<Paths, arbitrary::Error> {
    let count = u.int_in_range(0..=max_count)?;
    let mut pool = previous.to_vec();
    let mut ret = Vec::with_capacity(count);
    for _ in 0..count {
        let poly = polygon(&pool, max_len, u)?;
        pool.extend_from_slice(&poly);
        ret.push(poly);
    }
    Ok(ret)
}

/// Generate an arbitrary fill rule.
pub fn fill_rule(u: &mut Unstructured<'_>) -> Result<FillRule, arbitrary::Error> {
    Ok(*u.choose(&[
        FillRule::EvenOdd,
        FillRule::NonZero,
        FillRule::Positive,
        FillRule::Negative,
    ])?)
}

/// Generate an arbitrary binary operation.
pub fn binary_op(u: &mut Unstructured<'_>) -> Result<BinaryOp, arbitrary::Error> {
    Ok(*u.choose(&[
        BinaryOp::Intersection,
        BinaryOp::Union,
        BinaryOp::Difference,
        BinaryOp::Xor,
    ])?)
}

impl<'a> Arbitrary<'a> for FillRule {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        fill_rule(u)
    }
}

impl<'a> Arbitrary<'a> for BinaryOp {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        binary_op(u)
    }
}

impl<'a> Arbitrary<'a> for PolyType {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(*u.choose(&[PolyType::Subject, PolyType::Clip])?)
    }
}

impl<'a> Arbitrary<'a> for ClipOptions {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(ClipOptions {
            preserve_collinear: u.arbitrary()?,
            reverse_solution: u.arbitrary()?,
            strictly_simple: u.arbitrary()?,
        })
    }
}

/// A complete, closed-path clipping problem.
#[derive(Clone, Debug)]
pub struct ClipInput {
    /// The subject polygons.
    pub subject: Paths,
    /// The clip polygons.
    pub clip: Paths,
    /// The operation.
    pub op: BinaryOp,
    /// The subject's fill rule.
    pub subject_fill: FillRule,
    /// The clip polygons' fill rule.
    pub clip_fill: FillRule,
    /// Output options.
    pub options: ClipOptions,
}

impl<'a> Arbitrary<'a> for ClipInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let subject = polygons(&[], 4, 8, u)?;
        let shared: Vec<Point> = subject.iter().flatten().copied().collect();
        let clip = polygons(&shared, 4, 8, u)?;
        Ok(ClipInput {
            subject,
            clip,
            op: u.arbitrary()?,
            subject_fill: u.arbitrary()?,
            clip_fill: u.arbitrary()?,
            options: u.arbitrary()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_COORD;

    #[test]
    fn generated_points_are_in_range() {
        arbtest::arbtest(|u| {
            let input: ClipInput = u.arbitrary()?;
            for p in input.subject.iter().chain(&input.clip).flatten() {
                assert!(p.x.abs() <= MAX_COORD && p.y.abs() <= MAX_COORD);
            }
            for poly in input.subject.iter().chain(&input.clip) {
                assert!(poly.len() >= 3);
            }
            Ok(())
        });
    }
}
