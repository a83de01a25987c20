//! The scanbeam sweep.
//!
//! We sweep a horizontal line across the plane, from the bottom (largest
//! `y`) to the top (smallest `y`), stopping at every `y` coordinate where
//! something interesting happens: an edge starts or ends, or two edges cross.
//! The stretch between two consecutive stops is a "scanbeam". Within a
//! scanbeam, the edges crossing the sweep line are kept in the active edge
//! list (AEL), ordered from left to right, and each of them knows the
//! winding numbers of the regions on either side of it. That's all we need to
//! decide which edges are on the boundary of the output, and those edges emit
//! output points as the sweep goes.
//!
//! Every operation gets a fresh [`Sweep`], which holds all of the mutable
//! state of the operation. The long-lived [`Clipper`] only holds the input
//! edges.

use crate::{
    edges::{Edge, EdgeIdx, EdgeVec, Edges, LocalMinima},
    geom::{Path, Paths, Point},
    output::{GhostJoin, Join, Output},
    tree::PolyTree,
    BinaryOp, Error, FillRule, PolyType,
};

mod active;
mod emit;
mod horizontal;
mod intersections;
mod scanbeam;
mod top;
mod winding;

use intersections::IntersectNode;
use scanbeam::{Maxima, Scanbeam};

/// Options that change the shape of the output without changing the region it covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ClipOptions {
    /// Keep vertices in the middle of straight runs, both in the input and in the output.
    pub preserve_collinear: bool,
    /// Reverse the orientation of the output: outer contours get negative
    /// area and holes get positive area.
    pub reverse_solution: bool,
    /// Guarantee that no output contour touches itself or another contour at a vertex.
    pub strictly_simple: bool,
}

/// The callback that fills in the `z` coordinate of new intersection points.
///
/// The arguments are the bottom and top of the first edge, the bottom and top
/// of the second edge, and the intersection point.
type ZFill = dyn FnMut(Point, Point, Point, Point, &mut Point) + Send + 'static;

/// A reusable polygon clipper.
///
/// Add subject and clip paths, then run one or more boolean operations on
/// them. The paths stay around until [`Clipper::clear`] is called, so the same
/// input can be clipped in different ways.
///
/// ```
/// use scanclip::{BinaryOp, Clipper, FillRule, Point, PolyType};
///
/// let square = |x: i64, y: i64| {
///     vec![
///         Point::new(x, y),
///         Point::new(x, y + 10),
///         Point::new(x + 10, y + 10),
///         Point::new(x + 10, y),
///     ]
/// };
/// let mut clipper = Clipper::default();
/// clipper.add_path(&square(0, 0), PolyType::Subject, true).unwrap();
/// clipper.add_path(&square(5, 5), PolyType::Clip, true).unwrap();
/// let out = clipper
///     .execute(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero)
///     .unwrap();
/// assert_eq!(out.len(), 1);
/// assert_eq!(scanclip::area(&out[0]), 25.0);
/// ```
#[derive(Default)]
pub struct Clipper {
    edges: Edges,
    options: ClipOptions,
    z_fill: Option<Box<ZFill>>,
}

impl std::fmt::Debug for Clipper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clipper")
            .field("edges", &self.edges.edges.len())
            .field("minima", &self.edges.minima.len())
            .field("options", &self.options)
            .field("z_fill", &self.z_fill.is_some())
            .finish()
    }
}

impl Clipper {
    /// Creates a new clipper with the given options.
    pub fn new(options: ClipOptions) -> Self {
        Clipper {
            options,
            ..Default::default()
        }
    }

    /// The current options.
    pub fn options(&self) -> ClipOptions {
        self.options
    }

    /// Changes the options.
    ///
    /// `preserve_collinear` affects how paths are added, so it only applies
    /// to paths added after this call.
    pub fn set_options(&mut self, options: ClipOptions) {
        self.options = options;
    }

    /// Adds a path.
    ///
    /// Returns `Ok(false)` if the path was too degenerate to contribute
    /// anything (for example, a closed path with fewer than three distinct
    /// vertices). Open paths can only be subject paths.
    pub fn add_path(
        &mut self,
        path: &[Point],
        poly_type: PolyType,
        closed: bool,
    ) -> Result<bool, Error> {
        self.edges
            .add_path(path, poly_type, closed, self.options.preserve_collinear)
    }

    /// Adds several paths, returning whether any of them was added.
    ///
    /// If one of the paths is invalid, the paths before it stay added.
    pub fn add_paths(
        &mut self,
        paths: &[Path],
        poly_type: PolyType,
        closed: bool,
    ) -> Result<bool, Error> {
        let mut added = false;
        for path in paths {
            added |= self.add_path(path, poly_type, closed)?;
        }
        Ok(added)
    }

    /// Removes all paths.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Sets the callback that assigns `z` values to intersection points.
    ///
    /// The callback is only called for points that don't already have a `z`
    /// value and that aren't at an endpoint of either intersecting edge: in
    /// that case the endpoint's `z` is used.
    pub fn set_z_fill(
        &mut self,
        f: impl FnMut(Point, Point, Point, Point, &mut Point) + Send + 'static,
    ) {
        self.z_fill = Some(Box::new(f));
    }

    /// Computes a boolean operation, returning the output as a flat list of contours.
    ///
    /// This fails if any open paths were added: use [`Clipper::execute_tree`] for those.
    pub fn execute(
        &mut self,
        op: BinaryOp,
        subject_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<Paths, Error> {
        if self.edges.has_open_paths {
            return Err(Error::OpenPathsNeedTree);
        }
        let out = self.run(op, subject_fill, clip_fill, false)?;
        Ok(out.build_paths())
    }

    /// Computes a boolean operation, returning the output as a tree of nested contours.
    pub fn execute_tree(
        &mut self,
        op: BinaryOp,
        subject_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<PolyTree, Error> {
        let mut out = self.run(op, subject_fill, clip_fill, true)?;
        Ok(out.build_tree())
    }

    fn run(
        &mut self,
        op: BinaryOp,
        subject_fill: FillRule,
        clip_fill: FillRule,
        using_tree: bool,
    ) -> Result<Output, Error> {
        self.edges.reset();
        let sweep = Sweep {
            edges: &mut self.edges.edges,
            minima: &self.edges.minima,
            next_minima: 0,
            out: Output::default(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            scanbeam: Scanbeam::default(),
            maxima: Maxima::default(),
            intersections: Vec::new(),
            active: None,
            sorted: None,
            z_fill: self.z_fill.as_deref_mut(),
            op,
            subject_fill,
            clip_fill,
            options: self.options,
            using_tree,
        };
        sweep.run()
    }
}

/// The state of a single boolean operation.
pub(crate) struct Sweep<'a> {
    edges: &'a mut EdgeVec<Edge>,
    /// Local minima in sweep order.
    minima: &'a [LocalMinima],
    /// The first minimum that hasn't been inserted into the AEL.
    next_minima: usize,
    out: Output,
    joins: Vec<Join>,
    ghost_joins: Vec<GhostJoin>,
    scanbeam: Scanbeam,
    maxima: Maxima,
    intersections: Vec<IntersectNode>,
    /// The left-most edge of the AEL.
    active: Option<EdgeIdx>,
    /// The first edge of the SEL.
    ///
    /// The SEL is a scratch list that gets used for two different things:
    /// holding horizontal edges that are waiting to be processed, and sorting
    /// the AEL to find intersections.
    sorted: Option<EdgeIdx>,
    z_fill: Option<&'a mut ZFill>,
    op: BinaryOp,
    subject_fill: FillRule,
    clip_fill: FillRule,
    options: ClipOptions,
    using_tree: bool,
}

impl Sweep<'_> {
    /// Takes the next local minimum, if it starts at height `y`.
    fn pop_local_minima(&mut self, y: i64) -> Option<LocalMinima> {
        let lm = self.minima.get(self.next_minima)?;
        if lm.y != y {
            return None;
        }
        self.next_minima += 1;
        Some(lm.clone())
    }

    fn run(mut self) -> Result<Output, Error> {
        for lm in self.minima {
            self.scanbeam.insert(lm.y);
        }

        let Some(mut bot_y) = self.scanbeam.pop() else {
            return Ok(self.out);
        };
        tracing::debug!(
            minima = self.minima.len(),
            op = ?self.op,
            "starting sweep"
        );
        let mut beams = 0usize;
        loop {
            self.insert_local_minima_into_ael(bot_y)?;
            self.process_horizontals()?;
            self.ghost_joins.clear();
            let Some(top_y) = self.scanbeam.pop() else {
                break;
            };
            beams += 1;
            tracing::trace!(bot_y, top_y, "scanbeam");
            self.process_intersections(top_y)?;
            self.process_edges_at_top_of_scanbeam(top_y)?;
            bot_y = top_y;

            #[cfg(any(test, feature = "slow-asserts"))]
            self.check_invariants();
        }
        tracing::debug!(
            scanbeams = beams,
            records = self.out.recs.len(),
            joins = self.joins.len(),
            "finished sweep"
        );

        let reverse = self.options.reverse_solution;
        self.out.fix_orientations(reverse);
        self.out
            .join_common_edges(&mut self.joins, self.using_tree, reverse);

        let preserve = self.options.preserve_collinear || self.options.strictly_simple;
        for rec in self.out.recs.indices() {
            if self.out.recs[rec].pts.is_none() {
                continue;
            }
            if self.out.recs[rec].is_open {
                self.out.fixup_out_polyline(rec);
            } else {
                self.out.fixup_out_polygon(rec, preserve);
            }
        }

        if self.options.strictly_simple {
            self.out.do_simple_polygons(self.using_tree);
        }

        #[cfg(any(test, feature = "slow-asserts"))]
        self.out.check_invariants();

        Ok(self.out)
    }

    /// The fill rules for an edge of type `poly_type`: first its own, then the other type's.
    fn fill_rules(&self, poly_type: PolyType) -> (FillRule, FillRule) {
        match poly_type {
            PolyType::Subject => (self.subject_fill, self.clip_fill),
            PolyType::Clip => (self.clip_fill, self.subject_fill),
        }
    }

    /// Checks that the AEL and SEL are consistently linked, and that the
    /// output rings are too.
    #[cfg(any(test, feature = "slow-asserts"))]
    fn check_invariants(&self) {
        let mut prev = None;
        let mut e = self.active;
        while let Some(idx) = e {
            assert_eq!(self.edges[idx].prev_in_ael, prev, "bad AEL link at {idx:?}");
            prev = e;
            e = self.edges[idx].next_in_ael;
        }
        let mut prev = None;
        let mut e = self.sorted;
        while let Some(idx) = e {
            assert_eq!(self.edges[idx].prev_in_sel, prev, "bad SEL link at {idx:?}");
            prev = e;
            e = self.edges[idx].next_in_sel;
        }
        self.out.check_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{area, tests::{p, square}};
    use assert_matches::assert_matches;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p)).sum()
    }

    fn clip(subject: &[Path], clip: &[Path], op: BinaryOp, fill: FillRule) -> Paths {
        let mut clipper = Clipper::default();
        clipper.add_paths(subject, PolyType::Subject, true).unwrap();
        clipper.add_paths(clip, PolyType::Clip, true).unwrap();
        clipper.execute(op, fill, fill).unwrap()
    }

    #[test]
    fn empty() {
        let mut clipper = Clipper::default();
        assert_eq!(
            clipper.execute(BinaryOp::Union, FillRule::EvenOdd, FillRule::EvenOdd),
            Ok(vec![])
        );
        assert!(clipper
            .execute_tree(BinaryOp::Union, FillRule::EvenOdd, FillRule::EvenOdd)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn single_square() {
        let out = clip(&[square(0, 0, 10)], &[], BinaryOp::Union, FillRule::NonZero);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 4);
        assert_eq!(area(&out[0]), 100.0);

        // Intersecting with nothing gives nothing.
        let out = clip(&[square(0, 0, 10)], &[], BinaryOp::Intersection, FillRule::NonZero);
        assert!(out.is_empty());
    }

    #[test]
    fn disjoint_union() {
        let out = clip(
            &[square(0, 0, 10)],
            &[square(20, 0, 10)],
            BinaryOp::Union,
            FillRule::NonZero,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(total_area(&out), 200.0);
    }

    #[test]
    fn hole() {
        let out = clip(
            &[square(0, 0, 30)],
            &[square(10, 10, 10)],
            BinaryOp::Difference,
            FillRule::NonZero,
        );
        assert_eq!(out.len(), 2);
        let mut areas: Vec<_> = out.iter().map(|p| area(p)).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![-100.0, 900.0]);

        let mut clipper = Clipper::new(ClipOptions {
            reverse_solution: true,
            ..Default::default()
        });
        clipper.add_path(&square(0, 0, 30), PolyType::Subject, true).unwrap();
        clipper.add_path(&square(10, 10, 10), PolyType::Clip, true).unwrap();
        let out = clipper
            .execute(BinaryOp::Difference, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        let mut areas: Vec<_> = out.iter().map(|p| area(p)).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![-900.0, 100.0]);
    }

    #[test]
    fn tree_output() {
        let mut clipper = Clipper::default();
        clipper
            .add_paths(&[square(0, 0, 30), square(10, 10, 10)], PolyType::Subject, true)
            .unwrap();
        let tree = clipper
            .execute_tree(BinaryOp::Union, FillRule::EvenOdd, FillRule::EvenOdd)
            .unwrap();
        assert_eq!(tree.total(), 2);
        assert_eq!(tree.roots().len(), 1);
        let outer = tree.roots()[0];
        assert!(!tree.is_hole(outer));
        let [hole] = tree.children(outer) else {
            panic!("expected one hole");
        };
        assert!(tree.is_hole(*hole));
        assert_eq!(area(tree.contour(*hole)), -100.0);
    }

    #[test]
    fn open_paths() {
        let mut clipper = Clipper::default();
        clipper.add_path(&square(0, 0, 10), PolyType::Clip, true).unwrap();
        clipper
            .add_path(&[p(5, -5), p(5, 15)], PolyType::Subject, false)
            .unwrap();
        assert_matches!(
            clipper.execute(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero),
            Err(Error::OpenPathsNeedTree)
        );
        let tree = clipper
            .execute_tree(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        let open = tree.open_paths();
        assert_eq!(open.len(), 1);
        let mut ys: Vec<_> = open[0].iter().map(|p| p.y).collect();
        ys.sort();
        assert_eq!(ys, vec![0, 10]);
        assert!(open[0].iter().all(|p| p.x == 5));
        assert!(tree.closed_paths().is_empty());

        let tree = clipper
            .execute_tree(BinaryOp::Difference, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert_eq!(tree.open_paths().len(), 2);
    }

    #[test]
    fn flat_open_path() {
        // A horizontal polyline has nothing above it, so it's only swept by
        // the horizontal processing at its own height.
        let mut clipper = Clipper::default();
        clipper.add_path(&square(0, 0, 10), PolyType::Clip, true).unwrap();
        clipper
            .add_path(&[p(-5, 5), p(15, 5)], PolyType::Subject, false)
            .unwrap();
        let tree = clipper
            .execute_tree(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        let open = tree.open_paths();
        assert_eq!(open.len(), 1);
        let mut xs: Vec<_> = open[0].iter().map(|p| p.x).collect();
        xs.sort();
        assert_eq!(xs, vec![0, 10]);
        assert!(open[0].iter().all(|p| p.y == 5));
    }

    #[test]
    fn z_fill() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut clipper = Clipper::default();
        let counter = Arc::clone(&calls);
        clipper.set_z_fill(move |_, _, _, _, pt| {
            counter.fetch_add(1, Ordering::Relaxed);
            pt.z = 7;
        });
        let tagged = |x0: i64, y0: i64, z: i64| -> Path {
            square(x0, y0, 10)
                .into_iter()
                .map(|pt| Point::with_z(pt.x, pt.y, z))
                .collect()
        };
        clipper.add_path(&tagged(0, 0, 1), PolyType::Subject, true).unwrap();
        clipper.add_path(&tagged(5, 5, 2), PolyType::Clip, true).unwrap();
        let out = clipper
            .execute(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert_eq!(out.len(), 1);
        let mut zs: Vec<_> = out[0].iter().map(|p| (p.x, p.y, p.z)).collect();
        zs.sort();
        assert_eq!(zs, vec![(5, 5, 2), (5, 10, 7), (10, 5, 7), (10, 10, 1)]);
        assert!(calls.load(Ordering::Relaxed) >= 2);
    }

    #[test]
    fn reuse() {
        let mut clipper = Clipper::default();
        clipper.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        clipper.add_path(&square(5, 0, 10), PolyType::Clip, true).unwrap();
        let union = clipper
            .execute(BinaryOp::Union, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        let inter = clipper
            .execute(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert_eq!(total_area(&union), 150.0);
        assert_eq!(total_area(&inter), 50.0);

        clipper.clear();
        assert_eq!(
            clipper.execute(BinaryOp::Union, FillRule::NonZero, FillRule::NonZero),
            Ok(vec![])
        );
    }

    #[test]
    fn clipper_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Clipper>();
    }
}
