//! Output contours, as they are built up by the sweep and then stitched together.
//!
//! Every output contour is an [`OutRec`], which owns a circular
//! doubly-linked ring of [`OutPt`]s. During the sweep, the ring of a
//! contour that is still growing has its "left-most" point at `pts` and its
//! "right-most" point at `pts.prev`: points added by the left edge of the
//! contour go at the front, and points added by the right edge go at the
//! back.
//!
//! Records never move or get deleted. When two records are merged, the
//! absorbed one loses its points and has its `idx` redirected to the
//! survivor; [`Output::find_root`] chases these redirections.

use crate::{
    geom::{inverse_slope, point_in_ring, Point, PointLocation},
    tree::NodeIdx,
};

mod fixup;
mod joins;
mod result;

pub(crate) use joins::{GhostJoin, Join};

typed_vec!(
    /// An index into the output-record arena.
    OutRecVec,
    OutRecIdx,
    "or"
);

typed_vec!(
    /// An index into the output-point arena.
    OutPtVec,
    OutPtIdx,
    "op"
);

/// A single output contour.
#[derive(Clone, Debug, serde::Serialize)]
pub(crate) struct OutRec {
    /// The identity of this record. Starts out as its own index, and gets
    /// redirected when this record is merged into another one.
    pub idx: OutRecIdx,
    pub is_hole: bool,
    pub is_open: bool,
    /// The closest record that this one is known to be to the right of (and
    /// possibly inside).
    pub first_left: Option<OutRecIdx>,
    pub pts: Option<OutPtIdx>,
    /// A cache of the bottom-most point, invalidated whenever the ring changes.
    pub bottom_pt: Option<OutPtIdx>,
    pub node: Option<NodeIdx>,
}

/// A vertex of an output contour.
#[derive(Clone, Debug, serde::Serialize)]
pub(crate) struct OutPt {
    pub pt: Point,
    pub idx: OutRecIdx,
    pub next: OutPtIdx,
    pub prev: OutPtIdx,
}

/// All the output contours of a single operation.
#[derive(Clone, Debug, Default)]
pub(crate) struct Output {
    pub recs: OutRecVec<OutRec>,
    pub pts: OutPtVec<OutPt>,
}

impl Output {
    pub fn create_rec(&mut self) -> OutRecIdx {
        let idx = self.recs.next_idx();
        self.recs.push(OutRec {
            idx,
            is_hole: false,
            is_open: false,
            first_left: None,
            pts: None,
            bottom_pt: None,
            node: None,
        })
    }

    /// Starts a new ring, containing the single point `pt`, for `rec`.
    pub fn new_ring(&mut self, rec: OutRecIdx, pt: Point) -> OutPtIdx {
        let op = self.pts.next_idx();
        self.pts.push(OutPt {
            pt,
            idx: rec,
            next: op,
            prev: op,
        });
        self.recs[rec].pts = Some(op);
        op
    }

    /// Inserts a copy of `op` into its ring, either just after or just before it.
    pub fn dup_out_pt(&mut self, op: OutPtIdx, insert_after: bool) -> OutPtIdx {
        let OutPt {
            pt, idx, next, prev,
        } = self.pts[op].clone();
        let new_op = self.pts.next_idx();
        if insert_after {
            self.pts.push(OutPt {
                pt,
                idx,
                next,
                prev: op,
            });
            self.pts[next].prev = new_op;
            self.pts[op].next = new_op;
        } else {
            self.pts.push(OutPt {
                pt,
                idx,
                next: op,
                prev,
            });
            self.pts[prev].next = new_op;
            self.pts[op].prev = new_op;
        }
        new_op
    }

    /// Iterates over the ring starting at `op`, following `next` links.
    pub fn ring(&self, op: OutPtIdx) -> impl Iterator<Item = OutPtIdx> + '_ {
        let mut cur = Some(op);
        std::iter::from_fn(move || {
            let ret = cur?;
            let next = self.pts[ret].next;
            cur = (next != op).then_some(next);
            Some(ret)
        })
    }

    pub fn ring_points(&self, op: OutPtIdx) -> impl Iterator<Item = Point> + '_ {
        self.ring(op).map(|o| self.pts[o].pt)
    }

    pub fn point_count(&self, op: Option<OutPtIdx>) -> usize {
        op.map_or(0, |op| self.ring(op).count())
    }

    /// Reverses the direction of the ring containing `op`.
    pub fn reverse_links(&mut self, op: OutPtIdx) {
        let mut pp1 = op;
        loop {
            let pp2 = self.pts[pp1].next;
            let o = &mut self.pts[pp1];
            std::mem::swap(&mut o.next, &mut o.prev);
            pp1 = pp2;
            if pp1 == op {
                break;
            }
        }
    }

    /// The signed area of the ring, with the same sign convention as
    /// [`area`](crate::area) applied to the emitted path.
    ///
    /// Emitted paths traverse rings backwards, which is why the sign here is
    /// flipped relative to a forward traversal.
    pub fn ring_area(&self, op: OutPtIdx) -> f64 {
        let mut a = 0.0;
        for o in self.ring(op) {
            let OutPt { pt, prev, .. } = &self.pts[o];
            let prev = self.pts[*prev].pt;
            a += (prev.x as f64 + pt.x as f64) * (prev.y as f64 - pt.y as f64);
        }
        a * 0.5
    }

    pub fn rec_area(&self, rec: OutRecIdx) -> f64 {
        self.recs[rec].pts.map_or(0.0, |op| self.ring_area(op))
    }

    /// Finds the bottom-most point of a ring (largest `y`, then smallest `x`).
    ///
    /// If several vertices share that location, we pick the one whose
    /// adjoining edges make it the "true" bottom.
    pub fn bottom_pt(&self, mut pp: OutPtIdx) -> OutPtIdx {
        let mut dups = None;
        let mut p = self.pts[pp].next;
        while p != pp {
            let (pt, cur) = (self.pts[p].pt, self.pts[pp].pt);
            if pt.y > cur.y {
                pp = p;
                dups = None;
            } else if pt.y == cur.y && pt.x <= cur.x {
                if pt.x < cur.x {
                    dups = None;
                    pp = p;
                } else if self.pts[p].next != pp && self.pts[p].prev != pp {
                    dups = Some(p);
                }
            }
            p = self.pts[p].next;
        }
        if let Some(mut d) = dups {
            // There are at least two vertices at the bottom point.
            while d != p {
                if !self.first_is_bottom_pt(p, d) {
                    pp = d;
                }
                d = self.pts[d].next;
                while self.pts[d].pt != self.pts[pp].pt {
                    d = self.pts[d].next;
                }
            }
        }
        pp
    }

    // The absolute inverse slopes of the edges leaving `op` in both
    // directions, skipping over duplicates of `op`.
    fn adjoining_slopes(&self, op: OutPtIdx) -> (f64, f64) {
        let pt = self.pts[op].pt;
        let mut p = self.pts[op].prev;
        while self.pts[p].pt == pt && p != op {
            p = self.pts[p].prev;
        }
        let dp = inverse_slope(pt, self.pts[p].pt).abs();
        p = self.pts[op].next;
        while self.pts[p].pt == pt && p != op {
            p = self.pts[p].next;
        }
        let dn = inverse_slope(pt, self.pts[p].pt).abs();
        (dp, dn)
    }

    fn first_is_bottom_pt(&self, btm1: OutPtIdx, btm2: OutPtIdx) -> bool {
        let (dx1p, dx1n) = self.adjoining_slopes(btm1);
        let (dx2p, dx2n) = self.adjoining_slopes(btm2);
        if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
            // Otherwise identical, so use orientation.
            self.ring_area(btm1) > 0.0
        } else {
            (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
        }
    }

    fn cached_bottom_pt(&mut self, rec: OutRecIdx) -> Option<OutPtIdx> {
        if self.recs[rec].bottom_pt.is_none() {
            self.recs[rec].bottom_pt = self.recs[rec].pts.map(|op| self.bottom_pt(op));
        }
        self.recs[rec].bottom_pt
    }

    /// Of two records, returns the one whose bottom point is lower; that's
    /// the one with the correct hole state when the two get merged.
    pub fn lowermost_rec(&mut self, rec1: OutRecIdx, rec2: OutRecIdx) -> OutRecIdx {
        let (Some(op1), Some(op2)) = (self.cached_bottom_pt(rec1), self.cached_bottom_pt(rec2))
        else {
            return rec1;
        };
        let (p1, p2) = (self.pts[op1].pt, self.pts[op2].pt);
        if p1.y > p2.y {
            rec1
        } else if p1.y < p2.y {
            rec2
        } else if p1.x < p2.x {
            rec1
        } else if p1.x > p2.x {
            rec2
        } else if self.pts[op1].next == op1 {
            rec2
        } else if self.pts[op2].next == op2 || self.first_is_bottom_pt(op1, op2) {
            rec1
        } else {
            rec2
        }
    }

    /// Is `rec1` (transitively) to the right of `rec2`?
    pub fn is_right_of(&self, rec1: OutRecIdx, rec2: OutRecIdx) -> bool {
        let mut r = self.recs[rec1].first_left;
        while let Some(fl) = r {
            if fl == rec2 {
                return true;
            }
            r = self.recs[fl].first_left;
        }
        false
    }

    /// Follows merge redirections until reaching a record that is still live.
    pub fn find_root(&self, mut idx: OutRecIdx) -> OutRecIdx {
        while self.recs[idx].idx != idx {
            idx = self.recs[idx].idx;
        }
        idx
    }

    /// Skips over `first_left` records that have lost their points.
    pub fn parse_first_left(&self, mut fl: Option<OutRecIdx>) -> Option<OutRecIdx> {
        while let Some(r) = fl {
            if self.recs[r].pts.is_some() {
                break;
            }
            fl = self.recs[r].first_left;
        }
        fl
    }

    /// Points `first_left` at the nearest live record with the opposite hole state.
    pub fn fix_hole_linkage(&mut self, rec: OutRecIdx) {
        let Some(fl) = self.recs[rec].first_left else {
            return;
        };
        let is_hole = self.recs[rec].is_hole;
        if is_hole != self.recs[fl].is_hole && self.recs[fl].pts.is_some() {
            return;
        }
        let mut orfl = Some(fl);
        while let Some(r) = orfl {
            if self.recs[r].is_hole != is_hole && self.recs[r].pts.is_some() {
                break;
            }
            orfl = self.recs[r].first_left;
        }
        self.recs[rec].first_left = orfl;
    }

    pub fn point_in_ring(&self, pt: Point, op: OutPtIdx) -> PointLocation {
        point_in_ring(pt, self.ring_points(op))
    }

    /// Does the ring at `op2` contain the ring at `op1`?
    ///
    /// Decided by the first vertex of ring 1 that isn't on ring 2's boundary.
    pub fn poly2_contains_poly1(&self, op1: OutPtIdx, op2: OutPtIdx) -> bool {
        for pt in self.ring_points(op1) {
            match self.point_in_ring(pt, op2) {
                PointLocation::Inside => return true,
                PointLocation::Outside => return false,
                PointLocation::OnBoundary => {}
            }
        }
        true
    }

    /// Makes every point in `rec`'s ring point back to `rec`.
    pub fn update_out_pt_idxs(&mut self, rec: OutRecIdx) {
        let Some(start) = self.recs[rec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.pts[op].idx = rec;
            op = self.pts[op].prev;
            if op == start {
                break;
            }
        }
    }

    /// Checks that every ring is consistently linked and owned.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub fn check_invariants(&self) {
        for (idx, rec) in self.recs.iter() {
            let Some(start) = rec.pts else {
                continue;
            };
            for op in self.ring(start) {
                let o = &self.pts[op];
                assert_eq!(self.pts[o.next].prev, op);
                assert_eq!(self.pts[o.prev].next, op);
                assert_eq!(self.find_root(o.idx), idx);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geom::tests::{p, square};

    /// Builds a record whose ring, once emitted, is exactly `path`.
    pub(crate) fn ring_from_path(out: &mut Output, path: &[Point]) -> OutRecIdx {
        let rec = out.create_rec();
        let mut pts = path.iter().rev();
        let first = out.new_ring(rec, *pts.next().unwrap());
        let mut last = first;
        for &pt in pts {
            last = out.dup_out_pt(last, true);
            out.pts[last].pt = pt;
        }
        rec
    }

    #[test]
    fn ring_basics() {
        let mut out = Output::default();
        let rec = ring_from_path(&mut out, &square(0, 0, 10));
        let op = out.recs[rec].pts.unwrap();
        assert_eq!(out.point_count(Some(op)), 4);
        assert_eq!(out.point_count(None), 0);
        // Emitted paths go backwards around the ring.
        let emitted: Vec<_> = {
            let mut v = Vec::new();
            let mut o = out.pts[op].prev;
            for _ in 0..4 {
                v.push(out.pts[o].pt);
                o = out.pts[o].prev;
            }
            v
        };
        assert_eq!(crate::geom::area(&emitted), out.ring_area(op));
        assert_eq!(out.ring_area(op), -100.0);
        out.reverse_links(op);
        assert_eq!(out.ring_area(op), 100.0);
        out.check_invariants();
    }

    #[test]
    fn bottom_point() {
        let mut out = Output::default();
        let rec = ring_from_path(&mut out, &[p(5, 0), p(0, 10), p(3, 10), p(10, 5)]);
        let op = out.recs[rec].pts.unwrap();
        assert_eq!(out.pts[out.bottom_pt(op)].pt, p(0, 10));
    }

    #[test]
    fn lowermost() {
        let mut out = Output::default();
        let a = ring_from_path(&mut out, &square(0, 0, 10));
        let b = ring_from_path(&mut out, &square(0, 5, 10));
        assert_eq!(out.lowermost_rec(a, b), b);
        assert_eq!(out.lowermost_rec(b, a), b);
    }

    #[test]
    fn containment() {
        let mut out = Output::default();
        let outer = ring_from_path(&mut out, &square(0, 0, 10));
        let inner = ring_from_path(&mut out, &square(2, 2, 2));
        let touching = ring_from_path(&mut out, &square(0, 0, 5));
        let (o, i, t) = (
            out.recs[outer].pts.unwrap(),
            out.recs[inner].pts.unwrap(),
            out.recs[touching].pts.unwrap(),
        );
        assert!(out.poly2_contains_poly1(i, o));
        assert!(!out.poly2_contains_poly1(o, i));
        assert!(out.poly2_contains_poly1(t, o));
    }

    #[test]
    fn redirection() {
        let mut out = Output::default();
        let a = out.create_rec();
        let b = out.create_rec();
        let c = out.create_rec();
        out.recs[c].idx = b;
        out.recs[b].idx = a;
        assert_eq!(out.find_root(c), a);
        assert_eq!(out.find_root(a), a);

        out.recs[c].first_left = Some(b);
        out.recs[b].first_left = Some(a);
        assert!(out.is_right_of(c, a));
        assert!(!out.is_right_of(a, c));
        assert_eq!(out.parse_first_left(Some(b)), None);
    }

    #[test]
    fn hole_linkage() {
        let mut out = Output::default();
        let outer = ring_from_path(&mut out, &square(0, 0, 10));
        let dead = out.create_rec();
        let hole = ring_from_path(&mut out, &square(2, 2, 2));
        out.recs[hole].is_hole = true;
        out.recs[dead].first_left = Some(outer);
        out.recs[hole].first_left = Some(dead);
        out.fix_hole_linkage(hole);
        assert_eq!(out.recs[hole].first_left, Some(outer));
    }
}
