//! Splicing together output contours that share edges.
//!
//! While sweeping, whenever two output contours end up running along the
//! same segment we record a [`Join`]. After the sweep, each join is either
//! used to merge the two contours into one, or to split a single contour
//! into two.
//!
//! There are three kinds of joins:
//!
//! 1. Horizontal joins, where both points are somewhere along collinear
//!    horizontal edges, and `off_pt` is on the same horizontal line.
//! 2. Non-horizontal joins, where both points are at the bottom of the
//!    overlapping segment and `off_pt` is somewhere above them.
//! 3. Strictly-simple joins, where the edges touch at a point without being
//!    collinear. All three points coincide.

use super::{OutPtIdx, OutRecIdx, Output};
use crate::geom::{slopes_equal3, Point};

/// A deferred request to splice the contours at two output points.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Join {
    pub out_pt1: OutPtIdx,
    pub out_pt2: OutPtIdx,
    pub off_pt: Point,
}

/// A horizontal output segment that later horizontals might overlap.
///
/// These only live for a single scanbeam. If a horizontal edge starting at a
/// local minimum overlaps one, it gets promoted to a real [`Join`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct GhostJoin {
    pub out_pt: OutPtIdx,
    pub off_pt: Point,
}

/// The overlap of the spans `[a1, a2]` and `[b1, b2]` (each in either order),
/// if it has positive length.
fn overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> Option<(i64, i64)> {
    let (a1, a2) = (a1.min(a2), a1.max(a2));
    let (b1, b2) = (b1.min(b2), b1.max(b2));
    let left = a1.max(b1);
    let right = a2.min(b2);
    (left < right).then_some((left, right))
}

impl Output {
    // Walks along a horizontal run starting at `op` to the point where the
    // join at `pt` should be made, and makes sure there's a pair of vertices
    // at `pt` to splice.
    fn prepare_horz(
        &mut self,
        mut op: OutPtIdx,
        left_to_right: bool,
        pt: Point,
        discard_left: bool,
    ) -> (OutPtIdx, OutPtIdx) {
        if left_to_right {
            loop {
                let next = self.pts[self.pts[op].next].pt;
                if next.x <= pt.x && next.x >= self.pts[op].pt.x && next.y == pt.y {
                    op = self.pts[op].next;
                } else {
                    break;
                }
            }
            if discard_left && self.pts[op].pt.x != pt.x {
                op = self.pts[op].next;
            }
        } else {
            loop {
                let next = self.pts[self.pts[op].next].pt;
                if next.x >= pt.x && next.x <= self.pts[op].pt.x && next.y == pt.y {
                    op = self.pts[op].next;
                } else {
                    break;
                }
            }
            if !discard_left && self.pts[op].pt.x != pt.x {
                op = self.pts[op].next;
            }
        }
        let after = discard_left != left_to_right;
        let mut opb = self.dup_out_pt(op, after);
        if self.pts[opb].pt != pt {
            op = opb;
            self.pts[op].pt = pt;
            opb = self.dup_out_pt(op, after);
        }
        (op, opb)
    }

    /// Splices two horizontal runs `op1 -> op1b` and `op2 -> op2b` together at `pt`.
    fn join_horz(
        &mut self,
        op1: OutPtIdx,
        op1b: OutPtIdx,
        op2: OutPtIdx,
        op2b: OutPtIdx,
        pt: Point,
        discard_left: bool,
    ) -> bool {
        let dir1_ltr = self.pts[op1].pt.x <= self.pts[op1b].pt.x;
        let dir2_ltr = self.pts[op2].pt.x <= self.pts[op2b].pt.x;
        if dir1_ltr == dir2_ltr {
            return false;
        }

        // When discarding the left, we want op1b to be on the left of op1,
        // otherwise on the right (and likewise for op2 and op2b).
        let (op1, op1b) = self.prepare_horz(op1, dir1_ltr, pt, discard_left);
        let (op2, op2b) = self.prepare_horz(op2, dir2_ltr, pt, discard_left);

        if dir1_ltr == discard_left {
            self.pts[op1].prev = op2;
            self.pts[op2].next = op1;
            self.pts[op1b].next = op2b;
            self.pts[op2b].prev = op1b;
        } else {
            self.pts[op1].next = op2;
            self.pts[op2].prev = op1;
            self.pts[op1b].prev = op2b;
            self.pts[op2b].next = op1b;
        }
        true
    }

    // Links `op1` and `op2` (which are at the same point) so that each
    // continues into the other's ring, and returns the new point that
    // starts the second ring.
    fn splice(&mut self, op1: OutPtIdx, op2: OutPtIdx, reverse: bool) -> OutPtIdx {
        let op1b = self.dup_out_pt(op1, !reverse);
        let op2b = self.dup_out_pt(op2, reverse);
        if reverse {
            self.pts[op1].prev = op2;
            self.pts[op2].next = op1;
            self.pts[op1b].next = op2b;
            self.pts[op2b].prev = op1b;
        } else {
            self.pts[op1].next = op2;
            self.pts[op2].prev = op1;
            self.pts[op1b].prev = op2b;
            self.pts[op2b].next = op1b;
        }
        op1b
    }

    // Looks for a neighbor of `op` that is distinct from it, walking forwards
    // or backwards.
    fn distinct_neighbor(&self, op: OutPtIdx, forward: bool) -> OutPtIdx {
        let step = |o: OutPtIdx| if forward { self.pts[o].next } else { self.pts[o].prev };
        let mut b = step(op);
        while self.pts[b].pt == self.pts[op].pt && b != op {
            b = step(b);
        }
        b
    }

    /// Performs a join, if possible, updating its points to be one point on
    /// each of the resulting rings.
    fn join_points(&mut self, j: &mut Join, rec1: OutRecIdx, rec2: OutRecIdx) -> bool {
        let mut op1 = j.out_pt1;
        let mut op2 = j.out_pt2;
        let off = j.off_pt;
        let is_horizontal = self.pts[op1].pt.y == off.y;

        if is_horizontal && off == self.pts[op1].pt && off == self.pts[op2].pt {
            // Strictly simple join.
            if rec1 != rec2 {
                return false;
            }
            let mut op1b = self.pts[op1].next;
            while op1b != op1 && self.pts[op1b].pt == off {
                op1b = self.pts[op1b].next;
            }
            let reverse1 = self.pts[op1b].pt.y > off.y;
            let mut op2b = self.pts[op2].next;
            while op2b != op2 && self.pts[op2b].pt == off {
                op2b = self.pts[op2b].next;
            }
            let reverse2 = self.pts[op2b].pt.y > off.y;
            if reverse1 == reverse2 {
                return false;
            }
            j.out_pt1 = op1;
            j.out_pt2 = self.splice(op1, op2, reverse1);
            true
        } else if is_horizontal {
            // With horizontal joins we don't know yet where the overlap is:
            // the two points can be anywhere along the horizontal edges.
            let mut op1b = op1;
            while self.pts[self.pts[op1].prev].pt.y == self.pts[op1].pt.y
                && self.pts[op1].prev != op1b
                && self.pts[op1].prev != op2
            {
                op1 = self.pts[op1].prev;
            }
            while self.pts[self.pts[op1b].next].pt.y == self.pts[op1b].pt.y
                && self.pts[op1b].next != op1
                && self.pts[op1b].next != op2
            {
                op1b = self.pts[op1b].next;
            }
            if self.pts[op1b].next == op1 || self.pts[op1b].next == op2 {
                // A flat "polygon".
                return false;
            }

            let mut op2b = op2;
            while self.pts[self.pts[op2].prev].pt.y == self.pts[op2].pt.y
                && self.pts[op2].prev != op2b
                && self.pts[op2].prev != op1b
            {
                op2 = self.pts[op2].prev;
            }
            while self.pts[self.pts[op2b].next].pt.y == self.pts[op2b].pt.y
                && self.pts[op2b].next != op2
                && self.pts[op2b].next != op1
            {
                op2b = self.pts[op2b].next;
            }
            if self.pts[op2b].next == op2 || self.pts[op2b].next == op1 {
                return false;
            }

            let (p1, p1b, p2, p2b) = (
                self.pts[op1].pt,
                self.pts[op1b].pt,
                self.pts[op2].pt,
                self.pts[op2b].pt,
            );
            let Some((left, right)) = overlap(p1.x, p1b.x, p2.x, p2b.x) else {
                return false;
            };

            // Joining overlapping edges creates a spike that gets cleaned up
            // later. Choose the side to discard so that neither op1 nor op2
            // gets caught up in it, since they may still be needed by other joins.
            let in_range = |p: Point| p.x >= left && p.x <= right;
            let (pt, discard_left) = if in_range(p1) {
                (p1, p1.x > p1b.x)
            } else if in_range(p2) {
                (p2, p2.x > p2b.x)
            } else if in_range(p1b) {
                (p1b, p1b.x > p1.x)
            } else {
                (p2b, p2b.x > p2.x)
            };
            j.out_pt1 = op1;
            j.out_pt2 = op2;
            self.join_horz(op1, op1b, op2, op2b, pt, discard_left)
        } else {
            // For non-horizontal joins, both points are at the same location
            // at the bottom of the overlap, and `off` is above them.
            let pt1 = self.pts[op1].pt;
            let mut op1b = self.distinct_neighbor(op1, true);
            let bad = |out: &Output, a: Point, b: OutPtIdx| {
                out.pts[b].pt.y > a.y || !slopes_equal3(a, out.pts[b].pt, off)
            };
            let reverse1 = bad(self, pt1, op1b);
            if reverse1 {
                op1b = self.distinct_neighbor(op1, false);
                if bad(self, pt1, op1b) {
                    return false;
                }
            }
            let pt2 = self.pts[op2].pt;
            let mut op2b = self.distinct_neighbor(op2, true);
            let reverse2 = bad(self, pt2, op2b);
            if reverse2 {
                op2b = self.distinct_neighbor(op2, false);
                if bad(self, pt2, op2b) {
                    return false;
                }
            }

            if op1b == op1
                || op2b == op2
                || op1b == op2b
                || (rec1 == rec2 && reverse1 == reverse2)
            {
                return false;
            }
            j.out_pt1 = op1;
            j.out_pt2 = self.splice(op1, op2, reverse1);
            true
        }
    }

    /// After `old` was split, reassigns to `new` the records that were inside
    /// `old` but are now inside `new`.
    pub(super) fn fixup_first_lefts1(&mut self, old: OutRecIdx, new: OutRecIdx) {
        let Some(new_pts) = self.recs[new].pts else {
            return;
        };
        for r in self.recs.indices() {
            let fl = self.parse_first_left(self.recs[r].first_left);
            if let Some(pts) = self.recs[r].pts {
                if fl == Some(old) && self.poly2_contains_poly1(pts, new_pts) {
                    self.recs[r].first_left = Some(new);
                }
            }
        }
    }

    /// After a record split into an `inner` one inside an `outer` one, the
    /// two might now wrap around other records, so check everything that
    /// shared their container.
    pub(super) fn fixup_first_lefts2(&mut self, inner: OutRecIdx, outer: OutRecIdx) {
        let orfl = self.recs[outer].first_left;
        let (Some(inner_pts), Some(outer_pts)) = (self.recs[inner].pts, self.recs[outer].pts) else {
            return;
        };
        for r in self.recs.indices() {
            let Some(pts) = self.recs[r].pts else {
                continue;
            };
            if r == outer || r == inner {
                continue;
            }
            let fl = self.parse_first_left(self.recs[r].first_left);
            if fl != orfl && fl != Some(inner) && fl != Some(outer) {
                continue;
            }
            if self.poly2_contains_poly1(pts, inner_pts) {
                self.recs[r].first_left = Some(inner);
            } else if self.poly2_contains_poly1(pts, outer_pts) {
                self.recs[r].first_left = Some(outer);
            } else if self.recs[r].first_left == Some(inner)
                || self.recs[r].first_left == Some(outer)
            {
                self.recs[r].first_left = orfl;
            }
        }
    }

    /// Like [`fixup_first_lefts1`](Self::fixup_first_lefts1), but without
    /// checking containment: used when `old` was merged into `new`.
    fn fixup_first_lefts3(&mut self, old: OutRecIdx, new: OutRecIdx) {
        for r in self.recs.indices() {
            let fl = self.parse_first_left(self.recs[r].first_left);
            if self.recs[r].pts.is_some() && fl == Some(old) {
                self.recs[r].first_left = Some(new);
            }
        }
    }

    /// Reverses a closed ring if its orientation disagrees with its hole state.
    pub(super) fn normalize_orientation(&mut self, rec: OutRecIdx, reverse_solution: bool) {
        let Some(pts) = self.recs[rec].pts else {
            return;
        };
        if (self.recs[rec].is_hole ^ reverse_solution) == (self.ring_area(pts) > 0.0) {
            self.reverse_links(pts);
        }
    }

    /// Applies all the joins recorded during the sweep.
    pub fn join_common_edges(
        &mut self,
        joins: &mut [Join],
        using_tree: bool,
        reverse_solution: bool,
    ) {
        for j in joins.iter_mut() {
            let rec1 = self.find_root(self.pts[j.out_pt1].idx);
            let mut rec2 = self.find_root(self.pts[j.out_pt2].idx);

            if self.recs[rec1].pts.is_none() || self.recs[rec2].pts.is_none() {
                continue;
            }
            if self.recs[rec1].is_open || self.recs[rec2].is_open {
                continue;
            }

            // Get the fragment with the correct hole state before joining.
            let hole_state_rec = if rec1 == rec2 {
                rec1
            } else if self.is_right_of(rec1, rec2) {
                rec2
            } else if self.is_right_of(rec2, rec1) {
                rec1
            } else {
                self.lowermost_rec(rec1, rec2)
            };

            if !self.join_points(j, rec1, rec2) {
                continue;
            }

            if rec1 == rec2 {
                // Instead of joining two polygons, we've split one into two.
                self.recs[rec1].pts = Some(j.out_pt1);
                self.recs[rec1].bottom_pt = None;
                rec2 = self.create_rec();
                self.recs[rec2].pts = Some(j.out_pt2);
                self.update_out_pt_idxs(rec2);

                if self.poly2_contains_poly1(j.out_pt2, j.out_pt1) {
                    // rec1 contains rec2.
                    self.recs[rec2].is_hole = !self.recs[rec1].is_hole;
                    self.recs[rec2].first_left = Some(rec1);
                    if using_tree {
                        self.fixup_first_lefts2(rec2, rec1);
                    }
                    self.normalize_orientation(rec2, reverse_solution);
                } else if self.poly2_contains_poly1(j.out_pt1, j.out_pt2) {
                    // rec2 contains rec1.
                    self.recs[rec2].is_hole = self.recs[rec1].is_hole;
                    self.recs[rec1].is_hole = !self.recs[rec2].is_hole;
                    self.recs[rec2].first_left = self.recs[rec1].first_left;
                    self.recs[rec1].first_left = Some(rec2);
                    if using_tree {
                        self.fixup_first_lefts2(rec1, rec2);
                    }
                    self.normalize_orientation(rec1, reverse_solution);
                } else {
                    // The two polygons are completely separate.
                    self.recs[rec2].is_hole = self.recs[rec1].is_hole;
                    self.recs[rec2].first_left = self.recs[rec1].first_left;
                    if using_tree {
                        self.fixup_first_lefts1(rec1, rec2);
                    }
                }
            } else {
                // We joined two polygons together.
                self.recs[rec2].pts = None;
                self.recs[rec2].bottom_pt = None;
                self.recs[rec2].idx = rec1;

                self.recs[rec1].is_hole = self.recs[hole_state_rec].is_hole;
                if hole_state_rec == rec2 {
                    self.recs[rec1].first_left = self.recs[rec2].first_left;
                }
                self.recs[rec2].first_left = Some(rec1);
                if using_tree {
                    self.fixup_first_lefts3(rec2, rec1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::p;
    use crate::output::tests::ring_from_path;

    #[test]
    fn overlaps() {
        assert_eq!(overlap(0, 10, 5, 20), Some((5, 10)));
        assert_eq!(overlap(10, 0, 20, 5), Some((5, 10)));
        assert_eq!(overlap(0, 5, 5, 10), None);
    }

    #[test]
    fn merge_on_vertical_join() {
        // Two squares that share the segment from (5, 10) up to (5, 0),
        // running along it in opposite directions.
        let mut out = Output::default();
        let left = ring_from_path(&mut out, &[p(0, 10), p(0, 0), p(5, 0), p(5, 10)]);
        let right = ring_from_path(&mut out, &[p(10, 0), p(10, 10), p(5, 10), p(5, 0)]);
        let find = |out: &Output, rec: OutRecIdx| {
            out.ring(out.recs[rec].pts.unwrap())
                .find(|&o| out.pts[o].pt == p(5, 10))
                .unwrap()
        };
        let mut joins = vec![Join {
            out_pt1: find(&out, left),
            out_pt2: find(&out, right),
            off_pt: p(5, 0),
        }];
        out.join_common_edges(&mut joins, false, false);

        let live: Vec<_> = out
            .recs
            .iter()
            .filter(|(_, r)| r.pts.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(live, vec![left]);
        assert_eq!(out.point_count(out.recs[left].pts), 10);
        assert_eq!(out.rec_area(left).abs(), 100.0);
        assert_eq!(out.find_root(right), left);
        out.check_invariants();
    }
}
