//! Cleaning up output contours once the sweep is done.

use super::{OutRecIdx, Output};
use crate::geom::{pt2_is_between_pt1_and_pt3, slopes_equal3};

impl Output {
    /// Makes every closed contour's orientation agree with its hole state.
    pub fn fix_orientations(&mut self, reverse_solution: bool) {
        for rec in self.recs.indices() {
            if !self.recs[rec].is_open {
                self.normalize_orientation(rec, reverse_solution);
            }
        }
    }

    /// Removes duplicate points and the middle vertices of collinear runs.
    ///
    /// If `preserve_collinear` is set, collinear vertices are only removed
    /// when they make a spike (that is, when the middle vertex isn't between
    /// its neighbors).
    pub fn fixup_out_polygon(&mut self, rec: OutRecIdx, preserve_collinear: bool) {
        self.recs[rec].bottom_pt = None;
        let Some(mut pp) = self.recs[rec].pts else {
            return;
        };
        let mut last_ok = None;
        loop {
            let (prev, next) = (self.pts[pp].prev, self.pts[pp].next);
            if prev == pp || prev == next {
                self.recs[rec].pts = None;
                return;
            }
            let (p0, p1, p2) = (self.pts[prev].pt, self.pts[pp].pt, self.pts[next].pt);
            if p1 == p2
                || p1 == p0
                || (slopes_equal3(p0, p1, p2)
                    && (!preserve_collinear || !pt2_is_between_pt1_and_pt3(p0, p1, p2)))
            {
                last_ok = None;
                self.pts[prev].next = next;
                self.pts[next].prev = prev;
                pp = prev;
            } else if Some(pp) == last_ok {
                break;
            } else {
                if last_ok.is_none() {
                    last_ok = Some(pp);
                }
                pp = next;
            }
        }
        self.recs[rec].pts = Some(pp);
    }

    /// Removes consecutive duplicate points from an open contour.
    pub fn fixup_out_polyline(&mut self, rec: OutRecIdx) {
        let Some(start) = self.recs[rec].pts else {
            return;
        };
        let mut pp = start;
        let mut last = self.pts[pp].prev;
        while pp != last {
            pp = self.pts[pp].next;
            let prev = self.pts[pp].prev;
            if self.pts[pp].pt == self.pts[prev].pt {
                if pp == last {
                    last = prev;
                }
                let next = self.pts[pp].next;
                self.pts[prev].next = next;
                self.pts[next].prev = prev;
                pp = prev;
            }
        }
        if pp == self.pts[pp].prev {
            self.recs[rec].pts = None;
        }
    }

    /// Splits every closed contour that touches itself at a vertex into
    /// several contours that don't.
    pub fn do_simple_polygons(&mut self, using_tree: bool) {
        // Records created by splitting get pushed onto the end, and they
        // need processing too.
        let mut i = 0;
        while i < self.recs.len() {
            let rec = OutRecIdx(i);
            i += 1;
            let Some(mut op) = self.recs[rec].pts else {
                continue;
            };
            if self.recs[rec].is_open {
                continue;
            }
            loop {
                let mut op2 = self.pts[op].next;
                while Some(op2) != self.recs[rec].pts {
                    if self.pts[op].pt == self.pts[op2].pt
                        && self.pts[op2].next != op
                        && self.pts[op2].prev != op
                    {
                        // Split the contour in two.
                        let op3 = self.pts[op].prev;
                        let op4 = self.pts[op2].prev;
                        self.pts[op].prev = op4;
                        self.pts[op4].next = op;
                        self.pts[op2].prev = op3;
                        self.pts[op3].next = op2;

                        self.recs[rec].pts = Some(op);
                        let rec2 = self.create_rec();
                        self.recs[rec2].pts = Some(op2);
                        self.update_out_pt_idxs(rec2);
                        self.classify_split(rec, rec2, op, op2, using_tree);
                        // Start scanning for duplicates again after `op`.
                        op2 = op;
                    }
                    op2 = self.pts[op2].next;
                }
                op = self.pts[op].next;
                if Some(op) == self.recs[rec].pts {
                    break;
                }
            }
        }
        tracing::trace!(records = self.recs.len(), "split self-touching contours");
    }

    // After `rec` (with ring `op`) was split, sets the hole state and
    // containment of the new `rec2` (with ring `op2`).
    fn classify_split(
        &mut self,
        rec: OutRecIdx,
        rec2: OutRecIdx,
        op: super::OutPtIdx,
        op2: super::OutPtIdx,
        using_tree: bool,
    ) {
        if self.poly2_contains_poly1(op2, op) {
            // rec2 is inside rec.
            self.recs[rec2].is_hole = !self.recs[rec].is_hole;
            self.recs[rec2].first_left = Some(rec);
            if using_tree {
                self.fixup_first_lefts2(rec2, rec);
            }
        } else if self.poly2_contains_poly1(op, op2) {
            // rec is inside rec2.
            self.recs[rec2].is_hole = self.recs[rec].is_hole;
            self.recs[rec].is_hole = !self.recs[rec2].is_hole;
            self.recs[rec2].first_left = self.recs[rec].first_left;
            self.recs[rec].first_left = Some(rec2);
            if using_tree {
                self.fixup_first_lefts2(rec, rec2);
            }
        } else {
            self.recs[rec2].is_hole = self.recs[rec].is_hole;
            self.recs[rec2].first_left = self.recs[rec].first_left;
            if using_tree {
                self.fixup_first_lefts1(rec, rec2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::{p, square};
    use crate::output::tests::ring_from_path;

    #[test]
    fn duplicates_and_collinear() {
        let mut out = Output::default();
        let rec = ring_from_path(
            &mut out,
            &[p(0, 0), p(0, 0), p(0, 5), p(0, 10), p(10, 10), p(10, 0)],
        );
        out.fixup_out_polygon(rec, false);
        assert_eq!(out.point_count(out.recs[rec].pts), 4);
        assert_eq!(out.rec_area(rec), -100.0);
    }

    #[test]
    fn preserve_collinear() {
        let mut out = Output::default();
        let rec = ring_from_path(&mut out, &[p(0, 0), p(0, 5), p(0, 10), p(10, 10), p(10, 0)]);
        out.fixup_out_polygon(rec, true);
        assert_eq!(out.point_count(out.recs[rec].pts), 5);

        // Spikes go even when preserving collinear points.
        let rec = ring_from_path(
            &mut out,
            &[p(0, 0), p(0, 10), p(5, 10), p(5, 20), p(5, 10), p(10, 10), p(10, 0)],
        );
        out.fixup_out_polygon(rec, true);
        assert_eq!(out.point_count(out.recs[rec].pts), 5);
    }

    #[test]
    fn degenerate_polygon() {
        let mut out = Output::default();
        let rec = ring_from_path(&mut out, &[p(0, 0), p(5, 5), p(10, 10)]);
        out.fixup_out_polygon(rec, false);
        assert!(out.recs[rec].pts.is_none());
    }

    #[test]
    fn polyline_duplicates() {
        let mut out = Output::default();
        let rec = ring_from_path(&mut out, &[p(0, 0), p(0, 0), p(5, 5), p(5, 5), p(10, 0)]);
        out.recs[rec].is_open = true;
        out.fixup_out_polyline(rec);
        assert_eq!(out.point_count(out.recs[rec].pts), 3);

        let rec = ring_from_path(&mut out, &[p(1, 1), p(1, 1)]);
        out.fixup_out_polyline(rec);
        assert!(out.recs[rec].pts.is_none());
    }

    #[test]
    fn split_touching() {
        // Two squares touching at a corner, traced as a single contour.
        let mut out = Output::default();
        let mut path = vec![p(10, 10), p(10, 0), p(0, 0), p(0, 10)];
        path.extend(square(10, 10, 10));
        let rec = ring_from_path(&mut out, &path);
        out.do_simple_polygons(false);
        let live: Vec<_> = out
            .recs
            .iter()
            .filter(|(_, r)| r.pts.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(live.len(), 2);
        for r in live {
            assert_eq!(out.point_count(out.recs[r].pts), 4);
            assert!(!out.recs[r].is_hole);
            assert_eq!(out.rec_area(r).abs(), 100.0);
        }
        assert!(out.recs[rec].pts.is_some());
        out.check_invariants();
    }
}
