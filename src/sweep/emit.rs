//! Adding points to output contours, and starting and finishing contours.

use super::Sweep;
use crate::{
    edges::{EdgeIdx, Side},
    geom::{slopes_equal4, Point},
    output::{GhostJoin, Join, OutPt, OutPtIdx, OutRecIdx, Output},
};

// Makes `b` follow `a` in their ring.
fn link(out: &mut Output, a: OutPtIdx, b: OutPtIdx) {
    out.pts[a].next = b;
    out.pts[b].prev = a;
}

impl Sweep<'_> {
    /// Adds a point to the contour that `e` is building, starting a new
    /// contour if `e` isn't building one yet.
    ///
    /// Left edges add to the front of the ring and right edges add to the
    /// back. Adding a point that's already at the relevant end does nothing,
    /// and returns the existing point.
    pub(super) fn add_out_pt(&mut self, e: EdgeIdx, pt: Point) -> OutPtIdx {
        let Some(rec) = self.edges[e].out_idx else {
            let rec = self.out.create_rec();
            let is_open = self.edges[e].wind_delta == 0;
            self.out.recs[rec].is_open = is_open;
            let op = self.out.new_ring(rec, pt);
            if !is_open {
                self.set_hole_state(e, rec);
            }
            self.edges[e].out_idx = Some(rec);
            tracing::trace!(?rec, ?pt, edge = ?e, "new contour");
            return op;
        };

        let Some(front) = self.out.recs[rec].pts else {
            return self.out.new_ring(rec, pt);
        };
        let back = self.out.pts[front].prev;
        let to_front = self.edges[e].side == Side::Left;
        if to_front && pt == self.out.pts[front].pt {
            return front;
        } else if !to_front && pt == self.out.pts[back].pt {
            return back;
        }

        let op = self.out.pts.push(OutPt {
            pt,
            idx: rec,
            next: front,
            prev: back,
        });
        self.out.pts[back].next = op;
        self.out.pts[front].prev = op;
        if to_front {
            self.out.recs[rec].pts = Some(op);
        }
        op
    }

    /// The point most recently added by `e`.
    pub(super) fn last_out_pt(&self, e: EdgeIdx) -> Option<OutPtIdx> {
        let front = self.out.recs[self.edges[e].out_idx?].pts?;
        Some(match self.edges[e].side {
            Side::Left => front,
            Side::Right => self.out.pts[front].prev,
        })
    }

    /// Decides whether a new contour is a hole, by counting the contours
    /// to the left of the edge that started it.
    fn set_hole_state(&mut self, e: EdgeIdx, rec: OutRecIdx) {
        let mut unpaired: Option<EdgeIdx> = None;
        let mut cur = self.edges[e].prev_in_ael;
        while let Some(idx) = cur {
            let edge = &self.edges[idx];
            if let Some(out_idx) = edge.out_idx {
                if edge.wind_delta != 0 {
                    match unpaired {
                        None => unpaired = Some(idx),
                        Some(u) if self.edges[u].out_idx == Some(out_idx) => unpaired = None,
                        Some(_) => {}
                    }
                }
            }
            cur = edge.prev_in_ael;
        }

        match unpaired.and_then(|u| self.edges[u].out_idx) {
            Some(outer) => {
                self.out.recs[rec].first_left = Some(outer);
                self.out.recs[rec].is_hole = !self.out.recs[outer].is_hole;
            }
            None => {
                self.out.recs[rec].first_left = None;
                self.out.recs[rec].is_hole = false;
            }
        }
    }

    /// Starts a new contour at a local minimum formed by `e1` and `e2`.
    pub(super) fn add_local_min_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: Point) -> OutPtIdx {
        let (left, right) =
            if self.edges[e2].is_horizontal() || self.edges[e1].dx > self.edges[e2].dx {
                (e1, e2)
            } else {
                (e2, e1)
            };
        let result = self.add_out_pt(left, pt);
        self.edges[right].out_idx = self.edges[left].out_idx;
        self.edges[left].side = Side::Left;
        self.edges[right].side = Side::Right;

        let e = left;
        let prev_e = if self.edges[e].prev_in_ael == Some(right) {
            self.edges[right].prev_in_ael
        } else {
            self.edges[e].prev_in_ael
        };

        // If the new contour starts on top of an existing output edge, the
        // two will need joining.
        if let Some(prev_e) = prev_e {
            let (p, c) = (&self.edges[prev_e], &self.edges[e]);
            if p.out_idx.is_some() && p.top.y < pt.y && c.top.y < pt.y {
                let x_prev = p.top_x(pt.y);
                let x_e = c.top_x(pt.y);
                if x_prev == x_e
                    && c.wind_delta != 0
                    && p.wind_delta != 0
                    && slopes_equal4(Point::new(x_prev, pt.y), p.top, Point::new(x_e, pt.y), c.top)
                {
                    let off = c.top;
                    let op = self.add_out_pt(prev_e, pt);
                    self.add_join(result, op, off);
                }
            }
        }
        result
    }

    /// Finishes a contour (or two) at a local maximum formed by `e1` and `e2`.
    pub(super) fn add_local_max_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: Point) {
        self.add_out_pt(e1, pt);
        if self.edges[e2].wind_delta == 0 {
            self.add_out_pt(e2, pt);
        }
        let (i1, i2) = (self.edges[e1].out_idx, self.edges[e2].out_idx);
        if i1 == i2 {
            self.edges[e1].out_idx = None;
            self.edges[e2].out_idx = None;
        } else if i1 < i2 {
            self.append_polygon(e1, e2);
        } else {
            self.append_polygon(e2, e1);
        }
    }

    /// Merges `e2`'s contour onto the end of `e1`'s.
    ///
    /// Both edges stop contributing; whichever other active edge was still
    /// building `e2`'s contour gets redirected to `e1`'s.
    fn append_polygon(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let (Some(rec1), Some(rec2)) = (self.edges[e1].out_idx, self.edges[e2].out_idx) else {
            return;
        };
        let hole_state_rec = if self.out.is_right_of(rec1, rec2) {
            rec2
        } else if self.out.is_right_of(rec2, rec1) {
            rec1
        } else {
            self.out.lowermost_rec(rec1, rec2)
        };

        let (Some(p1_lft), Some(p2_lft)) = (self.out.recs[rec1].pts, self.out.recs[rec2].pts) else {
            return;
        };
        let p1_rt = self.out.pts[p1_lft].prev;
        let p2_rt = self.out.pts[p2_lft].prev;
        let side1 = self.edges[e1].side;
        let out = &mut self.out;
        match (side1, self.edges[e2].side) {
            (Side::Left, Side::Left) => {
                // z y x a b c
                out.reverse_links(p2_lft);
                link(out, p2_lft, p1_lft);
                link(out, p1_rt, p2_rt);
                out.recs[rec1].pts = Some(p2_rt);
            }
            (Side::Left, Side::Right) => {
                // x y z a b c
                link(out, p2_rt, p1_lft);
                link(out, p1_rt, p2_lft);
                out.recs[rec1].pts = Some(p2_lft);
            }
            (Side::Right, Side::Right) => {
                // a b c z y x
                out.reverse_links(p2_lft);
                link(out, p1_rt, p2_rt);
                link(out, p2_lft, p1_lft);
            }
            (Side::Right, Side::Left) => {
                // a b c x y z
                link(out, p1_rt, p2_lft);
                link(out, p2_rt, p1_lft);
            }
        }

        out.recs[rec1].bottom_pt = None;
        if hole_state_rec == rec2 {
            if out.recs[rec2].first_left != Some(rec1) {
                out.recs[rec1].first_left = out.recs[rec2].first_left;
            }
            out.recs[rec1].is_hole = out.recs[rec2].is_hole;
        }
        out.recs[rec2].pts = None;
        out.recs[rec2].bottom_pt = None;
        out.recs[rec2].first_left = Some(rec1);

        self.edges[e1].out_idx = None;
        self.edges[e2].out_idx = None;
        let mut e = self.active;
        while let Some(idx) = e {
            if self.edges[idx].out_idx == Some(rec2) {
                self.edges[idx].out_idx = Some(rec1);
                self.edges[idx].side = side1;
                break;
            }
            e = self.edges[idx].next_in_ael;
        }
        self.out.recs[rec2].idx = self.out.recs[rec1].idx;
        tracing::trace!(into = ?rec1, from = ?rec2, "appended contour");
    }

    pub(super) fn add_join(&mut self, out_pt1: OutPtIdx, out_pt2: OutPtIdx, off_pt: Point) {
        self.joins.push(Join {
            out_pt1,
            out_pt2,
            off_pt,
        });
    }

    pub(super) fn add_ghost_join(&mut self, out_pt: OutPtIdx, off_pt: Point) {
        self.ghost_joins.push(GhostJoin { out_pt, off_pt });
    }

    /// Fills in the `z` coordinate of an intersection point between `e1` and `e2`.
    ///
    /// Points that already have a `z` are left alone. Points at an end of
    /// either edge take that end's `z`; the rest go to the callback.
    pub(super) fn set_z(&mut self, pt: &mut Point, e1: EdgeIdx, e2: EdgeIdx) {
        if pt.z != 0 {
            return;
        }
        let Some(z_fill) = self.z_fill.as_deref_mut() else {
            return;
        };
        let (e1, e2) = (&self.edges[e1], &self.edges[e2]);
        if let Some(end) = [e1.bot, e1.top, e2.bot, e2.top].into_iter().find(|end| *end == *pt) {
            pt.z = end.z;
        } else {
            z_fill(e1.bot, e1.top, e2.bot, e2.top, pt);
        }
    }
}
