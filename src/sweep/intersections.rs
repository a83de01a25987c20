//! Finding and processing the crossings of active edges within a scanbeam.

use super::{active::List, Sweep};
use crate::{
    edges::{Edge, EdgeIdx},
    geom::Point,
    BinaryOp, Error, FillRule, PolyType,
};

/// A crossing between two edges that are adjacent in the AEL at the time it gets processed.
#[derive(Clone, Copy, Debug)]
pub(super) struct IntersectNode {
    pub e1: EdgeIdx,
    pub e2: EdgeIdx,
    pub pt: Point,
}

/// Where two (non-parallel) edges cross, rounded to integer coordinates.
///
/// The result is clamped so that it lies within the current scanbeam: not
/// above the top of either edge and not below `e1.curr`.
pub(super) fn intersect_point(e1: &Edge, e2: &Edge) -> Point {
    // With huge coordinates, slopes that aren't equal can still round to the same dx.
    if e1.dx == e2.dx {
        let y = e1.curr.y;
        return Point::new(e1.top_x(y), y);
    }

    let mut ip = if e1.delta_x == 0 {
        let x = e1.bot.x;
        let y = if e2.is_horizontal() {
            e2.bot.y
        } else {
            let b2 = e2.bot.y as f64 - e2.bot.x as f64 / e2.dx;
            (x as f64 / e2.dx + b2).round() as i64
        };
        Point::new(x, y)
    } else if e2.delta_x == 0 {
        let x = e2.bot.x;
        let y = if e1.is_horizontal() {
            e1.bot.y
        } else {
            let b1 = e1.bot.y as f64 - e1.bot.x as f64 / e1.dx;
            (x as f64 / e1.dx + b1).round() as i64
        };
        Point::new(x, y)
    } else {
        let b1 = e1.bot.x as f64 - e1.bot.y as f64 * e1.dx;
        let b2 = e2.bot.x as f64 - e2.bot.y as f64 * e2.dx;
        let q = (b2 - b1) / (e1.dx - e2.dx);
        let x = if e1.dx.abs() < e2.dx.abs() {
            e1.dx * q + b1
        } else {
            e2.dx * q + b2
        };
        Point::new(x.round() as i64, q.round() as i64)
    };

    // Derive x from the more vertical edge, where rounding hurts least.
    let steeper = |y: i64| {
        if e1.dx.abs() < e2.dx.abs() {
            e1.top_x(y)
        } else {
            e2.top_x(y)
        }
    };
    if ip.y < e1.top.y || ip.y < e2.top.y {
        ip.y = e1.top.y.max(e2.top.y);
        ip.x = steeper(ip.y);
    }
    if ip.y > e1.curr.y {
        ip.y = e1.curr.y;
        ip.x = if e1.dx.abs() > e2.dx.abs() {
            e2.top_x(ip.y)
        } else {
            e1.top_x(ip.y)
        };
    }
    ip
}

impl Sweep<'_> {
    /// Handles all the crossings between the bottom and the top of the current scanbeam.
    pub(super) fn process_intersections(&mut self, top_y: i64) -> Result<(), Error> {
        if self.active.is_none() {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        let result = if self.intersections.is_empty() {
            Ok(())
        } else if self.intersections.len() == 1 || self.fixup_intersection_order() {
            self.process_intersect_list();
            Ok(())
        } else {
            tracing::warn!(
                count = self.intersections.len(),
                top_y,
                "no valid order for intersections"
            );
            Err(Error::IntersectionOrder)
        };
        self.sorted = None;
        self.intersections.clear();
        result
    }

    /// Bubble-sorts a copy of the AEL by `x` at `top_y`, recording a crossing for every swap.
    fn build_intersect_list(&mut self, top_y: i64) {
        self.sorted = self.active;
        let mut e = self.active;
        while let Some(idx) = e {
            let edge = &mut self.edges[idx];
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            edge.curr.x = edge.top_x(top_y);
            e = edge.next_in_ael;
        }

        let mut modified = true;
        while modified {
            let Some(mut e) = self.sorted else {
                break;
            };
            modified = false;
            while let Some(next) = self.edges[e].next_in_sel {
                if self.edges[e].curr.x > self.edges[next].curr.x {
                    let mut pt = intersect_point(&self.edges[e], &self.edges[next]);
                    if pt.y < top_y {
                        pt = Point::new(self.edges[e].top_x(top_y), top_y);
                    }
                    self.intersections.push(IntersectNode { e1: e, e2: next, pt });
                    self.swap_positions(List::Sorted, e, next);
                    modified = true;
                } else {
                    e = next;
                }
            }
            // The last edge is in its final place, so drop it from the sort.
            match self.edges[e].prev_in_sel {
                Some(prev) => self.edges[prev].next_in_sel = None,
                None => break,
            }
        }
        self.sorted = None;
    }

    fn edges_adjacent(&self, node: &IntersectNode) -> bool {
        let e1 = &self.edges[node.e1];
        e1.next_in_sel == Some(node.e2) || e1.prev_in_sel == Some(node.e2)
    }

    /// Reorders the intersections so that each one is between edges that
    /// will be adjacent when it gets processed. Returns false if that isn't
    /// possible.
    fn fixup_intersection_order(&mut self) -> bool {
        // Stable, so that crossings at the same height stay in the order they were found.
        self.intersections.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));
        self.copy_ael_to_sel();
        let count = self.intersections.len();
        for i in 0..count {
            if !self.edges_adjacent(&self.intersections[i]) {
                let Some(j) = (i + 1..count).find(|&j| self.edges_adjacent(&self.intersections[j]))
                else {
                    return false;
                };
                self.intersections.swap(i, j);
            }
            let IntersectNode { e1, e2, .. } = self.intersections[i];
            self.swap_positions(List::Sorted, e1, e2);
        }
        true
    }

    fn process_intersect_list(&mut self) {
        let nodes = std::mem::take(&mut self.intersections);
        for node in &nodes {
            let mut pt = node.pt;
            self.intersect_edges(node.e1, node.e2, &mut pt);
            self.swap_positions_in_ael(node.e1, node.e2);
        }
        self.intersections = nodes;
    }

    /// Updates winding counts and output where `e1` crosses `e2` at `pt`.
    ///
    /// `e1` must be the edge that's to the left below the crossing (and so to
    /// the right above it). `pt` might get its `z` filled in.
    pub(super) fn intersect_edges(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: &mut Point) {
        let e1_contributing = self.edges[e1].out_idx.is_some();
        let e2_contributing = self.edges[e2].out_idx.is_some();
        self.set_z(pt, e1, e2);
        let pt = *pt;

        let (d1, d2) = (self.edges[e1].wind_delta, self.edges[e2].wind_delta);
        if d1 == 0 || d2 == 0 {
            self.intersect_open(e1, e2, pt, e1_contributing, e2_contributing);
            return;
        }

        let (t1, t2) = (self.edges[e1].poly_type, self.edges[e2].poly_type);
        let even_odd = |t: PolyType| self.fill_rules(t).0 == FillRule::EvenOdd;
        let (e1_even_odd, e2_even_odd) = (even_odd(t1), even_odd(t2));
        if t1 == t2 {
            if e1_even_odd {
                let (a, b) = (self.edges[e1].wind_cnt, self.edges[e2].wind_cnt);
                self.edges[e1].wind_cnt = b;
                self.edges[e2].wind_cnt = a;
            } else {
                let edge1 = &mut self.edges[e1];
                if edge1.wind_cnt + d2 == 0 {
                    edge1.wind_cnt = -edge1.wind_cnt;
                } else {
                    edge1.wind_cnt += d2;
                }
                let edge2 = &mut self.edges[e2];
                if edge2.wind_cnt - d1 == 0 {
                    edge2.wind_cnt = -edge2.wind_cnt;
                } else {
                    edge2.wind_cnt -= d1;
                }
            }
        } else {
            let toggle = |w: i32| if w == 0 { 1 } else { 0 };
            let edge1 = &mut self.edges[e1];
            edge1.wind_cnt2 = if e2_even_odd {
                toggle(edge1.wind_cnt2)
            } else {
                edge1.wind_cnt2 + d2
            };
            let edge2 = &mut self.edges[e2];
            edge2.wind_cnt2 = if e1_even_odd {
                toggle(edge2.wind_cnt2)
            } else {
                edge2.wind_cnt2 - d1
            };
        }

        let e1_wc = self.effective_count(e1);
        let e2_wc = self.effective_count(e2);
        let unit = |w: i32| w == 0 || w == 1;

        if e1_contributing && e2_contributing {
            if !unit(e1_wc) || !unit(e2_wc) || (t1 != t2 && self.op != BinaryOp::Xor) {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_out_idxs(e1, e2);
            }
        } else if e1_contributing {
            if unit(e2_wc) {
                self.add_out_pt(e1, pt);
                self.swap_sides(e1, e2);
                self.swap_out_idxs(e1, e2);
            }
        } else if e2_contributing {
            if unit(e1_wc) {
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_out_idxs(e1, e2);
            }
        } else if unit(e1_wc) && unit(e2_wc) {
            // Neither edge is contributing, but they might start a new contour here.
            let e1_wc2 = self.effective_count2(e1);
            let e2_wc2 = self.effective_count2(e2);
            if t1 != t2 {
                self.add_local_min_poly(e1, e2, pt);
            } else if e1_wc == 1 && e2_wc == 1 {
                let starts = match self.op {
                    BinaryOp::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
                    BinaryOp::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                    BinaryOp::Difference => match t1 {
                        PolyType::Clip => e1_wc2 > 0 && e2_wc2 > 0,
                        PolyType::Subject => e1_wc2 <= 0 && e2_wc2 <= 0,
                    },
                    BinaryOp::Xor => true,
                };
                if starts {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
    }

    // Crossings involving at least one open path. These never change winding
    // counts; they only start or stop the open path's output.
    fn intersect_open(
        &mut self,
        e1: EdgeIdx,
        e2: EdgeIdx,
        pt: Point,
        e1_contributing: bool,
        e2_contributing: bool,
    ) {
        let Edge {
            wind_delta: d1,
            wind_cnt: w1,
            wind_cnt2: w1_other,
            poly_type: t1,
            ..
        } = self.edges[e1];
        let Edge {
            wind_delta: d2,
            wind_cnt: w2,
            wind_cnt2: w2_other,
            poly_type: t2,
            ..
        } = self.edges[e2];
        if d1 == 0 && d2 == 0 {
            return;
        }
        let union = self.op == BinaryOp::Union;
        if t1 == t2 && d1 != d2 && union {
            if d1 == 0 {
                if e2_contributing {
                    self.add_out_pt(e1, pt);
                    if e1_contributing {
                        self.edges[e1].out_idx = None;
                    }
                }
            } else if e1_contributing {
                self.add_out_pt(e2, pt);
                if e2_contributing {
                    self.edges[e2].out_idx = None;
                }
            }
        } else if t1 != t2 {
            if d1 == 0 && w2.abs() == 1 && (!union || w2_other == 0) {
                self.add_out_pt(e1, pt);
                if e1_contributing {
                    self.edges[e1].out_idx = None;
                }
            } else if d2 == 0 && w1.abs() == 1 && (!union || w1_other == 0) {
                self.add_out_pt(e2, pt);
                if e2_contributing {
                    self.edges[e2].out_idx = None;
                }
            }
        }
    }

    fn swap_sides(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let (s1, s2) = (self.edges[e1].side, self.edges[e2].side);
        self.edges[e1].side = s2;
        self.edges[e2].side = s1;
    }

    fn swap_out_idxs(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let (i1, i2) = (self.edges[e1].out_idx, self.edges[e2].out_idx);
        self.edges[e1].out_idx = i2;
        self.edges[e2].out_idx = i1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        edges::Edges,
        geom::{area, tests::p},
        Clipper,
    };

    fn edge_between(a: Point, b: Point) -> Edge {
        // Build a throwaway triangle so that the edge gets its slope set up.
        let mut edges = Edges::default();
        // Off the line through `a` and `b`, otherwise the edge gets merged away.
        let third = Point::new(a.x.min(b.x) - 100, a.y.max(b.y) + 37);
        edges
            .add_path(&[a, b, third], PolyType::Subject, true, false)
            .unwrap();
        let edge = edges
            .edges
            .iter()
            .map(|(_, e)| e.clone())
            .find(|e| (e.bot == a && e.top == b) || (e.bot == b && e.top == a));
        edge.unwrap()
    }

    #[test]
    fn crossing_point() {
        let mut e1 = edge_between(p(0, 10), p(10, 0));
        let mut e2 = edge_between(p(10, 10), p(0, 0));
        e1.curr = e1.bot;
        e2.curr = e2.bot;
        assert_eq!(intersect_point(&e1, &e2), p(5, 5));

        // A vertical edge.
        let mut v = edge_between(p(4, 10), p(4, 0));
        v.curr = v.bot;
        assert_eq!(intersect_point(&v, &e2), p(4, 4));
        assert_eq!(intersect_point(&e2, &v), p(4, 4));
    }

    #[test]
    fn crossing_point_is_clamped() {
        // These lines would meet above the top of `e1`.
        let mut e1 = edge_between(p(0, 10), p(1, 5));
        let mut e2 = edge_between(p(10, 10), p(9, 5));
        e1.curr = e1.bot;
        e2.curr = e2.bot;
        let ip = intersect_point(&e1, &e2);
        assert_eq!(ip.y, 5);
    }

    #[test]
    fn bowtie_crossing() {
        // A self-intersecting quadrilateral: the sweep has to find the crossing.
        let mut clipper = Clipper::default();
        clipper
            .add_path(&[p(0, 0), p(10, 10), p(10, 0), p(0, 10)], PolyType::Subject, true)
            .unwrap();
        let out = clipper
            .execute(BinaryOp::Union, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert_eq!(out.len(), 2);
        for path in &out {
            assert_eq!(path.len(), 3);
            assert_eq!(area(path), 25.0);
            assert!(path.contains(&p(5, 5)));
        }
    }

    #[test]
    fn many_crossings() {
        // A star-ish polygon whose edges cross each other several times in one scanbeam.
        let mut clipper = Clipper::default();
        let star = vec![p(0, 0), p(30, 20), p(0, 20), p(30, 0), p(15, 30)];
        clipper.add_path(&star, PolyType::Subject, true).unwrap();
        let union = clipper
            .execute(BinaryOp::Union, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        let even_odd = clipper
            .execute(BinaryOp::Union, FillRule::EvenOdd, FillRule::EvenOdd)
            .unwrap();
        let total = |paths: &Vec<Vec<Point>>| paths.iter().map(|p| area(p)).sum::<f64>();
        assert!(total(&union) > 0.0);
        assert!(total(&even_odd) > 0.0);
        assert!(total(&even_odd) <= total(&union));
    }
}
