//! Horizontal edges.
//!
//! A horizontal edge doesn't cross the sweep line; it lies on it. So instead
//! of being handled by the scanbeam machinery, each horizontal edge gets
//! "swept" along its length as soon as the sweep reaches its `y` coordinate,
//! crossing every active edge between its two ends.

use super::Sweep;
use crate::{
    edges::{Edge, EdgeIdx},
    geom::{horz_segments_overlap, Point},
    output::OutPtIdx,
    Error,
};

/// The direction of a horizontal edge (true if it goes left to right), and
/// its left and right ends.
fn direction(e: &Edge) -> (bool, i64, i64) {
    if e.bot.x < e.top.x {
        (true, e.bot.x, e.top.x)
    } else {
        (false, e.top.x, e.bot.x)
    }
}

impl Sweep<'_> {
    /// Processes all the horizontal edges that are waiting in the SEL.
    pub(super) fn process_horizontals(&mut self) -> Result<(), Error> {
        while let Some(horz) = self.pop_sel() {
            self.process_horizontal(horz)?;
        }
        Ok(())
    }

    fn next_in_direction(&self, e: EdgeIdx, left_to_right: bool) -> Option<EdgeIdx> {
        if left_to_right {
            self.edges[e].next_in_ael
        } else {
            self.edges[e].prev_in_ael
        }
    }

    /// Joins `op` with any pending horizontal output edge that overlaps `horz`.
    fn join_overlapping_horizontals(&mut self, horz: EdgeIdx, op: OutPtIdx) {
        let (bot_x, top_x) = (self.edges[horz].bot.x, self.edges[horz].top.x);
        let mut h = self.sorted;
        while let Some(idx) = h {
            let other = &self.edges[idx];
            if other.out_idx.is_some()
                && horz_segments_overlap(bot_x, top_x, other.bot.x, other.top.x)
            {
                let off = other.top;
                if let Some(op2) = self.last_out_pt(idx) {
                    self.add_join(op2, op, off);
                }
            }
            h = self.edges[idx].next_in_sel;
        }
    }

    /// Sweeps along a horizontal edge (and any horizontals that immediately
    /// follow it in its bound).
    fn process_horizontal(&mut self, mut horz: EdgeIdx) -> Result<(), Error> {
        let is_open = self.edges[horz].wind_delta == 0;
        let (mut left_to_right, mut horz_left, mut horz_right) = direction(&self.edges[horz]);

        let mut last_horz = horz;
        while let Some(next) = self.edges[last_horz].next_in_lml {
            if !self.edges[next].is_horizontal() {
                break;
            }
            last_horz = next;
        }
        let max_pair = if self.edges[last_horz].next_in_lml.is_none() {
            self.edges.maxima_pair(last_horz)
        } else {
            None
        };

        let mut curr_max = self
            .maxima
            .first_between(self.edges[horz].bot.x, self.edges[last_horz].top.x);

        let mut op1 = None;
        loop {
            let is_last_horz = horz == last_horz;
            let mut e = self.next_in_direction(horz, left_to_right);
            while let Some(ei) = e {
                let e_x = self.edges[ei].curr.x;

                // Give the output a vertex wherever a maximum touches this horizontal.
                while let Some(x) = curr_max.and_then(|i| self.maxima.get(i)) {
                    if (left_to_right && x >= e_x) || (!left_to_right && x <= e_x) {
                        break;
                    }
                    if self.edges[horz].out_idx.is_some() && !is_open {
                        let y = self.edges[horz].bot.y;
                        self.add_out_pt(horz, Point::new(x, y));
                    }
                    curr_max = if left_to_right {
                        curr_max.map(|i| i + 1)
                    } else {
                        curr_max.and_then(|i| i.checked_sub(1))
                    };
                }

                if (left_to_right && e_x > horz_right) || (!left_to_right && e_x < horz_left) {
                    break;
                }
                // At the end of an intermediate horizontal, edges that will be
                // to the right of the next edge above the horizontal stay put.
                let h = &self.edges[horz];
                if e_x == h.top.x {
                    if let Some(next) = h.next_in_lml {
                        if self.edges[ei].dx < self.edges[next].dx {
                            break;
                        }
                    }
                }

                if self.edges[horz].out_idx.is_some() && !is_open {
                    let mut curr = self.edges[ei].curr;
                    if left_to_right {
                        self.set_z(&mut curr, horz, ei);
                    } else {
                        self.set_z(&mut curr, ei, horz);
                    }
                    self.edges[ei].curr = curr;
                    let op = self.add_out_pt(horz, curr);
                    op1 = Some(op);
                    self.join_overlapping_horizontals(horz, op);
                    let bot = self.edges[horz].bot;
                    self.add_ghost_join(op, bot);
                }

                if Some(ei) == max_pair && is_last_horz {
                    if self.edges[horz].out_idx.is_some() {
                        let top = self.edges[horz].top;
                        self.add_local_max_poly(horz, ei, top);
                    }
                    self.delete_from_ael(horz);
                    self.delete_from_ael(ei);
                    return Ok(());
                }

                let mut pt = Point::new(e_x, self.edges[horz].curr.y);
                if left_to_right {
                    self.intersect_edges(horz, ei, &mut pt);
                } else {
                    self.intersect_edges(ei, horz, &mut pt);
                }
                let next = self.next_in_direction(ei, left_to_right);
                self.swap_positions_in_ael(horz, ei);
                e = next;
            }

            match self.edges[horz].next_in_lml {
                Some(next) if self.edges[next].is_horizontal() => {}
                _ => break,
            }
            horz = self.update_edge_into_ael(horz)?;
            if self.edges[horz].out_idx.is_some() {
                let bot = self.edges[horz].bot;
                self.add_out_pt(horz, bot);
            }
            (left_to_right, horz_left, horz_right) = direction(&self.edges[horz]);
        }

        // An output horizontal that didn't cross anything can still be
        // overlapped by other horizontals.
        if self.edges[horz].out_idx.is_some() && op1.is_none() {
            if let Some(op) = self.last_out_pt(horz) {
                self.join_overlapping_horizontals(horz, op);
                let top = self.edges[horz].top;
                self.add_ghost_join(op, top);
            }
        }

        if self.edges[horz].next_in_lml.is_none() {
            if self.edges[horz].out_idx.is_some() {
                let top = self.edges[horz].top;
                self.add_out_pt(horz, top);
            }
            self.delete_from_ael(horz);
            return Ok(());
        }

        if self.edges[horz].out_idx.is_none() {
            self.update_edge_into_ael(horz)?;
            return Ok(());
        }
        let top = self.edges[horz].top;
        let op1 = self.add_out_pt(horz, top);
        let horz = self.update_edge_into_ael(horz)?;
        if self.edges[horz].wind_delta == 0 {
            return Ok(());
        }
        self.join_continuing_edge(horz, op1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geom::{area, tests::p},
        BinaryOp, ClipOptions, Clipper, FillRule, PolyType,
    };

    fn union(paths: &[Vec<crate::Point>], options: ClipOptions) -> Vec<Vec<crate::Point>> {
        let mut clipper = Clipper::new(options);
        clipper.add_paths(paths, PolyType::Subject, true).unwrap();
        clipper
            .execute(BinaryOp::Union, FillRule::NonZero, FillRule::NonZero)
            .unwrap()
    }

    #[test]
    fn stacked_rectangles() {
        // Two rectangles sharing a horizontal edge become one.
        let out = union(
            &[
                vec![p(0, 0), p(0, 10), p(20, 10), p(20, 0)],
                vec![p(0, 10), p(0, 20), p(20, 20), p(20, 10)],
            ],
            ClipOptions::default(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 400.0);
        assert_eq!(out[0].len(), 4);
    }

    #[test]
    fn staircase() {
        // Consecutive horizontals in the same bound.
        let stairs = vec![
            p(0, 0),
            p(0, 30),
            p(30, 30),
            p(30, 20),
            p(20, 20),
            p(20, 10),
            p(10, 10),
            p(10, 0),
        ];
        let out = union(&[stairs], ClipOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 600.0);
        assert_eq!(out[0].len(), 8);
    }

    #[test]
    fn horizontal_crosses_edges() {
        // The bottom edge of the wide rectangle crosses both sides of the tall one.
        let tall = vec![p(10, 0), p(10, 30), p(20, 30), p(20, 0)];
        let wide = vec![p(0, 10), p(0, 20), p(30, 20), p(30, 10)];
        let out = union(&[tall.clone(), wide.clone()], ClipOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 500.0);
        assert_eq!(out[0].len(), 12);

        let mut clipper = Clipper::default();
        clipper.add_path(&tall, PolyType::Subject, true).unwrap();
        clipper.add_path(&wide, PolyType::Clip, true).unwrap();
        let out = clipper
            .execute(BinaryOp::Intersection, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 100.0);
    }

    #[test]
    fn maxima_touching_horizontal() {
        // A triangle whose apex touches the bottom edge of a rectangle. With
        // strictly simple output the rectangle gets a vertex at the apex.
        let tri = vec![p(10, 20), p(0, 30), p(20, 30)];
        let rect = vec![p(0, 0), p(0, 20), p(30, 20), p(30, 0)];
        let options = ClipOptions {
            strictly_simple: true,
            ..Default::default()
        };
        let out = union(&[tri, rect], options);
        let total: f64 = out.iter().map(|p| area(p)).sum();
        assert_eq!(total, 600.0 + 100.0);
        assert!(out.iter().any(|path| path.contains(&p(10, 20))));
    }
}
