//! The two ends of a scanbeam: starting new bounds at the bottom, and
//! finishing or advancing edges at the top.

use super::Sweep;
use crate::{
    edges::EdgeIdx,
    geom::{horz_segments_overlap, slopes_equal4},
    output::OutPtIdx,
    Error,
};

impl Sweep<'_> {
    /// Activates the bounds of all local minima at height `bot_y`.
    pub(super) fn insert_local_minima_into_ael(&mut self, bot_y: i64) -> Result<(), Error> {
        while let Some(lm) = self.pop_local_minima(bot_y) {
            let (lb, rb) = (lm.left_bound, lm.right_bound);
            let op1 = match (lb, rb) {
                (None, Some(rb)) => {
                    self.insert_edge_into_ael(rb, None);
                    self.set_winding_count(rb);
                    self.is_contributing(rb).then(|| {
                        let bot = self.edges[rb].bot;
                        self.add_out_pt(rb, bot)
                    })
                }
                (Some(lb), None) => {
                    self.insert_edge_into_ael(lb, None);
                    self.set_winding_count(lb);
                    let op = self.is_contributing(lb).then(|| {
                        let bot = self.edges[lb].bot;
                        self.add_out_pt(lb, bot)
                    });
                    self.scanbeam.insert(self.edges[lb].top.y);
                    op
                }
                (Some(lb), Some(rb)) => {
                    self.insert_edge_into_ael(lb, None);
                    self.insert_edge_into_ael(rb, Some(lb));
                    self.set_winding_count(lb);
                    self.edges[rb].wind_cnt = self.edges[lb].wind_cnt;
                    self.edges[rb].wind_cnt2 = self.edges[lb].wind_cnt2;
                    let op = self.is_contributing(lb).then(|| {
                        let bot = self.edges[lb].bot;
                        self.add_local_min_poly(lb, rb, bot)
                    });
                    self.scanbeam.insert(self.edges[lb].top.y);
                    op
                }
                (None, None) => continue,
            };

            if let Some(rb) = rb {
                if self.edges[rb].is_horizontal() {
                    if let Some(next) = self.edges[rb].next_in_lml {
                        self.scanbeam.insert(self.edges[next].top.y);
                    }
                    self.add_edge_to_sel(rb);
                } else {
                    self.scanbeam.insert(self.edges[rb].top.y);
                }
            }

            let (Some(lb), Some(rb)) = (lb, rb) else {
                continue;
            };

            // A horizontal right bound that overlaps an output horizontal from
            // earlier in this scanbeam shares an edge with it.
            if let Some(op1) = op1 {
                let r = &self.edges[rb];
                if r.is_horizontal() && r.wind_delta != 0 {
                    let (bot_x, top_x) = (r.bot.x, r.top.x);
                    for i in 0..self.ghost_joins.len() {
                        let gj = self.ghost_joins[i];
                        let x = self.out.pts[gj.out_pt].pt.x;
                        if horz_segments_overlap(x, gj.off_pt.x, bot_x, top_x) {
                            self.add_join(gj.out_pt, op1, gj.off_pt);
                        }
                    }
                }
            }

            if let (Some(op1), Some(prev)) = (op1, self.edges[lb].prev_in_ael) {
                let (l, p) = (&self.edges[lb], &self.edges[prev]);
                if l.out_idx.is_some()
                    && p.curr.x == l.bot.x
                    && p.out_idx.is_some()
                    && slopes_equal4(p.curr, p.top, l.curr, l.top)
                    && l.wind_delta != 0
                    && p.wind_delta != 0
                {
                    let (bot, top) = (l.bot, l.top);
                    let op2 = self.add_out_pt(prev, bot);
                    self.add_join(op1, op2, top);
                }
            }

            if self.edges[lb].next_in_ael != Some(rb) {
                if let (Some(op1), Some(prev)) = (op1, self.edges[rb].prev_in_ael) {
                    let (r, p) = (&self.edges[rb], &self.edges[prev]);
                    if r.out_idx.is_some()
                        && p.out_idx.is_some()
                        && slopes_equal4(p.curr, p.top, r.curr, r.top)
                        && r.wind_delta != 0
                        && p.wind_delta != 0
                    {
                        let (bot, top) = (r.bot, r.top);
                        let op2 = self.add_out_pt(prev, bot);
                        self.add_join(op1, op2, top);
                    }
                }

                // The right bound starts to the right of some edges that are
                // to its left above the minimum, so it crosses them here.
                let mut e = self.edges[lb].next_in_ael;
                while let Some(ei) = e {
                    if ei == rb {
                        break;
                    }
                    let mut pt = self.edges[lb].curr;
                    self.intersect_edges(rb, ei, &mut pt);
                    self.edges[lb].curr = pt;
                    e = self.edges[ei].next_in_ael;
                }
            }
        }
        Ok(())
    }

    /// Handles everything that happens at the top of a scanbeam: bounds that
    /// end there, edges that give way to the next edge in their bound, and
    /// horizontal edges.
    pub(super) fn process_edges_at_top_of_scanbeam(&mut self, top_y: i64) -> Result<(), Error> {
        let mut e = self.active;
        while let Some(mut ei) = e {
            // Maxima are treated like bent horizontals, unless they really
            // are horizontal: those get processed with the other horizontals.
            let mut is_maxima = self.edges[ei].is_maxima(top_y);
            if is_maxima {
                if let Some(pair) = self.edges.maxima_pair_ex(ei) {
                    is_maxima = !self.edges[pair].is_horizontal();
                }
            }

            if is_maxima {
                if self.options.strictly_simple {
                    self.maxima.insert(self.edges[ei].top.x);
                }
                let prev = self.edges[ei].prev_in_ael;
                self.do_maxima(ei)?;
                e = match prev {
                    Some(p) => self.edges[p].next_in_ael,
                    None => self.active,
                };
                continue;
            }

            let next_is_horizontal = self.edges[ei]
                .next_in_lml
                .is_some_and(|n| self.edges[n].is_horizontal());
            if self.edges[ei].is_intermediate(top_y) && next_is_horizontal {
                ei = self.update_edge_into_ael(ei)?;
                if self.edges[ei].out_idx.is_some() {
                    let bot = self.edges[ei].bot;
                    self.add_out_pt(ei, bot);
                }
                self.add_edge_to_sel(ei);
            } else {
                let edge = &mut self.edges[ei];
                edge.curr.x = edge.top_x(top_y);
                edge.curr.y = top_y;
                edge.curr.z = if edge.top.y == top_y {
                    edge.top.z
                } else if edge.bot.y == top_y {
                    edge.bot.z
                } else {
                    0
                };
            }

            // In strictly simple mode, output edges that touch get a vertex each.
            if self.options.strictly_simple {
                if let Some(prev) = self.edges[ei].prev_in_ael {
                    let (c, p) = (&self.edges[ei], &self.edges[prev]);
                    if c.out_idx.is_some()
                        && c.wind_delta != 0
                        && p.out_idx.is_some()
                        && p.curr.x == c.curr.x
                        && p.wind_delta != 0
                    {
                        let mut ip = c.curr;
                        self.set_z(&mut ip, prev, ei);
                        let op = self.add_out_pt(prev, ip);
                        let op2 = self.add_out_pt(ei, ip);
                        self.add_join(op, op2, ip);
                    }
                }
            }
            e = self.edges[ei].next_in_ael;
        }

        self.process_horizontals()?;
        self.maxima.clear();

        // Advance the edges whose bounds continue above this scanbeam.
        let mut e = self.active;
        while let Some(mut ei) = e {
            if self.edges[ei].is_intermediate(top_y) {
                let op = self.edges[ei].out_idx.map(|_| {
                    let top = self.edges[ei].top;
                    self.add_out_pt(ei, top)
                });
                ei = self.update_edge_into_ael(ei)?;
                if let Some(op) = op {
                    self.join_continuing_edge(ei, op);
                }
            }
            e = self.edges[ei].next_in_ael;
        }
        Ok(())
    }

    /// Is `other` an output edge that runs along the same line as `e`,
    /// starting from `e.bot`?
    fn overlaps_output_edge(&self, e: EdgeIdx, other: EdgeIdx) -> bool {
        let (e, o) = (&self.edges[e], &self.edges[other]);
        o.curr == e.bot
            && o.out_idx.is_some()
            && o.curr.y > o.top.y
            && e.wind_delta != 0
            && o.wind_delta != 0
            && slopes_equal4(e.curr, e.top, o.curr, o.top)
    }

    /// `e` has just replaced the previous edge of its bound, and `op` is the
    /// output point where they meet. If a neighboring output edge runs along
    /// `e`, the two contours share an edge and need joining.
    pub(super) fn join_continuing_edge(&mut self, e: EdgeIdx, op: OutPtIdx) {
        let neighbor = [self.edges[e].prev_in_ael, self.edges[e].next_in_ael]
            .into_iter()
            .flatten()
            .find(|&n| self.overlaps_output_edge(e, n));
        if let Some(n) = neighbor {
            let (bot, top) = (self.edges[e].bot, self.edges[e].top);
            let op2 = self.add_out_pt(n, bot);
            self.add_join(op, op2, top);
        }
    }

    /// Finishes a bound that ends at the top of this scanbeam.
    ///
    /// If the bound ends at a local maximum, the edge ending the other bound
    /// at that maximum is found, and everything between the two crosses them
    /// both first.
    fn do_maxima(&mut self, e: EdgeIdx) -> Result<(), Error> {
        let Some(pair) = self.edges.maxima_pair_ex(e) else {
            if self.edges[e].out_idx.is_some() {
                let top = self.edges[e].top;
                self.add_out_pt(e, top);
            }
            self.delete_from_ael(e);
            return Ok(());
        };

        let mut next = self.edges[e].next_in_ael;
        while let Some(n) = next {
            if n == pair {
                break;
            }
            let mut top = self.edges[e].top;
            self.intersect_edges(e, n, &mut top);
            self.edges[e].top = top;
            self.swap_positions_in_ael(e, n);
            next = self.edges[e].next_in_ael;
        }

        let top = self.edges[e].top;
        match (self.edges[e].out_idx, self.edges[pair].out_idx) {
            (None, None) => {}
            (Some(_), Some(_)) => self.add_local_max_poly(e, pair, top),
            _ if self.edges[e].wind_delta == 0 => {
                for edge in [e, pair] {
                    if self.edges[edge].out_idx.is_some() {
                        self.add_out_pt(edge, top);
                        self.edges[edge].out_idx = None;
                    }
                }
            }
            _ => return Err(Error::Invariant("maxima with only one contributing edge")),
        }
        self.delete_from_ael(e);
        self.delete_from_ael(pair);
        Ok(())
    }
}
