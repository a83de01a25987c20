//! Winding numbers, and deciding which edges are on the output boundary.

use super::Sweep;
use crate::{edges::EdgeIdx, BinaryOp, FillRule, PolyType};

impl Sweep<'_> {
    /// Computes the winding counts for an edge that was just inserted into the AEL.
    ///
    /// `wind_cnt` comes from the nearest edge of the same polygon type to the
    /// left; `wind_cnt2` is accumulated from all the edges of the other type
    /// to the left.
    pub(super) fn set_winding_count(&mut self, edge: EdgeIdx) {
        let (own_fill, other_fill) = self.fill_rules(self.edges[edge].poly_type);
        let poly_type = self.edges[edge].poly_type;
        let wind_delta = self.edges[edge].wind_delta;

        let mut e = self.edges[edge].prev_in_ael;
        while let Some(idx) = e {
            if self.edges[idx].poly_type == poly_type && self.edges[idx].wind_delta != 0 {
                break;
            }
            e = self.edges[idx].prev_in_ael;
        }

        let mut cursor = match e {
            None => {
                self.edges[edge].wind_cnt = match (wind_delta, own_fill) {
                    (0, FillRule::Negative) => -1,
                    (0, _) => 1,
                    (d, _) => d,
                };
                self.edges[edge].wind_cnt2 = 0;
                self.active
            }
            Some(prev) if wind_delta == 0 && self.op != BinaryOp::Union => {
                self.edges[edge].wind_cnt = 1;
                self.edges[edge].wind_cnt2 = self.edges[prev].wind_cnt2;
                self.edges[prev].next_in_ael
            }
            Some(prev) if own_fill == FillRule::EvenOdd => {
                self.edges[edge].wind_cnt = if wind_delta == 0 {
                    // Open paths are inside if an odd number of closed
                    // edges of the same type are to their left.
                    let mut inside = true;
                    let mut e2 = self.edges[prev].prev_in_ael;
                    while let Some(idx) = e2 {
                        let other = &self.edges[idx];
                        if other.poly_type == poly_type && other.wind_delta != 0 {
                            inside = !inside;
                        }
                        e2 = self.edges[idx].prev_in_ael;
                    }
                    if inside {
                        0
                    } else {
                        1
                    }
                } else {
                    wind_delta
                };
                self.edges[edge].wind_cnt2 = self.edges[prev].wind_cnt2;
                self.edges[prev].next_in_ael
            }
            Some(prev) => {
                let p = &self.edges[prev];
                let cnt = if p.wind_cnt * p.wind_delta < 0 {
                    // The previous edge takes the count towards zero, so we're
                    // outside of its polygon.
                    if p.wind_cnt.abs() > 1 {
                        if p.wind_delta * wind_delta < 0 {
                            p.wind_cnt
                        } else {
                            p.wind_cnt + wind_delta
                        }
                    } else if wind_delta == 0 {
                        1
                    } else {
                        wind_delta
                    }
                } else if wind_delta == 0 {
                    if p.wind_cnt < 0 {
                        p.wind_cnt - 1
                    } else {
                        p.wind_cnt + 1
                    }
                } else if p.wind_delta * wind_delta < 0 {
                    p.wind_cnt
                } else {
                    p.wind_cnt + wind_delta
                };
                let cnt2 = p.wind_cnt2;
                self.edges[edge].wind_cnt = cnt;
                self.edges[edge].wind_cnt2 = cnt2;
                self.edges[prev].next_in_ael
            }
        };

        let even_odd = other_fill == FillRule::EvenOdd;
        while let Some(idx) = cursor {
            if idx == edge {
                break;
            }
            let delta = self.edges[idx].wind_delta;
            let cnt2 = &mut self.edges[edge].wind_cnt2;
            if even_odd {
                if delta != 0 {
                    *cnt2 = if *cnt2 == 0 { 1 } else { 0 };
                }
            } else {
                *cnt2 += delta;
            }
            cursor = self.edges[idx].next_in_ael;
        }
    }

    /// Does this edge separate a region that belongs in the output from one that doesn't?
    pub(super) fn is_contributing(&self, edge: EdgeIdx) -> bool {
        let e = &self.edges[edge];
        let (own_fill, other_fill) = self.fill_rules(e.poly_type);

        let own_ok = match own_fill {
            FillRule::EvenOdd => e.wind_delta != 0 || e.wind_cnt == 1,
            FillRule::NonZero => e.wind_cnt.abs() == 1,
            FillRule::Positive => e.wind_cnt == 1,
            FillRule::Negative => e.wind_cnt == -1,
        };
        if !own_ok {
            return false;
        }

        // Is the other polygon type filled on this edge's side?
        let inside_other = match other_fill {
            FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 != 0,
            FillRule::Positive => e.wind_cnt2 > 0,
            FillRule::Negative => e.wind_cnt2 < 0,
        };
        match self.op {
            BinaryOp::Intersection => inside_other,
            BinaryOp::Union => !inside_other,
            BinaryOp::Difference => match e.poly_type {
                PolyType::Subject => !inside_other,
                PolyType::Clip => inside_other,
            },
            BinaryOp::Xor => e.wind_delta != 0 || !inside_other,
        }
    }

    /// The winding count of `edge`'s own type, as seen by its fill rule.
    ///
    /// Positive means "inside" for every fill rule except `EvenOdd`, which
    /// only looks at the parity.
    pub(super) fn effective_count(&self, edge: EdgeIdx) -> i32 {
        let e = &self.edges[edge];
        self.effective(e.poly_type, e.wind_cnt)
    }

    /// Like [`effective_count`](Self::effective_count), but for the other polygon type's count.
    pub(super) fn effective_count2(&self, edge: EdgeIdx) -> i32 {
        let e = &self.edges[edge];
        self.effective(e.poly_type.other(), e.wind_cnt2)
    }

    fn effective(&self, poly_type: PolyType, w: i32) -> i32 {
        let (rule, _) = self.fill_rules(poly_type);
        match rule {
            FillRule::Positive => w,
            FillRule::Negative => -w,
            FillRule::EvenOdd | FillRule::NonZero => w.abs(),
        }
    }
}
