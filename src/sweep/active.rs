//! Maintaining the active edge list (AEL) and the sorted edge list (SEL).
//!
//! Both lists are intrusive: the links live in the edges themselves.

use super::Sweep;
use crate::{
    edges::{Edge, EdgeIdx, EdgeVec},
    Error,
};

/// Which of the two intrusive lists we're talking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum List {
    Active,
    Sorted,
}

impl List {
    fn next(self, edges: &EdgeVec<Edge>, e: EdgeIdx) -> Option<EdgeIdx> {
        match self {
            List::Active => edges[e].next_in_ael,
            List::Sorted => edges[e].next_in_sel,
        }
    }

    fn prev(self, edges: &EdgeVec<Edge>, e: EdgeIdx) -> Option<EdgeIdx> {
        match self {
            List::Active => edges[e].prev_in_ael,
            List::Sorted => edges[e].prev_in_sel,
        }
    }

    fn set_next(self, edges: &mut EdgeVec<Edge>, e: EdgeIdx, next: Option<EdgeIdx>) {
        match self {
            List::Active => edges[e].next_in_ael = next,
            List::Sorted => edges[e].next_in_sel = next,
        }
    }

    fn set_prev(self, edges: &mut EdgeVec<Edge>, e: EdgeIdx, prev: Option<EdgeIdx>) {
        match self {
            List::Active => edges[e].prev_in_ael = prev,
            List::Sorted => edges[e].prev_in_sel = prev,
        }
    }
}

/// Should `e2` go before `e1` in the AEL, assuming that they're both starting
/// at the current sweep line?
fn e2_inserts_before_e1(e1: &Edge, e2: &Edge) -> bool {
    if e2.curr.x == e1.curr.x {
        if e2.top.y > e1.top.y {
            e2.top.x < e1.top_x(e2.top.y)
        } else {
            e1.top.x > e2.top_x(e1.top.y)
        }
    } else {
        e2.curr.x < e1.curr.x
    }
}

impl Sweep<'_> {
    fn head_mut(&mut self, list: List) -> &mut Option<EdgeIdx> {
        match list {
            List::Active => &mut self.active,
            List::Sorted => &mut self.sorted,
        }
    }

    /// Inserts `edge` into the AEL, searching for its position starting from `start`.
    pub(super) fn insert_edge_into_ael(&mut self, edge: EdgeIdx, start: Option<EdgeIdx>) {
        let Some(head) = self.active else {
            self.edges[edge].prev_in_ael = None;
            self.edges[edge].next_in_ael = None;
            self.active = Some(edge);
            return;
        };
        if start.is_none() && e2_inserts_before_e1(&self.edges[head], &self.edges[edge]) {
            self.edges[edge].prev_in_ael = None;
            self.edges[edge].next_in_ael = Some(head);
            self.edges[head].prev_in_ael = Some(edge);
            self.active = Some(edge);
            return;
        }

        let mut start = start.unwrap_or(head);
        while let Some(next) = self.edges[start].next_in_ael {
            if e2_inserts_before_e1(&self.edges[next], &self.edges[edge]) {
                break;
            }
            start = next;
        }
        let next = self.edges[start].next_in_ael;
        self.edges[edge].next_in_ael = next;
        if let Some(next) = next {
            self.edges[next].prev_in_ael = Some(edge);
        }
        self.edges[edge].prev_in_ael = Some(start);
        self.edges[start].next_in_ael = Some(edge);
    }

    fn delete_from(&mut self, list: List, e: EdgeIdx) {
        let prev = list.prev(self.edges, e);
        let next = list.next(self.edges, e);
        if prev.is_none() && next.is_none() && *self.head_mut(list) != Some(e) {
            // Already deleted.
            return;
        }
        match prev {
            Some(p) => list.set_next(self.edges, p, next),
            None => *self.head_mut(list) = next,
        }
        if let Some(n) = next {
            list.set_prev(self.edges, n, prev);
        }
        list.set_next(self.edges, e, None);
        list.set_prev(self.edges, e, None);
    }

    pub(super) fn delete_from_ael(&mut self, e: EdgeIdx) {
        self.delete_from(List::Active, e);
    }

    /// Swaps two edges in one of the lists. They don't need to be adjacent.
    pub(super) fn swap_positions(&mut self, list: List, e1: EdgeIdx, e2: EdgeIdx) {
        let edges = &mut *self.edges;
        let (n1, p1) = (list.next(edges, e1), list.prev(edges, e1));
        let (n2, p2) = (list.next(edges, e2), list.prev(edges, e2));

        // Check that neither edge has already been removed.
        match list {
            List::Active => {
                if n1 == p1 || n2 == p2 {
                    return;
                }
            }
            List::Sorted => {
                if (n1.is_none() && p1.is_none()) || (n2.is_none() && p2.is_none()) {
                    return;
                }
            }
        }

        if n1 == Some(e2) {
            if let Some(next) = n2 {
                list.set_prev(edges, next, Some(e1));
            }
            if let Some(prev) = p1 {
                list.set_next(edges, prev, Some(e2));
            }
            list.set_prev(edges, e2, p1);
            list.set_next(edges, e2, Some(e1));
            list.set_prev(edges, e1, Some(e2));
            list.set_next(edges, e1, n2);
        } else if n2 == Some(e1) {
            if let Some(next) = n1 {
                list.set_prev(edges, next, Some(e2));
            }
            if let Some(prev) = p2 {
                list.set_next(edges, prev, Some(e1));
            }
            list.set_prev(edges, e1, p2);
            list.set_next(edges, e1, Some(e2));
            list.set_prev(edges, e2, Some(e1));
            list.set_next(edges, e2, n1);
        } else {
            list.set_next(edges, e1, n2);
            if let Some(next) = n2 {
                list.set_prev(edges, next, Some(e1));
            }
            list.set_prev(edges, e1, p2);
            if let Some(prev) = p2 {
                list.set_next(edges, prev, Some(e1));
            }
            list.set_next(edges, e2, n1);
            if let Some(next) = n1 {
                list.set_prev(edges, next, Some(e2));
            }
            list.set_prev(edges, e2, p1);
            if let Some(prev) = p1 {
                list.set_next(edges, prev, Some(e2));
            }
        }

        if list.prev(self.edges, e1).is_none() {
            *self.head_mut(list) = Some(e1);
        } else if list.prev(self.edges, e2).is_none() {
            *self.head_mut(list) = Some(e2);
        }
    }

    pub(super) fn swap_positions_in_ael(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        self.swap_positions(List::Active, e1, e2);
    }

    /// Pushes `e` onto the front of the SEL.
    pub(super) fn add_edge_to_sel(&mut self, e: EdgeIdx) {
        self.edges[e].prev_in_sel = None;
        self.edges[e].next_in_sel = self.sorted;
        if let Some(head) = self.sorted {
            self.edges[head].prev_in_sel = Some(e);
        }
        self.sorted = Some(e);
    }

    /// Removes and returns the first edge of the SEL.
    pub(super) fn pop_sel(&mut self) -> Option<EdgeIdx> {
        let e = self.sorted?;
        self.sorted = self.edges[e].next_in_sel;
        if let Some(head) = self.sorted {
            self.edges[head].prev_in_sel = None;
        }
        self.edges[e].next_in_sel = None;
        self.edges[e].prev_in_sel = None;
        Some(e)
    }

    /// Makes the SEL a copy of the AEL.
    pub(super) fn copy_ael_to_sel(&mut self) {
        self.sorted = self.active;
        let mut e = self.active;
        while let Some(idx) = e {
            let edge = &mut self.edges[idx];
            edge.prev_in_sel = edge.prev_in_ael;
            edge.next_in_sel = edge.next_in_ael;
            e = edge.next_in_ael;
        }
    }

    /// Replaces `e` in the AEL by the next edge in its bound, returning that edge.
    pub(super) fn update_edge_into_ael(&mut self, e: EdgeIdx) -> Result<EdgeIdx, Error> {
        let Some(next) = self.edges[e].next_in_lml else {
            return Err(Error::Invariant("advancing an edge with no next segment"));
        };
        let Edge {
            out_idx,
            side,
            wind_delta,
            wind_cnt,
            wind_cnt2,
            prev_in_ael,
            next_in_ael,
            ..
        } = self.edges[e];

        match prev_in_ael {
            Some(p) => self.edges[p].next_in_ael = Some(next),
            None => self.active = Some(next),
        }
        if let Some(n) = next_in_ael {
            self.edges[n].prev_in_ael = Some(next);
        }

        let edge = &mut self.edges[next];
        edge.out_idx = out_idx;
        edge.side = side;
        edge.wind_delta = wind_delta;
        edge.wind_cnt = wind_cnt;
        edge.wind_cnt2 = wind_cnt2;
        edge.curr = edge.bot;
        edge.prev_in_ael = prev_in_ael;
        edge.next_in_ael = next_in_ael;
        if !edge.is_horizontal() {
            let y = edge.top.y;
            self.scanbeam.insert(y);
        }
        tracing::trace!(from = ?e, to = ?next, "advanced edge");
        Ok(next)
    }
}
