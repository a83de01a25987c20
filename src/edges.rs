//! Input edges, and the local minima that the sweep consumes.
//!
//! Every input polygon is broken into a ring of [`Edge`]s, and then the ring
//! is split into "bounds": maximal chains of edges that go monotonically up
//! from a local minimum to a local maximum. Each local minimum has a left and
//! a right bound (open paths can have minima with only one bound), and the
//! sweep activates both bounds when it reaches the minimum's `y` coordinate.

use crate::{
    geom::{inverse_slope, pt2_is_between_pt1_and_pt3, slopes_equal3, Point},
    output::OutRecIdx,
    Error, PolyType,
};

/// The value of [`Edge::dx`] for horizontal edges.
pub(crate) const HORIZONTAL: f64 = -1.0e40;

typed_vec!(
    /// An index into the edge arena.
    EdgeVec,
    EdgeIdx,
    "e"
);

/// Which side of its output contour an edge is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub(crate) enum Side {
    #[default]
    Left,
    Right,
}

/// A directed segment of an input contour.
///
/// Edges are stored with `bot.y >= top.y`, regardless of the direction of the
/// original contour.
#[derive(Clone, Debug, serde::Serialize)]
pub(crate) struct Edge {
    pub bot: Point,
    /// The point where this edge currently meets the sweep line. Before the
    /// edge is finished building, this holds the input vertex that starts it.
    pub curr: Point,
    pub top: Point,
    pub delta_x: i64,
    pub delta_y: i64,
    /// Inverse slope, or [`HORIZONTAL`].
    pub dx: f64,
    pub poly_type: PolyType,
    pub side: Side,
    /// +1 or -1 for closed contours, depending on the direction; 0 for open paths.
    pub wind_delta: i32,
    /// Winding count of the region to the right of this edge, for the edge's own polygon type.
    pub wind_cnt: i32,
    /// Winding count for the other polygon type.
    pub wind_cnt2: i32,
    pub out_idx: Option<OutRecIdx>,
    /// The closing edge of an open path, which isn't part of the input at all.
    pub skip: bool,

    pub next: EdgeIdx,
    pub prev: EdgeIdx,
    pub next_in_lml: Option<EdgeIdx>,
    pub next_in_ael: Option<EdgeIdx>,
    pub prev_in_ael: Option<EdgeIdx>,
    pub next_in_sel: Option<EdgeIdx>,
    pub prev_in_sel: Option<EdgeIdx>,
}

impl Edge {
    fn new(pt: Point, next: EdgeIdx, prev: EdgeIdx) -> Self {
        Edge {
            bot: Point::default(),
            curr: pt,
            top: Point::default(),
            delta_x: 0,
            delta_y: 0,
            dx: 0.0,
            poly_type: PolyType::Subject,
            side: Side::Left,
            wind_delta: 0,
            wind_cnt: 0,
            wind_cnt2: 0,
            out_idx: None,
            skip: false,
            next,
            prev,
            next_in_lml: None,
            next_in_ael: None,
            prev_in_ael: None,
            next_in_sel: None,
            prev_in_sel: None,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.delta_y == 0
    }

    /// The x coordinate of this edge at height `y`, rounded to the nearest integer.
    pub fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y {
            self.top.x
        } else {
            self.bot.x + (self.dx * (y - self.bot.y) as f64).round() as i64
        }
    }

    /// Is this edge the last one in its bound, ending at height `y`?
    pub fn is_maxima(&self, y: i64) -> bool {
        self.top.y == y && self.next_in_lml.is_none()
    }

    /// Does this edge end at height `y`, with another edge of its bound following it?
    pub fn is_intermediate(&self, y: i64) -> bool {
        self.top.y == y && self.next_in_lml.is_some()
    }

    pub fn is_in_ael(&self) -> bool {
        self.next_in_ael.is_some() || self.prev_in_ael.is_some()
    }

    fn set_dx(&mut self) {
        self.delta_x = self.top.x - self.bot.x;
        self.delta_y = self.top.y - self.bot.y;
        self.dx = inverse_slope(self.bot, self.top);
    }

    // Horizontal edges have no natural direction. We store them so that
    // `bot.x` is where the previous edge in their bound attaches.
    fn reverse_horizontal(&mut self) {
        std::mem::swap(&mut self.top.x, &mut self.bot.x);
        std::mem::swap(&mut self.top.z, &mut self.bot.z);
    }
}

impl EdgeVec<Edge> {
    /// The edge that ends at the same local maximum as `e`, if there is one.
    pub fn maxima_pair(&self, e: EdgeIdx) -> Option<EdgeIdx> {
        let edge = &self[e];
        let next = &self[edge.next];
        let prev = &self[edge.prev];
        if next.top == edge.top && next.next_in_lml.is_none() {
            Some(edge.next)
        } else if prev.top == edge.top && prev.next_in_lml.is_none() {
            Some(edge.prev)
        } else {
            None
        }
    }

    /// Like [`maxima_pair`](Self::maxima_pair), but only returns edges that
    /// are currently active.
    pub fn maxima_pair_ex(&self, e: EdgeIdx) -> Option<EdgeIdx> {
        self.maxima_pair(e).filter(|&pair| {
            let p = &self[pair];
            !p.skip && (p.is_in_ael() || p.is_horizontal())
        })
    }
}

/// A local minimum of an input contour, and the two bounds that rise from it.
#[derive(Clone, Debug, serde::Serialize)]
pub(crate) struct LocalMinima {
    pub y: i64,
    pub left_bound: Option<EdgeIdx>,
    pub right_bound: Option<EdgeIdx>,
}

/// All the edges that have been added to a clipper, organized into local minima.
#[derive(Clone, Debug, Default)]
pub(crate) struct Edges {
    pub edges: EdgeVec<Edge>,
    pub minima: Vec<LocalMinima>,
    pub has_open_paths: bool,
}

impl Edges {
    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.has_open_paths = false;
    }

    /// Adds a path, returning `false` if it was too degenerate to contribute anything.
    pub fn add_path(
        &mut self,
        path: &[Point],
        poly_type: PolyType,
        closed: bool,
        preserve_collinear: bool,
    ) -> Result<bool, Error> {
        if !closed && poly_type == PolyType::Clip {
            return Err(Error::OpenClipPath);
        }
        let Some(mut high) = path.len().checked_sub(1) else {
            return Ok(false);
        };
        if closed {
            while high > 0 && path[high] == path[0] {
                high -= 1;
            }
        }
        while high > 0 && path[high] == path[high - 1] {
            high -= 1;
        }
        if (closed && high < 2) || (!closed && high < 1) {
            return Ok(false);
        }
        if let Some(p) = path[..=high].iter().find(|p| !p.in_range()) {
            return Err(Error::CoordinateOutOfRange(*p));
        }

        let base = self.edges.len();
        let n = high + 1;
        for (i, &pt) in path[..n].iter().enumerate() {
            let next = EdgeIdx(base + (i + 1) % n);
            let prev = EdgeIdx(base + (i + n - 1) % n);
            self.edges.push(Edge::new(pt, next, prev));
        }

        let mut e_start = EdgeIdx(base);
        let mut e = e_start;
        let mut loop_stop = e_start;
        loop {
            let next = self.edges[e].next;
            // Open paths are allowed to start and end at the same point.
            if self.edges[e].curr == self.edges[next].curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                loop_stop = e;
                continue;
            }
            let prev = self.edges[e].prev;
            if prev == next {
                break;
            }
            let (pp, pe, pn) = (self.edges[prev].curr, self.edges[e].curr, self.edges[next].curr);
            if closed
                && slopes_equal3(pp, pe, pn)
                && (!preserve_collinear || !pt2_is_between_pt1_and_pt3(pp, pe, pn))
            {
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                e = self.edges[e].prev;
                loop_stop = e;
                continue;
            }
            e = next;
            if e == loop_stop || (!closed && self.edges[e].next == e_start) {
                break;
            }
        }

        if (!closed && e == self.edges[e].next)
            || (closed && self.edges[e].prev == self.edges[e].next)
        {
            self.edges.truncate(base);
            return Ok(false);
        }

        if !closed {
            self.has_open_paths = true;
            let p = self.edges[e_start].prev;
            self.edges[p].skip = true;
        }

        let mut is_flat = true;
        e = e_start;
        loop {
            self.init_edge2(e, poly_type);
            e = self.edges[e].next;
            if is_flat && self.edges[e].curr.y != self.edges[e_start].curr.y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        if is_flat {
            if closed {
                self.edges.truncate(base);
                return Ok(false);
            }
            self.add_flat_open_path(e);
            return Ok(true);
        }

        let mut e_min = None;
        let prev = self.edges[e].prev;
        if self.edges[prev].bot == self.edges[prev].top {
            e = self.edges[e].next;
        }

        loop {
            e = self.find_next_loc_min(e);
            if Some(e) == e_min {
                break;
            }
            if e_min.is_none() {
                e_min = Some(e);
            }

            // `e` and `e.prev` now share a local minimum (left-aligned if
            // horizontal). Their slopes tell us which one starts which bound.
            let y = self.edges[e].bot.y;
            let prev = self.edges[e].prev;
            let (left, right, left_is_forward) = if self.edges[e].dx < self.edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };

            let wind_delta = if !closed {
                0
            } else if self.edges[left].next == right {
                -1
            } else {
                1
            };
            self.edges[left].wind_delta = wind_delta;
            self.edges[right].wind_delta = -wind_delta;

            let mut e1 = self.process_bound(left, left_is_forward);
            if self.edges[e1].skip {
                e1 = self.process_bound(e1, left_is_forward);
            }
            let mut e2 = self.process_bound(right, !left_is_forward);
            if self.edges[e2].skip {
                e2 = self.process_bound(e2, !left_is_forward);
            }

            let (left_bound, right_bound) = if self.edges[left].skip {
                (None, Some(right))
            } else if self.edges[right].skip {
                (Some(left), None)
            } else {
                (Some(left), Some(right))
            };
            self.minima.push(LocalMinima {
                y,
                left_bound,
                right_bound,
            });
            e = if left_is_forward { e1 } else { e2 };
        }
        Ok(true)
    }

    // A totally flat open path becomes a single minimum whose right bound
    // runs along the whole path.
    fn add_flat_open_path(&mut self, mut e: EdgeIdx) {
        let p = self.edges[e].prev;
        self.edges[p].skip = true;
        self.edges[e].side = Side::Right;
        self.edges[e].wind_delta = 0;
        let lm = LocalMinima {
            y: self.edges[e].bot.y,
            left_bound: None,
            right_bound: Some(e),
        };
        loop {
            let prev = self.edges[e].prev;
            if self.edges[e].bot.x != self.edges[prev].top.x {
                self.edges[e].reverse_horizontal();
            }
            let next = self.edges[e].next;
            if self.edges[next].skip {
                break;
            }
            self.edges[e].next_in_lml = Some(next);
            e = next;
        }
        self.minima.push(lm);
    }

    // Unlinks `e` from its ring, returning the edge that followed it.
    fn remove_edge(&mut self, e: EdgeIdx) -> EdgeIdx {
        let (next, prev) = (self.edges[e].next, self.edges[e].prev);
        self.edges[prev].next = next;
        self.edges[next].prev = prev;
        next
    }

    fn init_edge2(&mut self, e: EdgeIdx, poly_type: PolyType) {
        let next_pt = self.edges[self.edges[e].next].curr;
        let edge = &mut self.edges[e];
        if edge.curr.y >= next_pt.y {
            edge.bot = edge.curr;
            edge.top = next_pt;
        } else {
            edge.top = edge.curr;
            edge.bot = next_pt;
        }
        edge.set_dx();
        edge.poly_type = poly_type;
    }

    fn find_next_loc_min(&self, mut e: EdgeIdx) -> EdgeIdx {
        let edges = &self.edges;
        loop {
            while edges[e].bot != edges[edges[e].prev].bot || edges[e].curr == edges[e].top {
                e = edges[e].next;
            }
            if !edges[e].is_horizontal() && !edges[edges[e].prev].is_horizontal() {
                break;
            }
            while edges[edges[e].prev].is_horizontal() {
                e = edges[e].prev;
            }
            let e2 = e;
            while edges[e].is_horizontal() {
                e = edges[e].next;
            }
            if edges[e].top.y == edges[edges[e].prev].bot.y {
                // Just an intermediate horizontal.
                continue;
            }
            if edges[edges[e2].prev].bot.x < edges[e].bot.x {
                e = e2;
            }
            break;
        }
        e
    }

    /// Links up the bound starting at `e`, returning the first edge after it.
    fn process_bound(&mut self, mut e: EdgeIdx, next_is_forward: bool) -> EdgeIdx {
        let mut result = e;
        let step = |edges: &EdgeVec<Edge>, e: EdgeIdx, forward: bool| {
            if forward {
                edges[e].next
            } else {
                edges[e].prev
            }
        };

        if self.edges[e].skip {
            // If there are edges in this bound beyond the skip edge, they
            // form another local minimum.
            let fwd = next_is_forward;
            while self.edges[e].top.y == self.edges[step(&self.edges, e, fwd)].bot.y {
                e = step(&self.edges, e, fwd);
            }
            // Top horizontals belong to the opposite bound.
            while e != result && self.edges[e].is_horizontal() {
                e = step(&self.edges, e, !fwd);
            }

            if e == result {
                return step(&self.edges, e, fwd);
            }
            let start = step(&self.edges, result, fwd);
            self.edges[start].wind_delta = 0;
            let lm = LocalMinima {
                y: self.edges[start].bot.y,
                left_bound: None,
                right_bound: Some(start),
            };
            result = self.process_bound(start, fwd);
            self.minima.push(lm);
            return result;
        }

        if self.edges[e].is_horizontal() {
            // This might not be a true local minimum (it could follow a skip
            // edge), and consecutive horizontals may head left before going right.
            let before = step(&self.edges, e, !next_is_forward);
            let (before_bot, before_top) = (self.edges[before].bot.x, self.edges[before].top.x);
            let bot_x = self.edges[e].bot.x;
            if self.edges[before].is_horizontal() {
                if before_bot != bot_x && before_top != bot_x {
                    self.edges[e].reverse_horizontal();
                }
            } else if self.edges[before].skip {
                // The skip edge may meet the horizontal at either of its
                // ends, so orient the horizontal away from the shared vertex.
                let joint = if next_is_forward {
                    self.edges[e].curr
                } else {
                    self.edges[before].curr
                };
                if joint.x != bot_x {
                    self.edges[e].reverse_horizontal();
                }
            } else if before_bot != bot_x {
                self.edges[e].reverse_horizontal();
            }
        }

        let e_start = e;
        let fwd = next_is_forward;
        loop {
            let after = step(&self.edges, result, fwd);
            if self.edges[result].top.y != self.edges[after].bot.y || self.edges[after].skip {
                break;
            }
            result = after;
        }
        let after = step(&self.edges, result, fwd);
        if self.edges[result].is_horizontal() && !self.edges[after].skip {
            // At the top of a bound, horizontals only belong to the bound if
            // the preceding edge attaches to the horizontal's left end.
            let mut horz = result;
            while self.edges[step(&self.edges, horz, !fwd)].is_horizontal() {
                horz = step(&self.edges, horz, !fwd);
            }
            let before_horz = step(&self.edges, horz, !fwd);
            let before_x = self.edges[before_horz].top.x;
            let after_x = self.edges[after].top.x;
            if (fwd && before_x > after_x) || (!fwd && before_x >= after_x) {
                result = before_horz;
            }
        }

        loop {
            let is_last = e == result;
            let behind = step(&self.edges, e, !fwd);
            if !is_last {
                let ahead = step(&self.edges, e, fwd);
                self.edges[e].next_in_lml = Some(ahead);
            }
            if self.edges[e].is_horizontal()
                && e != e_start
                && self.edges[e].bot.x != self.edges[behind].top.x
            {
                self.edges[e].reverse_horizontal();
            }
            if is_last {
                break;
            }
            e = step(&self.edges, e, fwd);
        }
        step(&self.edges, result, fwd)
    }

    /// Gets everything ready for a new sweep: sorts the minima into sweep
    /// order and clears whatever state the previous sweep left in the edges.
    pub fn reset(&mut self) {
        // Stable, so minima at the same height are activated in the order they were added.
        self.minima.sort_by(|a, b| b.y.cmp(&a.y));
        for (_, e) in self.edges.iter_mut() {
            e.curr = e.bot;
            e.out_idx = None;
            e.wind_cnt = 0;
            e.wind_cnt2 = 0;
            e.next_in_ael = None;
            e.prev_in_ael = None;
            e.next_in_sel = None;
            e.prev_in_sel = None;
        }
        for lm in &self.minima {
            if let Some(l) = lm.left_bound {
                self.edges[l].side = Side::Left;
            }
            if let Some(r) = lm.right_bound {
                self.edges[r].side = Side::Right;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::{p, square};
    use assert_matches::assert_matches;

    fn build(paths: &[(Vec<Point>, bool)]) -> Edges {
        let mut edges = Edges::default();
        for (path, closed) in paths {
            edges.add_path(path, PolyType::Subject, *closed, false).unwrap();
        }
        edges.reset();
        edges
    }

    fn ring_len(edges: &Edges, start: EdgeIdx) -> usize {
        let mut e = edges.edges[start].next;
        let mut count = 1;
        while e != start {
            count += 1;
            e = edges.edges[e].next;
        }
        count
    }

    fn bound(edges: &Edges, start: EdgeIdx) -> Vec<EdgeIdx> {
        let mut ret = vec![start];
        while let Some(next) = edges.edges[*ret.last().unwrap()].next_in_lml {
            ret.push(next);
        }
        ret
    }

    #[test]
    fn square_has_one_minimum() {
        let edges = build(&[(square(0, 0, 10), true)]);
        assert_eq!(edges.minima.len(), 1);
        let lm = &edges.minima[0];
        assert_eq!(lm.y, 10);
        let left = lm.left_bound.unwrap();
        let right = lm.right_bound.unwrap();
        assert_eq!(ring_len(&edges, left), 4);
        assert_eq!(edges.edges[left].side, Side::Left);
        assert_eq!(edges.edges[right].side, Side::Right);
        assert_eq!(edges.edges[left].wind_delta, -edges.edges[right].wind_delta);

        // The bottom horizontal belongs to one of the bounds.
        let total = bound(&edges, left).len() + bound(&edges, right).len();
        assert_eq!(total, 4);
        for e in bound(&edges, left).into_iter().chain(bound(&edges, right)) {
            let edge = &edges.edges[e];
            assert!(edge.bot.y >= edge.top.y);
        }
    }

    #[test]
    fn bounds_go_up() {
        // An arrowhead: the notch at (10, 10) is a second local minimum.
        let edges = build(&[(vec![p(0, 0), p(10, 20), p(20, 0), p(10, 10)], true)]);
        assert_eq!(edges.minima.len(), 2);
        assert_eq!(edges.minima[0].y, 20);
        assert_eq!(edges.minima[1].y, 10);
        for lm in &edges.minima {
            for b in [lm.left_bound.unwrap(), lm.right_bound.unwrap()] {
                let chain = bound(&edges, b);
                for pair in chain.windows(2) {
                    assert_eq!(edges.edges[pair[0]].top, edges.edges[pair[1]].bot);
                }
            }
        }
        let lm = &edges.minima[0];
        let left = &edges.edges[lm.left_bound.unwrap()];
        assert_eq!(left.bot, p(10, 20));
        assert_eq!(left.top, p(0, 0));
        assert!(left.dx > 0.0);
    }

    #[test]
    fn open_path_starting_with_horizontal() {
        let paths = [
            vec![p(8, 4), p(4, 4), p(8, 1), p(5, 6)],
            vec![p(8, 4), p(4, 4), p(8, 1), p(5, 6), p(7, 6)],
            vec![p(5, 6), p(8, 1), p(4, 4), p(8, 4)],
        ];
        for path in paths {
            let edges = build(&[(path.clone(), false)]);
            let mut covered = 0;
            for lm in &edges.minima {
                for b in lm.left_bound.into_iter().chain(lm.right_bound) {
                    let chain = bound(&edges, b);
                    covered += chain.len();
                    for pair in chain.windows(2) {
                        assert_eq!(edges.edges[pair[0]].top, edges.edges[pair[1]].bot);
                    }
                    for e in chain {
                        let edge = &edges.edges[e];
                        assert!(edge.bot.y >= edge.top.y);
                        // Every bound edge is a segment of the input.
                        assert!(path.windows(2).any(|w| {
                            (w[0] == edge.bot && w[1] == edge.top)
                                || (w[1] == edge.bot && w[0] == edge.top)
                        }));
                    }
                }
            }
            assert_eq!(covered, path.len() - 1);
        }
    }

    #[test]
    fn two_minima() {
        // A "W" shape has two valleys.
        let w = vec![p(0, 0), p(5, 10), p(10, 5), p(15, 10), p(20, 0)];
        let edges = build(&[(w, true)]);
        assert_eq!(edges.minima.len(), 2);
        assert!(edges.minima.iter().all(|lm| lm.y == 10));
    }

    #[test]
    fn minima_sorted() {
        let edges = build(&[(square(0, 0, 10), true), (square(0, 20, 10), true)]);
        assert_eq!(edges.minima[0].y, 30);
        assert_eq!(edges.minima[1].y, 10);
    }

    #[test]
    fn collinear_removed() {
        let tri = vec![p(0, 0), p(5, 0), p(10, 0), p(5, 10)];
        let edges = build(&[(tri.clone(), true)]);
        let lm = &edges.minima[0];
        assert_eq!(ring_len(&edges, lm.left_bound.unwrap()), 3);

        let mut edges = Edges::default();
        edges.add_path(&tri, PolyType::Subject, true, true).unwrap();
        let lm = &edges.minima[0];
        assert_eq!(ring_len(&edges, lm.left_bound.unwrap()), 4);
    }

    #[test]
    fn degenerate_paths() {
        let mut edges = Edges::default();
        assert!(!edges.add_path(&[], PolyType::Subject, true, false).unwrap());
        assert!(!edges
            .add_path(&[p(0, 0), p(1, 1), p(0, 0)], PolyType::Subject, true, false)
            .unwrap());
        assert!(!edges
            .add_path(&[p(0, 0), p(5, 5), p(10, 10)], PolyType::Clip, true, false)
            .unwrap());
        assert!(!edges
            .add_path(&[p(0, 0), p(5, 0), p(10, 0)], PolyType::Subject, true, false)
            .unwrap());
        assert!(edges.edges.is_empty());
        assert!(edges.minima.is_empty());
    }

    #[test]
    fn open_paths() {
        let mut edges = Edges::default();
        assert_matches!(
            edges.add_path(&[p(0, 0), p(1, 1)], PolyType::Clip, false, false),
            Err(Error::OpenClipPath)
        );
        assert!(edges
            .add_path(&[p(0, 0), p(10, 10), p(20, 0)], PolyType::Subject, false, false)
            .unwrap());
        assert!(edges.has_open_paths);
        edges.reset();
        assert!(edges.minima.iter().all(|lm| {
            let b = lm.left_bound.or(lm.right_bound).unwrap();
            edges.edges[b].wind_delta == 0
        }));
        assert_eq!(edges.edges.iter().filter(|(_, e)| e.skip).count(), 1);
    }

    #[test]
    fn flat_open_path() {
        let mut edges = Edges::default();
        assert!(edges
            .add_path(&[p(0, 0), p(10, 0), p(20, 0)], PolyType::Subject, false, false)
            .unwrap());
        assert_eq!(edges.minima.len(), 1);
        let lm = &edges.minima[0];
        assert!(lm.left_bound.is_none());
        let chain = bound(&edges, lm.right_bound.unwrap());
        assert_eq!(chain.len(), 2);
        assert!(chain.iter().all(|&e| edges.edges[e].is_horizontal()));
    }

    #[test]
    fn out_of_range() {
        let mut edges = Edges::default();
        let res = edges.add_path(
            &[p(0, 0), p(crate::geom::MAX_COORD + 1, 0), p(0, 5)],
            PolyType::Subject,
            true,
            false,
        );
        assert_matches!(res, Err(Error::CoordinateOutOfRange(_)));
        assert!(edges.edges.is_empty());
    }

    #[test]
    fn top_x() {
        let edges = build(&[(vec![p(0, 0), p(10, 20), p(20, 0)], true)]);
        let lm = &edges.minima[0];
        let right = &edges.edges[lm.right_bound.unwrap()];
        assert_eq!(right.top_x(20), 10);
        assert_eq!(right.top_x(10), 15);
        assert_eq!(right.top_x(0), 20);
    }
}
