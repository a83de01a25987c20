//! Turning output records into the caller-facing results.

use super::{OutPtIdx, OutRecIdx, Output};
use crate::{
    geom::{Path, Paths},
    tree::PolyTree,
};

impl Output {
    // Reads off `count` points of a ring, backwards from `start`.
    fn emit(&self, start: OutPtIdx, count: usize) -> Path {
        let mut path = Vec::with_capacity(count);
        let mut op = self.pts[start].prev;
        for _ in 0..count {
            path.push(self.pts[op].pt);
            op = self.pts[op].prev;
        }
        path
    }

    /// Collects the surviving contours into a flat list.
    pub fn build_paths(&self) -> Paths {
        let mut ret = Vec::new();
        for (_, rec) in self.recs.iter() {
            let Some(start) = rec.pts else {
                continue;
            };
            let count = self.point_count(Some(start));
            if count < 2 {
                continue;
            }
            ret.push(self.emit(start, count));
        }
        ret
    }

    /// Arranges the surviving contours into a tree by containment.
    pub fn build_tree(&mut self) -> PolyTree {
        let mut tree = PolyTree::default();
        for rec in self.recs.indices() {
            let count = self.point_count(self.recs[rec].pts);
            let is_open = self.recs[rec].is_open;
            if (is_open && count < 2) || (!is_open && count < 3) {
                continue;
            }
            let Some(start) = self.recs[rec].pts else {
                continue;
            };
            self.fix_hole_linkage(rec);
            let node = tree.add_node(self.emit(start, count), is_open);
            self.recs[rec].node = Some(node);
        }

        for rec in self.recs.indices() {
            let Some(node) = self.recs[rec].node else {
                continue;
            };
            let parent = if self.recs[rec].is_open {
                None
            } else {
                self.tree_parent(rec).and_then(|fl| self.recs[fl].node)
            };
            tree.attach(node, parent);
        }
        tree
    }

    // The record whose node `rec` hangs from. Splits and merges during the
    // joins can leave `first_left` pointing at a contour that doesn't
    // surround `rec` any more; in that case we look for the smallest
    // surrounding contour of the opposite hole state.
    fn tree_parent(&self, rec: OutRecIdx) -> Option<OutRecIdx> {
        let r = &self.recs[rec];
        let pts = r.pts?;
        match r.first_left.filter(|&fl| self.recs[fl].node.is_some()) {
            Some(fl) => {
                let parent = &self.recs[fl];
                let contains = parent
                    .pts
                    .is_some_and(|parent_pts| self.poly2_contains_poly1(pts, parent_pts));
                if parent.is_hole != r.is_hole && contains {
                    return Some(fl);
                }
            }
            None if !r.is_hole => return None,
            None => {}
        }

        let size = self.rec_area(rec).abs();
        self.recs
            .iter()
            .filter(|(c, cand)| {
                *c != rec && cand.node.is_some() && !cand.is_open && cand.is_hole != r.is_hole
            })
            .filter_map(|(c, cand)| {
                let cand_size = self.rec_area(c).abs();
                let cand_pts = cand.pts?;
                (cand_size > size && self.poly2_contains_poly1(pts, cand_pts))
                    .then_some((c, cand_size))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }
}
