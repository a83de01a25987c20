//! Hierarchical output: contours arranged by containment.
//!
//! A [`PolyTree`] is what you get from [`Clipper::execute_tree`](crate::Clipper::execute_tree).
//! Every closed output contour is a node, and a node's children are the
//! contours immediately inside it. So the roots are outer contours, their
//! children are holes, the holes' children are islands inside the holes,
//! and so on. Open contours (from open subject paths) are always roots and
//! never have children.

use kurbo::BezPath;

use crate::geom::{path_to_bez, Path, Paths};

typed_vec!(
    /// An index into the nodes of a [`PolyTree`].
    NodeVec,
    NodeIdx,
    "node"
);

/// A single contour in a [`PolyTree`].
#[derive(Clone, Debug, serde::Serialize)]
pub struct PolyNode {
    contour: Path,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
    is_open: bool,
}

impl PolyNode {
    /// The vertices of this contour.
    pub fn contour(&self) -> &Path {
        &self.contour
    }

    /// The contours immediately inside this one.
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }

    /// The contour immediately containing this one, if there is one.
    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    /// Did this contour come from an open path?
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// Output contours, arranged by containment.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct PolyTree {
    nodes: NodeVec<PolyNode>,
    roots: Vec<NodeIdx>,
}

impl std::ops::Index<NodeIdx> for PolyTree {
    type Output = PolyNode;

    fn index(&self, index: NodeIdx) -> &PolyNode {
        &self.nodes[index]
    }
}

impl PolyTree {
    pub(crate) fn add_node(&mut self, contour: Path, is_open: bool) -> NodeIdx {
        self.nodes.push(PolyNode {
            contour,
            parent: None,
            children: Vec::new(),
            is_open,
        })
    }

    pub(crate) fn attach(&mut self, child: NodeIdx, parent: Option<NodeIdx>) {
        self.nodes[child].parent = parent;
        match parent {
            Some(p) => self.nodes[p].children.push(child),
            None => self.roots.push(child),
        }
    }

    /// The top-level contours: outer contours, and all open contours.
    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    /// The contours immediately inside `node`.
    pub fn children(&self, node: NodeIdx) -> &[NodeIdx] {
        &self.nodes[node].children
    }

    /// The contour immediately containing `node`.
    pub fn parent(&self, node: NodeIdx) -> Option<NodeIdx> {
        self.nodes[node].parent
    }

    /// Is `node` a hole? That's the case for closed contours with an odd
    /// number of ancestors.
    pub fn is_hole(&self, node: NodeIdx) -> bool {
        if self.nodes[node].is_open {
            return false;
        }
        let mut hole = false;
        let mut cur = self.nodes[node].parent;
        while let Some(p) = cur {
            hole = !hole;
            cur = self.nodes[p].parent;
        }
        hole
    }

    /// Did `node` come from an open path?
    pub fn is_open(&self, node: NodeIdx) -> bool {
        self.nodes[node].is_open
    }

    /// The vertices of `node`'s contour.
    pub fn contour(&self, node: NodeIdx) -> &Path {
        &self.nodes[node].contour
    }

    /// The total number of contours in the tree.
    pub fn total(&self) -> usize {
        self.nodes.len()
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all the nodes, depth first, visiting parents before children.
    pub fn iter(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        let mut stack: Vec<NodeIdx> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.nodes[next].children.iter().rev().copied());
            Some(next)
        })
    }

    /// All contours, open and closed, in depth-first order.
    pub fn to_paths(&self) -> Paths {
        self.iter().map(|n| self.nodes[n].contour.clone()).collect()
    }

    /// All the closed contours, in depth-first order.
    pub fn closed_paths(&self) -> Paths {
        self.iter()
            .filter(|&n| !self.nodes[n].is_open)
            .map(|n| self.nodes[n].contour.clone())
            .collect()
    }

    /// All the open contours.
    pub fn open_paths(&self) -> Paths {
        self.roots
            .iter()
            .filter(|&&n| self.nodes[n].is_open)
            .map(|&n| self.nodes[n].contour.clone())
            .collect()
    }

    /// Converts the whole tree to a single path, with closed contours closed.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        for n in self.iter() {
            let node = &self.nodes[n];
            ret.extend(path_to_bez(&node.contour, !node.is_open));
        }
        ret
    }
}

/// Draws some paths as an svg document, for debugging.
#[cfg(feature = "debug-svg")]
pub fn paths_svg(paths: &Paths) -> svg::Document {
    use svg::node::element::{path::Data, Path as SvgPath};

    let pts = paths.iter().flatten();
    let min_x = pts.clone().map(|p| p.x).min().unwrap_or(0) as f64;
    let max_x = pts.clone().map(|p| p.x).max().unwrap_or(0) as f64;
    let min_y = pts.clone().map(|p| p.y).min().unwrap_or(0) as f64;
    let max_y = pts.map(|p| p.y).max().unwrap_or(0) as f64;
    let pad = 1.0 + (max_x - min_x).max(max_y - min_y) / 32.0;
    let stroke_width = (max_x - min_x).max(max_y - min_y) / 512.0;

    let mut document = svg::Document::new().set(
        "viewBox",
        (
            min_x - pad,
            min_y - pad,
            max_x - min_x + 2.0 * pad,
            max_y - min_y + 2.0 * pad,
        ),
    );
    for path in paths {
        let Some(first) = path.first() else {
            continue;
        };
        let mut data = Data::new().move_to((first.x as f64, first.y as f64));
        for p in &path[1..] {
            data = data.line_to((p.x as f64, p.y as f64));
        }
        data = data.close();
        let color = if crate::geom::orientation(path) {
            "blue"
        } else {
            "red"
        };
        let path = SvgPath::new()
            .set("stroke", color)
            .set("stroke-width", stroke_width)
            .set("stroke-linejoin", "round")
            .set("fill", color)
            .set("fill-opacity", 0.2)
            .set("d", data);
        document = document.add(path);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::{p, square};

    fn nested() -> (PolyTree, [NodeIdx; 4]) {
        let mut tree = PolyTree::default();
        let outer = tree.add_node(square(0, 0, 100), false);
        let hole = tree.add_node(square(10, 10, 80), false);
        let island = tree.add_node(square(20, 20, 10), false);
        let line = tree.add_node(vec![p(0, 0), p(200, 200)], true);
        tree.attach(outer, None);
        tree.attach(hole, Some(outer));
        tree.attach(island, Some(hole));
        tree.attach(line, None);
        (tree, [outer, hole, island, line])
    }

    #[test]
    fn structure() {
        let (tree, [outer, hole, island, line]) = nested();
        assert_eq!(tree.total(), 4);
        assert_eq!(tree.roots(), &[outer, line]);
        assert_eq!(tree.children(outer), &[hole]);
        assert_eq!(tree.parent(island), Some(hole));
        assert_eq!(tree[island].parent(), Some(hole));
        assert!(!tree.is_hole(outer));
        assert!(tree.is_hole(hole));
        assert!(!tree.is_hole(island));
        assert!(!tree.is_hole(line));
        assert!(tree.is_open(line));
        assert_eq!(tree.contour(island), &square(20, 20, 10));
    }

    #[test]
    fn traversal() {
        let (tree, [outer, hole, island, line]) = nested();
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![outer, hole, island, line]);
        assert_eq!(tree.to_paths().len(), 4);
        assert_eq!(tree.closed_paths().len(), 3);
        assert_eq!(tree.open_paths(), vec![vec![p(0, 0), p(200, 200)]]);

        // Three closed contours with a move, three lines and a close each,
        // plus an open line.
        assert_eq!(tree.to_bez_path().elements().len(), 3 * 5 + 2);
    }

    #[test]
    fn empty() {
        let tree = PolyTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().count(), 0);
        assert!(tree.to_bez_path().elements().is_empty());
    }
}
