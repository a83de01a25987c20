//! Geometric primitives, like points and paths, and the predicates the sweep relies on.
//!
//! All the predicates here are exact: slope comparisons are done in 128-bit
//! integer arithmetic, so they never disagree with one another about
//! collinearity. Areas are computed in `f64`, which is only used for
//! orientation decisions and reporting.

use std::iter;

/// The largest coordinate magnitude accepted in input paths.
///
/// With coordinates bounded by this, every product taken by the slope
/// predicates fits comfortably in an `i128`, and every difference of two
/// coordinates fits in an `i64`.
pub const MAX_COORD: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// A two-dimensional integer point, with an extra user-data tag.
///
/// The `z` coordinate is never looked at by any geometric computation, and it
/// is ignored by equality and hashing. It is carried along with input
/// vertices and, for newly created intersection points, can be filled in by a
/// callback (see [`Clipper::set_z_fill`](crate::Clipper::set_z_fill)).
///
/// Although it isn't important for functionality, the documentation and
/// method naming assumes that larger `y` values are down. The sweep starts at
/// the bottom (largest `y`) and moves up.
#[derive(Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal component.
    pub x: i64,
    /// Vertical component.
    pub y: i64,
    /// Opaque user data.
    pub z: i64,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl std::hash::Hash for Point {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.z == 0 {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "({}, {}; {})", self.x, self.y, self.z)
        }
    }
}

impl Point {
    /// Create a new point with a zero `z` tag.
    pub fn new(x: i64, y: i64) -> Self {
        Point { x, y, z: 0 }
    }

    /// Create a new point with the given `z` tag.
    pub fn with_z(x: i64, y: i64, z: i64) -> Self {
        Point { x, y, z }
    }

    /// Is this point inside the coordinate range that the clipper accepts?
    pub fn in_range(&self) -> bool {
        (-MAX_COORD..=MAX_COORD).contains(&self.x) && (-MAX_COORD..=MAX_COORD).contains(&self.y)
    }

    /// Converts to a floating-point `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x as f64, self.y as f64)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// An ordered sequence of points.
///
/// For a closed polygon, the last point is implicitly connected to the first.
pub type Path = Vec<Point>;

/// A collection of paths.
pub type Paths = Vec<Path>;

/// Where a point lies relative to a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PointLocation {
    /// Strictly outside.
    Outside,
    /// Strictly inside.
    Inside,
    /// Exactly on one of the polygon's edges or vertices.
    OnBoundary,
}

/// Are the segments `p1 -> p2` and `p2 -> p3` collinear?
pub fn slopes_equal3(p1: Point, p2: Point, p3: Point) -> bool {
    (p1.y - p2.y) as i128 * (p2.x - p3.x) as i128 == (p1.x - p2.x) as i128 * (p2.y - p3.y) as i128
}

/// Are the segments `p1 -> p2` and `p3 -> p4` parallel?
pub fn slopes_equal4(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    (p1.y - p2.y) as i128 * (p3.x - p4.x) as i128 == (p1.x - p2.x) as i128 * (p3.y - p4.y) as i128
}

/// Does `p2` lie strictly between `p1` and `p3`?
///
/// The three points are assumed to be collinear, so this only compares one
/// coordinate. It returns false if any two of the points coincide.
pub fn pt2_is_between_pt1_and_pt3(p1: Point, p2: Point, p3: Point) -> bool {
    if p1 == p3 || p1 == p2 || p3 == p2 {
        false
    } else if p1.x != p3.x {
        (p2.x > p1.x) == (p2.x < p3.x)
    } else {
        (p2.y > p1.y) == (p2.y < p3.y)
    }
}

/// Do the horizontal spans `[a1, a2]` and `[b1, b2]` overlap in more than a point?
///
/// The endpoints of each span may be given in either order.
pub fn horz_segments_overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> bool {
    let (a1, a2) = if a1 > a2 { (a2, a1) } else { (a1, a2) };
    let (b1, b2) = if b1 > b2 { (b2, b1) } else { (b1, b2) };
    a1 < b2 && b1 < a2
}

/// The inverse slope `dx / dy` of the line from `p1` to `p2`.
///
/// Horizontal lines get the sentinel [`HORIZONTAL`](crate::edges::HORIZONTAL).
pub(crate) fn inverse_slope(p1: Point, p2: Point) -> f64 {
    if p1.y == p2.y {
        crate::edges::HORIZONTAL
    } else {
        (p2.x - p1.x) as f64 / (p2.y - p1.y) as f64
    }
}

/// The signed area of a closed polygon.
///
/// With `y` pointing down, polygons whose vertices go clockwise on screen have
/// positive area. Paths with fewer than three points have zero area.
pub fn area(path: &[Point]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut prev = path[path.len() - 1];
    for &p in path {
        a += (prev.x as f64 + p.x as f64) * (prev.y as f64 - p.y as f64);
        prev = p;
    }
    -a * 0.5
}

/// Returns true if `path` has non-negative signed area.
///
/// Outer contours produced by the clipper have positive orientation and holes
/// have negative orientation (unless the output was requested reversed).
pub fn orientation(path: &[Point]) -> bool {
    area(path) >= 0.0
}

/// Reverses the direction of a path in place.
pub fn reverse_path(path: &mut Path) {
    path.reverse();
}

/// Reverses the direction of every path in place.
pub fn reverse_paths(paths: &mut Paths) {
    for p in paths {
        p.reverse();
    }
}

/// Returns a copy of `path`, translated by `delta`.
pub fn translate_path(path: &[Point], delta: Point) -> Path {
    path.iter()
        .map(|p| Point::with_z(p.x + delta.x, p.y + delta.y, p.z))
        .collect()
}

/// Classifies `pt` against a closed polygon.
///
/// Paths with fewer than three points contain nothing.
pub fn point_in_polygon(pt: Point, path: &[Point]) -> PointLocation {
    if path.len() < 3 {
        return PointLocation::Outside;
    }
    point_in_ring(pt, path.iter().copied())
}

/// Classifies `pt` against the closed ring described by `ring`.
///
/// This is a ray-parity walk (see "The Point in Polygon Problem for Arbitrary
/// Polygons" by Hormann and Agathos). Whenever a vertex or edge is level with
/// the point in a way that could make the parity ambiguous, we report
/// `OnBoundary` instead of guessing.
pub(crate) fn point_in_ring(pt: Point, ring: impl IntoIterator<Item = Point>) -> PointLocation {
    let mut pts = ring.into_iter();
    let Some(first) = pts.next() else {
        return PointLocation::Outside;
    };

    let mut inside = false;
    let mut p0 = first;
    for p1 in pts.chain(iter::once(first)) {
        if p1.y == pt.y && (p1.x == pt.x || (p0.y == pt.y && ((p1.x > pt.x) == (p0.x < pt.x)))) {
            return PointLocation::OnBoundary;
        }
        if (p0.y < pt.y) != (p1.y < pt.y) {
            if p0.x >= pt.x && p1.x > pt.x {
                inside = !inside;
            } else if p0.x >= pt.x || p1.x > pt.x {
                let d = (p0.x - pt.x) as f64 * (p1.y - pt.y) as f64
                    - (p1.x - pt.x) as f64 * (p0.y - pt.y) as f64;
                if d == 0.0 {
                    return PointLocation::OnBoundary;
                }
                if (d > 0.0) == (p1.y > p0.y) {
                    inside = !inside;
                }
            }
        }
        p0 = p1;
    }

    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

fn points_are_close(p1: Point, p2: Point, dist_sqrd: f64) -> bool {
    let dx = p1.x as f64 - p2.x as f64;
    let dy = p1.y as f64 - p2.y as f64;
    dx * dx + dy * dy <= dist_sqrd
}

fn distance_from_line_sqrd(pt: Point, ln1: Point, ln2: Point) -> f64 {
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let c = a * ln1.x as f64 + b * ln1.y as f64;
    let c = a * pt.x as f64 + b * pt.y as f64 - c;
    (c * c) / (a * a + b * b)
}

// Measures the distance from whichever of the three points lies between the
// other two to the line through the outer two.
fn slopes_near_collinear(p1: Point, p2: Point, p3: Point, dist_sqrd: f64) -> bool {
    let (mid, a, b) = if (p1.x - p2.x).abs() > (p1.y - p2.y).abs() {
        if (p1.x > p2.x) == (p1.x < p3.x) {
            (p1, p2, p3)
        } else if (p2.x > p1.x) == (p2.x < p3.x) {
            (p2, p1, p3)
        } else {
            (p3, p1, p2)
        }
    } else if (p1.y > p2.y) == (p1.y < p3.y) {
        (p1, p2, p3)
    } else if (p2.y > p1.y) == (p2.y < p3.y) {
        (p2, p1, p3)
    } else {
        (p3, p1, p2)
    };
    distance_from_line_sqrd(mid, a, b) < dist_sqrd
}

/// Removes vertices that are within `distance` of a neighbor, or that are
/// within `distance` of being collinear with their neighbors.
///
/// A polygon that ends up with fewer than three vertices is returned empty.
/// A `distance` of about `1.415` (a bit over `sqrt(2)`) removes the
/// artifacts that integer rounding leaves behind.
pub fn clean_polygon(path: &[Point], distance: f64) -> Path {
    let n = path.len();
    if n == 0 {
        return Vec::new();
    }
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut checked = vec![false; n];
    let dist_sqrd = distance * distance;

    // Unlinks `i` from the ring and returns its predecessor, which needs
    // re-checking now that its neighborhood has changed.
    fn exclude(i: usize, next: &mut [usize], prev: &mut [usize], checked: &mut [bool]) -> usize {
        let p = prev[i];
        next[p] = next[i];
        prev[next[i]] = p;
        checked[p] = false;
        p
    }

    let mut size = n;
    let mut op = 0;
    while !checked[op] && next[op] != prev[op] {
        let (pp, pn) = (path[prev[op]], path[next[op]]);
        if points_are_close(path[op], pp, dist_sqrd) {
            op = exclude(op, &mut next, &mut prev, &mut checked);
            size -= 1;
        } else if points_are_close(pp, pn, dist_sqrd) {
            exclude(next[op], &mut next, &mut prev, &mut checked);
            op = exclude(op, &mut next, &mut prev, &mut checked);
            size -= 2;
        } else if slopes_near_collinear(pp, path[op], pn, dist_sqrd) {
            op = exclude(op, &mut next, &mut prev, &mut checked);
            size -= 1;
        } else {
            checked[op] = true;
            op = next[op];
        }
    }

    if size < 3 {
        return Vec::new();
    }
    let mut ret = Vec::with_capacity(size);
    for _ in 0..size {
        ret.push(path[op]);
        op = next[op];
    }
    ret
}

/// Applies [`clean_polygon`] to every path.
pub fn clean_polygons(paths: &[Path], distance: f64) -> Paths {
    paths.iter().map(|p| clean_polygon(p, distance)).collect()
}

/// Converts a path to a `kurbo` path made of line segments.
///
/// If `closed` is true, the path is closed back to its first point.
pub fn path_to_bez(path: &[Point], closed: bool) -> kurbo::BezPath {
    let mut ret = kurbo::BezPath::new();
    let mut pts = path.iter();
    if let Some(first) = pts.next() {
        ret.move_to(first.to_kurbo());
        for p in pts {
            ret.line_to(p.to_kurbo());
        }
        if closed {
            ret.close_path();
        }
    }
    ret
}
