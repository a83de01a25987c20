use proptest::prelude::*;
use scanclip::{
    area, binary_op, point_in_polygon, BinaryOp, ClipOptions, Clipper, FillRule, Path, Paths,
    Point, PointLocation, PolyType,
};

fn total_area(paths: &Paths) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

// Unions of axis-aligned rectangles have integer vertices, so none of the
// operations need to round anything and areas add up exactly.
fn rect() -> impl Strategy<Value = Path> {
    (-50i64..50, -50i64..50, 1i64..40, 1i64..40, any::<bool>()).prop_map(|(x, y, w, h, rev)| {
        let mut r = vec![
            Point::new(x, y),
            Point::new(x, y + h),
            Point::new(x + w, y + h),
            Point::new(x + w, y),
        ];
        if rev {
            r.reverse();
        }
        r
    })
}

fn rects() -> impl Strategy<Value = Paths> {
    prop::collection::vec(rect(), 1..5)
}

// Small coordinates, so that vertices and edges often coincide.
fn polygon() -> impl Strategy<Value = Path> {
    prop::collection::vec((0i64..20, 0i64..20).prop_map(|(x, y)| Point::new(x, y)), 3..7)
}

fn polygons() -> impl Strategy<Value = Paths> {
    prop::collection::vec(polygon(), 1..3)
}

fn fill_rule() -> impl Strategy<Value = FillRule> {
    prop_oneof![Just(FillRule::EvenOdd), Just(FillRule::NonZero)]
}

fn any_fill_rule() -> impl Strategy<Value = FillRule> {
    prop_oneof![
        Just(FillRule::EvenOdd),
        Just(FillRule::NonZero),
        Just(FillRule::Positive),
        Just(FillRule::Negative),
    ]
}

fn any_op() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Intersection),
        Just(BinaryOp::Union),
        Just(BinaryOp::Difference),
        Just(BinaryOp::Xor),
    ]
}

fn op(p: &[Path], q: &[Path], op: BinaryOp, fill: FillRule) -> Paths {
    binary_op(p, q, op, fill).unwrap()
}

/// The winding number of `paths` around `(x, y)`, counted so that paths
/// with positive area wind positively.
fn winding(paths: &[Path], x: f64, y: f64) -> i32 {
    let mut w = 0;
    for path in paths {
        for (i, a) in path.iter().enumerate() {
            let b = path[(i + 1) % path.len()];
            let (ax, ay, bx, by) = (a.x as f64, a.y as f64, b.x as f64, b.y as f64);
            let cross = (bx - ax) * (y - ay) - (x - ax) * (by - ay);
            if ay <= y {
                if by > y && cross > 0.0 {
                    w += 1;
                }
            } else if by <= y && cross < 0.0 {
                w -= 1;
            }
        }
    }
    w
}

fn filled(w: i32, fill: FillRule) -> bool {
    match fill {
        FillRule::EvenOdd => w % 2 != 0,
        FillRule::NonZero => w != 0,
        FillRule::Positive => w > 0,
        FillRule::Negative => w < 0,
    }
}

fn distance_to_segment(x: f64, y: f64, a: Point, b: Point) -> f64 {
    let (ax, ay, bx, by) = (a.x as f64, a.y as f64, b.x as f64, b.y as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((x - ax) * dx + (y - ay) * dy) / len2).clamp(0.0, 1.0)
    };
    ((x - ax - t * dx).powi(2) + (y - ay - t * dy).powi(2)).sqrt()
}

fn near_boundary(paths: &[Path], x: f64, y: f64) -> bool {
    // Rounding intersection points to the grid moves boundaries by less than this.
    const MARGIN: f64 = 1.5;
    paths.iter().any(|path| {
        (0..path.len()).any(|i| {
            distance_to_segment(x, y, path[i], path[(i + 1) % path.len()]) < MARGIN
        })
    })
}

proptest! {
    #[test]
    fn area_identities(p in rects(), q in rects(), fill in fill_rule()) {
        let union = total_area(&op(&p, &q, BinaryOp::Union, fill));
        let inter = total_area(&op(&p, &q, BinaryOp::Intersection, fill));
        let p_minus_q = total_area(&op(&p, &q, BinaryOp::Difference, fill));
        let q_minus_p = total_area(&op(&q, &p, BinaryOp::Difference, fill));
        let xor = total_area(&op(&p, &q, BinaryOp::Xor, fill));
        let p_area = total_area(&op(&p, &[], BinaryOp::Union, fill));
        let q_area = total_area(&op(&q, &[], BinaryOp::Union, fill));

        prop_assert_eq!(p_minus_q + inter, p_area);
        prop_assert_eq!(p_minus_q + q_minus_p + inter, union);
        prop_assert_eq!(xor, p_area + q_area - 2.0 * inter);
    }

    #[test]
    fn self_intersection(p in rects(), fill in fill_rule()) {
        let simplified = op(&p, &[], BinaryOp::Union, fill);
        let inter = op(&p, &p, BinaryOp::Intersection, fill);
        prop_assert_eq!(total_area(&inter), total_area(&simplified));

        let inter_again = op(&simplified, &simplified, BinaryOp::Intersection, FillRule::NonZero);
        prop_assert_eq!(total_area(&inter_again), total_area(&simplified));
    }

    #[test]
    fn orientation(
        p in rects(),
        q in rects(),
        fill in fill_rule(),
        reverse_solution in any::<bool>(),
    ) {
        let mut clipper = Clipper::new(ClipOptions {
            reverse_solution,
            ..ClipOptions::default()
        });
        clipper.add_paths(&p, PolyType::Subject, true).unwrap();
        clipper.add_paths(&q, PolyType::Clip, true).unwrap();
        let tree = clipper.execute_tree(BinaryOp::Xor, fill, fill).unwrap();
        for node in tree.iter() {
            let a = area(tree.contour(node));
            prop_assert!(a != 0.0);
            prop_assert_eq!(a > 0.0, tree.is_hole(node) == reverse_solution);
        }
    }

    #[test]
    fn strictly_simple_has_no_repeated_vertices(p in rects(), fill in fill_rule()) {
        let mut clipper = Clipper::new(ClipOptions {
            strictly_simple: true,
            ..ClipOptions::default()
        });
        clipper.add_paths(&p, PolyType::Subject, true).unwrap();
        let out = clipper.execute(BinaryOp::Union, fill, fill).unwrap();
        for contour in &out {
            let mut pts: Vec<_> = contour.iter().map(|p| (p.x, p.y)).collect();
            pts.sort();
            pts.dedup();
            prop_assert_eq!(pts.len(), contour.len());
        }
        prop_assert_eq!(total_area(&out), total_area(&op(&p, &[], BinaryOp::Union, fill)));
    }

    #[test]
    fn coverage_matches_winding_numbers(
        p in polygons(),
        q in polygons(),
        op in any_op(),
        subject_fill in any_fill_rule(),
        clip_fill in any_fill_rule(),
    ) {
        let mut clipper = Clipper::default();
        clipper.add_paths(&p, PolyType::Subject, true).unwrap();
        clipper.add_paths(&q, PolyType::Clip, true).unwrap();
        let out = match clipper.execute(op, subject_fill, clip_fill) {
            Ok(out) => out,
            Err(e) => {
                prop_assert!(!e.is_fatal(), "{}", e);
                return Ok(());
            }
        };

        for i in -2..22 {
            for j in -2..22 {
                let (x, y) = (i as f64 + 0.5, j as f64 + 0.5);
                if near_boundary(&p, x, y) || near_boundary(&q, x, y) {
                    continue;
                }
                let in_p = filled(winding(&p, x, y), subject_fill);
                let in_q = filled(winding(&q, x, y), clip_fill);
                let expected = match op {
                    BinaryOp::Intersection => in_p && in_q,
                    BinaryOp::Union => in_p || in_q,
                    BinaryOp::Difference => in_p && !in_q,
                    BinaryOp::Xor => in_p != in_q,
                };
                prop_assert_eq!(winding(&out, x, y) != 0, expected, "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn tree_nesting(
        p in polygons(),
        q in polygons(),
        op in any_op(),
        subject_fill in any_fill_rule(),
        clip_fill in any_fill_rule(),
        strictly_simple in any::<bool>(),
    ) {
        let mut clipper = Clipper::new(ClipOptions {
            strictly_simple,
            ..ClipOptions::default()
        });
        clipper.add_paths(&p, PolyType::Subject, true).unwrap();
        clipper.add_paths(&q, PolyType::Clip, true).unwrap();
        let tree = match clipper.execute_tree(op, subject_fill, clip_fill) {
            Ok(tree) => tree,
            Err(e) => {
                prop_assert!(!e.is_fatal(), "{}", e);
                return Ok(());
            }
        };

        for node in tree.iter() {
            let contour = tree.contour(node);
            let a = area(contour);
            prop_assert!(a != 0.0);
            prop_assert_eq!(a > 0.0, !tree.is_hole(node), "{:?}", contour);
            if let Some(parent) = tree.parent(node) {
                let outer = tree.contour(parent);
                for &pt in contour {
                    prop_assert_ne!(point_in_polygon(pt, outer), PointLocation::Outside);
                }
            }
        }
    }
}
