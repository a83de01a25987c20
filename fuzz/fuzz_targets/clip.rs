#![no_main]

use libfuzzer_sys::fuzz_target;
use scanclip::{arbitrary::ClipInput, Clipper, Error, PolyType};

fuzz_target!(|input: ClipInput| {
    let mut clipper = Clipper::new(input.options);
    clipper
        .add_paths(&input.subject, PolyType::Subject, true)
        .unwrap();
    clipper.add_paths(&input.clip, PolyType::Clip, true).unwrap();

    let (min_x, max_x, min_y, max_y) = input
        .subject
        .iter()
        .chain(&input.clip)
        .flatten()
        .fold((i64::MAX, i64::MIN, i64::MAX, i64::MIN), |(a, b, c, d), p| {
            (a.min(p.x), b.max(p.x), c.min(p.y), d.max(p.y))
        });

    match clipper.execute(input.op, input.subject_fill, input.clip_fill) {
        Ok(paths) => {
            for path in &paths {
                assert!(path.len() >= 2);
                for p in path {
                    assert!((min_x..=max_x).contains(&p.x));
                    assert!((min_y..=max_y).contains(&p.y));
                }
            }
        }
        Err(Error::IntersectionOrder) => {}
        Err(e) => panic!("{e}"),
    }

    // The tree output covers the same contours.
    if let Ok(tree) = clipper.execute_tree(input.op, input.subject_fill, input.clip_fill) {
        assert!(tree.open_paths().is_empty());
    }
});
