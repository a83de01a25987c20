#![no_main]

use libfuzzer_sys::fuzz_target;
use scanclip::{arbitrary::ClipInput, simplify_polygons, Error, FillRule};

fuzz_target!(|input: ClipInput| {
    match simplify_polygons(&input.subject, input.subject_fill) {
        Ok(paths) => {
            // The output is already simple, so simplifying it again (with
            // holes cancelling out their outers) shouldn't change the area.
            let area: f64 = paths.iter().map(|p| scanclip::area(p)).sum();
            let again = simplify_polygons(&paths, FillRule::NonZero).unwrap();
            let area_again: f64 = again.iter().map(|p| scanclip::area(p)).sum();
            assert!((area - area_again).abs() <= 1e-9 * area.abs().max(1.0));
        }
        Err(Error::IntersectionOrder) => {}
        Err(e) => panic!("{e}"),
    }
});
