use super::*;
use std::sync::Arc;

#[test]
fn uniform_map_samples_its_level() {
    let m = GreyMap::filled(4, 4, 77);
    assert_eq!(m.sample(0.0, 0.0), 77);
    assert_eq!(m.sample(0.99, 0.5), 77);
}

#[test]
fn bilinear_sample_interpolates() {
    let m = GreyMap {
        width: 2,
        height: 1,
        data: vec![0, 200],
    };
    assert_eq!(m.sample(0.25, 0.5), 0);
    assert_eq!(m.sample(0.75, 0.5), 200);
    assert_eq!(m.sample(0.5, 0.5), 100);
}

#[test]
fn placed_map_is_neutral_outside_its_rect() {
    let placed = PlacedMap {
        map: GreyMap::filled(2, 2, 10),
        rect: Rect::new(10.0, 10.0, 20.0, 20.0),
        neutral: NEUTRAL_SHADOW,
    };
    assert_eq!(placed.at(15, 15), 10);
    assert_eq!(placed.at(5, 15), NEUTRAL_SHADOW);
    assert_eq!(placed.at(20, 15), NEUTRAL_SHADOW);
}

#[test]
fn image_luminance_flattens_over_white() {
    let img = PreparedImage {
        width: 2,
        height: 1,
        logical_width: 2.0,
        logical_height: 1.0,
        rgba8_premul: Arc::new(vec![0, 0, 0, 255, 0, 0, 0, 0]),
    };
    let m = GreyMap::from_image(&img);
    assert_eq!(m.data, vec![0, 255]);
}

#[test]
fn default_maps_stay_subtle() {
    let hl = default_highlight_map();
    let sh = default_shadow_map();
    assert!(hl.data.iter().all(|&v| v <= 56));
    assert!(hl.data.iter().any(|&v| v > 0));
    assert!(sh.data.iter().all(|&v| v >= 200));
    assert_eq!(sh.sample(0.5, 0.5), 255);
    assert_eq!(default_displacement_map().sample(0.3, 0.7), NEUTRAL_DISPLACEMENT);
}
