use super::*;

#[test]
fn centered_origin_keeps_center_at_position() {
    let t = LayerTransform {
        x: 512.0,
        y: 400.0,
        scale_x: 2.0,
        scale_y: 0.5,
        rotation: 33.0,
        ..LayerTransform::default()
    };
    let c = t.center(120.0, 40.0);
    assert!((c.x - 512.0).abs() < 1e-9);
    assert!((c.y - 400.0).abs() < 1e-9);
}

#[test]
fn start_origin_places_top_left() {
    let t = LayerTransform {
        x: 10.0,
        y: 20.0,
        origin_x: Origin::Start,
        origin_y: Origin::Start,
        ..LayerTransform::default()
    };
    let b = t.bounds(100.0, 50.0);
    assert!((b.x0 - 10.0).abs() < 1e-9);
    assert!((b.y0 - 20.0).abs() < 1e-9);
    assert!((b.width() - 100.0).abs() < 1e-9);
}

#[test]
fn rotation_grows_bounds() {
    let t = LayerTransform {
        rotation: 45.0,
        ..LayerTransform::centered_at(Point::new(0.0, 0.0))
    };
    let b = t.bounds(100.0, 100.0);
    assert!(b.width() > 140.0);
}

#[test]
fn contains_respects_rotation_and_slop() {
    let t = LayerTransform {
        rotation: 90.0,
        ..LayerTransform::centered_at(Point::new(100.0, 100.0))
    };
    // 200 wide, 20 tall rotated 90 degrees: tall and thin.
    assert!(t.contains(200.0, 20.0, Point::new(100.0, 190.0), 0.0));
    assert!(!t.contains(200.0, 20.0, Point::new(190.0, 100.0), 0.0));
    assert!(t.contains(200.0, 20.0, Point::new(113.0, 100.0), 5.0));
}
