use super::*;
use crate::assets::text::{TextStyle, estimate};

fn shaped(content: &str) -> ShapedText {
    estimate(&TextStyle {
        content: content.to_string(),
        font_family: "Inter".to_string(),
        font_size: 20.0,
        font_weight: 400,
        italic: false,
        letter_spacing: 0.0,
    })
}

#[test]
fn zero_curvature_has_no_arc() {
    assert!(ArcPath::for_curvature(0.0, 100.0, 18.0).is_none());
    assert!(ArcPath::for_curvature(30.0, 0.0, 18.0).is_none());
}

#[test]
fn clamp_limits_range() {
    assert_eq!(clamp_curvature(90.0), MAX_CURVATURE_DEG);
    assert_eq!(clamp_curvature(-90.0), -MAX_CURVATURE_DEG);
    assert_eq!(clamp_curvature(f64::NAN), 0.0);
    assert_eq!(clamp_curvature(12.5), 12.5);
}

#[test]
fn radius_follows_width_over_angle() {
    let arc = ArcPath::for_curvature(45.0, 200.0, 10.0).unwrap();
    let theta = 45f64.to_radians();
    assert!((arc.radius - 200.0 / theta).abs() < 1e-9);
    assert_eq!(arc.bulge, Bulge::Up);
    assert_eq!(
        ArcPath::for_curvature(-45.0, 200.0, 10.0).unwrap().bulge,
        Bulge::Down
    );
}

#[test]
fn chord_ends_sit_on_the_baseline() {
    for deg in [-60.0, -20.0, 15.0, 60.0] {
        let arc = ArcPath::for_curvature(deg, 240.0, 30.0).unwrap();
        let left = arc.point_at(-arc.sweep / 2.0, arc.radius);
        let right = arc.point_at(arc.sweep / 2.0, arc.radius);
        assert!((left.x - 0.0).abs() < 1e-6, "deg {deg}: {left:?}");
        assert!((right.x - 240.0).abs() < 1e-6, "deg {deg}: {right:?}");
        assert!((left.y - 30.0).abs() < 1e-6);
        assert!((right.y - 30.0).abs() < 1e-6);
        assert!(arc.arc_length() > arc.chord);
    }
}

#[test]
fn bulge_direction_moves_the_midpoint() {
    let up = ArcPath::for_curvature(40.0, 100.0, 50.0).unwrap();
    let down = ArcPath::for_curvature(-40.0, 100.0, 50.0).unwrap();
    assert!(up.point_at(0.0, up.radius).y < 50.0);
    assert!(down.point_at(0.0, down.radius).y > 50.0);
}

#[test]
fn bez_path_spans_the_chord() {
    use kurbo::Shape as _;

    let arc = ArcPath::for_curvature(30.0, 120.0, 20.0).unwrap();
    let bbox = arc.to_bez_path().bounding_box();
    assert!((bbox.x0 - 0.0).abs() < 0.5);
    assert!((bbox.x1 - 120.0).abs() < 0.5);
    assert!(bbox.y0 < 20.0);
}

#[test]
fn straight_placement_matches_shaped_positions() {
    let text = shaped("curve");
    let placed = place_glyphs(&text, None);
    assert_eq!(placed.len(), text.glyphs.len());
    for (p, g) in placed.iter().zip(&text.glyphs) {
        assert_eq!(p.x, f64::from(g.x));
        assert_eq!(p.y, f64::from(g.y));
        assert_eq!(p.rotation, 0.0);
    }
}

#[test]
fn curved_placement_is_symmetric_and_rotated() {
    let text = shaped("abcd");
    let arc = ArcPath::for_curvature(50.0, text.width, f64::from(text.first_baseline)).unwrap();
    let placed = place_glyphs(&text, Some(&arc));
    assert_eq!(placed.len(), 4);

    // Glyph centers, undoing the half-advance step back along the tangent.
    let mids = placed
        .iter()
        .zip(&text.glyphs)
        .map(|(p, g)| {
            let half = f64::from(g.advance) / 2.0;
            (p.x + p.rotation.cos() * half, p.y + p.rotation.sin() * half)
        })
        .collect::<Vec<_>>();

    assert!(placed[0].rotation < 0.0);
    assert!(placed[3].rotation > 0.0);
    assert!((placed[0].rotation + placed[3].rotation).abs() < 1e-9);
    assert!((mids[0].0 + mids[3].0 - text.width).abs() < 1e-6);
    assert!((mids[0].1 - mids[3].1).abs() < 1e-6);
    assert!(mids[1].1 < mids[0].1);
}
