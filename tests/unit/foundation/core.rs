use super::*;

#[test]
fn zone_center_and_percent() {
    let zone = ZoneRect::new(312.0, 262.0, 400.0, 500.0);
    assert_eq!(zone.center(), Point::new(512.0, 512.0));

    let pct = zone.to_percent(1024.0);
    assert!((pct.left - 312.0 / 1024.0).abs() < 1e-12);
    assert!((pct.width - 400.0 / 1024.0).abs() < 1e-12);

    let px = pct.to_pixels(2048, 2048);
    assert!((px.x0 - 624.0).abs() < 1e-9);
    assert!((px.width() - 800.0).abs() < 1e-9);
    assert!((px.height() - 1000.0).abs() < 1e-9);
}

#[test]
fn zone_validation_rejects_out_of_canvas() {
    assert!(
        ZoneRect::new(0.0, 0.0, 1024.0, 1024.0)
            .validate_within(1024.0, "zone")
            .is_ok()
    );
    assert!(
        ZoneRect::new(900.0, 0.0, 200.0, 10.0)
            .validate_within(1024.0, "zone")
            .is_err()
    );
    assert!(
        ZoneRect::new(-1.0, 0.0, 10.0, 10.0)
            .validate_within(1024.0, "zone")
            .is_err()
    );
}

#[test]
fn degenerate_zones_are_detected() {
    assert!(ZoneRect::new(10.0, 10.0, 0.0, 20.0).is_degenerate());
    assert!(ZoneRect::new(10.0, 10.0, 20.0, 0.0).is_degenerate());
    assert!(!ZoneRect::new(10.0, 10.0, 1.0, 1.0).is_degenerate());
}

#[test]
fn hex_colors_parse_and_format() {
    let c = ColorRgba8::parse_hex("#ff8000").unwrap();
    assert_eq!((c.r, c.g, c.b, c.a), (255, 128, 0, 255));
    assert_eq!(c.to_hex(), "#ff8000");

    let short = ColorRgba8::parse_hex("#fff").unwrap();
    assert_eq!((short.r, short.g, short.b), (255, 255, 255));

    let with_alpha = ColorRgba8::parse_hex("00000080").unwrap();
    assert_eq!(with_alpha.a, 128);
    assert_eq!(with_alpha.to_hex(), "#00000080");

    assert!(ColorRgba8::parse_hex("#12").is_err());
    assert!(ColorRgba8::parse_hex("#gggggg").is_err());
    assert!(ColorRgba8::parse_hex("#+f+f+f").is_err());
    assert!(ColorRgba8::parse_hex("#+ff").is_err());
}
