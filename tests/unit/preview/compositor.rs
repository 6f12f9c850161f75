use super::*;
use std::sync::Arc;

const GREY: [u8; 4] = [128, 128, 128, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn base() -> PreparedImage {
    PreparedImage {
        width: 200,
        height: 200,
        logical_width: 200.0,
        logical_height: 200.0,
        rgba8_premul: Arc::new(GREY.repeat(200 * 200)),
    }
}

fn design() -> ExportedRaster {
    ExportedRaster {
        width: 100,
        height: 100,
        rgba8: RED.repeat(100 * 100),
    }
}

fn zone() -> ZonePercent {
    ZonePercent {
        left: 0.25,
        top: 0.25,
        width: 0.5,
        height: 0.5,
    }
}

fn settings(warp: bool, show_outline: bool) -> MockupSettings {
    MockupSettings {
        warp,
        displacement_scale: 20.0,
        show_outline,
    }
}

struct Maps {
    displacement: GreyMap,
    highlight: GreyMap,
    shadow: GreyMap,
}

fn neutral_maps() -> Maps {
    Maps {
        displacement: GreyMap::filled(1, 1, 255),
        highlight: GreyMap::filled(1, 1, NEUTRAL_HIGHLIGHT),
        shadow: GreyMap::filled(1, 1, NEUTRAL_SHADOW),
    }
}

fn inputs<'a>(
    base: &'a PreparedImage,
    design: Option<&'a ExportedRaster>,
    maps: &'a Maps,
) -> MockupInputs<'a> {
    MockupInputs {
        base: Some(base),
        fallback_size: (1, 1),
        design,
        zone: zone(),
        displacement: Some(&maps.displacement),
        highlight: Some(&maps.highlight),
        shadow: Some(&maps.shadow),
    }
}

#[test]
fn unwarped_design_lands_in_zone_rect() {
    let (b, d, maps) = (base(), design(), neutral_maps());
    let out = composite_mockup(inputs(&b, Some(&d), &maps), settings(false, false)).unwrap();
    assert_eq!((out.width, out.height), (200, 200));
    assert_eq!(out.pixel(100, 100), RED);
    assert_eq!(out.pixel(50, 50), RED);
    assert_eq!(out.pixel(149, 149), RED);
    assert_eq!(out.pixel(10, 10), GREY);
    assert_eq!(out.pixel(150, 100), GREY);
}

#[test]
fn warp_shifts_the_design() {
    let (b, d, maps) = (base(), design(), neutral_maps());
    let warped = composite_mockup(inputs(&b, Some(&d), &maps), settings(true, false)).unwrap();
    // Full-white map: offset of +10 design pixels on both axes.
    assert_eq!(warped.pixel(145, 100), GREY);
    assert_eq!(warped.pixel(55, 55), RED);

    let flat = composite_mockup(inputs(&b, Some(&d), &maps), settings(false, false)).unwrap();
    assert_eq!(flat.pixel(145, 100), RED);
}

#[test]
fn highlight_and_shadow_only_touch_the_design() {
    let b = base();
    let d = design();
    let maps = Maps {
        displacement: GreyMap::filled(1, 1, NEUTRAL_DISPLACEMENT),
        highlight: GreyMap::filled(1, 1, 255),
        shadow: GreyMap::filled(1, 1, NEUTRAL_SHADOW),
    };
    let out = composite_mockup(inputs(&b, Some(&d), &maps), settings(true, false)).unwrap();
    assert_eq!(out.pixel(100, 100), [255, 255, 255, 255]);
    assert_eq!(out.pixel(10, 10), GREY);

    let maps = Maps {
        displacement: GreyMap::filled(1, 1, NEUTRAL_DISPLACEMENT),
        highlight: GreyMap::filled(1, 1, NEUTRAL_HIGHLIGHT),
        shadow: GreyMap::filled(1, 1, 0),
    };
    let out = composite_mockup(inputs(&b, Some(&d), &maps), settings(true, false)).unwrap();
    assert_eq!(out.pixel(100, 100), [0, 0, 0, 255]);
    assert_eq!(out.pixel(190, 190), GREY);
}

#[test]
fn default_maps_leave_bare_photo_untouched() {
    let (b, d) = (base(), design());
    let out = composite_mockup(
        MockupInputs {
            base: Some(&b),
            fallback_size: (1, 1),
            design: Some(&d),
            zone: zone(),
            displacement: None,
            highlight: None,
            shadow: None,
        },
        settings(true, false),
    )
    .unwrap();
    assert_eq!(out.pixel(10, 10), GREY);
    assert_eq!(out.pixel(199, 199), GREY);
    let center = out.pixel(100, 100);
    assert!(center[0] > 200 && center[3] == 255);
}

#[test]
fn outline_sits_under_the_design() {
    let (b, d, maps) = (base(), design(), neutral_maps());
    let outlined = composite_mockup(inputs(&b, None, &maps), settings(false, true)).unwrap();
    assert_ne!(outlined.pixel(50, 50), GREY);
    assert_eq!(outlined.pixel(100, 100), GREY);

    let covered = composite_mockup(inputs(&b, Some(&d), &maps), settings(false, true)).unwrap();
    assert_eq!(covered.pixel(50, 50), RED);
}

#[test]
fn missing_photo_uses_fallback_canvas() {
    let d = design();
    let out = composite_mockup(
        MockupInputs {
            base: None,
            fallback_size: (40, 40),
            design: Some(&d),
            zone: zone(),
            displacement: None,
            highlight: None,
            shadow: None,
        },
        settings(false, false),
    )
    .unwrap();
    assert_eq!((out.width, out.height), (40, 40));
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(20, 20)[3], 255);
}
