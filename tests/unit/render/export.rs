use super::*;
use crate::{
    assets::{decode::decode_data_url, text::EstimatedMetrics},
    transform::viewport::ViewTransform,
};

fn red_png() -> Vec<u8> {
    encode_png(&[255u8, 0, 0, 255].repeat(100), 10, 10).unwrap()
}

struct Fixture {
    renderer: CpuRenderer,
    target: RenderTarget,
    scene: SceneGraph,
    assets: AssetStore,
    zone: ZoneRect,
}

fn fixture() -> Fixture {
    let zone = ZoneRect::new(300.0, 250.0, 400.0, 500.0);
    let mut assets = AssetStore::new();
    assets.insert_bytes("red.png", &red_png()).unwrap();
    let mut scene = SceneGraph::new(zone);
    scene.add_image("red.png", 10.0, 10.0, zone).unwrap();
    let view = ViewTransform::fit(800.0, 600.0, 1000.0, 0.9).unwrap();
    Fixture {
        renderer: CpuRenderer::new(),
        target: RenderTarget::new(800, 600, 1000.0, view),
        scene,
        assets,
        zone,
    }
}

fn run(f: &mut Fixture, zone: ZoneRect, multiplier: u32) -> Capture {
    export_view(
        &mut f.renderer,
        &mut f.target,
        &mut f.scene,
        ExportJob {
            assets: &f.assets,
            measure: &mut EstimatedMetrics,
            zone,
            multiplier,
        },
    )
    .unwrap()
}

#[test]
fn export_matches_zone_times_multiplier() {
    let mut f = fixture();
    let zone = f.zone;
    let capture = run(&mut f, zone, 2);
    let capture = capture.ready().unwrap();
    assert_eq!((capture.raster.width, capture.raster.height), (800, 1000));
    assert!(capture.data_url.starts_with("data:image/png;base64,"));
    assert_eq!(capture.scene.layers.len(), 1);
}

#[test]
fn exported_pixels_correspond_to_artwork_positions() {
    let mut f = fixture();
    let zone = f.zone;
    let capture = run(&mut f, zone, 2);
    let raster = &capture.ready().unwrap().raster;

    // Image covers artwork 380..620 on both axes.
    let at = |ax: f64, ay: f64| {
        raster.pixel(
            ((ax - zone.left) * 2.0) as u32,
            ((ay - zone.top) * 2.0) as u32,
        )
    };
    assert_eq!(at(500.0, 500.0), [255, 0, 0, 255]);
    assert_eq!(at(385.0, 615.0), [255, 0, 0, 255]);
    assert_eq!(at(305.0, 255.0)[3], 0);
    assert_eq!(at(690.0, 740.0)[3], 0);
}

#[test]
fn guide_and_backdrop_never_reach_the_export() {
    let mut f = fixture();
    let id = f.scene.layers()[0].id;
    f.scene.remove_layer(id);
    let zone = f.zone;
    let capture = run(&mut f, zone, 1);
    let raster = &capture.ready().unwrap().raster;
    assert!(raster.rgba8.iter().all(|&b| b == 0));
}

#[test]
fn data_url_decodes_to_the_raster() {
    let mut f = fixture();
    let zone = ZoneRect::new(350.0, 350.0, 300.0, 300.0);
    let capture = run(&mut f, zone, 1);
    let capture = capture.ready().unwrap();
    let png = decode_data_url(&capture.data_url).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (300, 300));
    assert_eq!(decoded.into_raw(), capture.raster.rgba8);
}

#[test]
fn degenerate_zone_is_unavailable() {
    let mut f = fixture();
    let capture = run(&mut f, ZoneRect::new(10.0, 10.0, 0.0, 40.0), 1);
    assert_eq!(
        capture,
        Capture::Unavailable(UnavailableReason::DegenerateZone)
    );
}

#[test]
fn sub_pixel_zone_is_unavailable() {
    let mut f = fixture();
    let capture = run(&mut f, ZoneRect::new(10.0, 10.0, 0.3, 40.0), 1);
    assert_eq!(
        capture,
        Capture::Unavailable(UnavailableReason::SubPixelZone)
    );
    // The same zone covers a pixel once multiplied.
    let capture = run(&mut f, ZoneRect::new(10.0, 10.0, 0.3, 40.0), 2);
    let ready = capture.ready().unwrap();
    assert_eq!((ready.raster.width, ready.raster.height), (1, 80));
}

#[test]
fn export_restores_on_screen_target() {
    let mut f = fixture();
    let before = f.target.clone();
    let zone = f.zone;
    run(&mut f, zone, 2);
    assert_eq!(f.target, before);
    assert!(f.scene.guide_visible());
}

#[test]
fn crop_rejects_zone_outside_frame() {
    let frame = FrameRgba::transparent(10, 10);
    assert!(crop_to_zone(frame, ZoneRect::new(20.0, 20.0, 5.0, 5.0), 1).is_err());
}
