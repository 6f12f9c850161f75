use super::*;
use crate::{
    assets::{decode::encode_png, text::EstimatedMetrics},
    foundation::core::ZoneRect,
    scene::layer::{LayerId, LayerProperty},
    transform::viewport::ViewTransform,
};

const RED: &str = "red.png";

fn assets_with_red() -> AssetStore {
    let rgba = [255u8, 0, 0, 255].repeat(100);
    let png = encode_png(&rgba, 10, 10).unwrap();
    let mut assets = AssetStore::new();
    assets.insert_bytes(RED, &png).unwrap();
    assets
}

fn scene_with_image() -> (SceneGraph, LayerId) {
    let zone = ZoneRect::new(20.0, 20.0, 60.0, 60.0);
    let mut scene = SceneGraph::new(zone);
    scene.set_guide_visible(false);
    let id = scene.add_image(RED, 10.0, 10.0, zone).unwrap();
    (scene, id)
}

fn render(scene: &SceneGraph, assets: &AssetStore) -> FrameRgba {
    let target = RenderTarget::native(100, 1);
    CpuRenderer::new()
        .render_scene(
            scene,
            &target,
            assets,
            &mut EstimatedMetrics,
            SceneExtras::default(),
        )
        .unwrap()
}

#[test]
fn image_layer_lands_at_its_transform() {
    let assets = assets_with_red();
    let (scene, _) = scene_with_image();
    let frame = render(&scene, &assets);
    assert_eq!((frame.width, frame.height), (100, 100));
    assert_eq!(frame.pixel(50, 50), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(5, 5)[3], 0);
    assert_eq!(frame.pixel(75, 50)[3], 0);
}

#[test]
fn clip_to_zone_cuts_outside_pixels() {
    let assets = assets_with_red();
    let (mut scene, id) = scene_with_image();
    scene.transform_layer(id, |t| t.x = 20.0);

    let clipped = render(&scene, &assets);
    assert_eq!(clipped.pixel(10, 50)[3], 0);
    assert_eq!(clipped.pixel(30, 50)[3], 255);

    scene
        .update_layer(id, LayerProperty::ClipToZone(false), &mut EstimatedMetrics)
        .unwrap();
    let unclipped = render(&scene, &assets);
    assert_eq!(unclipped.pixel(10, 50)[3], 255);
}

#[test]
fn opacity_scales_alpha() {
    let assets = assets_with_red();
    let (mut scene, id) = scene_with_image();
    scene
        .update_layer(id, LayerProperty::Opacity(0.5), &mut EstimatedMetrics)
        .unwrap();
    let a = render(&scene, &assets).pixel(50, 50)[3];
    assert!((120..=136).contains(&a), "alpha {a}");
}

#[test]
fn missing_image_is_skipped() {
    let (scene, _) = scene_with_image();
    let frame = render(&scene, &AssetStore::new());
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn text_without_font_draws_nothing() {
    let zone = ZoneRect::new(20.0, 20.0, 60.0, 60.0);
    let mut scene = SceneGraph::new(zone);
    scene.set_guide_visible(false);
    scene.add_text(zone, "Hello", true, &mut EstimatedMetrics);
    let frame = render(&scene, &AssetStore::new());
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn guide_is_drawn_only_when_visible() {
    let zone = ZoneRect::new(20.0, 20.0, 60.0, 60.0);
    let mut scene = SceneGraph::new(zone);
    let frame = render(&scene, &AssetStore::new());
    assert!(frame.data.chunks_exact(4).any(|px| px[3] > 0));
    assert_eq!(frame.pixel(50, 50)[3], 0);

    scene.set_guide_visible(false);
    let frame = render(&scene, &AssetStore::new());
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn backdrop_is_stretched_over_canvas_under_view() {
    let assets = assets_with_red();
    let scene = {
        let (mut s, id) = scene_with_image();
        s.remove_layer(id);
        s
    };
    let view = ViewTransform::fit(200.0, 100.0, 100.0, 1.0).unwrap();
    let target = RenderTarget::new(200, 100, 100.0, view);
    let frame = CpuRenderer::new()
        .render_scene(
            &scene,
            &target,
            &assets,
            &mut EstimatedMetrics,
            SceneExtras {
                backdrop: Some(RED),
            },
        )
        .unwrap();
    // Canvas is centered horizontally: x in 50..150.
    assert_eq!(frame.pixel(100, 50), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(10, 50)[3], 0);
}
