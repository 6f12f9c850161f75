use super::*;

fn tee_json() -> &'static str {
    r##"{
        "id": "tee",
        "name": "Classic tee",
        "canvas_size": 1024,
        "views": [
            {
                "id": "front",
                "name": "Front",
                "editor_zone": {"left": 312, "top": 262, "width": 400, "height": 500},
                "preview_zone": {"left": 312, "top": 262, "width": 400, "height": 500},
                "background_image": "front.png"
            },
            {
                "id": "back",
                "editor_zone": {"left": 262, "top": 200, "width": 500, "height": 600},
                "preview_zone": {"left": 300, "top": 220, "width": 420, "height": 560}
            }
        ],
        "color_variants": [
            {"id": "navy", "swatch": "#001f3f", "images": {"front": "navy_front.png"}}
        ],
        "default_image": "plain.png"
    }"##
}

#[test]
fn parses_and_validates() {
    let product = ProductDescriptor::from_json(tee_json()).unwrap();
    assert_eq!(product.canvas_size, 1024);
    assert_eq!(product.views.len(), 2);
    assert!(product.clip_text_to_zone);
    assert_eq!(product.first_view().id, "front");
}

#[test]
fn background_resolution_falls_back() {
    let product = ProductDescriptor::from_json(tee_json()).unwrap();
    assert_eq!(
        product.background_for("front", Some("navy")),
        Some("navy_front.png")
    );
    // variant lacks a back image, view lacks a background: product default
    assert_eq!(product.background_for("back", Some("navy")), Some("plain.png"));
    assert_eq!(product.background_for("front", None), Some("front.png"));
    assert_eq!(product.background_for("front", Some("missing")), Some("front.png"));
}

#[test]
fn rejects_zone_outside_canvas() {
    let mut product = ProductDescriptor::from_json(tee_json()).unwrap();
    product.views[0].preview_zone = ZoneRect::new(900.0, 0.0, 400.0, 10.0);
    assert!(product.validate().is_err());
}

#[test]
fn rejects_duplicate_views_and_unknown_variant_views() {
    let mut product = ProductDescriptor::from_json(tee_json()).unwrap();
    product.views[1].id = "front".to_string();
    assert!(product.validate().is_err());

    let mut product = ProductDescriptor::from_json(tee_json()).unwrap();
    product.color_variants[0]
        .images
        .insert("sleeve".to_string(), "x.png".to_string());
    assert!(product.validate().is_err());
}

#[test]
fn rejects_empty_product() {
    let mut product = ProductDescriptor::from_json(tee_json()).unwrap();
    product.views.clear();
    assert!(product.validate().is_err());

    let mut product = ProductDescriptor::from_json(tee_json()).unwrap();
    product.canvas_size = 0;
    assert!(product.validate().is_err());
    product.canvas_size = 70_000;
    assert!(product.validate().is_err());
}
