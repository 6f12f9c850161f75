use super::*;
use crate::foundation::core::ZoneRect;

fn product() -> ProductDescriptor {
    ProductDescriptor::from_json(
        r#"{
            "id": "tee",
            "canvas_size": 500,
            "views": [
                {"id": "front", "editor_zone": {"left": 100, "top": 100, "width": 300, "height": 300},
                 "preview_zone": {"left": 120, "top": 120, "width": 260, "height": 260}},
                {"id": "back", "editor_zone": {"left": 50, "top": 50, "width": 400, "height": 400},
                 "preview_zone": {"left": 50, "top": 50, "width": 400, "height": 400}}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn mount_creates_isolated_states() {
    let product = product();
    let mut store = ViewStore::default();
    let front = product.view("front").unwrap().clone();
    let back = product.view("back").unwrap().clone();

    store
        .mount(&front)
        .scene
        .add_image("a.png", 10.0, 10.0, front.editor_zone)
        .unwrap();
    assert_eq!(store.mount(&back).scene.len(), 0);
    assert_eq!(store.get("front").unwrap().scene.len(), 1);
    assert_eq!(
        store.get("back").unwrap().scene.guide(),
        ZoneRect::new(50.0, 50.0, 400.0, 400.0)
    );
}

#[test]
fn stored_documents_seed_views() {
    let product = product();
    let front = product.view("front").unwrap().clone();
    let mut seed = SceneGraph::new(front.editor_zone);
    seed.add_image("a.png", 10.0, 10.0, front.editor_zone).unwrap();

    let mut docs = BTreeMap::new();
    docs.insert("front".to_string(), seed.to_document(500));
    docs.insert("side".to_string(), seed.to_document(500));
    let store = ViewStore::with_documents(&product, &docs).unwrap();
    assert_eq!(store.get("front").unwrap().scene.layers(), seed.layers());
    assert!(store.get("side").is_none());

    let snap = store.snapshot(&product);
    assert_eq!(snap.product_id, "tee");
    assert_eq!(snap.views.len(), 1);
    assert!(snap.views["front"].raster_data_url.is_none());
}
