use super::*;
use crate::{
    foundation::core::Point,
    scene::layer::{ImageProps, LayerId},
    transform::layer::LayerTransform,
};

fn image(id: u64) -> Layer {
    Layer {
        id: LayerId(id),
        kind: LayerKind::Image(ImageProps {
            source: "logo.png".to_string(),
            width: 10.0,
            height: 10.0,
            corner_radius: 2.0,
        }),
        transform: LayerTransform::centered_at(Point::new(5.0, 5.0)),
        opacity: 0.5,
        clip_to_zone: false,
    }
}

#[test]
fn json_round_trip_is_lossless() {
    let doc = SceneDocument::new(400, vec![image(1), image(2)]);
    let back = SceneDocument::from_json(&doc.to_json().unwrap()).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn unknown_version_is_rejected() {
    let mut doc = SceneDocument::new(400, vec![]);
    doc.version = 99;
    let json = serde_json::to_string(&doc).unwrap();
    let err = SceneDocument::from_json(&json).unwrap_err();
    assert!(err.to_string().contains("version"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let doc = SceneDocument::new(400, vec![image(3), image(3)]);
    assert!(doc.validate().is_err());
}

#[test]
fn design_state_round_trip() {
    let mut state = DesignState::new("tee");
    state.views.insert(
        "front".to_string(),
        ViewDesign {
            scene: SceneDocument::new(400, vec![image(1)]),
            raster_data_url: Some("data:image/png;base64,AAAA".to_string()),
        },
    );
    let back = DesignState::from_json(&state.to_json().unwrap()).unwrap();
    assert_eq!(back, state);
}
