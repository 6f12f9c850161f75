use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = EngineConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.export_multiplier, 1);
    assert!((cfg.padding_factor - 0.9).abs() < 1e-12);
    assert!(cfg.capabilities.reliable_filters);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let cfg = EngineConfig {
        export_multiplier: 0,
        ..EngineConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = EngineConfig {
        padding_factor: 1.5,
        ..EngineConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn export_size_is_bounded_by_canvas() {
    let cfg = EngineConfig {
        export_multiplier: MAX_EXPORT_MULTIPLIER,
        ..EngineConfig::default()
    };
    assert!(cfg.validate_for_canvas(4096).is_ok());
    assert!(cfg.validate_for_canvas(20_000).is_err());
    assert!(EngineConfig::default().validate_for_canvas(20_000).is_ok());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: EngineConfig =
        serde_json::from_str(r#"{"export_multiplier":2,"presentation":"mobile"}"#).unwrap();
    assert_eq!(cfg.export_multiplier, 2);
    assert_eq!(cfg.presentation, PresentationMode::Mobile);
    assert_eq!(cfg.default_text, "Your text");
}

#[test]
fn mobile_gets_larger_touch_slop() {
    assert!(PresentationMode::Mobile.hit_slop_px() > PresentationMode::Desktop.hit_slop_px());
}
