use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PrintZoneError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PrintZoneError::asset("x").to_string().contains("asset error:"));
    assert!(
        PrintZoneError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        PrintZoneError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PrintZoneError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: PrintZoneError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PrintZoneError::Serde(_)));
}
