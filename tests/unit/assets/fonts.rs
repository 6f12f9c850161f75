use super::*;

#[test]
fn empty_cache_resolves_nothing() {
    let cache = FontCache::empty();
    assert_eq!(cache.face_count(), 0);
    assert!(cache.resolve("Inter", 400, false).is_none());
    assert!(!cache.has_family("Inter"));
}

#[test]
fn non_font_bytes_register_no_families() {
    let cache = FontCache::empty();
    let families = cache.register_bytes(b"definitely not a font".to_vec());
    assert!(families.is_empty());
    assert_eq!(cache.face_count(), 0);
}

#[test]
fn missing_dir_is_ignored() {
    let cache = FontCache::empty();
    cache.load_dir(std::path::Path::new("/nonexistent/printzone/fonts"));
    assert_eq!(cache.face_count(), 0);
}

#[test]
fn system_fonts_fall_back_for_unknown_family() {
    let cache = FontCache::with_system_fonts();
    if cache.face_count() == 0 {
        return;
    }
    let font = cache
        .resolve("No Such Family 7f3a", 400, false)
        .expect("fallback face");
    assert!(font.is_fallback);
    assert!(!font.bytes.is_empty());

    let again = cache.resolve("No Such Family 7f3a", 400, false).unwrap();
    assert_eq!(font.key, again.key);
}
