use super::*;
use crate::assets::decode::{encode_data_url, encode_png};

fn tiny_png() -> Vec<u8> {
    encode_png(&[1, 2, 3, 255], 1, 1).unwrap()
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "printzone_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn asset_id_is_stable_and_trim_insensitive() {
    let a = AssetId::for_reference("mockups/front.png");
    let b = AssetId::for_reference("  mockups/front.png ");
    assert_eq!(a, b);
    assert_ne!(a, AssetId::for_reference("mockups/back.png"));
}

#[test]
fn insert_and_lookup() {
    let mut store = AssetStore::new();
    let img = store.insert_bytes("front.png", &tiny_png()).unwrap();
    assert_eq!((img.width, img.height), (1, 1));
    assert_eq!(store.get("front.png").unwrap().pixel(0, 0), [1, 2, 3, 255]);
    assert_eq!(store.get("front.png").unwrap().pixel(5, 0), [0, 0, 0, 0]);
    assert_eq!(store.len(), 1);
}

#[test]
fn corrupt_bytes_are_marked_failed() {
    let mut store = AssetStore::new();
    assert!(store.insert_bytes("bad.png", b"nope").is_err());
    assert!(store.has_failed("bad.png"));
    assert!(store.get("bad.png").is_none());
    assert!(store.is_empty());
}

#[test]
fn inline_references_decode_without_io() {
    let mut store = AssetStore::new();
    let url = encode_data_url("image/png", &tiny_png());
    assert!(store.ensure_inline(&url).unwrap());
    assert!(store.get(&url).is_some());
    assert!(!store.ensure_inline("remote/photo.png").unwrap());
}

#[test]
fn dir_reader_reads_relative_files() {
    let tmp = temp_dir("dir_reader");
    std::fs::create_dir_all(tmp.join("img")).unwrap();
    std::fs::write(tmp.join("img/a.png"), tiny_png()).unwrap();

    let reader = DirAssetReader::new(&tmp);
    assert_eq!(reader.read("img/a.png").unwrap(), tiny_png());
    assert!(reader.read("img/missing.png").is_err());
    assert!(reader.read("../escape.png").is_err());

    std::fs::remove_dir_all(&tmp).ok();
}
