use super::*;

fn png_2x1() -> Vec<u8> {
    encode_png(&[255, 0, 0, 255, 0, 0, 255, 128], 2, 1).unwrap()
}

#[test]
fn decode_png_premultiplies() {
    let img = decode_image(&png_2x1()).unwrap();
    assert_eq!((img.width, img.height), (2, 1));
    assert_eq!(img.logical_width, 2.0);
    assert_eq!(&img.rgba8_premul[0..4], &[255, 0, 0, 255]);
    assert_eq!(&img.rgba8_premul[4..8], &[0, 0, 128, 128]);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn decode_svg_oversamples_but_keeps_logical_size() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect width="10" height="20" fill="red"/></svg>"#;
    let img = decode_image(svg).unwrap();
    assert_eq!((img.logical_width, img.logical_height), (10.0, 20.0));
    assert_eq!((img.width, img.height), (20, 40));
    assert_eq!(img.rgba8_premul[3], 255);
}

#[test]
fn data_url_roundtrip() {
    let png = png_2x1();
    let url = encode_data_url(sniff_mime(&png), &png);
    assert!(url.starts_with("data:image/png;base64,"));
    assert!(is_data_url(&url));
    assert_eq!(decode_data_url(&url).unwrap(), png);
}

#[test]
fn plain_data_url_and_errors() {
    assert_eq!(decode_data_url("data:text/plain,hi").unwrap(), b"hi");
    assert!(decode_data_url("https://example.com/a.png").is_err());
    assert!(decode_data_url("data:image/png;base64").is_err());
    assert!(decode_data_url("data:image/png;base64,@@@").is_err());
}
