use std::{io::Cursor, sync::Arc};

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};

use crate::{
    assets::store::PreparedImage,
    foundation::{
        error::{PrintZoneError, PrintZoneResult},
        math::premultiply_rgba8_in_place,
    },
};

/// SVG sources are rasterized at this multiple of their intrinsic size.
const SVG_OVERSAMPLE: f32 = 2.0;

/// Decode encoded image bytes (PNG, JPEG, WebP, ... or SVG) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PrintZoneResult<PreparedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        logical_width: f64::from(width),
        logical_height: f64::from(height),
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> PrintZoneResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() {
        return Err(PrintZoneError::asset("svg has invalid width/height"));
    }
    let width = (size.width() * SVG_OVERSAMPLE).ceil().max(1.0) as u32;
    let height = (size.height() * SVG_OVERSAMPLE).ceil().max(1.0) as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PrintZoneError::asset("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    Ok(PreparedImage {
        width,
        height,
        logical_width: f64::from(size.width()),
        logical_height: f64::from(size.height()),
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

/// Return `true` when `reference` is an inline `data:` URL.
pub fn is_data_url(reference: &str) -> bool {
    reference.trim_start().starts_with("data:")
}

/// Decode the payload of a `data:[<mime>][;base64],<payload>` URL.
pub fn decode_data_url(reference: &str) -> PrintZoneResult<Vec<u8>> {
    let rest = reference
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| PrintZoneError::asset("not a data URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PrintZoneError::asset("data URL has no payload separator"))?;

    if meta.ends_with(";base64") {
        BASE64_STANDARD
            .decode(payload.trim())
            .map_err(|e| PrintZoneError::asset(format!("invalid base64 in data URL: {e}")))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Build a base64 data URL for `bytes` with the given MIME type.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// Best-effort MIME type for encoded image bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if looks_like_svg(bytes) {
        return "image/svg+xml";
    }
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Gif) => "image/gif",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Bmp) => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode straight-alpha RGBA8 pixels as PNG bytes.
pub fn encode_png(rgba8: &[u8], width: u32, height: u32) -> PrintZoneResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8.to_vec())
        .ok_or_else(|| PrintZoneError::render("rgba buffer does not match png dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
