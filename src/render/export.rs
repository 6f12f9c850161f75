//! Native-resolution capture of a view's print region.

use crate::{
    assets::{
        decode::{encode_data_url, encode_png},
        store::AssetStore,
        text::TextMeasure,
    },
    foundation::{
        core::ZoneRect,
        error::{PrintZoneError, PrintZoneResult},
    },
    render::{
        cpu::{CpuRenderer, SceneExtras},
        target::{FrameRgba, NativeCapture, RenderTarget},
    },
    scene::{document::SceneDocument, graph::SceneGraph},
};

/// Straight-alpha RGBA8 raster of a view's print region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedRaster {
    /// Width in pixels (zone width × multiplier).
    pub width: u32,
    /// Height in pixels (zone height × multiplier).
    pub height: u32,
    /// Row-major straight-alpha RGBA8.
    pub rgba8: Vec<u8>,
}

impl ExportedRaster {
    /// Read one pixel; out-of-range coordinates are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.rgba8[i],
            self.rgba8[i + 1],
            self.rgba8[i + 2],
            self.rgba8[i + 3],
        ]
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> PrintZoneResult<Vec<u8>> {
        encode_png(&self.rgba8, self.width, self.height)
    }
}

/// A successful export.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewCapture {
    /// Cropped raster.
    pub raster: ExportedRaster,
    /// The same raster as a `data:image/png;base64,...` URL.
    pub data_url: String,
    /// Scene document at capture time.
    pub scene: SceneDocument,
}

/// Why a view could not be exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The print zone has zero width or height.
    DegenerateZone,
    /// The print zone rounds to less than one pixel at the export multiplier.
    SubPixelZone,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateZone => f.write_str("print zone has no area"),
            Self::SubPixelZone => f.write_str("print zone is smaller than one pixel"),
        }
    }
}

/// Outcome of an export.
#[derive(Clone, Debug, PartialEq)]
pub enum Capture {
    /// Raster and document are available.
    Ready(Box<ViewCapture>),
    /// Nothing to export yet.
    Unavailable(UnavailableReason),
}

impl Capture {
    /// The capture, when ready.
    pub fn ready(&self) -> Option<&ViewCapture> {
        match self {
            Self::Ready(c) => Some(c),
            Self::Unavailable(_) => None,
        }
    }
}

/// Inputs of one export.
pub struct ExportJob<'a> {
    /// Decoded images.
    pub assets: &'a AssetStore,
    /// Text shaper shared with the editor.
    pub measure: &'a mut dyn TextMeasure,
    /// Print region to crop to.
    pub zone: ZoneRect,
    /// Pixels per artwork unit.
    pub multiplier: u32,
}

/// Render the scene at native resolution and crop it to the print zone.
///
/// The target's on-screen dimensions, view transform and guide/backdrop visibility are restored
/// before returning, whatever the outcome.
#[tracing::instrument(skip_all, fields(multiplier = job.multiplier))]
pub fn export_view(
    renderer: &mut CpuRenderer,
    target: &mut RenderTarget,
    scene: &mut SceneGraph,
    job: ExportJob<'_>,
) -> PrintZoneResult<Capture> {
    if job.zone.is_degenerate() {
        tracing::debug!("print zone is degenerate, skipping export");
        return Ok(Capture::Unavailable(UnavailableReason::DegenerateZone));
    }
    if job.multiplier == 0 {
        return Err(PrintZoneError::validation("export multiplier must be >= 1"));
    }
    let (x0, y0, x1, y1) = zone_pixels(job.zone, job.multiplier);
    if x1 <= x0 || y1 <= y0 {
        tracing::debug!(zone = ?job.zone, "print zone rounds to no pixels, skipping export");
        return Ok(Capture::Unavailable(UnavailableReason::SubPixelZone));
    }

    let canvas_size = target.canvas_size().round() as u32;
    let frame = {
        let capture = NativeCapture::begin(target, scene, job.multiplier);
        renderer.render_scene(
            capture.scene(),
            capture.target(),
            job.assets,
            job.measure,
            SceneExtras::default(),
        )?
    };

    let raster = crop_to_zone(frame, job.zone, job.multiplier)?;
    let png = raster.to_png()?;
    let data_url = encode_data_url("image/png", &png);
    tracing::debug!(
        width = raster.width,
        height = raster.height,
        png_bytes = png.len(),
        "exported print region"
    );

    Ok(Capture::Ready(Box::new(ViewCapture {
        raster,
        data_url,
        scene: scene.to_document(canvas_size),
    })))
}

/// Crop a native frame to `zone × multiplier`, converting to straight alpha.
pub fn crop_to_zone(frame: FrameRgba, zone: ZoneRect, multiplier: u32) -> PrintZoneResult<ExportedRaster> {
    let (x0, y0, x1, y1) = zone_pixels(zone, multiplier);
    let x1 = x1.min(frame.width);
    let y1 = y1.min(frame.height);
    if x1 <= x0 || y1 <= y0 {
        return Err(PrintZoneError::render(
            "print zone lies outside the rendered canvas",
        ));
    }

    let frame = frame.into_straight();
    let full = image::RgbaImage::from_raw(frame.width, frame.height, frame.data)
        .ok_or_else(|| PrintZoneError::render("frame buffer does not match its dimensions"))?;
    let cropped = image::imageops::crop_imm(&full, x0, y0, x1 - x0, y1 - y0).to_image();

    Ok(ExportedRaster {
        width: cropped.width(),
        height: cropped.height(),
        rgba8: cropped.into_raw(),
    })
}

/// Pixel edges `(x0, y0, x1, y1)` of `zone × multiplier`.
fn zone_pixels(zone: ZoneRect, multiplier: u32) -> (u32, u32, u32, u32) {
    let m = f64::from(multiplier);
    let edge = |v: f64| (v * m).round().max(0.0) as u32;
    (
        edge(zone.left),
        edge(zone.top),
        edge(zone.left + zone.width),
        edge(zone.top + zone.height),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
