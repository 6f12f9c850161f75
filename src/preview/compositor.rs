//! Photographic mockup compositing.
//!
//! Strict z-order, bottom to top: product photo, optional dashed print-zone outline, the design
//! raster (warped by the displacement map), the highlight map in screen mode and the shadow map in
//! multiply mode. Highlight and shadow only touch pixels the design covers, weighted by design
//! alpha; the bare photo is never altered.

use rayon::prelude::*;

use crate::{
    assets::store::PreparedImage,
    foundation::{
        core::{ColorRgba8, Rect, ZonePercent},
        error::{PrintZoneError, PrintZoneResult},
        math::{lerp_u8, multiply_u8, over, premultiply_rgba8_in_place, screen_u8},
    },
    preview::maps::{
        GreyMap, NEUTRAL_DISPLACEMENT, NEUTRAL_HIGHLIGHT, NEUTRAL_SHADOW, PlacedMap,
        default_highlight_map, default_shadow_map,
    },
    render::{export::ExportedRaster, target::FrameRgba},
};

const OUTLINE_DASH: u32 = 8;
const OUTLINE_GAP: u32 = 6;
const OUTLINE_COLOR: ColorRgba8 = ColorRgba8 {
    r: 0xff,
    g: 0xff,
    b: 0xff,
    a: 0xc0,
};

/// Inputs of one mockup composite.
#[derive(Clone, Copy, Debug)]
pub struct MockupInputs<'a> {
    /// Product photo for the active view and color; `None` composites over transparency.
    pub base: Option<&'a PreparedImage>,
    /// Output size used when there is no photo.
    pub fallback_size: (u32, u32),
    /// Exported design raster of the print region.
    pub design: Option<&'a ExportedRaster>,
    /// Print region as fractions of the artwork canvas.
    pub zone: ZonePercent,
    /// Photo-aligned displacement map.
    pub displacement: Option<&'a GreyMap>,
    /// Photo-aligned highlight map; a generic sheen is used when absent.
    pub highlight: Option<&'a GreyMap>,
    /// Photo-aligned shadow map; a generic vignette is used when absent.
    pub shadow: Option<&'a GreyMap>,
}

/// Compositing switches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MockupSettings {
    /// Apply the displacement warp.
    pub warp: bool,
    /// Maximum offset, in design pixels, of a full-contrast displacement map.
    pub displacement_scale: f64,
    /// Draw the dashed print-zone outline.
    pub show_outline: bool,
}

/// Composite the mockup. Returns a premultiplied frame of the photo's size.
#[tracing::instrument(skip_all, fields(warp = settings.warp))]
pub fn composite_mockup(
    inputs: MockupInputs<'_>,
    settings: MockupSettings,
) -> PrintZoneResult<FrameRgba> {
    let mut frame = match inputs.base {
        Some(base) => FrameRgba {
            width: base.width,
            height: base.height,
            data: base.rgba8_premul.as_ref().clone(),
            premultiplied: true,
        },
        None => FrameRgba::transparent(inputs.fallback_size.0, inputs.fallback_size.1),
    };
    if frame.width == 0 || frame.height == 0 {
        return Err(PrintZoneError::render("mockup output has zero area"));
    }

    let zone_px = inputs.zone.to_pixels(frame.width, frame.height);
    if settings.show_outline {
        draw_dashed_outline(&mut frame, zone_px, OUTLINE_COLOR);
    }

    let Some(design) = inputs.design else {
        return Ok(frame);
    };
    if design.width == 0 || design.height == 0 || zone_px.width() <= 0.0 || zone_px.height() <= 0.0
    {
        return Ok(frame);
    }

    let full = Rect::new(0.0, 0.0, f64::from(frame.width), f64::from(frame.height));
    let displacement = if settings.warp {
        inputs.displacement.map(|m| PlacedMap {
            map: m.clone(),
            rect: full,
            neutral: NEUTRAL_DISPLACEMENT,
        })
    } else {
        None
    };
    let highlight = match inputs.highlight {
        Some(m) => PlacedMap {
            map: m.clone(),
            rect: full,
            neutral: NEUTRAL_HIGHLIGHT,
        },
        None => PlacedMap {
            map: default_highlight_map(),
            rect: zone_px,
            neutral: NEUTRAL_HIGHLIGHT,
        },
    };
    let shadow = match inputs.shadow {
        Some(m) => PlacedMap {
            map: m.clone(),
            rect: full,
            neutral: NEUTRAL_SHADOW,
        },
        None => PlacedMap {
            map: default_shadow_map(),
            rect: zone_px,
            neutral: NEUTRAL_SHADOW,
        },
    };

    let mut design_premul = design.rgba8.clone();
    premultiply_rgba8_in_place(&mut design_premul);
    let sampler = DesignSampler {
        width: design.width,
        height: design.height,
        data: &design_premul,
    };

    // Design pixels per output pixel.
    let to_design_x = f64::from(design.width) / zone_px.width();
    let to_design_y = f64::from(design.height) / zone_px.height();
    let scale = settings.displacement_scale;

    let y_start = zone_px.y0.floor().max(0.0) as u32;
    let y_end = (zone_px.y1.ceil().max(0.0) as u32).min(frame.height);
    let x_start = zone_px.x0.floor().max(0.0) as u32;
    let x_end = (zone_px.x1.ceil().max(0.0) as u32).min(frame.width);
    let row_bytes = frame.width as usize * 4;

    frame
        .data
        .par_chunks_mut(row_bytes)
        .enumerate()
        .skip(y_start as usize)
        .take(y_end.saturating_sub(y_start) as usize)
        .for_each(|(y, row)| {
            let y = y as u32;
            for x in x_start..x_end {
                let mut dx = 0.0;
                let mut dy = 0.0;
                if let Some(disp) = &displacement {
                    let offset = scale * (f64::from(disp.at(x, y)) / 255.0 - 0.5);
                    dx = offset;
                    dy = offset;
                }

                let sx = (f64::from(x) + 0.5 - zone_px.x0) * to_design_x + dx;
                let sy = (f64::from(y) + 0.5 - zone_px.y0) * to_design_y + dy;
                let src = sampler.sample(sx - 0.5, sy - 0.5);
                if src[3] == 0 {
                    continue;
                }

                let i = x as usize * 4;
                let dst = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                let composed = over(dst, src, 1.0);
                let lit = shade(composed, highlight.at(x, y), shadow.at(x, y));
                let weighted = [
                    lerp_u8(composed[0], lit[0], src[3]),
                    lerp_u8(composed[1], lit[1], src[3]),
                    lerp_u8(composed[2], lit[2], src[3]),
                    composed[3],
                ];
                row[i..i + 4].copy_from_slice(&weighted);
            }
        });

    Ok(frame)
}

/// Screen with `highlight`, then multiply with `shadow`, on a premultiplied pixel.
fn shade(px: [u8; 4], highlight: u8, shadow: u8) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return px;
    }
    let mut out = px;
    for c in &mut out[..3] {
        // Blend modes operate on straight color.
        let straight = ((u32::from(*c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
        let blended = multiply_u8(screen_u8(straight, highlight), shadow);
        *c = crate::foundation::math::mul_div255_u8(u16::from(blended), u16::from(a));
    }
    out
}

struct DesignSampler<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl DesignSampler<'_> {
    fn texel(&self, x: i64, y: i64) -> [f64; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0.0; 4];
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            f64::from(self.data[i]),
            f64::from(self.data[i + 1]),
            f64::from(self.data[i + 2]),
            f64::from(self.data[i + 3]),
        ]
    }

    /// Bilinear sample in pixel-center coordinates; outside the raster is transparent.
    fn sample(&self, x: f64, y: f64) -> [u8; 4] {
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);
        let a = self.texel(x0, y0);
        let b = self.texel(x0 + 1, y0);
        let c = self.texel(x0, y0 + 1);
        let d = self.texel(x0 + 1, y0 + 1);

        let mut out = [0u8; 4];
        for k in 0..4 {
            let top = a[k] * (1.0 - fx) + b[k] * fx;
            let bottom = c[k] * (1.0 - fx) + d[k] * fx;
            out[k] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

fn draw_dashed_outline(frame: &mut FrameRgba, rect: Rect, color: ColorRgba8) {
    let mut src = [color.r, color.g, color.b, color.a];
    premultiply_rgba8_in_place(&mut src);

    let clamp_x = |v: f64| (v.round().max(0.0) as u32).min(frame.width.saturating_sub(1));
    let clamp_y = |v: f64| (v.round().max(0.0) as u32).min(frame.height.saturating_sub(1));
    let (x0, x1) = (clamp_x(rect.x0), clamp_x(rect.x1 - 1.0));
    let (y0, y1) = (clamp_y(rect.y0), clamp_y(rect.y1 - 1.0));
    let period = OUTLINE_DASH + OUTLINE_GAP;

    let mut plot = |x: u32, y: u32| {
        let i = (y as usize * frame.width as usize + x as usize) * 4;
        let dst = [
            frame.data[i],
            frame.data[i + 1],
            frame.data[i + 2],
            frame.data[i + 3],
        ];
        frame.data[i..i + 4].copy_from_slice(&over(dst, src, 1.0));
    };

    for x in x0..=x1 {
        if (x - x0) % period < OUTLINE_DASH {
            plot(x, y0);
            if y1 != y0 {
                plot(x, y1);
            }
        }
    }
    for y in y0..=y1 {
        if (y - y0) % period < OUTLINE_DASH {
            plot(x0, y);
            if x1 != x0 {
                plot(x1, y);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/compositor.rs"]
mod tests;
