//! Greyscale maps for the mockup compositor.

use crate::{
    assets::store::PreparedImage,
    foundation::{core::Rect, math::mul_div255_u8},
};

/// Grey level at which a displacement map produces no offset.
pub const NEUTRAL_DISPLACEMENT: u8 = 128;
/// Grey level at which a highlight (screen) map changes nothing.
pub const NEUTRAL_HIGHLIGHT: u8 = 0;
/// Grey level at which a shadow (multiply) map changes nothing.
pub const NEUTRAL_SHADOW: u8 = 255;

/// Single-channel 8-bit map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreyMap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major grey levels.
    pub data: Vec<u8>,
}

impl GreyMap {
    /// Uniform map.
    pub fn filled(width: u32, height: u32, level: u8) -> Self {
        Self {
            width,
            height,
            data: vec![level; width as usize * height as usize],
        }
    }

    /// Build a map from a function of normalized coordinates `(u, v)` in `0..1`.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(f64, f64) -> u8) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let v = (f64::from(y) + 0.5) / f64::from(height.max(1));
            for x in 0..width {
                let u = (f64::from(x) + 0.5) / f64::from(width.max(1));
                data.push(f(u, v));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Luminance of a decoded image, flattened over white.
    pub fn from_image(img: &PreparedImage) -> Self {
        let mut data = Vec::with_capacity(img.width as usize * img.height as usize);
        for px in img.rgba8_premul.chunks_exact(4) {
            // Premultiplied over white: c + (255 - a).
            let bg = 255 - u16::from(px[3]);
            let r = (u32::from(px[0]) + u32::from(bg)).min(255);
            let g = (u32::from(px[1]) + u32::from(bg)).min(255);
            let b = (u32::from(px[2]) + u32::from(bg)).min(255);
            data.push(((r * 77 + g * 150 + b * 29 + 128) >> 8) as u8);
        }
        Self {
            width: img.width,
            height: img.height,
            data,
        }
    }

    /// Bilinear sample at normalized coordinates, clamped to the edges.
    pub fn sample(&self, u: f64, v: f64) -> u8 {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        let x = (u * f64::from(self.width) - 0.5).clamp(0.0, f64::from(self.width - 1));
        let y = (v * f64::from(self.height) - 0.5).clamp(0.0, f64::from(self.height - 1));
        let (x0, y0) = (x.floor() as u32, y.floor() as u32);
        let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
        let (fx, fy) = (x - f64::from(x0), y - f64::from(y0));

        let at = |xx: u32, yy: u32| f64::from(self.data[(yy * self.width + xx) as usize]);
        let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
        let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
        (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
    }
}

/// A map stretched over a rectangle of the output frame.
///
/// Outside the rectangle it reads as `neutral`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMap {
    /// Map pixels.
    pub map: GreyMap,
    /// Output-pixel rectangle the map covers.
    pub rect: Rect,
    /// Level returned outside `rect`.
    pub neutral: u8,
}

impl PlacedMap {
    /// Sample at output pixel center `(x + 0.5, y + 0.5)`.
    pub fn at(&self, x: u32, y: u32) -> u8 {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;
        if px < self.rect.x0 || px >= self.rect.x1 || py < self.rect.y0 || py >= self.rect.y1 {
            return self.neutral;
        }
        let u = (px - self.rect.x0) / self.rect.width();
        let v = (py - self.rect.y0) / self.rect.height();
        self.map.sample(u, v)
    }
}

const DEFAULT_MAP_SIZE: u32 = 64;

/// Generic fabric sheen: a soft light spot towards the upper left of the print region.
pub fn default_highlight_map() -> GreyMap {
    GreyMap::from_fn(DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE, |u, v| {
        let (dx, dy) = (u - 0.3, v - 0.25);
        let d = (dx * dx + dy * dy).sqrt();
        let falloff = (1.0 - d / 0.6).clamp(0.0, 1.0);
        (falloff * falloff * 56.0).round() as u8
    })
}

/// Generic ambient occlusion: darker towards the edges of the print region.
pub fn default_shadow_map() -> GreyMap {
    GreyMap::from_fn(DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE, |u, v| {
        let edge = u.min(1.0 - u).min(v).min(1.0 - v);
        let t = (edge / 0.2).clamp(0.0, 1.0);
        let darkening = mul_div255_u8(((1.0 - t) * 255.0) as u16, 48);
        255 - darkening
    })
}

/// Flat displacement map: no warp.
pub fn default_displacement_map() -> GreyMap {
    GreyMap::filled(1, 1, NEUTRAL_DISPLACEMENT)
}

#[cfg(test)]
#[path = "../../tests/unit/preview/maps.rs"]
mod tests;
