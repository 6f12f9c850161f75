use crate::foundation::error::{PrintZoneError, PrintZoneResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Axis-aligned rectangle in artwork space units.
///
/// Zones mark either the interactive editable region or the visible print region of a product
/// view. A zone with zero width or height is degenerate and cannot be exported.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoneRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width, must be >= 0.
    pub width: f64,
    /// Height, must be >= 0.
    pub height: f64,
}

impl ZoneRect {
    /// Create a zone from its top-left corner and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Geometric center of the zone.
    pub fn center(self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Return `true` when the zone has no area.
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }

    /// Convert to a [`Rect`] (`x0,y0,x1,y1`).
    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Express the zone as fractions of a square canvas of side `canvas_size`.
    pub fn to_percent(self, canvas_size: f64) -> ZonePercent {
        ZonePercent {
            left: self.left / canvas_size,
            top: self.top / canvas_size,
            width: self.width / canvas_size,
            height: self.height / canvas_size,
        }
    }

    /// Validate that the zone is finite, non-negative and inside `[0, canvas_size]²`.
    pub fn validate_within(self, canvas_size: f64, field: &str) -> PrintZoneResult<()> {
        let vals = [self.left, self.top, self.width, self.height];
        if vals.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PrintZoneError::validation(format!(
                "{field} must be finite and non-negative"
            )));
        }
        if self.left + self.width > canvas_size || self.top + self.height > canvas_size {
            return Err(PrintZoneError::validation(format!(
                "{field} exceeds the {canvas_size}x{canvas_size} artwork canvas"
            )));
        }
        Ok(())
    }
}

/// Zone rectangle expressed as fractions (`0..=1`) of the artwork canvas.
///
/// Used to position the design inside a mockup photo of arbitrary pixel size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZonePercent {
    /// Left edge fraction.
    pub left: f64,
    /// Top edge fraction.
    pub top: f64,
    /// Width fraction.
    pub width: f64,
    /// Height fraction.
    pub height: f64,
}

impl ZonePercent {
    /// Resolve to a pixel rectangle in an output of `width × height` pixels.
    pub fn to_pixels(self, width: u32, height: u32) -> Rect {
        let (w, h) = (f64::from(width), f64::from(height));
        Rect::new(
            self.left * w,
            self.top * h,
            (self.left + self.width) * w,
            (self.top + self.height) * h,
        )
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl ColorRgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` hex notation.
    pub fn parse_hex(s: &str) -> PrintZoneResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let digit = |i: usize| -> PrintZoneResult<u8> {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map_err(|_| PrintZoneError::validation(format!("invalid hex color '{s}'")))
        };
        let byte = |i: usize| -> PrintZoneResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| PrintZoneError::validation(format!("invalid hex color '{s}'")))
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PrintZoneError::validation(format!("invalid hex color '{s}'")));
        }
        match hex.len() {
            3 => Ok(Self {
                r: digit(0)? * 17,
                g: digit(1)? * 17,
                b: digit(2)? * 17,
                a: 255,
            }),
            6 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(PrintZoneError::validation(format!("invalid hex color '{s}'"))),
        }
    }

    /// Format as lowercase `#rrggbb` (alpha omitted when opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
