use crate::{
    assets::text::{TextMeasure, TextStyle},
    foundation::{
        core::{Affine, ColorRgba8, Point, Rect},
        error::{PrintZoneError, PrintZoneResult},
    },
    scene::curvature::{ArcPath, clamp_curvature},
    transform::layer::LayerTransform,
};

/// Stable identifier of a layer within one scene graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A placed element in a view's scene graph.
pub struct Layer {
    /// Identifier, unique within its graph.
    pub id: LayerId,
    /// Kind-specific properties.
    #[serde(flatten)]
    pub kind: LayerKind,
    /// Placement in artwork space.
    pub transform: LayerTransform,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Clip the rendered layer to the view's editor zone.
    pub clip_to_zone: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Layer payload.
pub enum LayerKind {
    /// Shaped text, optionally on an arc.
    Text(TextProps),
    /// Raster or vector image.
    Image(ImageProps),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Text layer properties.
pub struct TextProps {
    /// Text content.
    pub content: String,
    /// Requested font family.
    pub font_family: String,
    /// Font size in artwork units.
    pub font_size: f64,
    /// Fill color, hex notation.
    pub fill: String,
    /// CSS-style weight.
    #[serde(default = "default_weight")]
    pub font_weight: u16,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
    /// Extra spacing after each glyph, artwork units.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Curvature angle in degrees; 0 is straight.
    #[serde(default)]
    pub curvature: f64,
    /// Flat (uncurved) text box width, derived from measurement.
    #[serde(default)]
    pub width: f64,
    /// Text box height, derived from measurement.
    #[serde(default)]
    pub height: f64,
    /// Arc the glyphs follow; present only when curvature is non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<ArcPath>,
}

fn default_weight() -> u16 {
    400
}

impl TextProps {
    /// Shaping inputs for these properties.
    pub fn style(&self) -> TextStyle {
        TextStyle {
            content: self.content.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size as f32,
            font_weight: self.font_weight,
            italic: self.italic,
            letter_spacing: self.letter_spacing as f32,
        }
    }

    /// Re-measure the flat box and rebuild the arc.
    pub fn relayout(&mut self, measure: &mut dyn TextMeasure) {
        let shaped = measure.shape(&self.style());
        self.width = shaped.width;
        self.height = shaped.height;
        self.curve = ArcPath::for_curvature(
            self.curvature,
            self.width,
            f64::from(shaped.first_baseline),
        );
    }

    /// Parsed fill color; malformed values render black.
    pub fn fill_color(&self) -> ColorRgba8 {
        ColorRgba8::parse_hex(&self.fill).unwrap_or(ColorRgba8::BLACK)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Image layer properties.
pub struct ImageProps {
    /// Source reference (URL, relative path or data URL).
    pub source: String,
    /// Intrinsic width in artwork units.
    pub width: f64,
    /// Intrinsic height in artwork units.
    pub height: f64,
    /// Corner radius in local (unscaled) units.
    #[serde(default)]
    pub corner_radius: f64,
}

impl Layer {
    /// Local box size `(width, height)` before the transform.
    pub fn size(&self) -> (f64, f64) {
        match &self.kind {
            LayerKind::Text(t) => (t.width, t.height),
            LayerKind::Image(i) => (i.width, i.height),
        }
    }

    /// Local box to artwork space.
    pub fn affine(&self) -> Affine {
        let (w, h) = self.size();
        self.transform.to_affine(w, h)
    }

    /// Axis-aligned artwork-space bounds.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.size();
        self.transform.bounds(w, h)
    }

    /// Return `true` when artwork-space `p` hits the layer's oriented box, grown by `slop`.
    pub fn contains(&self, p: Point, slop: f64) -> bool {
        let (w, h) = self.size();
        self.transform.contains(w, h, p, slop)
    }

    /// Short kind name for logs and snapshots.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            LayerKind::Text(_) => "text",
            LayerKind::Image(_) => "image",
        }
    }

    /// Apply one property change.
    ///
    /// Returns `Ok(false)` when the property does not apply to this layer's kind. Text changes that
    /// affect geometry re-measure the text and rebuild its arc.
    pub fn apply(
        &mut self,
        property: LayerProperty,
        measure: &mut dyn TextMeasure,
    ) -> PrintZoneResult<bool> {
        match property {
            LayerProperty::Opacity(v) => {
                if !v.is_finite() {
                    return Err(PrintZoneError::validation("opacity must be finite"));
                }
                self.opacity = v.clamp(0.0, 1.0);
                return Ok(true);
            }
            LayerProperty::ClipToZone(v) => {
                self.clip_to_zone = v;
                return Ok(true);
            }
            _ => {}
        }

        match (&mut self.kind, property) {
            (LayerKind::Image(img), LayerProperty::CornerRadius(r)) => {
                if !r.is_finite() || r < 0.0 {
                    return Err(PrintZoneError::validation(
                        "corner radius must be finite and >= 0",
                    ));
                }
                img.corner_radius = r;
                Ok(true)
            }
            (LayerKind::Text(text), property) => {
                match property {
                    LayerProperty::Content(v) => text.content = v,
                    LayerProperty::FontFamily(v) => text.font_family = v,
                    LayerProperty::FontSize(v) => {
                        if !v.is_finite() || v <= 0.0 {
                            return Err(PrintZoneError::validation(
                                "font size must be finite and > 0",
                            ));
                        }
                        text.font_size = v;
                    }
                    LayerProperty::Fill(v) => {
                        text.fill = ColorRgba8::parse_hex(&v)?.to_hex();
                        return Ok(true);
                    }
                    LayerProperty::FontWeight(v) => text.font_weight = v.clamp(1, 1000),
                    LayerProperty::Italic(v) => text.italic = v,
                    LayerProperty::LetterSpacing(v) => {
                        if !v.is_finite() {
                            return Err(PrintZoneError::validation(
                                "letter spacing must be finite",
                            ));
                        }
                        text.letter_spacing = v;
                    }
                    LayerProperty::Curvature(v) => text.curvature = clamp_curvature(v),
                    _ => return Ok(false),
                }
                text.relayout(measure);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Read-only copy for selection events.
    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            id: self.id,
            kind: self.kind.clone(),
            transform: self.transform,
            opacity: self.opacity,
            clip_to_zone: self.clip_to_zone,
            bounds: self.bounds(),
        }
    }
}

/// A typed single-property update.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerProperty {
    /// Text content.
    Content(String),
    /// Font family name.
    FontFamily(String),
    /// Font size.
    FontSize(f64),
    /// Fill color, hex notation.
    Fill(String),
    /// CSS-style weight.
    FontWeight(u16),
    /// Italic on/off.
    Italic(bool),
    /// Letter spacing.
    LetterSpacing(f64),
    /// Curvature in degrees.
    Curvature(f64),
    /// Layer opacity.
    Opacity(f64),
    /// Image corner radius.
    CornerRadius(f64),
    /// Clip to the editor zone.
    ClipToZone(bool),
}

impl LayerProperty {
    /// Parse the string-keyed form used at the UI boundary.
    ///
    /// Keys accept both `camelCase` and `snake_case`. `fontWeight` also accepts `"normal"` and
    /// `"bold"`, `fontStyle` accepts `"normal"` and `"italic"`.
    pub fn from_key_value(key: &str, value: &serde_json::Value) -> PrintZoneResult<Self> {
        let bad = || PrintZoneError::validation(format!("invalid value for '{key}': {value}"));
        let num = || value.as_f64().ok_or_else(bad);
        let string = || value.as_str().map(str::to_string).ok_or_else(bad);
        let boolean = || value.as_bool().ok_or_else(bad);

        let prop = match key {
            "text" | "content" => Self::Content(string()?),
            "fontFamily" | "font_family" => Self::FontFamily(string()?),
            "fontSize" | "font_size" => Self::FontSize(num()?),
            "fill" => Self::Fill(string()?),
            "fontWeight" | "font_weight" => Self::FontWeight(match value {
                serde_json::Value::String(s) if s == "normal" => 400,
                serde_json::Value::String(s) if s == "bold" => 700,
                serde_json::Value::String(s) => s.parse::<u16>().map_err(|_| bad())?,
                _ => u16::try_from(value.as_u64().ok_or_else(bad)?).map_err(|_| bad())?,
            }),
            "fontStyle" | "font_style" => Self::Italic(match value.as_str() {
                Some("italic") | Some("oblique") => true,
                Some("normal") => false,
                _ => return Err(bad()),
            }),
            "italic" => Self::Italic(boolean()?),
            "letterSpacing" | "letter_spacing" | "charSpacing" => Self::LetterSpacing(num()?),
            "curvature" => Self::Curvature(num()?),
            "opacity" => Self::Opacity(num()?),
            "cornerRadius" | "corner_radius" => Self::CornerRadius(num()?),
            "clipToZone" | "clip_to_zone" => Self::ClipToZone(boolean()?),
            _ => {
                return Err(PrintZoneError::validation(format!(
                    "unknown layer property '{key}'"
                )));
            }
        };
        Ok(prop)
    }
}

/// Read-only copy of a layer's properties, published with selection events.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSnapshot {
    /// Layer id.
    pub id: LayerId,
    /// Kind-specific properties.
    pub kind: LayerKind,
    /// Placement.
    pub transform: LayerTransform,
    /// Opacity.
    pub opacity: f64,
    /// Zone clipping flag.
    pub clip_to_zone: bool,
    /// Artwork-space bounds.
    pub bounds: Rect,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layer.rs"]
mod tests;
