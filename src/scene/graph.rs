//! Ordered layer store of one view.
//!
//! Z-order is sequence position: index 0 is painted first (bottom), the last layer is on top.

use crate::{
    assets::text::TextMeasure,
    foundation::{
        core::{Point, ZoneRect},
        error::{PrintZoneError, PrintZoneResult},
    },
    scene::{
        document::SceneDocument,
        layer::{ImageProps, Layer, LayerId, LayerKind, LayerProperty, TextProps},
    },
    transform::layer::LayerTransform,
};

/// Fraction of the zone width used as the font size of new text layers.
const TEXT_SIZE_OF_ZONE: f64 = 0.15;
/// Fraction of the zone width new image layers are scaled to.
const IMAGE_WIDTH_OF_ZONE: f64 = 0.6;
/// Family requested for new text layers.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Scene graph of a single view.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    layers: Vec<Layer>,
    guide: ZoneRect,
    guide_visible: bool,
    next_id: u64,
}

impl SceneGraph {
    /// Empty graph whose on-screen guide outlines `editor_zone`.
    pub fn new(editor_zone: ZoneRect) -> Self {
        Self {
            layers: Vec::new(),
            guide: editor_zone,
            guide_visible: true,
            next_id: 1,
        }
    }

    /// Rebuild a graph from a stored document.
    pub fn from_document(doc: &SceneDocument, editor_zone: ZoneRect) -> PrintZoneResult<Self> {
        doc.validate()?;
        let next_id = doc.layers.iter().map(|l| l.id.0).max().unwrap_or(0) + 1;
        Ok(Self {
            layers: doc.layers.clone(),
            guide: editor_zone,
            guide_visible: true,
            next_id,
        })
    }

    /// Serialize the layers (never the guide).
    pub fn to_document(&self, canvas_size: u32) -> SceneDocument {
        SceneDocument::new(canvas_size, self.layers.clone())
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when the graph has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Editor zone outlined by the guide.
    pub fn guide(&self) -> ZoneRect {
        self.guide
    }

    /// Whether the guide is currently drawn.
    pub fn guide_visible(&self) -> bool {
        self.guide_visible
    }

    /// Show or hide the guide.
    pub fn set_guide_visible(&mut self, visible: bool) {
        self.guide_visible = visible;
    }

    /// Lookup a layer.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn alloc_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a text layer centered in `zone`, sized relative to the zone width.
    pub fn add_text(
        &mut self,
        zone: ZoneRect,
        content: &str,
        clip_to_zone: bool,
        measure: &mut dyn TextMeasure,
    ) -> LayerId {
        let mut props = TextProps {
            content: content.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: (zone.width * TEXT_SIZE_OF_ZONE).max(1.0),
            fill: "#000000".to_string(),
            font_weight: 400,
            italic: false,
            letter_spacing: 0.0,
            curvature: 0.0,
            width: 0.0,
            height: 0.0,
            curve: None,
        };
        props.relayout(measure);

        let id = self.alloc_id();
        self.layers.push(Layer {
            id,
            kind: LayerKind::Text(props),
            transform: LayerTransform::centered_at(zone.center()),
            opacity: 1.0,
            clip_to_zone,
        });
        tracing::debug!(%id, "added text layer");
        id
    }

    /// Add an image layer scaled to a fraction of the zone width and centered in it.
    pub fn add_image(
        &mut self,
        source: &str,
        width: f64,
        height: f64,
        zone: ZoneRect,
    ) -> PrintZoneResult<LayerId> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PrintZoneError::validation(
                "image dimensions must be finite and > 0",
            ));
        }

        let scale = zone.width * IMAGE_WIDTH_OF_ZONE / width;
        let id = self.alloc_id();
        self.layers.push(Layer {
            id,
            kind: LayerKind::Image(ImageProps {
                source: source.to_string(),
                width,
                height,
                corner_radius: 0.0,
            }),
            transform: LayerTransform {
                scale_x: scale,
                scale_y: scale,
                ..LayerTransform::centered_at(zone.center())
            },
            opacity: 1.0,
            clip_to_zone: true,
        });
        tracing::debug!(%id, scale, "added image layer");
        Ok(id)
    }

    /// Set one property. Missing ids and kind mismatches return `Ok(false)`.
    pub fn update_layer(
        &mut self,
        id: LayerId,
        property: LayerProperty,
        measure: &mut dyn TextMeasure,
    ) -> PrintZoneResult<bool> {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return Ok(false);
        };
        layer.apply(property, measure)
    }

    /// Re-measure text layers, all of them or only those using `family`.
    ///
    /// Returns the number of layers touched. Called once a font arrives.
    pub fn relayout_text(&mut self, family: Option<&str>, measure: &mut dyn TextMeasure) -> usize {
        let mut touched = 0;
        for layer in &mut self.layers {
            if let LayerKind::Text(text) = &mut layer.kind
                && family.is_none_or(|f| text.font_family.eq_ignore_ascii_case(f))
            {
                text.relayout(measure);
                touched += 1;
            }
        }
        touched
    }

    /// Mutate a layer's transform. Returns `false` for missing ids.
    pub fn transform_layer(&mut self, id: LayerId, f: impl FnOnce(&mut LayerTransform)) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        f(&mut layer.transform);
        true
    }

    /// Remove a layer. Returns `false` for missing ids.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.layers.remove(idx);
        true
    }

    /// Move a layer one step towards the top. Returns `false` if missing or already on top.
    pub fn bring_forward(&mut self, id: LayerId) -> bool {
        match self.position(id) {
            Some(idx) if idx + 1 < self.layers.len() => {
                self.layers.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Move a layer one step towards the bottom. Returns `false` if missing or already at the
    /// bottom.
    pub fn send_backward(&mut self, id: LayerId) -> bool {
        match self.position(id) {
            Some(idx) if idx > 0 => {
                self.layers.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    /// Topmost layer whose oriented box contains artwork-space `p`, within `slop` units.
    pub fn layer_at(&self, p: Point, slop: f64) -> Option<LayerId> {
        // Last painted is topmost.
        self.layers
            .iter()
            .rev()
            .find(|l| l.contains(p, slop))
            .map(|l| l.id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
