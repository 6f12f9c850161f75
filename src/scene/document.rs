use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::error::{PrintZoneError, PrintZoneResult},
    scene::layer::{Layer, LayerKind},
};

/// Current scene document format version.
pub const SCENE_DOCUMENT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Serialized scene graph of one view: layers only, no guide or selection.
pub struct SceneDocument {
    /// Format version.
    pub version: u32,
    /// Canvas side the layer geometry refers to.
    pub canvas_size: u32,
    /// Layers bottom to top.
    pub layers: Vec<Layer>,
}

impl SceneDocument {
    /// Current-version document.
    pub fn new(canvas_size: u32, layers: Vec<Layer>) -> Self {
        Self {
            version: SCENE_DOCUMENT_VERSION,
            canvas_size,
            layers,
        }
    }

    /// Parse and validate a document.
    pub fn from_json(json: &str) -> PrintZoneResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> PrintZoneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate version, id uniqueness and numeric sanity.
    pub fn validate(&self) -> PrintZoneResult<()> {
        if self.version != SCENE_DOCUMENT_VERSION {
            return Err(PrintZoneError::validation(format!(
                "unsupported scene document version {} (expected {SCENE_DOCUMENT_VERSION})",
                self.version
            )));
        }

        let mut ids = BTreeSet::new();
        for layer in &self.layers {
            if !ids.insert(layer.id) {
                return Err(PrintZoneError::validation(format!(
                    "duplicate layer id {}",
                    layer.id
                )));
            }
            let t = layer.transform;
            if [t.x, t.y, t.scale_x, t.scale_y, t.rotation, layer.opacity]
                .iter()
                .any(|v| !v.is_finite())
            {
                return Err(PrintZoneError::validation(format!(
                    "{} has non-finite transform or opacity",
                    layer.id
                )));
            }
            let (w, h) = layer.size();
            if !(w.is_finite() && h.is_finite()) || w < 0.0 || h < 0.0 {
                return Err(PrintZoneError::validation(format!(
                    "{} has invalid size",
                    layer.id
                )));
            }
            if let LayerKind::Text(text) = &layer.kind
                && !(text.font_size.is_finite() && text.font_size > 0.0)
            {
                return Err(PrintZoneError::validation(format!(
                    "{} has invalid font size",
                    layer.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Stored design of one view.
pub struct ViewDesign {
    /// Layer document.
    pub scene: SceneDocument,
    /// Latest exported raster of the view's print region, as a PNG data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster_data_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Complete design of a product: one entry per view that was ever edited or exported.
pub struct DesignState {
    /// Product the design belongs to.
    pub product_id: String,
    /// Designs keyed by view id.
    pub views: BTreeMap<String, ViewDesign>,
}

impl DesignState {
    /// Empty design for `product_id`.
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            views: BTreeMap::new(),
        }
    }

    /// Parse and validate every scene in a stored design.
    pub fn from_json(json: &str) -> PrintZoneResult<Self> {
        let state: Self = serde_json::from_str(json)?;
        for design in state.views.values() {
            design.scene.validate()?;
        }
        Ok(state)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> PrintZoneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
