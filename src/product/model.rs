use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::{
    core::ZoneRect,
    error::{PrintZoneError, PrintZoneResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Immutable per-product configuration consumed from the catalog.
///
/// A descriptor is pure data: it can be deserialized from JSON and must pass
/// [`ProductDescriptor::validate`] before an engine is created from it.
pub struct ProductDescriptor {
    /// Product identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Side of the square artwork canvas in artwork units.
    pub canvas_size: u32,
    /// Orientations of the product (front, back, ...), in display order.
    pub views: Vec<View>,
    /// Color variants of the product.
    #[serde(default)]
    pub color_variants: Vec<ColorVariant>,
    /// Fallback background when neither the variant nor the view provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
    /// Whether freshly added text layers clip to the editor zone.
    #[serde(default = "default_true")]
    pub clip_text_to_zone: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One product-facing orientation with its own zones, background and scene graph.
pub struct View {
    /// View identifier (unique within the product).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Interactive region: placement, clipping and the on-screen guide.
    pub editor_zone: ZoneRect,
    /// Final visible print region: export crop and mockup placement.
    pub preview_zone: ZoneRect,
    /// Default background photo reference for this view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Greyscale displacement map used to warp the design on the mockup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacement_map: Option<String>,
    /// Greyscale highlight map (screen-blended over the design).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_map: Option<String>,
    /// Greyscale shadow / ambient-occlusion map (multiply-blended over the design).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_map: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A product color with one photo per view.
pub struct ColorVariant {
    /// Variant identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Swatch color, hex notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swatch: Option<String>,
    /// Background image reference per view id.
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

impl ProductDescriptor {
    /// Parse a descriptor from JSON and validate it.
    pub fn from_json(json: &str) -> PrintZoneResult<Self> {
        let product: Self = serde_json::from_str(json)?;
        product.validate()?;
        Ok(product)
    }

    /// Canvas side as floating point artwork units.
    pub fn canvas_extent(&self) -> f64 {
        f64::from(self.canvas_size)
    }

    /// Validate descriptor invariants.
    pub fn validate(&self) -> PrintZoneResult<()> {
        if self.canvas_size == 0 || self.canvas_size > u32::from(u16::MAX) {
            return Err(PrintZoneError::validation(format!(
                "canvas_size must be in 1..={}",
                u16::MAX
            )));
        }
        if self.views.is_empty() {
            return Err(PrintZoneError::validation(
                "product must declare at least one view",
            ));
        }

        let canvas = self.canvas_extent();
        let mut seen = BTreeSet::new();
        for view in &self.views {
            if view.id.trim().is_empty() {
                return Err(PrintZoneError::validation("view id must be non-empty"));
            }
            if !seen.insert(view.id.as_str()) {
                return Err(PrintZoneError::validation(format!(
                    "duplicate view id '{}'",
                    view.id
                )));
            }
            view.editor_zone
                .validate_within(canvas, &format!("view '{}' editor_zone", view.id))?;
            view.preview_zone
                .validate_within(canvas, &format!("view '{}' preview_zone", view.id))?;
        }

        let mut seen_colors = BTreeSet::new();
        for variant in &self.color_variants {
            if variant.id.trim().is_empty() {
                return Err(PrintZoneError::validation(
                    "color variant id must be non-empty",
                ));
            }
            if !seen_colors.insert(variant.id.as_str()) {
                return Err(PrintZoneError::validation(format!(
                    "duplicate color variant id '{}'",
                    variant.id
                )));
            }
            for view_id in variant.images.keys() {
                if !seen.contains(view_id.as_str()) {
                    return Err(PrintZoneError::validation(format!(
                        "color variant '{}' references unknown view '{view_id}'",
                        variant.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Lookup a view by id.
    pub fn view(&self, id: &str) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Lookup a color variant by id.
    pub fn color_variant(&self, id: &str) -> Option<&ColorVariant> {
        self.color_variants.iter().find(|c| c.id == id)
    }

    /// First declared view.
    pub fn first_view(&self) -> &View {
        &self.views[0]
    }

    /// Resolve the background photo for a `{view, color}` pair.
    ///
    /// Order: the variant's image for the view, then the view's own background, then the
    /// product default image.
    pub fn background_for(&self, view_id: &str, color_id: Option<&str>) -> Option<&str> {
        let from_variant = color_id
            .and_then(|c| self.color_variant(c))
            .and_then(|c| c.images.get(view_id))
            .map(String::as_str);

        from_variant
            .or_else(|| self.view(view_id).and_then(|v| v.background_image.as_deref()))
            .or(self.default_image.as_deref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/product/model.rs"]
mod tests;
