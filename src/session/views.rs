use std::collections::BTreeMap;

use crate::{
    foundation::error::PrintZoneResult,
    product::model::{ProductDescriptor, View},
    render::export::Capture,
    scene::{
        document::{DesignState, SceneDocument, ViewDesign},
        graph::SceneGraph,
    },
};

/// Editing state of one view.
#[derive(Clone, Debug)]
pub struct ViewState {
    /// Layers of this view. Never shared with other views.
    pub scene: SceneGraph,
    /// Latest export, if any.
    pub capture: Option<Capture>,
}

impl ViewState {
    /// Empty state for `view`.
    pub fn empty(view: &View) -> Self {
        Self {
            scene: SceneGraph::new(view.editor_zone),
            capture: None,
        }
    }

    /// Data URL of the latest successful export.
    pub fn raster_data_url(&self) -> Option<&str> {
        self.capture
            .as_ref()
            .and_then(Capture::ready)
            .map(|c| c.data_url.as_str())
    }
}

/// Per-view states keyed by view id, created lazily on first mount.
#[derive(Clone, Debug, Default)]
pub struct ViewStore {
    states: BTreeMap<String, ViewState>,
}

impl ViewStore {
    /// Store seeded from stored scene documents. Documents for unknown views are ignored.
    pub fn with_documents(
        product: &ProductDescriptor,
        documents: &BTreeMap<String, SceneDocument>,
    ) -> PrintZoneResult<Self> {
        let mut states = BTreeMap::new();
        for (view_id, doc) in documents {
            let Some(view) = product.view(view_id) else {
                tracing::warn!(view = %view_id, "ignoring stored design for unknown view");
                continue;
            };
            states.insert(
                view_id.clone(),
                ViewState {
                    scene: SceneGraph::from_document(doc, view.editor_zone)?,
                    capture: None,
                },
            );
        }
        Ok(Self { states })
    }

    /// State of `view`, creating an empty one on first access.
    pub fn mount(&mut self, view: &View) -> &mut ViewState {
        self.states
            .entry(view.id.clone())
            .or_insert_with(|| ViewState::empty(view))
    }

    /// State of a view that was mounted before.
    pub fn get(&self, view_id: &str) -> Option<&ViewState> {
        self.states.get(view_id)
    }

    /// Mutable state of a view that was mounted before.
    pub fn get_mut(&mut self, view_id: &str) -> Option<&mut ViewState> {
        self.states.get_mut(view_id)
    }

    /// Ids of every view with state, in id order.
    pub fn view_ids(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    /// Freeze every known view into a design snapshot.
    pub fn snapshot(&self, product: &ProductDescriptor) -> DesignState {
        let mut state = DesignState::new(product.id.clone());
        for (view_id, view) in &self.states {
            state.views.insert(
                view_id.clone(),
                ViewDesign {
                    scene: view.scene.to_document(product.canvas_size),
                    raster_data_url: view.raster_data_url().map(str::to_string),
                },
            );
        }
        state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/views.rs"]
mod tests;
