use crate::{
    render::export::UnavailableReason,
    scene::layer::{LayerId, LayerSnapshot},
    session::loads::LoadRequest,
};

/// Which surface the UI shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Interactive canvas.
    #[default]
    Editor,
    /// Photographic mockup.
    Preview,
}

/// Geometric edit of the selected layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformAction {
    /// Translate by artwork units.
    Move {
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
    },
    /// Multiply both scale factors.
    Scale {
        /// Factor, must be finite and > 0.
        factor: f64,
    },
    /// Add to the rotation.
    Rotate {
        /// Degrees, clockwise.
        degrees: f64,
    },
    /// Remove the layer.
    Delete,
}

/// Everything the UI can ask the engine to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Add a text layer centered in the editor zone.
    AddText {
        /// Initial content; the configured default when `None`.
        content: Option<String>,
    },
    /// Add an image layer from raw bytes (e.g. a file upload).
    AddImage {
        /// Encoded image bytes.
        bytes: Vec<u8>,
        /// Original file name, for logs.
        name: Option<String>,
    },
    /// Add an image layer from a reference; non-inline references are loaded by the caller.
    AddImageRef {
        /// URL, relative path or data URL.
        reference: String,
    },
    /// Set one property of the selected layer.
    UpdateProperty {
        /// Property key (`fontSize`, `fill`, `curvature`, ...).
        key: String,
        /// New value.
        value: serde_json::Value,
    },
    /// Move, scale, rotate or delete the selected layer.
    Transform(TransformAction),
    /// Select a layer by id.
    Select(LayerId),
    /// Select the topmost layer under a viewport point.
    SelectAt {
        /// Viewport x in pixels.
        x: f64,
        /// Viewport y in pixels.
        y: f64,
    },
    /// Clear the selection.
    Deselect,
    /// Move the selected layer one step up.
    BringForward,
    /// Move the selected layer one step down.
    SendBackward,
    /// Re-export the mounted view.
    ExportCurrentView,
    /// Mount another view.
    SwitchView(String),
    /// Change the product color.
    SwitchColor(String),
    /// Switch between editor and mockup.
    SetViewMode(ViewMode),
    /// Container resized; applied on the next animation frame.
    Resize {
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
    },
}

/// Notifications emitted by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The selected layer changed, or its properties did.
    SelectionChanged(Option<LayerSnapshot>),
    /// A view's stored design was refreshed by an export.
    DesignUpdated {
        /// View id.
        view_id: String,
    },
    /// The view cannot be exported yet.
    ExportUnavailable {
        /// View id.
        view_id: String,
        /// Why.
        reason: UnavailableReason,
    },
    /// Rasterization or encoding failed; the previous design is kept.
    ExportFailed {
        /// View id.
        view_id: String,
        /// Error text.
        message: String,
    },
    /// The caller should fetch bytes and call `complete_load`.
    LoadRequested(LoadRequest),
    /// A requested asset was decoded and is ready to draw.
    AssetReady {
        /// Asset reference.
        reference: String,
    },
    /// An asset could not be decoded or fetched.
    AssetFailed {
        /// Asset reference.
        reference: String,
        /// Error text.
        message: String,
    },
    /// A different view is mounted.
    ViewChanged {
        /// View id.
        view_id: String,
    },
    /// The product color changed.
    ColorChanged {
        /// Color variant id.
        color_id: String,
    },
    /// The UI mode changed.
    ModeChanged(ViewMode),
    /// A command was malformed and ignored.
    CommandRejected {
        /// Error text.
        message: String,
    },
}
