//! printzone is a print-on-demand design canvas engine.
//!
//! A product declares square artwork canvases ("views", e.g. front and back) with a print zone
//! each. Users place text and image layers inside the zone; every edit re-exports the zone at
//! native resolution, and a photographic mockup shows the design on the product.
//!
//! - Describe the product with a [`ProductDescriptor`]
//! - Drive a [`DesignEngine`] with [`Command`]s and react to [`EngineEvent`]s
//! - Fulfil [`LoadRequest`]s through [`DesignEngine::complete_load`]
//! - Persist the [`DesignState`] returned by [`DesignEngine::snapshot`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod preview;
pub(crate) mod product;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;
pub(crate) mod transform;

pub use crate::foundation::config::{EngineConfig, MAX_EXPORT_MULTIPLIER, PresentationMode};
pub use crate::foundation::core::{
    Affine, BezPath, ColorRgba8, Point, Rect, Vec2, ZonePercent, ZoneRect,
};
pub use crate::foundation::error::{PrintZoneError, PrintZoneResult};

pub use crate::assets::decode::{
    decode_data_url, decode_image, encode_data_url, encode_png, is_data_url, sniff_mime,
};
pub use crate::assets::fonts::{FontCache, ResolvedFont};
pub use crate::assets::store::{
    AssetId, AssetStore, DirAssetReader, PreparedImage, normalize_rel_path,
};
pub use crate::assets::text::{
    EstimatedMetrics, ShapedGlyph, ShapedText, TextMeasure, TextShaper, TextStyle,
};

pub use crate::preview::capabilities::PlatformCapabilities;
pub use crate::preview::compositor::{MockupInputs, MockupSettings, composite_mockup};
pub use crate::preview::maps::{
    GreyMap, NEUTRAL_DISPLACEMENT, NEUTRAL_HIGHLIGHT, NEUTRAL_SHADOW, PlacedMap,
    default_displacement_map, default_highlight_map, default_shadow_map,
};

pub use crate::product::model::{ColorVariant, ProductDescriptor, View};

pub use crate::render::cpu::{CpuRenderer, SceneExtras};
pub use crate::render::export::{
    Capture, ExportJob, ExportedRaster, UnavailableReason, ViewCapture, crop_to_zone, export_view,
};
pub use crate::render::target::{FrameRgba, NativeCapture, RenderTarget};

pub use crate::scene::curvature::{
    ArcPath, Bulge, MAX_CURVATURE_DEG, PlacedGlyph, clamp_curvature, place_glyphs,
};
pub use crate::scene::document::{DesignState, SCENE_DOCUMENT_VERSION, SceneDocument, ViewDesign};
pub use crate::scene::graph::{DEFAULT_FONT_FAMILY, SceneGraph};
pub use crate::scene::layer::{
    ImageProps, Layer, LayerId, LayerKind, LayerProperty, LayerSnapshot, TextProps,
};

pub use crate::session::command::{Command, EngineEvent, TransformAction, ViewMode};
pub use crate::session::engine::DesignEngine;
pub use crate::session::loads::{LoadKind, LoadRequest, LoadTicket, LoadTracker, LoadVerdict};
pub use crate::session::views::{ViewState, ViewStore};

pub use crate::transform::layer::{LayerTransform, Origin};
pub use crate::transform::viewport::{ContainerSize, LayoutScheduler, ViewTransform};
