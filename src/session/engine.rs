//! The design session.
//!
//! [`DesignEngine`] owns the product, the per-view scene graphs, the single render target and
//! every cache. The UI talks to it exclusively through [`Command`]s and receives
//! [`EngineEvent`]s back; asset bytes enter through [`DesignEngine::complete_load`].

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    assets::{
        decode::{encode_data_url, sniff_mime},
        fonts::FontCache,
        store::AssetStore,
        text::TextShaper,
    },
    foundation::{config::EngineConfig, core::Point, error::PrintZoneResult},
    preview::{
        compositor::{MockupInputs, MockupSettings, composite_mockup},
        maps::GreyMap,
    },
    product::model::{ProductDescriptor, View},
    render::{
        cpu::{CpuRenderer, SceneExtras},
        export::{Capture, ExportJob, export_view},
        target::{FrameRgba, RenderTarget},
    },
    scene::{
        document::{DesignState, SceneDocument},
        graph::SceneGraph,
        layer::{Layer, LayerId, LayerKind, LayerProperty},
    },
    session::{
        command::{Command, EngineEvent, TransformAction, ViewMode},
        loads::{LoadKind, LoadTicket, LoadTracker, LoadVerdict},
        views::{ViewState, ViewStore},
    },
    transform::viewport::{LayoutScheduler, ViewTransform},
};

/// Interactive design session for one product.
#[derive(Debug)]
pub struct DesignEngine {
    product: ProductDescriptor,
    config: EngineConfig,
    shaper: TextShaper,
    assets: AssetStore,
    renderer: CpuRenderer,
    target: RenderTarget,
    layout: LayoutScheduler,
    views: ViewStore,
    active: View,
    active_color: Option<String>,
    selection: Option<LayerId>,
    mode: ViewMode,
    loads: LoadTracker,
    requested_fonts: BTreeSet<String>,
}

impl DesignEngine {
    /// Start a blank session.
    pub fn new(
        product: ProductDescriptor,
        config: EngineConfig,
        fonts: Arc<FontCache>,
    ) -> PrintZoneResult<Self> {
        Self::with_design(product, config, fonts, &BTreeMap::new())
    }

    /// Resume a session from stored per-view scene documents.
    pub fn with_design(
        product: ProductDescriptor,
        config: EngineConfig,
        fonts: Arc<FontCache>,
        documents: &BTreeMap<String, SceneDocument>,
    ) -> PrintZoneResult<Self> {
        product.validate()?;
        config.validate_for_canvas(product.canvas_size)?;

        let mut views = ViewStore::with_documents(&product, documents)?;
        let active = product.first_view().clone();
        views.mount(&active);
        let active_color = product.color_variants.first().map(|c| c.id.clone());
        let canvas = product.canvas_size;
        let target = RenderTarget::new(
            canvas,
            canvas,
            f64::from(canvas),
            ViewTransform::IDENTITY,
        );

        Ok(Self {
            product,
            config,
            shaper: TextShaper::new(fonts),
            assets: AssetStore::new(),
            renderer: CpuRenderer::new(),
            target,
            layout: LayoutScheduler::default(),
            views,
            active,
            active_color,
            selection: None,
            mode: ViewMode::Editor,
            loads: LoadTracker::new(),
            requested_fonts: BTreeSet::new(),
        })
    }

    /// Mount the first view and export every stored view once, requesting the assets they use.
    pub fn open(&mut self) -> Vec<EngineEvent> {
        let mut events = self.mount_active();
        events.extend(self.resume_stored_views());
        events
    }

    /// Product being edited.
    pub fn product(&self) -> &ProductDescriptor {
        &self.product
    }

    /// Session configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id of the mounted view.
    pub fn active_view(&self) -> &str {
        &self.active.id
    }

    /// Id of the selected color variant.
    pub fn active_color(&self) -> Option<&str> {
        self.active_color.as_deref()
    }

    /// Selected layer of the mounted view.
    pub fn selection(&self) -> Option<LayerId> {
        self.selection
    }

    /// Current UI mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Scene graph of a view that has state.
    pub fn scene(&self, view_id: &str) -> Option<&SceneGraph> {
        self.views.get(view_id).map(|v| &v.scene)
    }

    /// Latest export of a view.
    pub fn capture(&self, view_id: &str) -> Option<&Capture> {
        self.views.get(view_id).and_then(|v| v.capture.as_ref())
    }

    /// Decoded assets.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Current artwork-to-viewport mapping.
    pub fn view_transform(&self) -> ViewTransform {
        self.target.view()
    }

    /// Loads handed out and not completed yet.
    pub fn pending_loads(&self) -> usize {
        self.loads.pending()
    }

    /// Background photo reference for the mounted view and color.
    pub fn background(&self) -> Option<&str> {
        self.product
            .background_for(&self.active.id, self.active_color.as_deref())
    }

    /// Freeze all views into a serializable design.
    ///
    /// Rasters of resumed views exist once [`DesignEngine::open`] has run.
    pub fn snapshot(&self) -> DesignState {
        self.views.snapshot(&self.product)
    }

    /// Execute one command.
    #[tracing::instrument(skip_all, fields(view = %self.active.id))]
    pub fn dispatch(&mut self, command: Command) -> Vec<EngineEvent> {
        match command {
            Command::AddText { content } => self.add_text(content),
            Command::AddImage { bytes, name } => self.add_image_bytes(&bytes, name.as_deref()),
            Command::AddImageRef { reference } => self.add_image_ref(reference),
            Command::UpdateProperty { key, value } => self.update_property(&key, &value),
            Command::Transform(action) => self.transform_selected(action),
            Command::Select(id) => {
                if self.active_scene().and_then(|s| s.get(id)).is_none() {
                    tracing::debug!(%id, "select: no such layer");
                    return Vec::new();
                }
                self.selection = Some(id);
                vec![self.selection_event()]
            }
            Command::SelectAt { x, y } => self.select_at(x, y),
            Command::Deselect => {
                if self.selection.take().is_none() {
                    return Vec::new();
                }
                vec![EngineEvent::SelectionChanged(None)]
            }
            Command::BringForward => self.reorder(SceneGraph::bring_forward),
            Command::SendBackward => self.reorder(SceneGraph::send_backward),
            Command::ExportCurrentView => self.export_active(),
            Command::SwitchView(view_id) => self.switch_view(&view_id),
            Command::SwitchColor(color_id) => self.switch_color(&color_id),
            Command::SetViewMode(mode) => {
                if self.mode == mode {
                    return Vec::new();
                }
                self.mode = mode;
                vec![EngineEvent::ModeChanged(mode)]
            }
            Command::Resize { width, height } => {
                if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                    return vec![EngineEvent::CommandRejected {
                        message: format!("invalid container size {width}x{height}"),
                    }];
                }
                self.layout.request_resize(width, height);
                Vec::new()
            }
        }
    }

    /// Apply a pending container resize. Returns `true` when the view transform changed.
    pub fn on_animation_frame(&mut self) -> PrintZoneResult<bool> {
        let Some(size) = self.layout.on_animation_frame() else {
            return Ok(false);
        };
        let view = ViewTransform::fit(
            size.width,
            size.height,
            self.product.canvas_extent(),
            self.config.padding_factor,
        )?;
        self.target.resize(
            size.width.round().max(1.0) as u32,
            size.height.round().max(1.0) as u32,
            view,
        );
        tracing::debug!(width = size.width, height = size.height, scale = view.scale, "applied resize");
        Ok(true)
    }

    /// Hand back the result of a [`LoadRequest`](crate::session::loads::LoadRequest).
    ///
    /// Results for a view that is no longer mounted are dropped. Fonts are the exception: they
    /// land in the shared font cache whatever view asked for them.
    #[tracing::instrument(skip_all, fields(id = ticket.id, generation = ticket.generation))]
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<u8>, String>,
    ) -> Vec<EngineEvent> {
        let verdict = self.loads.complete(&ticket, &self.active.id);

        if let LoadKind::Font { family } = &ticket.kind {
            return self.complete_font(family, result);
        }
        if verdict == LoadVerdict::Stale {
            return Vec::new();
        }

        let reference = match &ticket.kind {
            LoadKind::Background { reference }
            | LoadKind::ViewAsset { reference }
            | LoadKind::StoredViewAsset { reference }
            | LoadKind::NewImageLayer { reference } => reference.clone(),
            LoadKind::Font { .. } => return Vec::new(),
        };
        if matches!(ticket.kind, LoadKind::Background { .. })
            && self.background() != Some(reference.as_str())
        {
            tracing::debug!(%reference, "background was replaced while loading");
            return Vec::new();
        }

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(message) => return vec![self.asset_failed(&reference, message)],
        };
        let (logical_w, logical_h) = match self.assets.insert_bytes(&reference, &bytes) {
            Ok(img) => (img.logical_width, img.logical_height),
            Err(err) => return vec![self.asset_failed(&reference, err.to_string())],
        };

        let mut events = vec![EngineEvent::AssetReady {
            reference: reference.clone(),
        }];
        match ticket.kind {
            LoadKind::NewImageLayer { .. } => {
                events.extend(self.push_image_layer(&reference, logical_w, logical_h));
            }
            LoadKind::ViewAsset { .. } | LoadKind::StoredViewAsset { .. } => {
                for view_id in self.views_using(&reference) {
                    events.extend(self.export(&view_id));
                }
            }
            LoadKind::Background { .. } | LoadKind::Font { .. } => {}
        }
        events
    }

    /// Rasterize the editor viewport: backdrop, layers and guide under the view transform.
    pub fn render_editor(&mut self) -> PrintZoneResult<FrameRgba> {
        let backdrop = self.background().map(str::to_string);
        let state = self.views.mount(&self.active);
        self.renderer.render_scene(
            &state.scene,
            &self.target,
            &self.assets,
            &mut self.shaper,
            SceneExtras {
                backdrop: backdrop.as_deref(),
            },
        )
    }

    /// Composite the photographic mockup of the mounted view.
    ///
    /// Uses the latest export; a view without one shows the bare product photo.
    pub fn render_preview(&self) -> PrintZoneResult<FrameRgba> {
        let load_map = |reference: &Option<String>| {
            reference
                .as_deref()
                .and_then(|r| self.assets.get(r))
                .map(GreyMap::from_image)
        };
        let displacement = load_map(&self.active.displacement_map);
        let highlight = load_map(&self.active.highlight_map);
        let shadow = load_map(&self.active.shadow_map);

        let base = self.background().and_then(|r| self.assets.get(r));
        let design = self
            .views
            .get(&self.active.id)
            .and_then(|v| v.capture.as_ref())
            .and_then(Capture::ready)
            .map(|c| &c.raster);
        let canvas = self.product.canvas_size;

        composite_mockup(
            MockupInputs {
                base,
                fallback_size: (canvas, canvas),
                design,
                zone: self.active.preview_zone.to_percent(f64::from(canvas)),
                displacement: displacement.as_ref(),
                highlight: highlight.as_ref(),
                shadow: shadow.as_ref(),
            },
            MockupSettings {
                warp: self.config.capabilities.reliable_filters,
                displacement_scale: self.config.displacement_scale
                    * f64::from(self.config.export_multiplier),
                show_outline: self.config.show_zone_outline,
            },
        )
    }

    fn active_state(&mut self) -> &mut ViewState {
        self.views.mount(&self.active)
    }

    fn active_scene(&self) -> Option<&SceneGraph> {
        self.scene(&self.active.id)
    }

    fn selected_layer(&self) -> Option<&Layer> {
        let id = self.selection?;
        self.active_scene()?.get(id)
    }

    fn selection_event(&self) -> EngineEvent {
        EngineEvent::SelectionChanged(self.selected_layer().map(Layer::snapshot))
    }

    fn asset_failed(&mut self, reference: &str, message: String) -> EngineEvent {
        tracing::warn!(%reference, %message, "asset failed to load");
        self.assets.mark_failed(reference, message.clone());
        EngineEvent::AssetFailed {
            reference: reference.to_string(),
            message,
        }
    }

    /// Ids of views with an image layer drawn from `reference`.
    fn views_using(&self, reference: &str) -> Vec<String> {
        self.views
            .view_ids()
            .into_iter()
            .filter(|id| {
                self.scene(id).is_some_and(|scene| {
                    scene.layers().iter().any(|l| {
                        matches!(&l.kind, LayerKind::Image(img) if img.source == reference)
                    })
                })
            })
            .collect()
    }

    /// Export stored views that are not mounted and have no capture yet.
    fn resume_stored_views(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        for view_id in self.views.view_ids() {
            let Some(state) = self.views.get(&view_id) else {
                continue;
            };
            if view_id == self.active.id || state.capture.is_some() {
                continue;
            }

            let mut sources = Vec::new();
            let mut families = Vec::new();
            for layer in state.scene.layers() {
                match &layer.kind {
                    LayerKind::Image(img) => sources.push(img.source.clone()),
                    LayerKind::Text(text) => families.push(text.font_family.clone()),
                }
            }
            for reference in sources {
                let kind = LoadKind::StoredViewAsset {
                    reference: reference.clone(),
                };
                events.extend(self.request(&view_id, kind, &reference));
            }
            for family in families {
                events.extend(self.request_font(&family));
            }
            events.extend(self.export(&view_id));
        }
        events
    }

    fn mount_active(&mut self) -> Vec<EngineEvent> {
        let mut events = vec![EngineEvent::ViewChanged {
            view_id: self.active.id.clone(),
        }];
        let state = self.views.mount(&self.active);

        let mut sources = Vec::new();
        let mut families = Vec::new();
        for layer in state.scene.layers() {
            match &layer.kind {
                LayerKind::Image(img) => sources.push(img.source.clone()),
                LayerKind::Text(text) => families.push(text.font_family.clone()),
            }
        }

        events.extend(self.request_background());
        let maps = [
            self.active.displacement_map.clone(),
            self.active.highlight_map.clone(),
            self.active.shadow_map.clone(),
        ];
        for reference in maps.into_iter().flatten().chain(sources) {
            events.extend(self.request_view_asset(&reference));
        }
        for family in families {
            events.extend(self.request_font(&family));
        }

        events.extend(self.export_active());
        events
    }

    fn request_background(&mut self) -> Option<EngineEvent> {
        let reference = self.background()?.to_string();
        let kind = LoadKind::Background {
            reference: reference.clone(),
        };
        let view_id = self.active.id.clone();
        self.request(&view_id, kind, &reference)
    }

    fn request_view_asset(&mut self, reference: &str) -> Option<EngineEvent> {
        let kind = LoadKind::ViewAsset {
            reference: reference.to_string(),
        };
        let view_id = self.active.id.clone();
        self.request(&view_id, kind, reference)
    }

    fn request(&mut self, view_id: &str, kind: LoadKind, reference: &str) -> Option<EngineEvent> {
        if self.assets.has_failed(reference) {
            return None;
        }
        match self.assets.ensure_inline(reference) {
            Ok(true) => None,
            Ok(false) => {
                if self.loads.is_pending(view_id, &kind) {
                    return None;
                }
                let request = self.loads.issue(view_id, kind, reference);
                Some(EngineEvent::LoadRequested(request))
            }
            Err(err) => Some(self.asset_failed(reference, err.to_string())),
        }
    }

    fn request_font(&mut self, family: &str) -> Option<EngineEvent> {
        let fonts = self.shaper.fonts();
        if fonts.has_family(family) || !self.requested_fonts.insert(family.to_ascii_lowercase()) {
            return None;
        }
        let kind = LoadKind::Font {
            family: family.to_string(),
        };
        let request = self.loads.issue(&self.active.id, kind, family);
        Some(EngineEvent::LoadRequested(request))
    }

    fn complete_font(&mut self, family: &str, result: Result<Vec<u8>, String>) -> Vec<EngineEvent> {
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(message) => {
                tracing::warn!(%family, %message, "font failed to load, using fallback");
                return vec![EngineEvent::AssetFailed {
                    reference: family.to_string(),
                    message,
                }];
            }
        };
        let registered = self.shaper.fonts().register_bytes(bytes);
        if registered.is_empty() {
            let message = "no usable font faces".to_string();
            tracing::warn!(%family, %message, "font failed to load, using fallback");
            return vec![EngineEvent::AssetFailed {
                reference: family.to_string(),
                message,
            }];
        }
        tracing::debug!(%family, ?registered, "registered font");

        let mut events = Vec::new();
        for view_id in self.views.view_ids() {
            let Some(state) = self.views.get_mut(&view_id) else {
                continue;
            };
            if state.scene.relayout_text(Some(family), &mut self.shaper) == 0 {
                continue;
            }
            if view_id == self.active.id && self.selection.is_some() {
                events.push(self.selection_event());
            }
            events.extend(self.export(&view_id));
        }
        events
    }

    fn add_text(&mut self, content: Option<String>) -> Vec<EngineEvent> {
        let content = content.unwrap_or_else(|| self.config.default_text.clone());
        let zone = self.active.editor_zone;
        let clip = self.product.clip_text_to_zone;
        let id = self
            .views
            .mount(&self.active)
            .scene
            .add_text(zone, &content, clip, &mut self.shaper);
        self.selection = Some(id);

        let mut events = vec![self.selection_event()];
        if let Some(LayerKind::Text(text)) = self.selected_layer().map(|l| &l.kind) {
            let family = text.font_family.clone();
            events.extend(self.request_font(&family));
        }
        events.extend(self.export_active());
        events
    }

    fn add_image_bytes(&mut self, bytes: &[u8], name: Option<&str>) -> Vec<EngineEvent> {
        let reference = encode_data_url(sniff_mime(bytes), bytes);
        match self.assets.insert_bytes(&reference, bytes) {
            Ok(img) => {
                let (w, h) = (img.logical_width, img.logical_height);
                self.push_image_layer(&reference, w, h)
            }
            Err(err) => {
                let label = name.unwrap_or("upload");
                tracing::warn!(name = label, error = %err, "uploaded image could not be decoded");
                vec![EngineEvent::AssetFailed {
                    reference: label.to_string(),
                    message: err.to_string(),
                }]
            }
        }
    }

    fn add_image_ref(&mut self, reference: String) -> Vec<EngineEvent> {
        match self.assets.ensure_inline(&reference) {
            Ok(true) => {
                let Some(img) = self.assets.get(&reference) else {
                    return Vec::new();
                };
                let (w, h) = (img.logical_width, img.logical_height);
                self.push_image_layer(&reference, w, h)
            }
            Ok(false) => {
                let kind = LoadKind::NewImageLayer {
                    reference: reference.clone(),
                };
                let request = self.loads.issue(&self.active.id, kind, &reference);
                vec![EngineEvent::LoadRequested(request)]
            }
            Err(err) => vec![self.asset_failed(&reference, err.to_string())],
        }
    }

    fn push_image_layer(&mut self, reference: &str, width: f64, height: f64) -> Vec<EngineEvent> {
        let zone = self.active.editor_zone;
        let added = self
            .active_state()
            .scene
            .add_image(reference, width, height, zone);
        match added {
            Ok(id) => {
                self.selection = Some(id);
                let mut events = vec![self.selection_event()];
                events.extend(self.export_active());
                events
            }
            Err(err) => vec![EngineEvent::CommandRejected {
                message: err.to_string(),
            }],
        }
    }

    fn update_property(&mut self, key: &str, value: &serde_json::Value) -> Vec<EngineEvent> {
        let Some(id) = self.selection else {
            tracing::debug!(key, "property update without selection");
            return Vec::new();
        };
        let property = match LayerProperty::from_key_value(key, value) {
            Ok(p) => p,
            Err(err) => {
                return vec![EngineEvent::CommandRejected {
                    message: err.to_string(),
                }];
            }
        };
        let family = match &property {
            LayerProperty::FontFamily(f) => Some(f.clone()),
            _ => None,
        };

        let state = self.views.mount(&self.active);
        match state.scene.update_layer(id, property, &mut self.shaper) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(%id, key, "property does not apply to layer");
                return Vec::new();
            }
            Err(err) => {
                return vec![EngineEvent::CommandRejected {
                    message: err.to_string(),
                }];
            }
        }

        let mut events = vec![self.selection_event()];
        if let Some(family) = family {
            events.extend(self.request_font(&family));
        }
        events.extend(self.export_active());
        events
    }

    fn transform_selected(&mut self, action: TransformAction) -> Vec<EngineEvent> {
        let Some(id) = self.selection else {
            tracing::debug!(?action, "transform without selection");
            return Vec::new();
        };

        let scene = &mut self.views.mount(&self.active).scene;
        let changed = match action {
            TransformAction::Move { dx, dy } => {
                if !(dx.is_finite() && dy.is_finite()) {
                    return vec![EngineEvent::CommandRejected {
                        message: "move offsets must be finite".to_string(),
                    }];
                }
                scene.transform_layer(id, |t| {
                    t.x += dx;
                    t.y += dy;
                })
            }
            TransformAction::Scale { factor } => {
                if !(factor.is_finite() && factor > 0.0) {
                    return vec![EngineEvent::CommandRejected {
                        message: "scale factor must be finite and > 0".to_string(),
                    }];
                }
                scene.transform_layer(id, |t| {
                    t.scale_x *= factor;
                    t.scale_y *= factor;
                })
            }
            TransformAction::Rotate { degrees } => {
                if !degrees.is_finite() {
                    return vec![EngineEvent::CommandRejected {
                        message: "rotation must be finite".to_string(),
                    }];
                }
                scene.transform_layer(id, |t| t.rotation = (t.rotation + degrees) % 360.0)
            }
            TransformAction::Delete => {
                if !scene.remove_layer(id) {
                    return Vec::new();
                }
                self.selection = None;
                let mut events = vec![EngineEvent::SelectionChanged(None)];
                events.extend(self.export_active());
                return events;
            }
        };
        if !changed {
            return Vec::new();
        }

        let mut events = vec![self.selection_event()];
        events.extend(self.export_active());
        events
    }

    fn select_at(&mut self, x: f64, y: f64) -> Vec<EngineEvent> {
        let view = self.target.view();
        let p = view.viewport_to_artwork(Point::new(x, y));
        let slop = self.config.presentation.hit_slop_px() / view.scale;
        let hit = self.active_scene().and_then(|s| s.layer_at(p, slop));
        if hit == self.selection {
            return Vec::new();
        }
        self.selection = hit;
        vec![self.selection_event()]
    }

    fn reorder(&mut self, op: fn(&mut SceneGraph, LayerId) -> bool) -> Vec<EngineEvent> {
        let Some(id) = self.selection else {
            return Vec::new();
        };
        if !op(&mut self.active_state().scene, id) {
            tracing::debug!(%id, "layer already at the end of the stack");
            return Vec::new();
        }
        self.export_active()
    }

    #[tracing::instrument(skip(self))]
    fn switch_view(&mut self, view_id: &str) -> Vec<EngineEvent> {
        if view_id == self.active.id {
            return Vec::new();
        }
        let Some(view) = self.product.view(view_id).cloned() else {
            tracing::debug!("unknown view");
            return Vec::new();
        };

        self.renderer.clear_caches();
        self.target = RenderTarget::new(
            self.target.width(),
            self.target.height(),
            self.product.canvas_extent(),
            self.target.view(),
        );
        self.loads.bump();
        self.active = view;

        let mut events = Vec::new();
        if self.selection.take().is_some() {
            events.push(EngineEvent::SelectionChanged(None));
        }
        events.extend(self.mount_active());
        events
    }

    fn switch_color(&mut self, color_id: &str) -> Vec<EngineEvent> {
        if self.active_color.as_deref() == Some(color_id) {
            return Vec::new();
        }
        if self.product.color_variant(color_id).is_none() {
            tracing::debug!(color = color_id, "unknown color variant");
            return Vec::new();
        }
        self.active_color = Some(color_id.to_string());

        let mut events = vec![EngineEvent::ColorChanged {
            color_id: color_id.to_string(),
        }];
        events.extend(self.request_background());
        events
    }

    fn export_active(&mut self) -> Vec<EngineEvent> {
        let view_id = self.active.id.clone();
        self.views.mount(&self.active);
        self.export(&view_id)
    }

    fn export(&mut self, view_id: &str) -> Vec<EngineEvent> {
        let Some(zone) = self.product.view(view_id).map(|v| v.preview_zone) else {
            return Vec::new();
        };
        let Some(state) = self.views.get_mut(view_id) else {
            return Vec::new();
        };

        let job = ExportJob {
            assets: &self.assets,
            measure: &mut self.shaper,
            zone,
            multiplier: self.config.export_multiplier,
        };
        match export_view(&mut self.renderer, &mut self.target, &mut state.scene, job) {
            Ok(Capture::Ready(capture)) => {
                state.capture = Some(Capture::Ready(capture));
                vec![EngineEvent::DesignUpdated {
                    view_id: view_id.to_string(),
                }]
            }
            Ok(Capture::Unavailable(reason)) => {
                state.capture = Some(Capture::Unavailable(reason));
                vec![EngineEvent::ExportUnavailable {
                    view_id: view_id.to_string(),
                    reason,
                }]
            }
            Err(err) => {
                tracing::warn!(view = view_id, error = %err, "export failed, keeping previous design");
                vec![EngineEvent::ExportFailed {
                    view_id: view_id.to_string(),
                    message: err.to_string(),
                }]
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
