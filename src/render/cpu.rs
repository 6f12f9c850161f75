use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{
        fonts::ResolvedFont,
        store::{AssetId, AssetStore, PreparedImage},
        text::TextMeasure,
    },
    foundation::{
        core::{Affine, BezPath, ColorRgba8, Point, Rect, Vec2},
        error::{PrintZoneError, PrintZoneResult},
    },
    render::target::{FrameRgba, RenderTarget},
    scene::{
        curvature::place_glyphs,
        graph::SceneGraph,
        layer::{ImageProps, Layer, LayerKind, TextProps},
    },
};

/// Guide dash length in viewport pixels.
const GUIDE_DASH: f64 = 6.0;
/// Gap between guide dashes in viewport pixels.
const GUIDE_GAP: f64 = 4.0;
/// Guide line width in viewport pixels.
const GUIDE_WIDTH: f64 = 1.0;
const GUIDE_COLOR: ColorRgba8 = ColorRgba8 {
    r: 0x3b,
    g: 0x82,
    b: 0xf6,
    a: 0xff,
};

/// What to draw besides the layers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneExtras<'a> {
    /// Reference of the product photo drawn behind the layers, stretched over the canvas.
    pub backdrop: Option<&'a str>,
}

/// CPU rasterizer for scene graphs, backed by `vello_cpu`.
///
/// Caches image paints and font data across frames.
#[derive(Default)]
pub struct CpuRenderer {
    image_cache: HashMap<AssetId, vello_cpu::Image>,
    font_cache: HashMap<u64, vello_cpu::peniko::FontData>,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("images", &self.image_cache.len())
            .field("fonts", &self.font_cache.len())
            .finish()
    }
}

impl CpuRenderer {
    /// Create a renderer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop cached paints (e.g. when the render target is torn down).
    pub fn clear_caches(&mut self) {
        self.image_cache.clear();
        self.font_cache.clear();
    }

    /// Rasterize `scene` into a premultiplied frame of the target's size.
    ///
    /// Layers whose image source is not decoded yet are skipped; they appear once their load
    /// completes and the scene is rendered again.
    #[tracing::instrument(skip_all, fields(w = target.width(), h = target.height(), layers = scene.len()))]
    pub fn render_scene(
        &mut self,
        scene: &SceneGraph,
        target: &RenderTarget,
        assets: &AssetStore,
        measure: &mut dyn TextMeasure,
        extras: SceneExtras<'_>,
    ) -> PrintZoneResult<FrameRgba> {
        let (w, h) = target.checked_dims()?;
        let view = target.view().to_affine();

        let mut ctx = vello_cpu::RenderContext::new(w, h);

        if target.backdrop_visible()
            && let Some(reference) = extras.backdrop
            && let Some(backdrop) = assets.get(reference)
        {
            let canvas = target.canvas_size();
            let fit = Affine::scale_non_uniform(
                canvas / f64::from(backdrop.width),
                canvas / f64::from(backdrop.height),
            );
            self.draw_raster(&mut ctx, view * fit, reference, backdrop, None)?;
        }

        for layer in scene.layers() {
            self.draw_layer(&mut ctx, view, scene, layer, assets, measure)?;
        }

        if scene.guide_visible() {
            let guide = view.transform_rect_bbox(scene.guide().to_rect());
            draw_dashed_rect(&mut ctx, guide, GUIDE_COLOR);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRgba {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_layer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        view: Affine,
        scene: &SceneGraph,
        layer: &Layer,
        assets: &AssetStore,
        measure: &mut dyn TextMeasure,
    ) -> PrintZoneResult<()> {
        if layer.opacity <= 0.0 {
            return Ok(());
        }

        let clip = layer.clip_to_zone;
        if clip {
            ctx.set_transform(affine_to_cpu(view));
            let zone = scene.guide().to_rect();
            ctx.push_clip_layer(&rect_to_cpu_path(zone));
        }
        let opacity = layer.opacity.clamp(0.0, 1.0) as f32;
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }

        let layer_xf = view * layer.affine();
        let result = match &layer.kind {
            LayerKind::Image(img) => self.draw_image_layer(ctx, layer_xf, img, assets),
            LayerKind::Text(text) => self.draw_text_layer(ctx, layer_xf, text, measure),
        };

        if opacity < 1.0 {
            ctx.pop_layer();
        }
        if clip {
            ctx.pop_layer();
        }
        result
    }

    fn draw_image_layer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layer_xf: Affine,
        img: &ImageProps,
        assets: &AssetStore,
    ) -> PrintZoneResult<()> {
        let Some(prepared) = assets.get(&img.source) else {
            tracing::trace!(source = %img.source, "image not loaded yet");
            return Ok(());
        };

        // Local box is the logical size; the raster may be oversampled.
        let sx = img.width / f64::from(prepared.width);
        let sy = img.height / f64::from(prepared.height);
        let radius = if img.corner_radius > 0.0 {
            Some(img.corner_radius)
        } else {
            None
        };
        self.draw_raster(
            ctx,
            layer_xf * Affine::scale_non_uniform(sx, sy),
            &img.source,
            prepared,
            radius.map(|r| (r / sx, r / sy)),
        )
    }

    fn draw_raster(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        transform: Affine,
        reference: &str,
        prepared: &PreparedImage,
        corner_radius: Option<(f64, f64)>,
    ) -> PrintZoneResult<()> {
        let paint = self.image_paint_for(reference, prepared)?;
        let (w, h) = (f64::from(prepared.width), f64::from(prepared.height));

        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        match corner_radius {
            Some((rx, ry)) => {
                // Non-uniform oversampling makes the radius elliptical in raster space.
                let r = rx.min(ry).min(w / 2.0).min(h / 2.0);
                let rounded = kurbo::RoundedRect::new(0.0, 0.0, w, h, r);
                let path = kurbo::Shape::to_path(&rounded, 0.1);
                ctx.fill_path(&bezpath_to_cpu(&path));
            }
            None => ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h)),
        }
        Ok(())
    }

    fn draw_text_layer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layer_xf: Affine,
        text: &TextProps,
        measure: &mut dyn TextMeasure,
    ) -> PrintZoneResult<()> {
        let shaped = measure.shape(&text.style());
        let Some(font) = shaped.font.as_ref() else {
            tracing::warn!(family = %text.font_family, "no font available, text layer not drawn");
            return Ok(());
        };
        let font_data = self.font_data_for(font);
        let fill = text.fill_color();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            fill.r, fill.g, fill.b, fill.a,
        ));

        let placed = place_glyphs(&shaped, text.curve.as_ref());
        if text.curve.is_none() {
            ctx.set_transform(affine_to_cpu(layer_xf));
            let glyphs = placed.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x as f32,
                y: g.y as f32,
            });
            ctx.glyph_run(&font_data)
                .font_size(shaped.font_size)
                .fill_glyphs(glyphs);
            return Ok(());
        }

        for g in &placed {
            let glyph_xf = layer_xf
                * Affine::translate(Vec2::new(g.x, g.y))
                * Affine::rotate(g.rotation);
            ctx.set_transform(affine_to_cpu(glyph_xf));
            ctx.glyph_run(&font_data)
                .font_size(shaped.font_size)
                .fill_glyphs(std::iter::once(vello_cpu::Glyph {
                    id: g.id,
                    x: 0.0,
                    y: 0.0,
                }));
        }
        Ok(())
    }

    fn image_paint_for(
        &mut self,
        reference: &str,
        prepared: &PreparedImage,
    ) -> PrintZoneResult<vello_cpu::Image> {
        let id = AssetId::for_reference(reference);
        if let Some(paint) = self.image_cache.get(&id)
            && paint_size(paint) == Some((prepared.width, prepared.height))
        {
            return Ok(paint.clone());
        }

        let pixmap = image_premul_bytes_to_pixmap(
            prepared.rgba8_premul.as_slice(),
            prepared.width,
            prepared.height,
        )?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(id, paint.clone());
        Ok(paint)
    }

    fn font_data_for(&mut self, font: &ResolvedFont) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(font.key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                    font.index,
                )
            })
            .clone()
    }
}

fn paint_size(image: &vello_cpu::Image) -> Option<(u32, u32)> {
    match &image.image {
        vello_cpu::ImageSource::Pixmap(p) => Some((u32::from(p.width()), u32::from(p.height()))),
        vello_cpu::ImageSource::OpaqueId(_) => None,
    }
}

/// Draw a dashed rectangle outline given in device pixels.
pub(crate) fn draw_dashed_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: ColorRgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));

    let half = GUIDE_WIDTH / 2.0;
    let edges = [
        (Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y0)),
        (Point::new(rect.x1, rect.y0), Point::new(rect.x1, rect.y1)),
        (Point::new(rect.x1, rect.y1), Point::new(rect.x0, rect.y1)),
        (Point::new(rect.x0, rect.y1), Point::new(rect.x0, rect.y0)),
    ];
    for (a, b) in edges {
        let len = (b - a).hypot();
        if len <= 0.0 {
            continue;
        }
        let dir = (b - a) / len;
        let mut t = 0.0;
        while t < len {
            let end = (t + GUIDE_DASH).min(len);
            let p0 = a + dir * t;
            let p1 = a + dir * end;
            let dash = Rect::from_points(p0, p1).inflate(half, half);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                dash.x0, dash.y0, dash.x1, dash.y1,
            ));
            t = end + GUIDE_GAP;
        }
    }
}

pub(crate) fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PrintZoneResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PrintZoneError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PrintZoneError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PrintZoneError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu_path(r: Rect) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    out.move_to(point_to_cpu(Point::new(r.x0, r.y0)));
    out.line_to(point_to_cpu(Point::new(r.x1, r.y0)));
    out.line_to(point_to_cpu(Point::new(r.x1, r.y1)));
    out.line_to(point_to_cpu(Point::new(r.x0, r.y1)));
    out.close_path();
    out
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
