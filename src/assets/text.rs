//! Text shaping for text layers.

use std::{borrow::Cow, collections::HashMap, sync::Arc};

use crate::assets::fonts::{FontCache, ResolvedFont};

/// Line height used by the estimated-metrics fallback, as a multiple of the font size.
const FALLBACK_LINE_HEIGHT: f32 = 1.2;
/// Average advance used by the estimated-metrics fallback, as a multiple of the font size.
const FALLBACK_ADVANCE: f32 = 0.6;
/// Baseline position used by the estimated-metrics fallback, as a multiple of the font size.
const FALLBACK_ASCENT: f32 = 0.9;

/// Text content plus the style properties that affect shaping.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Text to shape. `\n` starts a new line.
    pub content: String,
    /// Requested family name.
    pub font_family: String,
    /// Font size in artwork units.
    pub font_size: f32,
    /// CSS-style weight (100..=900).
    pub font_weight: u16,
    /// Italic style.
    pub italic: bool,
    /// Extra spacing added after each glyph, in artwork units.
    pub letter_spacing: f32,
}

/// One positioned glyph of a shaped text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id in the resolved font (0 for estimated glyphs).
    pub id: u32,
    /// Pen position x, relative to the text box's left edge.
    pub x: f32,
    /// Baseline y, relative to the text box's top edge.
    pub y: f32,
    /// Horizontal advance.
    pub advance: f32,
}

/// Result of shaping a [`TextStyle`].
#[derive(Clone, Debug)]
pub struct ShapedText {
    /// Positioned glyphs, in visual order.
    pub glyphs: Vec<ShapedGlyph>,
    /// Font size the glyphs were shaped at.
    pub font_size: f32,
    /// Box width in artwork units.
    pub width: f64,
    /// Box height in artwork units.
    pub height: f64,
    /// Baseline of the first line.
    pub first_baseline: f32,
    /// Font to draw the glyphs with; `None` when metrics were estimated.
    pub font: Option<ResolvedFont>,
}

impl ShapedText {
    /// Return `true` when glyph metrics come from a real font.
    pub fn is_shaped(&self) -> bool {
        self.font.is_some()
    }
}

/// Measures and shapes text. Injected wherever text geometry is needed.
pub trait TextMeasure {
    /// Shape `style` into positioned glyphs.
    fn shape(&mut self, style: &TextStyle) -> ShapedText;
}

/// Metrics-only shaper that never touches a font.
///
/// Every character gets the same advance; useful for headless layout and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct EstimatedMetrics;

impl TextMeasure for EstimatedMetrics {
    fn shape(&mut self, style: &TextStyle) -> ShapedText {
        estimate(style)
    }
}

/// Shapes text with parley, resolving fonts through a shared [`FontCache`].
///
/// Falls back to estimated metrics when no font is available at all.
pub struct TextShaper {
    fonts: Arc<FontCache>,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: HashMap<u64, String>,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("fonts", &self.fonts)
            .field("registered", &self.registered.len())
            .finish()
    }
}

impl TextShaper {
    /// Create a shaper over `fonts`.
    pub fn new(fonts: Arc<FontCache>) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Shared font cache.
    pub fn fonts(&self) -> &Arc<FontCache> {
        &self.fonts
    }

    fn family_name_for(&mut self, font: &ResolvedFont) -> Option<String> {
        if let Some(name) = self.registered.get(&font.key) {
            return Some(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id)?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)?
            .to_string();
        self.registered.insert(font.key, name.clone());
        Some(name)
    }
}

impl TextMeasure for TextShaper {
    #[tracing::instrument(skip(self, style), fields(family = %style.font_family, size = style.font_size))]
    fn shape(&mut self, style: &TextStyle) -> ShapedText {
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            return estimate(style);
        }
        let Some(font) = self
            .fonts
            .resolve(&style.font_family, style.font_weight, style.italic)
        else {
            tracing::debug!("no fonts registered, estimating text metrics");
            return estimate(style);
        };
        let Some(family_name) = self.family_name_for(&font) else {
            tracing::warn!(family = %font.family, "font bytes did not register a family");
            return estimate(style);
        };

        let text = style.content.as_str();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.font_size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(style.font_weight)),
        ));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        if style.letter_spacing != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                style.letter_spacing,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut first_baseline = None;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let baseline = run.baseline();
                first_baseline.get_or_insert(baseline);
                let mut pen = run.offset();
                for g in run.glyphs() {
                    glyphs.push(ShapedGlyph {
                        id: g.id,
                        x: pen + g.x,
                        y: baseline - g.y,
                        advance: g.advance,
                    });
                    pen += g.advance;
                }
            }
        }

        let line_height = style.font_size * FALLBACK_LINE_HEIGHT;
        ShapedText {
            glyphs,
            font_size: style.font_size,
            width: f64::from(layout.width()),
            height: f64::from(layout.height().max(line_height)),
            first_baseline: first_baseline.unwrap_or(style.font_size * FALLBACK_ASCENT),
            font: Some(font),
        }
    }
}

/// Uniform-advance layout used when no font can be resolved.
pub fn estimate(style: &TextStyle) -> ShapedText {
    let size = if style.font_size.is_finite() && style.font_size > 0.0 {
        style.font_size
    } else {
        1.0
    };
    let advance = size * FALLBACK_ADVANCE + style.letter_spacing;
    let line_height = size * FALLBACK_LINE_HEIGHT;
    let ascent = size * FALLBACK_ASCENT;

    let mut glyphs = Vec::new();
    let mut width = 0.0f32;
    let mut lines = 0usize;
    for (i, line) in style.content.split('\n').enumerate() {
        lines += 1;
        let baseline = ascent + line_height * i as f32;
        let mut pen = 0.0f32;
        for _ in line.chars() {
            glyphs.push(ShapedGlyph {
                id: 0,
                x: pen,
                y: baseline,
                advance,
            });
            pen += advance;
        }
        width = width.max(pen);
    }

    ShapedText {
        glyphs,
        font_size: size,
        width: f64::from(width.max(0.0)),
        height: f64::from(line_height * lines.max(1) as f32),
        first_baseline: ascent,
        font: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
