//! Artwork space ↔ viewport space mapping.

use crate::foundation::{
    core::{Affine, Point, Vec2},
    error::{PrintZoneError, PrintZoneResult},
};

/// Uniform scale + translation that fits the square artwork canvas into the on-screen container.
///
/// Only on-screen rendering and hit testing use it; stored layer geometry stays in artwork space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Uniform scale factor.
    pub scale: f64,
    /// Horizontal translation in viewport pixels.
    pub tx: f64,
    /// Vertical translation in viewport pixels.
    pub ty: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// Native 1:1 mapping with no translation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Fit a `canvas_size²` artwork into a `container_w × container_h` container, centered, with
    /// `padding` (e.g. 0.9) of visual margin.
    pub fn fit(
        container_w: f64,
        container_h: f64,
        canvas_size: f64,
        padding: f64,
    ) -> PrintZoneResult<Self> {
        if !container_w.is_finite() || !container_h.is_finite() || container_w <= 0.0 || container_h <= 0.0 {
            return Err(PrintZoneError::validation(
                "container dimensions must be finite and > 0",
            ));
        }
        if !canvas_size.is_finite() || canvas_size <= 0.0 {
            return Err(PrintZoneError::validation("canvas size must be > 0"));
        }

        let scale = (container_w / canvas_size).min(container_h / canvas_size) * padding;
        let tx = (container_w - canvas_size * scale) / 2.0;
        let ty = (container_h - canvas_size * scale) / 2.0;
        Ok(Self { scale, tx, ty })
    }

    /// Affine mapping artwork space into viewport space.
    pub fn to_affine(self) -> Affine {
        Affine::translate(Vec2::new(self.tx, self.ty)) * Affine::scale(self.scale)
    }

    /// Map an artwork-space point to viewport pixels.
    pub fn artwork_to_viewport(self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    /// Map a viewport pixel back into artwork space.
    pub fn viewport_to_artwork(self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.scale, (p.y - self.ty) / self.scale)
    }
}

/// On-screen container size in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Defers container resizes to the next animation frame.
///
/// Resize notifications may arrive in bursts (and may be caused by the editor's own layout, e.g.
/// a collapsing side panel); only the last size of a burst is applied, once, on the next tick.
#[derive(Clone, Debug, Default)]
pub struct LayoutScheduler {
    applied: Option<ContainerSize>,
    pending: Option<ContainerSize>,
}

impl LayoutScheduler {
    /// Create a scheduler with an already-applied container size.
    pub fn with_size(size: ContainerSize) -> Self {
        Self {
            applied: Some(size),
            pending: None,
        }
    }

    /// Record a resize. Takes effect on the next [`LayoutScheduler::on_animation_frame`].
    pub fn request_resize(&mut self, width: f64, height: f64) {
        self.pending = Some(ContainerSize { width, height });
    }

    /// Return `true` when a resize is waiting for the next frame.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the pending resize, if it differs from the applied one.
    ///
    /// Returns the newly applied size, or `None` when nothing changed.
    pub fn on_animation_frame(&mut self) -> Option<ContainerSize> {
        let next = self.pending.take()?;
        if self.applied == Some(next) {
            return None;
        }
        self.applied = Some(next);
        Some(next)
    }

    /// Currently applied container size.
    pub fn applied(&self) -> Option<ContainerSize> {
        self.applied
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/viewport.rs"]
mod tests;
