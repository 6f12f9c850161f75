use crate::{
    foundation::error::{PrintZoneError, PrintZoneResult},
    scene::graph::SceneGraph,
    transform::viewport::ViewTransform,
};

/// Rendered RGBA8 frame.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major RGBA8 order.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Transparent premultiplied frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: true,
        }
    }

    /// Read one pixel; out-of-range coordinates are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Convert to straight alpha in place.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }
}

/// The single drawing surface of a session.
///
/// Holds on-screen pixel dimensions and the view transform mapping artwork space onto them. Only
/// one target is live at a time; a view switch replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    canvas_size: f64,
    view: ViewTransform,
    backdrop_visible: bool,
}

impl RenderTarget {
    /// Target of `width × height` pixels showing a `canvas_size²` artwork through `view`.
    pub fn new(width: u32, height: u32, canvas_size: f64, view: ViewTransform) -> Self {
        Self {
            width,
            height,
            canvas_size,
            view,
            backdrop_visible: true,
        }
    }

    /// Target drawing the artwork 1:1 at `multiplier` pixels per artwork unit.
    pub fn native(canvas_size: u32, multiplier: u32) -> Self {
        let px = canvas_size.saturating_mul(multiplier);
        Self {
            width: px,
            height: px,
            canvas_size: f64::from(canvas_size),
            view: ViewTransform {
                scale: f64::from(multiplier),
                tx: 0.0,
                ty: 0.0,
            },
            backdrop_visible: false,
        }
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Artwork canvas side.
    pub fn canvas_size(&self) -> f64 {
        self.canvas_size
    }

    /// Current view transform.
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Whether the product photo is drawn behind the layers.
    pub fn backdrop_visible(&self) -> bool {
        self.backdrop_visible
    }

    /// Show or hide the product photo.
    pub fn set_backdrop_visible(&mut self, visible: bool) {
        self.backdrop_visible = visible;
    }

    /// Apply new pixel dimensions and view transform.
    pub fn resize(&mut self, width: u32, height: u32, view: ViewTransform) {
        self.width = width;
        self.height = height;
        self.view = view;
    }

    /// Validate dimensions against the rasterizer's limits.
    pub fn checked_dims(&self) -> PrintZoneResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| PrintZoneError::render("target width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| PrintZoneError::render("target height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PrintZoneError::render("target has zero area"));
        }
        Ok((w, h))
    }
}

#[derive(Clone, Copy, Debug)]
struct SavedTarget {
    width: u32,
    height: u32,
    view: ViewTransform,
    backdrop_visible: bool,
    guide_visible: bool,
}

/// Scope guard that switches a target to native export resolution.
///
/// While alive, the target renders the full `canvas_size × multiplier` square with an identity
/// (times multiplier) transform, without backdrop or guide. Dropping the guard restores the saved
/// dimensions, transform and visibility on every exit path.
pub struct NativeCapture<'a> {
    target: &'a mut RenderTarget,
    scene: &'a mut SceneGraph,
    saved: SavedTarget,
}

impl<'a> NativeCapture<'a> {
    /// Save the target state and switch it to native resolution.
    pub fn begin(target: &'a mut RenderTarget, scene: &'a mut SceneGraph, multiplier: u32) -> Self {
        let saved = SavedTarget {
            width: target.width,
            height: target.height,
            view: target.view,
            backdrop_visible: target.backdrop_visible,
            guide_visible: scene.guide_visible(),
        };

        let native = RenderTarget::native(target.canvas_size.round() as u32, multiplier);
        target.width = native.width;
        target.height = native.height;
        target.view = native.view;
        target.backdrop_visible = false;
        scene.set_guide_visible(false);

        Self {
            target,
            scene,
            saved,
        }
    }

    /// Target in its native configuration.
    pub fn target(&self) -> &RenderTarget {
        self.target
    }

    /// Scene with its guide hidden.
    pub fn scene(&self) -> &SceneGraph {
        self.scene
    }
}

impl Drop for NativeCapture<'_> {
    fn drop(&mut self) {
        self.target.width = self.saved.width;
        self.target.height = self.saved.height;
        self.target.view = self.saved.view;
        self.target.backdrop_visible = self.saved.backdrop_visible;
        self.scene.set_guide_visible(self.saved.guide_visible);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
