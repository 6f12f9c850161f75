//! Per-layer placement transform.

use crate::foundation::core::{Affine, Point, Rect, Vec2};

/// Which point of a layer's box its `x`/`y` position refers to, per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Left (x axis) or top (y axis) edge.
    Start,
    /// Box center.
    #[default]
    Center,
    /// Right (x axis) or bottom (y axis) edge.
    End,
}

impl Origin {
    /// Fraction of the box extent the origin sits at.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// Placement of a layer in artwork space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerTransform {
    /// Origin point x, artwork units.
    pub x: f64,
    /// Origin point y, artwork units.
    pub y: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Clockwise rotation in degrees about the origin point.
    pub rotation: f64,
    /// Horizontal origin.
    #[serde(default)]
    pub origin_x: Origin,
    /// Vertical origin.
    #[serde(default)]
    pub origin_y: Origin,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            origin_x: Origin::Center,
            origin_y: Origin::Center,
        }
    }
}

impl LayerTransform {
    /// Transform centered on `p`.
    pub fn centered_at(p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            ..Self::default()
        }
    }

    /// Affine mapping the layer's local box `(0,0)-(width,height)` into artwork space.
    pub fn to_affine(self, width: f64, height: f64) -> Affine {
        let anchor = Vec2::new(
            width * self.origin_x.fraction(),
            height * self.origin_y.fraction(),
        );

        // T(position) * R(rotation) * S(scale) * T(-anchor)
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(-anchor)
    }

    /// Center of the transformed box in artwork space.
    pub fn center(self, width: f64, height: f64) -> Point {
        self.to_affine(width, height) * Point::new(width / 2.0, height / 2.0)
    }

    /// Axis-aligned bounds of the transformed box.
    pub fn bounds(self, width: f64, height: f64) -> Rect {
        self.to_affine(width, height)
            .transform_rect_bbox(Rect::new(0.0, 0.0, width, height))
    }

    /// Return `true` when artwork-space `p` lies inside the transformed box grown by `slop`
    /// artwork units on each side.
    pub fn contains(self, width: f64, height: f64, p: Point, slop: f64) -> bool {
        let affine = self.to_affine(width, height);
        if affine.determinant().abs() < f64::EPSILON {
            return false;
        }
        let local = affine.inverse() * p;
        let sx = self.scale_x.abs().max(f64::EPSILON);
        let sy = self.scale_y.abs().max(f64::EPSILON);
        let (slop_x, slop_y) = (slop / sx, slop / sy);
        local.x >= -slop_x
            && local.x <= width + slop_x
            && local.y >= -slop_y
            && local.y <= height + slop_y
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/layer.rs"]
mod tests;
