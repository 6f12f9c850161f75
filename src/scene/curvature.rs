//! Text-on-arc geometry.
//!
//! A curvature angle θ and a flat text width `w` define a circular arc of radius `w / |θ|` whose
//! chord equals `w`. Glyphs keep their flat advances and are walked along the arc by arc length,
//! centered, each rotated to the local tangent. The derivation only needs the flat width and the
//! glyph pen positions, never font internals.

use crate::{
    assets::text::ShapedText,
    foundation::core::{BezPath, Point, Vec2},
};

/// Largest accepted curvature magnitude, in degrees.
pub const MAX_CURVATURE_DEG: f64 = 60.0;

/// Curvatures closer to zero than this are treated as straight.
const STRAIGHT_EPSILON_DEG: f64 = 1e-6;

/// Clamp a curvature angle into the accepted range. Non-finite input maps to 0.
pub fn clamp_curvature(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    degrees.clamp(-MAX_CURVATURE_DEG, MAX_CURVATURE_DEG)
}

/// Which side of the chord the arc bulges towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bulge {
    /// Arc above the chord (θ > 0).
    Up,
    /// Arc below the chord (θ < 0).
    Down,
}

/// Circular arc a curved text layer is laid out along, in the layer's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArcPath {
    /// Circle radius.
    pub radius: f64,
    /// Swept angle in radians (always positive).
    pub sweep: f64,
    /// Chord length; equals the flat text width.
    pub chord: f64,
    /// Local y of the chord (the first line's baseline).
    pub baseline: f64,
    /// Bulge direction.
    pub bulge: Bulge,
}

impl ArcPath {
    /// Build the arc for `degrees` of curvature over a flat width.
    ///
    /// Returns `None` for (near) zero curvature or an empty width; such text stays straight.
    pub fn for_curvature(degrees: f64, flat_width: f64, baseline: f64) -> Option<Self> {
        let degrees = clamp_curvature(degrees);
        if degrees.abs() < STRAIGHT_EPSILON_DEG || !(flat_width.is_finite() && flat_width > 0.0) {
            return None;
        }
        let theta = degrees.abs().to_radians();
        let radius = flat_width / theta;
        let sweep = 2.0 * (theta / 2.0).asin();
        Some(Self {
            radius,
            sweep,
            chord: flat_width,
            baseline,
            bulge: if degrees > 0.0 { Bulge::Up } else { Bulge::Down },
        })
    }

    /// Length of the arc.
    pub fn arc_length(&self) -> f64 {
        self.radius * self.sweep
    }

    /// Distance from the circle center to the chord.
    fn apothem(&self) -> f64 {
        let half = self.chord / 2.0;
        (self.radius * self.radius - half * half).max(0.0).sqrt()
    }

    /// Circle center in local coordinates.
    pub fn center(&self) -> Point {
        let d = self.apothem();
        match self.bulge {
            Bulge::Up => Point::new(self.chord / 2.0, self.baseline + d),
            Bulge::Down => Point::new(self.chord / 2.0, self.baseline - d),
        }
    }

    /// Point at angle `phi` (0 = arc midpoint, increasing left to right) on a circle of `radius`
    /// around [`ArcPath::center`].
    pub fn point_at(&self, phi: f64, radius: f64) -> Point {
        let c = self.center();
        match self.bulge {
            Bulge::Up => c + Vec2::new(radius * phi.sin(), -radius * phi.cos()),
            Bulge::Down => c + Vec2::new(radius * phi.sin(), radius * phi.cos()),
        }
    }

    /// Direction of travel at `phi`, in radians.
    pub fn tangent_angle(&self, phi: f64) -> f64 {
        match self.bulge {
            Bulge::Up => phi,
            Bulge::Down => -phi,
        }
    }

    /// The arc as a bezier path from the left chord end to the right one.
    pub fn to_bez_path(&self) -> BezPath {
        use kurbo::Shape as _;

        let (start_angle, sweep_angle) = match self.bulge {
            Bulge::Up => (-self.sweep / 2.0 - std::f64::consts::FRAC_PI_2, self.sweep),
            Bulge::Down => (std::f64::consts::FRAC_PI_2 + self.sweep / 2.0, -self.sweep),
        };
        kurbo::Arc::new(
            self.center(),
            Vec2::new(self.radius, self.radius),
            start_angle,
            sweep_angle,
            0.0,
        )
        .to_path(0.1)
    }
}

/// Glyph pen position and rotation in a text layer's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Glyph id.
    pub id: u32,
    /// Pen origin x.
    pub x: f64,
    /// Pen origin (baseline) y.
    pub y: f64,
    /// Rotation in radians about the pen origin.
    pub rotation: f64,
}

/// Place shaped glyphs either straight or along `curve`.
pub fn place_glyphs(shaped: &ShapedText, curve: Option<&ArcPath>) -> Vec<PlacedGlyph> {
    let Some(arc) = curve else {
        return shaped
            .glyphs
            .iter()
            .map(|g| PlacedGlyph {
                id: g.id,
                x: f64::from(g.x),
                y: f64::from(g.y),
                rotation: 0.0,
            })
            .collect();
    };

    let lead_in = (arc.arc_length() - arc.chord) / 2.0;
    let first_baseline = f64::from(shaped.first_baseline);
    shaped
        .glyphs
        .iter()
        .map(|g| {
            let half_advance = f64::from(g.advance) / 2.0;
            let s = lead_in + f64::from(g.x) + half_advance;

            // Lines below the first sit on concentric circles.
            let dy = f64::from(g.y) - first_baseline;
            let radius = match arc.bulge {
                Bulge::Up => arc.radius - dy,
                Bulge::Down => arc.radius + dy,
            };

            let phi = -arc.sweep / 2.0 + s / arc.radius;
            let mid = arc.point_at(phi, radius);
            let rotation = arc.tangent_angle(phi);
            let back = Vec2::new(rotation.cos(), rotation.sin()) * half_advance;
            let origin = mid - back;
            PlacedGlyph {
                id: g.id,
                x: origin.x,
                y: origin.y,
                rotation,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/curvature.rs"]
mod tests;
