//! Coordinate transforms between artwork, viewport and zone space.

pub(crate) mod layer;
pub(crate) mod viewport;
