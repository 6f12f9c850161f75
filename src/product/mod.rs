//! Product descriptor: canvas size, views with their zones, and color variants.

pub(crate) mod model;
