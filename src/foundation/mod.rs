//! Shared geometry, error, configuration and pixel-math primitives.

pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
