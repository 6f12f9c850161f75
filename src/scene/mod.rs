pub(crate) mod curvature;
pub(crate) mod document;
pub(crate) mod graph;
pub(crate) mod layer;
