pub(crate) mod graph;
pub(crate) mod shape;
pub(crate) mod surface;
