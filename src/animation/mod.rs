pub(crate) mod ease;
pub(crate) mod interpolate;
pub(crate) mod morph;
