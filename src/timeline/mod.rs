pub(crate) mod ease;
pub(crate) mod intensity;
pub(crate) mod phase;
