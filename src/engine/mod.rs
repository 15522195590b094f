pub(crate) mod burn;
pub(crate) mod preset;
