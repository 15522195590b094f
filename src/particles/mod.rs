pub(crate) mod profile;
pub(crate) mod rng;
pub(crate) mod system;
