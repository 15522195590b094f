pub(crate) mod ramp;
