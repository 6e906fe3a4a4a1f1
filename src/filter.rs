pub(crate) mod convolution;
pub(crate) mod multi;
pub(crate) mod point;
pub(crate) mod spec;
pub(crate) mod traits;
