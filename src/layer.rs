pub(crate) mod guard;
pub(crate) mod model;
pub(crate) mod stack;
