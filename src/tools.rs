pub(crate) mod brush;
pub(crate) mod context;
pub(crate) mod eraser;
pub(crate) mod gradient;
pub(crate) mod move_tool;
