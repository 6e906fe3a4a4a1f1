pub(crate) mod grid;
pub mod presets;
