pub mod loader;
pub mod program;
