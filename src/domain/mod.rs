pub mod builder;
pub mod config;
pub mod package;
pub mod policy;
pub mod ports;
pub mod program;
pub mod walker;
