//! pkgscope library — selective, depth-leveled program construction over a package import graph.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
