//! Package loading adapters
//!
//! The loader materializes a [PackageGraph](crate::domain::package::PackageGraph) from a
//! package manifest and selects the initial packages requested by the caller.

pub mod manifest;
pub mod test_variant;

pub use manifest::ManifestLoader;
