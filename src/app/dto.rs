use crate::domain::config::LoaderConfig;
use crate::domain::policy::{Fidelity, Reason};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub config: LoaderConfig,
    pub package_count: usize,
    pub full_count: usize,
    pub stub_count: usize,
    /// Files in the load session's position table
    pub file_count: usize,
    /// Visited packages that failed to type-check and were not built
    pub skipped: Vec<SkippedPackage>,
    /// One slot per initial package, in request order
    pub initial: Vec<InitialSlot>,
    /// Per-package decisions in walk post-order; the built initial packages for `no_deps`
    pub packages: Vec<PackageReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPackage {
    pub id: String,
    pub path: String,
    /// Type errors reported by the loader
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitialSlot {
    pub id: String,
    pub path: String,
    /// Absent when the package failed to type-check
    pub built: Option<BuiltSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuiltSummary {
    pub fidelity: Fidelity,
    pub member_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub id: String,
    pub path: String,
    pub name: String,
    pub files: Vec<String>,
    pub level: usize,
    pub initial: bool,
    pub fidelity: Fidelity,
    pub reason: Reason,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelEntry {
    pub id: String,
    pub path: String,
    pub level: usize,
    pub well_typed: bool,
    pub errors: Vec<String>,
}
