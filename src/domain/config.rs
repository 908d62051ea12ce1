use serde::{Deserialize, Serialize};

/// `deps_level` value meaning "no depth limit"
pub const UNLIMITED_DEPTH: i64 = -1;

/// Loader configuration: which packages get a full build and which only a stub.
///
/// - `include`: path prefixes that are always built in full (subject only to depth).
/// - `limit`: path prefixes eligible for a full build.
/// - `ignore`: path prefixes excluded from `limit`; they never cancel `include`.
/// - `tests`: whether test variants are loaded; consumed by the loader only.
/// - `no_deps`: skip the dependency walk and build the initial packages directly.
/// - `deps_level`: maximum import depth for full builds, `-1` for unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub ignore: Vec<String>,
    pub include: Vec<String>,
    pub limit: Vec<String>,
    pub tests: bool,
    pub no_deps: bool,
    pub deps_level: i64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            include: Vec::new(),
            limit: Vec::new(),
            tests: false,
            no_deps: false,
            deps_level: UNLIMITED_DEPTH,
        }
    }
}

impl LoaderConfig {
    /// True when a package at `level` passes the depth threshold.
    pub fn within_depth(&self, level: usize) -> bool {
        self.deps_level == UNLIMITED_DEPTH
            || i64::try_from(level).is_ok_and(|lv| lv <= self.deps_level)
    }
}
