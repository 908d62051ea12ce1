use crate::domain::config::LoaderConfig;
use serde::Serialize;

/// How completely a package is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    Full, // Built from parsed syntax; analyzable bodies
    Stub, // Type signatures only
}

/// Why a package received its fidelity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Included,   // Matched an include prefix
    Limited,    // Matched a limit prefix and no ignore prefix
    Ignored,    // Matched a limit prefix, suppressed by an ignore prefix
    Unmatched,  // Matched neither include nor limit
    DepthGated, // Deeper than deps_level and not an initial package
    Direct,     // Requested package of a no_deps build; the policy is not consulted
}

/// Inclusion decision for one package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub fidelity: Fidelity,
    pub reason: Reason,
}

impl Verdict {
    fn full(reason: Reason) -> Self {
        Self {
            fidelity: Fidelity::Full,
            reason,
        }
    }

    fn stub(reason: Reason) -> Self {
        Self {
            fidelity: Fidelity::Stub,
            reason,
        }
    }

    /// Verdict for an initial package built without walking its dependencies
    pub fn direct() -> Self {
        Self::full(Reason::Direct)
    }

    pub fn is_full(&self) -> bool {
        self.fidelity == Fidelity::Full
    }
}

/// A set of path prefixes. Matching is case-sensitive `starts_with`, not glob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRules {
    prefixes: Vec<String>,
}

impl PathRules {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Full-vs-stub policy derived from a [LoaderConfig].
///
/// Precedence: the depth gate is absolute for non-initial packages; `include`
/// beats `ignore`; `ignore` only cancels `limit`; everything else is a stub.
#[derive(Debug, Clone)]
pub struct InclusionPolicy {
    include: PathRules,
    limit: PathRules,
    ignore: PathRules,
    config: LoaderConfig,
}

impl InclusionPolicy {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            include: PathRules::new(config.include.iter().cloned()),
            limit: PathRules::new(config.limit.iter().cloned()),
            ignore: PathRules::new(config.ignore.iter().cloned()),
            config: config.clone(),
        }
    }

    pub fn evaluate(&self, path: &str, level: usize, is_initial: bool) -> Verdict {
        // 1. Depth eligibility
        if !is_initial && !self.config.within_depth(level) {
            return Verdict::stub(Reason::DepthGated);
        }

        // 2. Path rules
        if self.include.matches(path) {
            return Verdict::full(Reason::Included);
        }
        if self.limit.matches(path) {
            if self.ignore.matches(path) {
                return Verdict::stub(Reason::Ignored);
            }
            return Verdict::full(Reason::Limited);
        }
        Verdict::stub(Reason::Unmatched)
    }
}
