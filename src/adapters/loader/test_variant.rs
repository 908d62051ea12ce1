// Test variant recognition
// A loader run with tests enabled yields, for a package `p`, up to three extra packages:
//   `p [p.test]`       p recompiled with its in-package _test.go files
//   `p_test [p.test]`  the external test package
//   `p.test`           the generated test main
// Dependencies recompiled against a test variant also carry the `[p.test]` suffix.

use regex::Regex;
use std::sync::OnceLock;

/// Shape of a test variant id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestVariant {
    InPackage, // p [p.test]
    External,  // p_test [p.test]
    Main,      // p.test
    Augmented, // q [p.test], a dependency rebuilt for p's tests
}

fn bracketed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\S+) \[(\S+)\.test\]$").expect("test variant regex"))
}

fn main_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\S+)\.test$").expect("test main regex"))
}

/// Classify a package id; returns the variant and the path of the package under test.
pub fn classify(id: &str) -> Option<(TestVariant, &str)> {
    if let Some(caps) = bracketed_regex().captures(id) {
        let own = caps.get(1)?.as_str();
        let under_test = caps.get(2)?.as_str();
        let variant = if own == under_test {
            TestVariant::InPackage
        } else if own.strip_suffix("_test") == Some(under_test) {
            TestVariant::External
        } else {
            TestVariant::Augmented
        };
        return Some((variant, under_test));
    }
    let caps = main_regex().captures(id)?;
    Some((TestVariant::Main, caps.get(1)?.as_str()))
}

pub fn is_test_variant(id: &str) -> bool {
    classify(id).is_some()
}

/// True for the variants a loader reports next to `path` when it is requested with tests.
pub fn is_test_companion(id: &str, path: &str) -> bool {
    matches!(
        classify(id),
        Some((TestVariant::InPackage | TestVariant::External | TestVariant::Main, under_test))
            if under_test == path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_variants() {
        assert_eq!(
            classify("example.com/p [example.com/p.test]"),
            Some((TestVariant::InPackage, "example.com/p"))
        );
        assert_eq!(
            classify("example.com/p_test [example.com/p.test]"),
            Some((TestVariant::External, "example.com/p"))
        );
        assert_eq!(
            classify("example.com/p.test"),
            Some((TestVariant::Main, "example.com/p"))
        );
        assert_eq!(
            classify("example.com/q [example.com/p.test]"),
            Some((TestVariant::Augmented, "example.com/p"))
        );
    }

    #[test]
    fn test_plain_packages_are_not_variants() {
        assert!(!is_test_variant("example.com/p"));
        assert!(!is_test_variant("example.com/p_test"));
        assert!(!is_test_variant("fmt"));
    }

    #[test]
    fn test_companions_exclude_augmented_dependencies() {
        assert!(is_test_companion("a [a.test]", "a"));
        assert!(is_test_companion("a.test", "a"));
        assert!(!is_test_companion("b [a.test]", "a"));
        assert!(!is_test_companion("a [a.test]", "b"));
    }
}
