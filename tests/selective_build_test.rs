//! SelectiveBuilder scenarios: rule precedence, depth gating, fast path, output order.

mod common;

use common::fixtures::{app_lib_chain, config, graph_from_edges, id};
use common::mock::RecordingProgramBuilder;
use pkgscope::domain::builder::SelectiveBuilder;
use pkgscope::domain::config::LoaderConfig;
use pkgscope::domain::package::PackageGraph;
use pkgscope::domain::policy::{Fidelity, Reason};

fn run(graph: &PackageGraph, roots: &[&str], cfg: &LoaderConfig) -> RecordingProgramBuilder {
    let recorder = RecordingProgramBuilder::new();
    let builder = SelectiveBuilder::new(Box::new(recorder.clone()));
    let roots: Vec<_> = roots.iter().map(|r| id(graph, r)).collect();
    builder.build(graph, &roots, cfg);
    recorder
}

#[test]
fn test_limit_with_ignore_scenario() {
    let graph = app_lib_chain();
    let rec = run(&graph, &["app"], &config(&[], &["lib"], &["lib/b"], -1));

    assert_eq!(rec.fidelity_of("lib/a"), Some(Fidelity::Full));
    assert_eq!(rec.fidelity_of("lib/b"), Some(Fidelity::Stub));
    // the root matches neither include nor limit: depth eligibility alone is not enough
    assert_eq!(rec.fidelity_of("app"), Some(Fidelity::Stub));
}

#[test]
fn test_root_matching_limit_is_full() {
    let graph = app_lib_chain();
    let rec = run(&graph, &["app"], &config(&[], &["app", "lib"], &["lib/b"], -1));
    assert_eq!(
        rec.calls(),
        vec![
            ("lib/b".to_string(), Fidelity::Stub),
            ("lib/a".to_string(), Fidelity::Full),
            ("app".to_string(), Fidelity::Full),
        ]
    );
}

#[test]
fn test_depth_zero_gates_dependencies() {
    let graph = app_lib_chain();
    let rec = run(&graph, &["app"], &config(&[], &["app", "lib"], &[], 0));
    assert_eq!(rec.fidelity_of("app"), Some(Fidelity::Full));
    assert_eq!(rec.fidelity_of("lib/a"), Some(Fidelity::Stub));
    assert_eq!(rec.fidelity_of("lib/b"), Some(Fidelity::Stub));
}

#[test]
fn test_depth_gate_overrides_include() {
    let graph = app_lib_chain();
    let rec = run(&graph, &["app"], &config(&["lib"], &[], &[], 1));
    assert_eq!(rec.fidelity_of("lib/a"), Some(Fidelity::Full));
    assert_eq!(rec.fidelity_of("lib/b"), Some(Fidelity::Stub));
}

#[test]
fn test_include_wins_over_ignore() {
    let graph = app_lib_chain();
    let rec = run(&graph, &["app"], &config(&["lib/b"], &["lib"], &["lib"], -1));
    assert_eq!(rec.fidelity_of("lib/b"), Some(Fidelity::Full));
    assert_eq!(rec.fidelity_of("lib/a"), Some(Fidelity::Stub));
}

#[test]
fn test_no_deps_builds_only_initial_at_full() {
    let graph = app_lib_chain();
    let cfg = LoaderConfig {
        no_deps: true,
        ..config(&[], &["lib"], &["app"], 0)
    };
    let rec = run(&graph, &["app"], &cfg);
    assert_eq!(rec.calls(), vec![("app".to_string(), Fidelity::Full)]);
}

#[test]
fn test_output_parallels_initial_with_holes() {
    let mut graph = graph_from_edges(
        &["svc/a", "svc/b", "svc/c", "shared"],
        &[("svc/a", "shared"), ("svc/c", "shared")],
    );
    let broken = id(&graph, "svc/b");
    graph.graph[broken].ill_typed = true;

    let roots = [id(&graph, "svc/c"), id(&graph, "svc/b"), id(&graph, "svc/a")];
    let out = SelectiveBuilder::new(Box::new(RecordingProgramBuilder::new())).build(
        &graph,
        &roots,
        &config(&[], &["svc"], &[], -1),
    );

    assert_eq!(out.initial.len(), 3);
    assert!(out.initial[1].is_none());
    let paths: Vec<Option<&str>> = out
        .initial
        .iter()
        .map(|slot| slot.and_then(|b| out.program.get(b)).map(|p| p.path.as_str()))
        .collect();
    assert_eq!(paths, vec![Some("svc/c"), None, Some("svc/a")]);
    // shared is visited once, at level 1 under svc/c
    let shared = out.decision_for(id(&graph, "shared")).unwrap();
    assert_eq!(shared.level, 1);
    assert_eq!(shared.verdict.reason, Reason::Unmatched);
    assert_eq!(out.program.len(), 3);
}

#[test]
fn test_ill_typed_package_never_reaches_builder() {
    let mut graph = app_lib_chain();
    let untyped = id(&graph, "lib/a");
    graph.graph[untyped].types = None;
    let rec = run(&graph, &["app"], &config(&[], &["lib"], &[], -1));
    assert_eq!(rec.fidelity_of("lib/a"), None);
    // its imports are still walked
    assert_eq!(rec.fidelity_of("lib/b"), Some(Fidelity::Full));
}
