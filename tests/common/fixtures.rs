//! Package graph fixtures for integration tests.
#![allow(dead_code)]

use pkgscope::domain::config::LoaderConfig;
use pkgscope::domain::package::{Package, PackageGraph, PackageId};

/// Build a graph from package paths and `(importer, imported)` edges, inserting
/// edges in the given order. Packages are keyed by path.
pub fn graph_from_edges(paths: &[&str], edges: &[(&str, &str)]) -> PackageGraph {
    let mut graph = PackageGraph::new();
    for path in paths {
        graph.add_package(Package::new(*path, *path));
    }
    for (from, to) in edges {
        let importer = graph.get_by_id(from).expect("importer in fixture");
        let imported = graph.get_by_id(to).expect("imported in fixture");
        graph.add_import(importer, imported, *to);
    }
    graph
}

pub fn id(graph: &PackageGraph, path: &str) -> PackageId {
    graph.get_by_id(path).expect("package in fixture")
}

/// app -> lib/a -> lib/b
pub fn app_lib_chain() -> PackageGraph {
    graph_from_edges(
        &["app", "lib/a", "lib/b"],
        &[("app", "lib/a"), ("lib/a", "lib/b")],
    )
}

/// Shared sub-dependencies with one short and one long route to `util`:
/// app -> {api, util}, api -> {db, model}, db -> model, model -> util
pub fn shared_deps(edge_order_reversed: bool) -> PackageGraph {
    let mut edges = vec![
        ("app", "api"),
        ("app", "util"),
        ("api", "db"),
        ("api", "model"),
        ("db", "model"),
        ("model", "util"),
    ];
    if edge_order_reversed {
        edges.reverse();
    }
    let mut paths = vec!["app", "api", "db", "model", "util"];
    if edge_order_reversed {
        paths.reverse();
    }
    graph_from_edges(&paths, &edges)
}

pub fn config(include: &[&str], limit: &[&str], ignore: &[&str], deps_level: i64) -> LoaderConfig {
    LoaderConfig {
        include: include.iter().map(|s| s.to_string()).collect(),
        limit: limit.iter().map(|s| s.to_string()).collect(),
        ignore: ignore.iter().map(|s| s.to_string()).collect(),
        deps_level,
        ..Default::default()
    }
}
