//! Deterministic, visit-once depth-first walk over a [PackageGraph].
//!
//! Each package is visited once for the whole walk (the seen set is shared by all
//! roots) at the level of the first path that reaches it. Imports are followed in
//! import-path order, so levels of shared dependencies are reproducible. This is the
//! traversal-order level, not necessarily the shortest distance to a root.

use crate::domain::package::{Package, PackageGraph, PackageId};
use std::collections::HashSet;

/// One package on the explicit DFS stack
struct Frame {
    package: PackageId,
    level: usize,
    pending: std::vec::IntoIter<PackageId>,
}

/// Visit-once DFS over the import graph.
///
/// `pre(id, pkg, level)` runs on first visit; returning `false` skips that package's
/// imports, but `post` still fires for it. `post(id, pkg, level)` runs once all
/// followed imports are finished.
pub struct GraphWalker<'g> {
    graph: &'g PackageGraph,
    seen: HashSet<PackageId>,
    stack: Vec<Frame>,
}

impl<'g> GraphWalker<'g> {
    pub fn new(graph: &'g PackageGraph) -> Self {
        Self {
            graph,
            seen: HashSet::with_capacity(graph.len()),
            stack: Vec::new(),
        }
    }

    /// Walk from `roots` in the given order, each root starting at level 0.
    pub fn walk<Pre, Post>(mut self, roots: &[PackageId], mut pre: Pre, mut post: Post)
    where
        Pre: FnMut(PackageId, &'g Package, usize) -> bool,
        Post: FnMut(PackageId, &'g Package, usize),
    {
        let graph = self.graph;
        for &root in roots {
            self.enter(root, 0, &mut pre);

            while let Some(frame) = self.stack.last_mut() {
                match frame.pending.next() {
                    Some(child) => {
                        let level = frame.level + 1;
                        self.enter(child, level, &mut pre);
                    }
                    None => {
                        if let Some(done) = self.stack.pop() {
                            post(done.package, graph.package(done.package), done.level);
                        }
                    }
                }
            }
        }
    }

    /// Walk with only a post-order callback.
    pub fn walk_post<Post>(self, roots: &[PackageId], post: Post)
    where
        Post: FnMut(PackageId, &'g Package, usize),
    {
        self.walk(roots, |_, _, _| true, post);
    }

    fn enter<Pre>(&mut self, package: PackageId, level: usize, pre: &mut Pre)
    where
        Pre: FnMut(PackageId, &'g Package, usize) -> bool,
    {
        if !self.seen.insert(package) {
            return;
        }
        let graph = self.graph;
        let pending = if pre(package, graph.package(package), level) {
            graph.sorted_imports(package)
        } else {
            Vec::new()
        };
        self.stack.push(Frame {
            package,
            level,
            pending: pending.into_iter(),
        });
    }
}

/// Post-order `(package, level)` sequence of a full walk from `roots`.
pub fn post_order(graph: &PackageGraph, roots: &[PackageId]) -> Vec<(PackageId, usize)> {
    let mut order = Vec::with_capacity(graph.len());
    GraphWalker::new(graph).walk_post(roots, |id, _, level| order.push((id, level)));
    order
}
