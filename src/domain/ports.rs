use crate::domain::package::{Package, PackageGraph, PackageId, PositionTable, SourceFile};
use crate::domain::program::{BuiltId, Program};
use anyhow::Result;
use std::sync::Arc;

/// Packages produced by a [PackageLoader]: the import graph plus the initial set, in request order.
#[derive(Debug, Clone, Default)]
pub struct LoadedPackages {
    pub graph: PackageGraph,
    pub initial: Vec<PackageId>,
}

/// Package loading port (implemented by Infrastructure)
pub trait PackageLoader {
    /// Load the packages selected by `patterns` and everything they import.
    /// `tests` controls whether test variants are part of the result.
    fn load(&self, patterns: &[String], tests: bool) -> Result<LoadedPackages>;
}

/// Program construction port
pub trait ProgramBuilder: Send + Sync {
    /// Create an empty program sharing the session's position table.
    fn new_program(&self, positions: &PositionTable) -> Program {
        Program::new(Arc::new(positions.clone()))
    }

    /// Build `package` into `program`: a full build when `syntax` is given, a stub otherwise.
    fn create_package(
        &self,
        program: &mut Program,
        package: &Package,
        syntax: Option<&[SourceFile]>,
    ) -> BuiltId;

    /// Build the initial packages at full fidelity without any dependency selection.
    ///
    /// The result parallels `initial`; ill-typed packages yield `None`.
    fn build_direct(
        &self,
        graph: &PackageGraph,
        initial: &[PackageId],
    ) -> (Program, Vec<Option<BuiltId>>) {
        let mut program = self.new_program(&graph.positions);
        let built = initial
            .iter()
            .map(|&idx| {
                let package = graph.package(idx);
                package
                    .is_well_typed()
                    .then(|| self.create_package(&mut program, package, Some(&package.syntax)))
            })
            .collect();
        (program, built)
    }
}
