use crate::domain::package::{Package, SourceFile};
use crate::domain::policy::Fidelity;
use crate::domain::ports::ProgramBuilder;
use crate::domain::program::{BuiltId, BuiltPackage, Program};

/// Program builder producing member summaries.
///
/// A full build lists every top-level member declared in the package's syntax;
/// a stub lists only the exported signatures known from type information.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryProgramBuilder;

impl SummaryProgramBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl ProgramBuilder for SummaryProgramBuilder {
    fn create_package(
        &self,
        program: &mut Program,
        package: &Package,
        syntax: Option<&[SourceFile]>,
    ) -> BuiltId {
        let (fidelity, members): (Fidelity, Vec<String>) = match syntax {
            Some(files) => (
                Fidelity::Full,
                files
                    .iter()
                    .flat_map(|f| f.decls.iter().map(|d| d.qualified_name()))
                    .collect(),
            ),
            None => (
                Fidelity::Stub,
                package
                    .types
                    .iter()
                    .flat_map(|t| t.exports.iter())
                    .filter(|d| d.is_exported())
                    .map(|d| match &d.signature {
                        Some(sig) => format!("{} {}", d.qualified_name(), sig),
                        None => d.qualified_name(),
                    })
                    .collect(),
            ),
        };

        program.register(BuiltPackage {
            package_id: package.id.clone(),
            path: package.path.clone(),
            fidelity,
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::{DeclKind, Declaration, PackageGraph, TypeSummary};

    fn decl(name: &str, kind: DeclKind, signature: Option<&str>) -> Declaration {
        Declaration {
            name: name.to_string(),
            kind,
            receiver: None,
            signature: signature.map(str::to_string),
        }
    }

    fn package() -> Package {
        let mut pkg = Package::new("lib/a", "lib/a");
        pkg.syntax = vec![SourceFile {
            name: "a.go".into(),
            decls: vec![
                decl("New", DeclKind::Func, Some("func() *A")),
                decl("helper", DeclKind::Func, None),
            ],
        }];
        pkg.types = Some(TypeSummary {
            exports: vec![
                decl("New", DeclKind::Func, Some("func() *A")),
                decl("hidden", DeclKind::Var, None),
            ],
        });
        pkg
    }

    #[test]
    fn test_full_build_lists_all_declared_members() {
        let builder = SummaryProgramBuilder::new();
        let pkg = package();
        let mut program = builder.new_program(&PackageGraph::new().positions);
        let id = builder.create_package(&mut program, &pkg, Some(&pkg.syntax));

        let built = program.get(id).unwrap();
        assert_eq!(built.fidelity, Fidelity::Full);
        assert_eq!(built.members, vec!["New", "helper"]);
    }

    #[test]
    fn test_stub_lists_exported_signatures_only() {
        let builder = SummaryProgramBuilder::new();
        let pkg = package();
        let mut program = builder.new_program(&PackageGraph::new().positions);
        let id = builder.create_package(&mut program, &pkg, None);

        let built = program.get(id).unwrap();
        assert_eq!(built.fidelity, Fidelity::Stub);
        assert_eq!(built.members, vec!["New func() *A"]);
    }

    #[test]
    fn test_build_direct_parallels_initial() {
        let mut graph = PackageGraph::new();
        let good = graph.add_package(package());
        let mut broken = Package::new("bad", "bad");
        broken.ill_typed = true;
        let bad = graph.add_package(broken);
        let dep = graph.add_package(Package::new("dep", "dep"));
        graph.add_import(good, dep, "dep");

        let (program, built) = SummaryProgramBuilder::new().build_direct(&graph, &[bad, good]);
        assert_eq!(built.len(), 2);
        assert!(built[0].is_none());
        let full = program.get(built[1].unwrap()).unwrap();
        assert_eq!(full.fidelity, Fidelity::Full);
        assert_eq!(program.len(), 1, "dependencies are not built");
    }
}
