use crate::domain::config::LoaderConfig;
use crate::domain::package::{PackageGraph, PackageId};
use crate::domain::policy::{InclusionPolicy, Verdict};
use crate::domain::ports::ProgramBuilder;
use crate::domain::program::{BuiltId, Program};
use crate::domain::walker::GraphWalker;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Inclusion decision taken for one visited, well-typed package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub package: PackageId,
    pub level: usize,
    pub verdict: Verdict,
    pub built: BuiltId,
}

/// Result of a selective build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub program: Program,
    /// One slot per initial package, in request order; `None` when it failed to type-check
    pub initial: Vec<Option<BuiltId>>,
    /// Decisions in walk post-order; for a `no_deps` build, one per built initial package
    pub decisions: Vec<Decision>,
}

impl BuildOutput {
    pub fn decision_for(&self, package: PackageId) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.package == package)
    }
}

/// Selective builder - Domain Service deciding which packages get a full build
pub struct SelectiveBuilder {
    program_builder: Box<dyn ProgramBuilder>,
}

impl SelectiveBuilder {
    pub fn new(program_builder: Box<dyn ProgramBuilder>) -> Self {
        Self { program_builder }
    }

    pub fn build(
        &self,
        graph: &PackageGraph,
        initial: &[PackageId],
        config: &LoaderConfig,
    ) -> BuildOutput {
        if config.no_deps {
            let (program, built) = self.program_builder.build_direct(graph, initial);
            let decisions = initial
                .iter()
                .zip(&built)
                .filter_map(|(&package, slot)| {
                    slot.map(|built| Decision {
                        package,
                        level: 0,
                        verdict: Verdict::direct(),
                        built,
                    })
                })
                .collect();
            return BuildOutput {
                program,
                initial: built,
                decisions,
            };
        }
        self.build_selected(graph, initial, config)
    }

    /// Walk the import graph and build every well-typed package, full or stub per policy.
    fn build_selected(
        &self,
        graph: &PackageGraph,
        initial: &[PackageId],
        config: &LoaderConfig,
    ) -> BuildOutput {
        let policy = InclusionPolicy::new(config);
        let mut program = self.program_builder.new_program(&graph.positions);

        let is_initial: HashSet<PackageId> = initial.iter().copied().collect();
        let mut built: HashMap<PackageId, BuiltId> = HashMap::with_capacity(graph.len());
        let mut decisions = Vec::with_capacity(graph.len());

        GraphWalker::new(graph).walk_post(initial, |idx, package, level| {
            if !package.is_well_typed() {
                debug!("Skip ill-typed package {}", package.path);
                return;
            }

            let verdict = policy.evaluate(&package.path, level, is_initial.contains(&idx));
            let syntax = if verdict.is_full() {
                info!("Load Package {}", package.path);
                Some(package.syntax.as_slice())
            } else {
                debug!("Stub package {} ({:?})", package.path, verdict.reason);
                None
            };

            let id = self
                .program_builder
                .create_package(&mut program, package, syntax);
            built.insert(idx, id);
            decisions.push(Decision {
                package: idx,
                level,
                verdict,
                built: id,
            });
        });

        let initial = initial.iter().map(|idx| built.get(idx).copied()).collect();
        BuildOutput {
            program,
            initial,
            decisions,
        }
    }
}
