use crate::adapters::loader::ManifestLoader;
use crate::adapters::program::SummaryProgramBuilder;
use crate::app::dto::*;
use crate::domain::builder::{BuildOutput, SelectiveBuilder};
use crate::domain::config::{LoaderConfig, UNLIMITED_DEPTH};
use crate::domain::package::{PackageGraph, PackageId};
use crate::domain::policy::Fidelity;
use crate::domain::ports::{LoadedPackages, PackageLoader, ProgramBuilder};
use crate::domain::walker::post_order;
use anyhow::{Context as _, Result, bail};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Application service: load packages, run the selective build, report.
pub struct LoadEngine {
    loader: Box<dyn PackageLoader>,
    builder: SelectiveBuilder,
}

impl LoadEngine {
    pub fn new(loader: Box<dyn PackageLoader>, program_builder: Box<dyn ProgramBuilder>) -> Self {
        Self {
            loader,
            builder: SelectiveBuilder::new(program_builder),
        }
    }

    /// Engine over a JSON package manifest, building member summaries.
    pub fn from_manifest(manifest_path: &Path) -> Self {
        Self::new(
            Box::new(ManifestLoader::new(manifest_path)),
            Box::new(SummaryProgramBuilder::new()),
        )
    }

    pub fn run(&self, patterns: &[String], config: &LoaderConfig) -> Result<BuildReport> {
        let loaded = self.load(patterns, config)?;
        let output = self
            .builder
            .build(&loaded.graph, &loaded.initial, config);
        let report = build_report(&loaded, &output, config);
        info!(
            "Built {} packages ({} full, {} stub, {} skipped)",
            report.package_count,
            report.full_count,
            report.stub_count,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Post-order `(package, level)` listing of the walk, without building anything.
    ///
    /// A `no_deps` load walks nothing: the initial packages are listed at level 0,
    /// in request order.
    pub fn levels(&self, patterns: &[String], config: &LoaderConfig) -> Result<Vec<LevelEntry>> {
        let loaded = self.load(patterns, config)?;
        let graph = &loaded.graph;
        Ok(visited(graph, &loaded.initial, config)
            .into_iter()
            .map(|(idx, level)| {
                let package = graph.package(idx);
                LevelEntry {
                    id: package.id.clone(),
                    path: package.path.clone(),
                    level,
                    well_typed: package.is_well_typed(),
                    errors: package.errors.clone(),
                }
            })
            .collect())
    }

    /// Decision taken for the package with the given path (or id), if it was built.
    pub fn explain(
        &self,
        patterns: &[String],
        config: &LoaderConfig,
        package: &str,
    ) -> Result<Option<PackageReport>> {
        let report = self.run(patterns, config)?;
        Ok(report
            .packages
            .into_iter()
            .find(|p| p.path == package || p.id == package))
    }

    fn load(&self, patterns: &[String], config: &LoaderConfig) -> Result<LoadedPackages> {
        validate_config(config)?;
        self.loader
            .load(patterns, config.tests)
            .context("Failed to load packages")
    }
}

/// Reject configurations the selective builder would silently misinterpret.
pub fn validate_config(config: &LoaderConfig) -> Result<()> {
    if config.deps_level < UNLIMITED_DEPTH {
        bail!(
            "deps_level must be {} (unlimited) or >= 0, got {}",
            UNLIMITED_DEPTH,
            config.deps_level
        );
    }
    Ok(())
}

/// Read a JSON loader configuration file.
pub fn read_config(path: &Path) -> Result<LoaderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse loader config JSON")
}

fn build_report(loaded: &LoadedPackages, output: &BuildOutput, config: &LoaderConfig) -> BuildReport {
    let graph = &loaded.graph;
    let initial_set: HashSet<PackageId> = loaded.initial.iter().copied().collect();

    let initial = loaded
        .initial
        .iter()
        .zip(&output.initial)
        .map(|(&idx, slot)| {
            let package = graph.package(idx);
            InitialSlot {
                id: package.id.clone(),
                path: package.path.clone(),
                built: slot
                    .and_then(|id| output.program.get(id))
                    .map(|built| BuiltSummary {
                        fidelity: built.fidelity,
                        member_count: built.members.len(),
                    }),
            }
        })
        .collect();

    let packages = output
        .decisions
        .iter()
        .map(|d| {
            let package = graph.package(d.package);
            PackageReport {
                id: package.id.clone(),
                path: package.path.clone(),
                name: package.name.clone(),
                files: package.files.clone(),
                level: d.level,
                initial: initial_set.contains(&d.package),
                fidelity: d.verdict.fidelity,
                reason: d.verdict.reason,
                members: output
                    .program
                    .get(d.built)
                    .map(|b| b.members.clone())
                    .unwrap_or_default(),
            }
        })
        .collect();

    BuildReport {
        config: config.clone(),
        package_count: output.program.len(),
        full_count: output.program.count(Fidelity::Full),
        stub_count: output.program.count(Fidelity::Stub),
        file_count: output.program.positions().len(),
        skipped: skipped_packages(graph, &loaded.initial, config),
        initial,
        packages,
    }
}

/// Packages the build looked at, with their level: the walk, or just the initial set for `no_deps`.
fn visited(graph: &PackageGraph, initial: &[PackageId], config: &LoaderConfig) -> Vec<(PackageId, usize)> {
    if config.no_deps {
        initial.iter().map(|&idx| (idx, 0)).collect()
    } else {
        post_order(graph, initial)
    }
}

fn skipped_packages(
    graph: &PackageGraph,
    initial: &[PackageId],
    config: &LoaderConfig,
) -> Vec<SkippedPackage> {
    visited(graph, initial, config)
        .into_iter()
        .map(|(idx, _)| graph.package(idx))
        .filter(|p| !p.is_well_typed())
        .map(|p| SkippedPackage {
            id: p.id.clone(),
            path: p.path.clone(),
            errors: p.errors.clone(),
        })
        .collect()
}
