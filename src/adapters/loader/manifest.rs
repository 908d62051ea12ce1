use crate::adapters::loader::test_variant::{is_test_companion, is_test_variant};
use crate::domain::package::{Package, PackageGraph, PackageId, SourceFile, TypeSummary};
use crate::domain::ports::{LoadedPackages, PackageLoader};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk package manifest: the output of a package-loading run, serialized as JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Files of the load session, in position-table order
    pub files: Vec<ManifestFile>,
    /// Package ids selected when no pattern is given
    pub roots: Vec<String>,
    pub packages: Vec<ManifestPackage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestFile {
    pub name: String,
    #[serde(default)]
    pub size: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ManifestPackage {
    pub id: String,
    /// Defaults to `id`
    pub path: Option<String>,
    pub name: Option<String>,
    pub files: Vec<String>,
    /// Import path → imported package id. Unordered, as reported by the loader.
    pub imports: HashMap<String, String>,
    pub syntax: Vec<SourceFile>,
    pub types: Option<TypeSummary>,
    pub ill_typed: bool,
    pub errors: Vec<String>,
}

impl ManifestPackage {
    fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.id)
    }

    fn to_package(&self) -> Package {
        let mut package = Package::new(self.id.clone(), self.path());
        if let Some(name) = &self.name {
            package.name = name.clone();
        }
        package.files = self.files.clone();
        package.syntax = self.syntax.clone();
        package.types = self.types.clone();
        package.ill_typed = self.ill_typed;
        package.errors = self.errors.clone();
        package
    }
}

/// JSON manifest package loader
pub struct ManifestLoader {
    pub manifest_path: PathBuf,
}

impl ManifestLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            manifest_path: path.as_ref().to_path_buf(),
        }
    }
}

impl PackageLoader for ManifestLoader {
    fn load(&self, patterns: &[String], tests: bool) -> Result<LoadedPackages> {
        let manifest = read_manifest(&self.manifest_path)?;
        let loaded = materialize(&manifest, patterns, tests)?;
        debug!(
            "Loaded {} packages ({} initial) from {}",
            loaded.graph.len(),
            loaded.initial.len(),
            self.manifest_path.display()
        );
        Ok(loaded)
    }
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    use memmap2::Mmap;
    use std::fs::File;

    let file = File::open(path).context("Failed to open package manifest")?;
    let mmap = unsafe { Mmap::map(&file).context("Failed to mmap package manifest")? };
    let manifest =
        serde_json::from_slice(&mmap[..]).context("Failed to parse package manifest JSON")?;
    Ok(manifest)
}

/// Build the import graph and select the initial packages.
pub fn materialize(manifest: &Manifest, patterns: &[String], tests: bool) -> Result<LoadedPackages> {
    let mut graph = PackageGraph::new();
    for file in &manifest.files {
        graph
            .positions
            .add_file(file.name.clone(), file.size)
            .ok_or_else(|| anyhow!("file size overflows position table: {}", file.name))?;
    }

    let kept = |p: &&ManifestPackage| tests || !is_test_variant(&p.id);

    // Pass 1: packages
    let known: HashSet<&str> = manifest.packages.iter().map(|p| p.id.as_str()).collect();
    for package in manifest.packages.iter().filter(kept) {
        if graph.contains_id(&package.id) {
            bail!("duplicate package id {}", package.id);
        }
        graph.add_package(package.to_package());
    }

    // Pass 2: imports
    for package in manifest.packages.iter().filter(kept) {
        let importer = graph
            .get_by_id(&package.id)
            .ok_or_else(|| anyhow!("Package vanished: {}", package.id))?;
        for (import_path, target) in &package.imports {
            if !known.contains(target.as_str()) {
                return Err(anyhow!(
                    "unknown import {} ({}) in package {}",
                    import_path,
                    target,
                    package.id
                ));
            }
            if let Some(imported) = graph.get_by_id(target) {
                graph.add_import(importer, imported, import_path.clone());
            }
        }
    }

    let initial = select_initial(&graph, manifest, patterns, tests)?;
    Ok(LoadedPackages { graph, initial })
}

fn select_initial(
    graph: &PackageGraph,
    manifest: &Manifest,
    patterns: &[String],
    tests: bool,
) -> Result<Vec<PackageId>> {
    let mut initial = Vec::new();
    let mut selected = HashSet::new();
    let mut push = |idx: PackageId| {
        if selected.insert(idx) {
            initial.push(idx);
        }
    };
    // With tests, the variants of a selected package follow it
    let mut push_with_companions = |idx: PackageId| {
        push(idx);
        if !tests {
            return;
        }
        let path = &graph.package(idx).path;
        let companions = manifest
            .packages
            .iter()
            .filter(|p| is_test_companion(&p.id, path));
        for companion in companions {
            if let Some(idx) = graph.get_by_id(&companion.id) {
                push(idx);
            }
        }
    };

    if patterns.is_empty() {
        for root in &manifest.roots {
            match graph.get_by_id(root) {
                Some(idx) => push_with_companions(idx),
                None if !tests && is_test_variant(root) => {}
                None => return Err(anyhow!("Unknown root package: {}", root)),
            }
        }
        return Ok(initial);
    }

    for pattern in patterns {
        let matched: Vec<&ManifestPackage> = manifest
            .packages
            .iter()
            .filter(|p| !is_test_variant(&p.id) && pattern_matches(pattern, p.path()))
            .collect();
        if matched.is_empty() {
            warn!("Pattern {} matched no packages", pattern);
        }

        for package in matched {
            if let Some(idx) = graph.get_by_id(&package.id) {
                push_with_companions(idx);
            }
        }
    }
    Ok(initial)
}

/// `p` matches exactly; `p/...` matches `p` and everything below it; `...` matches all.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern == "..." {
        return true;
    }
    match pattern.strip_suffix("/...") {
        Some(prefix) => {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => path == pattern,
    }
}
