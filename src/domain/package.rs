use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity of a package inside a [PackageGraph]
pub type PackageId = NodeIndex;

/// Kind of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Func,
    Method,
    Type,
    Var,
    Const,
}

/// A top-level declaration, either parsed from source or taken from export data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// Receiver type name for methods
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl Declaration {
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    /// `Name` for package-level members, `(Recv).Name` for methods.
    pub fn qualified_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("({}).{}", recv, self.name),
            None => self.name.clone(),
        }
    }
}

/// One parsed source file of a package
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    #[serde(default)]
    pub decls: Vec<Declaration>,
}

/// Type-checker output for a package: its exported signatures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSummary {
    #[serde(default)]
    pub exports: Vec<Declaration>,
}

/// A file registered in the position table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub base: usize,
    pub size: usize,
}

/// Source-location table shared by every package of one load session.
///
/// Files occupy disjoint offset ranges `[base, base + size]`; offset 0 is reserved
/// as "no position", so the first file starts at base 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionTable {
    files: Vec<FileEntry>,
    next_base: usize,
}

impl PositionTable {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            next_base: 1,
        }
    }

    /// Register a file and return its base offset; `None` when the table's
    /// offset space cannot hold it.
    pub fn add_file(&mut self, name: impl Into<String>, size: usize) -> Option<usize> {
        let base = self.next_base.max(1);
        let next_base = base.checked_add(size)?.checked_add(1)?;
        self.files.push(FileEntry {
            name: name.into(),
            base,
            size,
        });
        self.next_base = next_base;
        Some(base)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A loaded package. Read-only once the loader hands it over.
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// Loader-unique id; differs from `path` for test variants (`p [p.test]`)
    pub id: String,
    pub path: String,
    pub name: String,
    pub files: Vec<String>,
    /// Parsed syntax; empty when the loader did not parse this package
    pub syntax: Vec<SourceFile>,
    pub types: Option<TypeSummary>,
    pub ill_typed: bool,
    pub errors: Vec<String>,
}

impl Package {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        let id = id.into();
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            id,
            path,
            name,
            types: Some(TypeSummary::default()),
            ..Default::default()
        }
    }

    /// Whether type-checking produced usable type information.
    pub fn is_well_typed(&self) -> bool {
        self.types.is_some() && !self.ill_typed
    }
}

/// Package import graph: packages are nodes, imports are edges weighted by import path.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    pub graph: DiGraph<Package, String>,

    /// Mapping from package id to node index
    pub id_to_node: HashMap<String, PackageId>,

    pub positions: PositionTable,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_node: HashMap::new(),
            positions: PositionTable::new(),
        }
    }

    pub fn add_package(&mut self, package: Package) -> PackageId {
        let id = package.id.clone();
        let idx = self.graph.add_node(package);
        self.id_to_node.insert(id, idx);
        idx
    }

    /// Record that `importer` imports `imported` under `import_path`.
    pub fn add_import(
        &mut self,
        importer: PackageId,
        imported: PackageId,
        import_path: impl Into<String>,
    ) {
        self.graph.add_edge(importer, imported, import_path.into());
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.id_to_node.contains_key(id)
    }

    pub fn get_by_id(&self, id: &str) -> Option<PackageId> {
        self.id_to_node.get(id).copied()
    }

    /// First package (in insertion order) whose path equals `path`.
    pub fn find_by_path(&self, path: &str) -> Option<PackageId> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].path == path)
    }

    pub fn package(&self, idx: PackageId) -> &Package {
        &self.graph[idx]
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct imports as `(import path, package)`, in arbitrary order.
    pub fn imports(&self, idx: PackageId) -> impl Iterator<Item = (&str, PackageId)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.weight().as_str(), e.target()))
    }

    /// Direct imports ordered by import path.
    pub fn sorted_imports(&self, idx: PackageId) -> Vec<PackageId> {
        let mut imports: Vec<(&str, PackageId)> = self.imports(idx).collect();
        imports.sort_by(|(a, _), (b, _)| a.cmp(b));
        imports.into_iter().map(|(_, pkg)| pkg).collect()
    }
}
