use crate::domain::package::PositionTable;
use crate::domain::policy::Fidelity;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Index of a built package inside its [Program]
pub type BuiltId = usize;

/// Built representation of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltPackage {
    pub package_id: String,
    pub path: String,
    pub fidelity: Fidelity,
    /// Members with bodies (full) or exported signatures (stub)
    pub members: Vec<String>,
}

/// Program-wide container of built packages
#[derive(Debug, Clone, Default)]
pub struct Program {
    positions: Arc<PositionTable>,
    packages: Vec<BuiltPackage>,
    by_package_id: HashMap<String, BuiltId>,
}

impl Program {
    pub fn new(positions: Arc<PositionTable>) -> Self {
        Self {
            positions,
            packages: Vec::new(),
            by_package_id: HashMap::new(),
        }
    }

    /// Register a built package; a package id registered twice keeps its first entry.
    pub fn register(&mut self, built: BuiltPackage) -> BuiltId {
        if let Some(&existing) = self.by_package_id.get(&built.package_id) {
            return existing;
        }
        let id = self.packages.len();
        self.by_package_id.insert(built.package_id.clone(), id);
        self.packages.push(built);
        id
    }

    pub fn get(&self, id: BuiltId) -> Option<&BuiltPackage> {
        self.packages.get(id)
    }

    /// Position table shared with the load session that produced this program
    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn count(&self, fidelity: Fidelity) -> usize {
        self.packages
            .iter()
            .filter(|p| p.fidelity == fidelity)
            .count()
    }
}
