//! Mock implementations for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use pkgscope::domain::package::{Package, SourceFile};
use pkgscope::domain::policy::Fidelity;
use pkgscope::domain::ports::ProgramBuilder;
use pkgscope::domain::program::{BuiltId, BuiltPackage, Program};

/// ProgramBuilder that records every `create_package` call as `(path, fidelity)`.
#[derive(Clone, Default)]
pub struct RecordingProgramBuilder {
    calls: Arc<Mutex<Vec<(String, Fidelity)>>>,
}

impl RecordingProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, Fidelity)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fidelity_of(&self, path: &str) -> Option<Fidelity> {
        self.calls()
            .into_iter()
            .find(|(p, _)| p == path)
            .map(|(_, f)| f)
    }
}

impl ProgramBuilder for RecordingProgramBuilder {
    fn create_package(
        &self,
        program: &mut Program,
        package: &Package,
        syntax: Option<&[SourceFile]>,
    ) -> BuiltId {
        let fidelity = if syntax.is_some() {
            Fidelity::Full
        } else {
            Fidelity::Stub
        };
        self.calls
            .lock()
            .unwrap()
            .push((package.path.clone(), fidelity));
        program.register(BuiltPackage {
            package_id: package.id.clone(),
            path: package.path.clone(),
            fidelity,
            members: vec![],
        })
    }
}
