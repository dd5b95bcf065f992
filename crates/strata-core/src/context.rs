// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Storage context providing access to the storage roots and the I/O backend.

use crate::io::AsyncFileIo;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Assembly tag of engine-owned packages.
pub const ENGINE_ASSEMBLY: &str = "engine";
/// Assembly tag of project-owned packages.
pub const PROJECT_ASSEMBLY: &str = "project";

/// The directories that logical path assemblies map to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageRoots {
    /// Root of packages tagged `engine`.
    pub engine: PathBuf,
    /// Root of packages tagged `project`.
    pub project: PathBuf,
    /// Roots of plugin packages, keyed by plugin name.
    pub plugins: HashMap<String, PathBuf>,
}

impl StorageRoots {
    /// Creates roots for the engine and the project, with no plugins.
    pub fn new(engine: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            engine: engine.into(),
            project: project.into(),
            plugins: HashMap::new(),
        }
    }

    /// Registers the root directory of a plugin.
    pub fn with_plugin(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.plugins.insert(name.into(), root.into());
        self
    }

    /// Maps an assembly tag to its storage root.
    ///
    /// `engine` and `project` are fixed; any other tag is looked up among the
    /// registered plugins. Unknown tags yield `None`.
    pub fn root_for(&self, assembly: &str) -> Option<&Path> {
        match assembly {
            ENGINE_ASSEMBLY => Some(&self.engine),
            PROJECT_ASSEMBLY => Some(&self.project),
            plugin => self.plugins.get(plugin).map(PathBuf::as_path),
        }
    }
}

/// Storage context shared by the package loader and its collaborators.
///
/// It is built once at startup and passed explicitly, so several independent
/// storage setups can coexist in one process (e.g. one per test).
#[derive(Clone)]
pub struct StorageContext {
    /// Where each assembly's packages live.
    pub roots: StorageRoots,

    /// The asynchronous file backend.
    pub io: Arc<dyn AsyncFileIo>,
}

impl StorageContext {
    /// Creates a context from its roots and I/O backend.
    pub fn new(roots: StorageRoots, io: Arc<dyn AsyncFileIo>) -> Self {
        Self { roots, io }
    }
}

impl std::fmt::Debug for StorageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageContext")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}
