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

//! Storage configuration read from `Storage.toml`.

use crate::{error::ConfigError, loader::PackageLoader};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use strata_core::{io::AsyncFileIo, StorageContext, StorageRoots};

/// Represents the structure of the `Storage.toml` configuration file.
///
/// ```toml
/// engine_root = "data/engine"
/// project_root = "data/project"
/// additional_save_to_text = true
///
/// [plugins]
/// terrain = "plugins/terrain"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory of `engine:` packages.
    pub engine_root: PathBuf,
    /// Root directory of `project:` packages.
    pub project_root: PathBuf,
    /// Root directories of plugin assemblies, keyed by assembly tag.
    pub plugins: HashMap<String, PathBuf>,
    /// Write a JSON mirror next to every saved package.
    pub additional_save_to_text: bool,
}

impl Default for StorageConfig {
    /// Provides a default configuration if `Storage.toml` is not found.
    ///
    /// Packages live under `engine/` and `project/`, no plugin is registered
    /// and the text mirror is off.
    fn default() -> Self {
        Self {
            engine_root: PathBuf::from("engine"),
            project_root: PathBuf::from("project"),
            plugins: HashMap::new(),
            additional_save_to_text: false,
        }
    }
}

impl StorageConfig {
    /// Default name of the configuration file.
    pub const FILE_NAME: &'static str = "Storage.toml";

    /// Parses a configuration from TOML text. Missing keys take their default.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the configuration file at `path`.
    ///
    /// A missing file yields the default configuration. Relative roots are
    /// resolved against the directory containing the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        if !path.exists() {
            log::info!(
                "No '{}' found. Using default storage configuration.",
                path.display()
            );
            return Ok(Self::default().relative_to(base));
        }

        log::info!("Found '{}'. Loading storage configuration.", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml_str(&text)?.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        let anchor = |root: &mut PathBuf| {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        };
        anchor(&mut self.engine_root);
        anchor(&mut self.project_root);
        self.plugins.values_mut().for_each(anchor);
        self
    }

    /// The storage roots described by this configuration.
    pub fn roots(&self) -> StorageRoots {
        self.plugins.iter().fold(
            StorageRoots::new(&self.engine_root, &self.project_root),
            |roots, (name, root)| roots.with_plugin(name.as_str(), root),
        )
    }

    /// Builds the storage context for these roots on top of `io`.
    pub fn into_context(self, io: Arc<dyn AsyncFileIo>) -> StorageContext {
        StorageContext::new(self.roots(), io)
    }

    /// Builds a package loader for these roots on top of `io`, with the text
    /// mirror option applied.
    pub fn into_loader(self, io: Arc<dyn AsyncFileIo>) -> PackageLoader {
        let additional_save_to_text = self.additional_save_to_text;
        let mut loader = PackageLoader::new(self.into_context(io));
        loader.set_additional_save_to_text(additional_save_to_text);
        loader
    }
}
