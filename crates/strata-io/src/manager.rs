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

//! The asset manager, which keeps the catalog entries of every loaded package
//! in a single identity-keyed cache.

use crate::{error::LoadError, loader::PackageStore};
use std::collections::{HashMap, HashSet};
use strata_core::asset::{AssetGuid, CatalogEntry, LogicalPath};

/// Caches the catalog entries of loaded packages and answers identity and
/// path lookups against them.
///
/// A package is loaded at most once; later requests for objects inside it are
/// answered from the cache. Entries loaded from disk carry no path until
/// [`AssetManager::rebind_path`] assigns one, since paths are not stored in
/// the package file.
pub struct AssetManager<S: PackageStore> {
    store: S,
    cache: HashMap<AssetGuid, CatalogEntry>,
    loaded_packages: HashSet<LogicalPath>,
}

impl<S: PackageStore> AssetManager<S> {
    /// Creates an empty manager on top of `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: HashMap::new(),
            loaded_packages: HashSet::new(),
        }
    }

    /// The backing package store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the package that holds `object` and merges its entries into the
    /// cache.
    ///
    /// Returns the number of entries merged, or zero if the package was
    /// already loaded. Entries already cached keep their bound path.
    pub async fn load_package(&mut self, object: &LogicalPath) -> Result<usize, LoadError> {
        let package = object.package_path();
        if self.loaded_packages.contains(&package) {
            log::trace!("Package '{package}' already loaded");
            return Ok(0);
        }

        let catalog = self.store.load_logical(object).await?;
        let count = catalog.len();
        for entry in catalog {
            match self.cache.get_mut(&entry.id) {
                Some(cached) => {
                    cached.dependencies = entry.dependencies;
                    cached.offset = entry.offset;
                    cached.size = entry.size;
                }
                None => {
                    self.cache.insert(entry.id, entry);
                }
            }
        }
        self.loaded_packages.insert(package.clone());

        log::info!("Loaded package '{package}' ({count} entries)");
        Ok(count)
    }

    /// Whether the package holding `object` has been loaded.
    pub fn is_package_loaded(&self, object: &LogicalPath) -> bool {
        self.loaded_packages.contains(&object.package_path())
    }

    /// The cached catalog entry of an asset.
    pub fn overview(&self, id: &AssetGuid) -> Option<&CatalogEntry> {
        self.cache.get(id)
    }

    /// Finds a cached entry by its bound logical path.
    pub fn find_by_path(&self, path: &LogicalPath) -> Option<&CatalogEntry> {
        self.cache.values().find(|entry| &entry.path == path)
    }

    /// Binds a logical path to a cached entry. Returns `false` if the
    /// identity is not cached.
    pub fn rebind_path(&mut self, id: &AssetGuid, path: LogicalPath) -> bool {
        match self.cache.get_mut(id) {
            Some(entry) => {
                entry.path = path;
                true
            }
            None => false,
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Forgets every cached entry and loaded package.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.loaded_packages.clear();
    }
}
