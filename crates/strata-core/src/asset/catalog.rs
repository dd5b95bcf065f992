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

use super::{entry::CatalogEntry, guid::AssetGuid, logical_path::LogicalPath};
use bincode::{enc::Encoder, error::EncodeError, Encode};
use std::collections::{hash_map, HashMap};

/// The in-memory table of every asset described by one package file.
///
/// The catalog owns its entries and is always replaced as a unit: a package
/// is fully rewritten on save and fully rebuilt on load. Identities are the
/// only indexed key, so lookups by logical path are a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    entries: HashMap<AssetGuid, CatalogEntry>,
}

impl PackageCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry keyed by its identity.
    ///
    /// Returns the entry previously registered under the same identity, if any.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.id, entry)
    }

    /// Retrieves the entry for a given identity.
    pub fn get(&self, id: &AssetGuid) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Mutable access to the entry for a given identity.
    pub fn get_mut(&mut self, id: &AssetGuid) -> Option<&mut CatalogEntry> {
        self.entries.get_mut(id)
    }

    /// Removes and returns the entry for a given identity.
    pub fn remove(&mut self, id: &AssetGuid) -> Option<CatalogEntry> {
        self.entries.remove(id)
    }

    /// Checks whether an identity is registered.
    pub fn contains(&self, id: &AssetGuid) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries, in table order.
    pub fn iter(&self) -> hash_map::Values<'_, AssetGuid, CatalogEntry> {
        self.entries.values()
    }

    /// Iterates over all registered identities, in table order.
    pub fn ids(&self) -> hash_map::Keys<'_, AssetGuid, CatalogEntry> {
        self.entries.keys()
    }

    /// Finds the first entry whose logical path equals `path` exactly.
    ///
    /// Catalogs decoded from disk carry empty paths, so this returns `None`
    /// for them until [`PackageCatalog::rebind_path`] has been called. If
    /// several entries share a path, which one is returned is unspecified.
    pub fn find_by_path(&self, path: &LogicalPath) -> Option<&CatalogEntry> {
        self.entries.values().find(|entry| entry.path == *path)
    }

    /// Re-associates a logical path with an entry after it was decoded.
    ///
    /// Returns `false` if the identity is not registered.
    pub fn rebind_path(&mut self, id: &AssetGuid, path: LogicalPath) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.path = path;
                true
            }
            None => false,
        }
    }
}

impl FromIterator<CatalogEntry> for PackageCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|entry| (entry.id, entry)).collect(),
        }
    }
}

impl IntoIterator for PackageCatalog {
    type Item = CatalogEntry;
    type IntoIter = hash_map::IntoValues<AssetGuid, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<'a> IntoIterator for &'a PackageCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = hash_map::Values<'a, AssetGuid, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Entries are written in ascending identity order so equal catalogs encode to
// equal bytes.
impl Encode for PackageCatalog {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        let mut entries: Vec<&CatalogEntry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.id);

        (entries.len() as u64).encode(encoder)?;
        for entry in entries {
            entry.encode(encoder)?;
        }
        Ok(())
    }
}
