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

//! Saving and loading of package files.

use crate::{
    error::{LoadError, LoadStage, SaveError},
    mirror, payload,
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    ffi::OsString,
    path::{Component, Path, PathBuf},
};
use strata_core::{
    asset::{AssetGuid, CatalogEntry, LogicalPath, PackageCatalog},
    io::IoPriority,
    package::{self, PackageHeader, HEADER_LEN, PACKAGE_EXTENSION},
    StorageContext,
};

/// A capability set for anything that can persist and retrieve package
/// catalogs.
///
/// [`PackageLoader`] is the filesystem implementation; the asset manager only
/// depends on this trait so other backends can be plugged in.
#[async_trait]
pub trait PackageStore: Send + Sync {
    /// Maps a logical path to the package file holding it.
    fn resolve_file_path(&self, path: &LogicalPath) -> Option<PathBuf>;

    /// Writes `catalog` to `path`, replacing the file.
    async fn save(&self, catalog: &PackageCatalog, path: &Path) -> Result<(), SaveError>;

    /// Reads the catalog of the package at `path`.
    async fn load(&self, path: &Path) -> Result<PackageCatalog, LoadError>;

    /// Resolves `path` and reads the catalog of the package it names.
    async fn load_logical(&self, path: &LogicalPath) -> Result<PackageCatalog, LoadError> {
        let file = self
            .resolve_file_path(path)
            .ok_or_else(|| LoadError::Unresolved(path.clone()))?;
        self.load(&file).await
    }
}

/// Reads and writes package files through the context's asynchronous I/O
/// backend.
///
/// A package is `[header-length field][catalog body][payload region]`. Saving
/// encodes the body first, measures it, prepends the header and issues a
/// single write. Loading is a two-phase read: the fixed-width header, then
/// exactly the number of body bytes it declares.
///
/// The loader holds no mutable state, so one instance can serve any number of
/// concurrent saves and loads of distinct packages. Concurrent access to the
/// same file is not serialized.
#[derive(Debug, Clone)]
pub struct PackageLoader {
    context: StorageContext,
    additional_save_to_text: bool,
}

impl PackageLoader {
    /// Creates a loader working inside the given storage context.
    pub fn new(context: StorageContext) -> Self {
        Self {
            context,
            additional_save_to_text: false,
        }
    }

    /// Enables or disables the JSON debug mirror written next to every saved
    /// package.
    pub fn set_additional_save_to_text(&mut self, state: bool) {
        self.additional_save_to_text = state;
    }

    /// Whether saves also write the JSON debug mirror.
    pub fn additional_save_to_text(&self) -> bool {
        self.additional_save_to_text
    }

    /// The storage context this loader works in.
    pub fn context(&self) -> &StorageContext {
        &self.context
    }

    /// Maps a logical path to its package file.
    ///
    /// The owner assembly selects the storage root and the package prefix is
    /// joined below it, followed by the package extension. Returns `None` when
    /// the assembly or the prefix is empty, the assembly is unknown, or the
    /// prefix would leave its root (absolute, `..`).
    pub fn resolve_file_path(&self, path: &LogicalPath) -> Option<PathBuf> {
        let assembly = path.owner_assembly();
        if assembly.is_empty() {
            return None;
        }

        let prefix = path.package_prefix();
        if prefix.is_empty() {
            return None;
        }

        let Some(root) = self.context.roots.root_for(assembly) else {
            log::debug!("No storage root registered for assembly '{assembly}' of '{path}'");
            return None;
        };

        let relative = Path::new(prefix);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
        {
            log::debug!("Package prefix '{prefix}' of '{path}' escapes its storage root");
            return None;
        }

        let mut file: OsString = root.join(relative).into_os_string();
        file.push(".");
        file.push(PACKAGE_EXTENSION);
        Some(PathBuf::from(file))
    }

    /// Writes `catalog` to `path`.
    ///
    /// Succeeds only if every byte of the package was written. A short write
    /// may leave a truncated file behind; it is reported, not repaired.
    pub async fn save(&self, catalog: &PackageCatalog, path: &Path) -> Result<(), SaveError> {
        let bytes = package::encode_package(catalog)?;
        self.write_mirror(catalog, path).await;
        self.write_package(path, &bytes).await?;

        log::info!(
            "Saved package '{}' ({} entries, {} bytes)",
            path.display(),
            catalog.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Writes `catalog` followed by the payload bytes of its assets.
    ///
    /// Offsets and sizes of every entry are reassigned to point into the
    /// payload region; the catalog that was actually written is returned.
    pub async fn save_with_payloads(
        &self,
        catalog: &PackageCatalog,
        payloads: &HashMap<AssetGuid, Vec<u8>>,
        path: &Path,
    ) -> Result<PackageCatalog, SaveError> {
        let layout = payload::lay_out(catalog, payloads)?;

        let mut bytes = package::encode_package(&layout.catalog)?;
        bytes.extend_from_slice(&layout.region);

        self.write_mirror(&layout.catalog, path).await;
        self.write_package(path, &bytes).await?;

        log::info!(
            "Saved package '{}' ({} entries, {} payload bytes)",
            path.display(),
            layout.catalog.len(),
            layout.region.len()
        );
        Ok(layout.catalog)
    }

    /// Reads the catalog of the package at `path`.
    ///
    /// Fails without issuing any read if the file does not exist.
    pub async fn load(&self, path: &Path) -> Result<PackageCatalog, LoadError> {
        let header = self.read_header(path).await?;

        let body = self
            .read_exact(
                path,
                HEADER_LEN as u64,
                u64::from(header.body_len),
                IoPriority::Normal,
                LoadStage::ReadingBody,
            )
            .await?;

        let catalog = package::decode_catalog(&body).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "Loaded package '{}' ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Resolves `path` and reads the catalog of the package it names.
    pub async fn load_logical(&self, path: &LogicalPath) -> Result<PackageCatalog, LoadError> {
        PackageStore::load_logical(self, path).await
    }

    /// Reads the payload bytes of one entry of the package at `path`.
    ///
    /// Entries without a payload yield an empty buffer without touching disk.
    pub async fn read_payload(
        &self,
        path: &Path,
        entry: &CatalogEntry,
        priority: IoPriority,
    ) -> Result<Vec<u8>, LoadError> {
        if !entry.has_payload() {
            return Ok(Vec::new());
        }

        let header = self.read_header(path).await?;
        let start = header.payload_start().saturating_add(entry.offset);
        self.read_exact(path, start, entry.size, priority, LoadStage::ReadingPayload)
            .await
    }

    async fn read_header(&self, path: &Path) -> Result<PackageHeader, LoadError> {
        if !self.context.io.exists(path).await {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let field = self
            .read_exact(
                path,
                0,
                HEADER_LEN as u64,
                IoPriority::Normal,
                LoadStage::ReadingLengthField,
            )
            .await?;

        let header = PackageHeader::from_bytes(&field).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Package '{}' declares a {} byte catalog",
            path.display(),
            header.body_len
        );
        Ok(header)
    }

    async fn read_exact(
        &self,
        path: &Path,
        offset: u64,
        len: u64,
        priority: IoPriority,
        stage: LoadStage,
    ) -> Result<Vec<u8>, LoadError> {
        let truncated = |actual: u64| LoadError::Truncated {
            path: path.to_path_buf(),
            stage,
            expected: len,
            actual,
        };
        let request = usize::try_from(len).map_err(|_| truncated(0))?;

        let bytes = self
            .context
            .io
            .read(path, offset, request, priority)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if bytes.len() < request {
            return Err(truncated(bytes.len() as u64));
        }
        Ok(bytes)
    }

    async fn write_mirror(&self, catalog: &PackageCatalog, path: &Path) {
        if self.additional_save_to_text {
            mirror::write_text_mirror(self.context.io.as_ref(), catalog, path).await;
        }
    }

    async fn write_package(&self, path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
        let written = self
            .context
            .io
            .write(path, bytes)
            .await
            .map_err(|source| SaveError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if written != bytes.len() {
            return Err(SaveError::ShortWrite {
                path: path.to_path_buf(),
                written,
                expected: bytes.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PackageStore for PackageLoader {
    fn resolve_file_path(&self, path: &LogicalPath) -> Option<PathBuf> {
        PackageLoader::resolve_file_path(self, path)
    }

    async fn save(&self, catalog: &PackageCatalog, path: &Path) -> Result<(), SaveError> {
        PackageLoader::save(self, catalog, path).await
    }

    async fn load(&self, path: &Path) -> Result<PackageCatalog, LoadError> {
        PackageLoader::load(self, path).await
    }
}
