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

use super::{guid::AssetGuid, logical_path::LogicalPath};
use bincode::{enc::Encoder, error::EncodeError, Encode};
use serde::{Deserialize, Serialize};

/// The descriptor of one asset stored in a package.
///
/// An entry is the "identity card" of an asset inside a package catalog: it
/// names the asset, lists the assets it imports, and locates its payload
/// bytes inside the package file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The unique, stable identifier for this asset.
    pub id: AssetGuid,

    /// The other assets this one imports, in declaration order.
    pub dependencies: Vec<AssetGuid>,

    /// Byte offset of the payload, relative to the start of the package's
    /// payload region.
    pub offset: u64,

    /// Byte length of the payload. Zero when the package carries no payload
    /// for this asset.
    pub size: u64,

    /// The logical path the asset was registered under.
    ///
    /// Only meaningful at editor time: it is not part of the persisted
    /// catalog, so entries decoded from a package file have an empty path
    /// until a catalog builder rebinds it.
    pub path: LogicalPath,
}

impl CatalogEntry {
    /// Creates an entry with no dependencies and no payload.
    pub fn new(id: AssetGuid, path: impl Into<LogicalPath>) -> Self {
        Self {
            id,
            dependencies: Vec::new(),
            offset: 0,
            size: 0,
            path: path.into(),
        }
    }

    /// Adds a dependency on another asset.
    pub fn with_dependency(mut self, dependency: AssetGuid) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Sets the payload location.
    pub fn with_payload(mut self, offset: u64, size: u64) -> Self {
        self.offset = offset;
        self.size = size;
        self
    }

    /// Returns `true` when a payload byte range has been assigned.
    pub fn has_payload(&self) -> bool {
        self.size > 0
    }
}

// The path is editor-only data; the wire shape is
// `id, dep_count, deps.., offset, size`.
impl Encode for CatalogEntry {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        self.id.encode(encoder)?;
        (self.dependencies.len() as u64).encode(encoder)?;
        for dependency in &self.dependencies {
            dependency.encode(encoder)?;
        }
        self.offset.encode(encoder)?;
        self.size.encode(encoder)
    }
}
