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

//! Provides the primitive types of Strata's package-based asset storage.
//!
//! This module defines the "common language" for all package operations. It
//! knows what an asset descriptor looks like and how it is addressed, but it
//! has no knowledge of where packages live on disk or how they are read.
//!
//! The key components are:
//! - [`AssetGuid`]: the 128-bit identity of an asset.
//! - [`LogicalPath`]: the human-readable `<assembly>:<prefix>.<name>` reference.
//! - [`CatalogEntry`]: the descriptor of one stored asset.
//! - [`PackageCatalog`]: the table of entries persisted at the head of a package.

mod catalog;
mod entry;
mod guid;
mod logical_path;

pub use catalog::*;
pub use entry::*;
pub use guid::*;
pub use logical_path::*;
