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

//! # Strata I/O
//!
//! Storage services built on `strata-core`: the tokio file backend, the
//! package loader that saves and loads package files, the asset manager cache
//! and the `Storage.toml` configuration.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fs_backend;
pub mod loader;
pub mod manager;
pub mod mirror;
mod payload;

pub use config::StorageConfig;
pub use error::{ConfigError, LoadError, LoadStage, SaveError};
pub use fs_backend::TokioFileIo;
pub use loader::{PackageLoader, PackageStore};
pub use manager::AssetManager;
pub use mirror::{text_mirror_path, write_text_mirror};
