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

//! Defines the error types returned by the storage services.
//!
//! Every failure is returned as a value; nothing in this crate panics or
//! retries on its own.

use std::{fmt, io, path::PathBuf};
use strata_core::{
    asset::{AssetGuid, LogicalPath},
    package::{DecodeError, EncodeError},
};
use thiserror::Error;

/// The read step a package load had reached when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Reading the fixed-width header-length field.
    ReadingLengthField,
    /// Reading the catalog body.
    ReadingBody,
    /// Reading one asset's payload bytes.
    ReadingPayload,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::ReadingLengthField => write!(f, "header-length field"),
            LoadStage::ReadingBody => write!(f, "catalog body"),
            LoadStage::ReadingPayload => write!(f, "asset payload"),
        }
    }
}

/// An error that can occur while loading a package.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The logical path does not map to a package file.
    #[error("logical path '{0}' does not resolve to a package file")]
    Unresolved(LogicalPath),

    /// The package file does not exist. No read was issued.
    #[error("package file '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// A read returned fewer bytes than required.
    #[error("package '{}' truncated while reading the {stage}: expected {expected} bytes, got {actual}", .path.display())]
    Truncated {
        /// The package file.
        path: PathBuf,
        /// The read step that came up short.
        stage: LoadStage,
        /// Bytes requested.
        expected: u64,
        /// Bytes returned.
        actual: u64,
    },

    /// The catalog body could not be decoded.
    #[error("package '{}' has a corrupt catalog: {source}", .path.display())]
    Decode {
        /// The package file.
        path: PathBuf,
        /// The codec failure.
        #[source]
        source: DecodeError,
    },

    /// The I/O backend failed.
    #[error("I/O error on package '{}': {source}", .path.display())]
    Io {
        /// The package file.
        path: PathBuf,
        /// The backend failure.
        #[source]
        source: io::Error,
    },
}

/// An error that can occur while saving a package.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The catalog could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A payload was supplied for an identity the catalog does not contain.
    #[error("payload supplied for asset {0} which is not in the catalog")]
    UnknownPayload(AssetGuid),

    /// The backend wrote fewer bytes than the package holds. The file on disk
    /// may be truncated.
    #[error("short write on package '{}': wrote {written} of {expected} bytes", .path.display())]
    ShortWrite {
        /// The package file.
        path: PathBuf,
        /// Bytes actually written.
        written: usize,
        /// Bytes in the package.
        expected: usize,
    },

    /// The I/O backend failed.
    #[error("I/O error on package '{}': {source}", .path.display())]
    Io {
        /// The package file.
        path: PathBuf,
        /// The backend failure.
        #[source]
        source: io::Error,
    },
}

/// An error that can occur while reading the storage configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read storage configuration '{}': {source}", .path.display())]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid TOML for [`crate::StorageConfig`].
    #[error("failed to parse storage configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
