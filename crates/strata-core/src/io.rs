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

//! The asynchronous disk I/O contract consumed by the package loader.

use async_trait::async_trait;
use std::{io, path::Path};

/// Scheduling hint attached to a read request.
///
/// Backends are free to ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IoPriority {
    /// Background work, e.g. prefetching.
    Low,
    /// Regular loads.
    #[default]
    Normal,
    /// Loads blocking the current frame.
    High,
}

/// A trait for a low-level service that reads and writes whole byte ranges of
/// files asynchronously.
///
/// The calling task suspends at each call and resumes when the operation has
/// completed, without holding a worker thread while the disk is busy.
///
/// A concrete implementation lives in `strata-io` and wraps `tokio::fs`.
#[async_trait]
pub trait AsyncFileIo: Send + Sync {
    /// Reads up to `len` bytes of `path`, starting at byte `offset`.
    ///
    /// Fewer bytes than requested are returned when the file ends early; an
    /// empty buffer means nothing could be read at that offset.
    async fn read(
        &self,
        path: &Path,
        offset: u64,
        len: usize,
        priority: IoPriority,
    ) -> io::Result<Vec<u8>>;

    /// Writes `bytes` to `path`, replacing any existing content.
    ///
    /// Missing parent directories are created. Returns the number of bytes
    /// actually written, which may be less than `bytes.len()`.
    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<usize>;

    /// Checks whether `path` names an existing file.
    async fn exists(&self, path: &Path) -> bool;
}
