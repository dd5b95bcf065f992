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

//! The tokio filesystem backend.

use async_trait::async_trait;
use std::{
    io::{self, SeekFrom},
    path::Path,
};
use strata_core::io::{AsyncFileIo, IoPriority};
use tokio::{
    fs::{self, File},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};

/// The filesystem implementation of [`AsyncFileIo`], backed by `tokio::fs`.
///
/// Each call opens its own file handle, so independent packages can be read
/// and written concurrently. Nothing serializes access to a single path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileIo;

impl TokioFileIo {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AsyncFileIo for TokioFileIo {
    async fn read(
        &self,
        path: &Path,
        offset: u64,
        len: usize,
        _priority: IoPriority,
    ) -> io::Result<Vec<u8>> {
        let mut file = File::open(path).await?;
        file.seek(SeekFrom::Start(offset)).await?;

        // `len` comes from untrusted headers; let the buffer grow with what
        // the file really holds.
        let mut buffer = Vec::new();
        file.take(len as u64).read_to_end(&mut buffer).await?;
        Ok(buffer)
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(path).await?;
        let mut written = 0;
        while written < bytes.len() {
            match file.write(&bytes[written..]).await? {
                0 => break,
                n => written += n,
            }
        }
        // tokio buffers writes in the background; flushing surfaces their errors.
        file.flush().await?;
        Ok(written)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }
}
