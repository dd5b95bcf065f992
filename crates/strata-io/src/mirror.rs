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

//! Human-readable JSON mirror of a package catalog, written next to the
//! binary package for debugging.

use serde::Serialize;
use std::path::{Path, PathBuf};
use strata_core::{
    asset::{CatalogEntry, PackageCatalog},
    io::AsyncFileIo,
    package::TEXT_MIRROR_EXTENSION,
};

#[derive(Serialize)]
struct TextMirror<'a> {
    entry_count: usize,
    entries: Vec<&'a CatalogEntry>,
}

/// The sibling path of the text mirror for a package file.
pub fn text_mirror_path(package_path: &Path) -> PathBuf {
    package_path.with_extension(TEXT_MIRROR_EXTENSION)
}

/// Writes the JSON mirror of `catalog` next to `package_path`.
///
/// Best effort: failures are logged and swallowed. Returns `true` if the
/// mirror was fully written.
pub async fn write_text_mirror(
    io: &dyn AsyncFileIo,
    catalog: &PackageCatalog,
    package_path: &Path,
) -> bool {
    let mirror_path = text_mirror_path(package_path);

    let mut entries: Vec<&CatalogEntry> = catalog.iter().collect();
    entries.sort_by_key(|entry| entry.id);
    let mirror = TextMirror {
        entry_count: entries.len(),
        entries,
    };

    let text = match serde_json::to_vec_pretty(&mirror) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("Skipping text mirror '{}': {err}", mirror_path.display());
            return false;
        }
    };

    match io.write(&mirror_path, &text).await {
        Ok(written) if written == text.len() => {
            log::debug!("Wrote text mirror '{}'", mirror_path.display());
            true
        }
        Ok(written) => {
            log::warn!(
                "Text mirror '{}' is incomplete: wrote {written} of {} bytes",
                mirror_path.display(),
                text.len()
            );
            false
        }
        Err(err) => {
            log::warn!("Failed to write text mirror '{}': {err}", mirror_path.display());
            false
        }
    }
}
