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

//! Lays out asset payload bytes in the region following the catalog body.

use crate::error::SaveError;
use std::collections::HashMap;
use strata_core::asset::{AssetGuid, PackageCatalog};

/// A catalog whose entries point into a contiguous payload region.
#[derive(Debug)]
pub(crate) struct PayloadLayout {
    pub catalog: PackageCatalog,
    pub region: Vec<u8>,
}

/// Assigns payload byte ranges to the entries of `catalog`.
///
/// Payloads are packed back to back in ascending identity order, so the same
/// input always produces the same file. Offsets are relative to the start of
/// the payload region. Entries without a payload get an empty range.
pub(crate) fn lay_out(
    catalog: &PackageCatalog,
    payloads: &HashMap<AssetGuid, Vec<u8>>,
) -> Result<PayloadLayout, SaveError> {
    if let Some(unknown) = payloads.keys().find(|id| !catalog.contains(id)) {
        return Err(SaveError::UnknownPayload(*unknown));
    }

    let mut ids: Vec<&AssetGuid> = catalog.ids().collect();
    ids.sort();

    let mut laid_out = catalog.clone();
    let mut region = Vec::with_capacity(payloads.values().map(Vec::len).sum());
    for id in ids {
        let (offset, size) = match payloads.get(id) {
            Some(bytes) => {
                let offset = region.len() as u64;
                region.extend_from_slice(bytes);
                (offset, bytes.len() as u64)
            }
            None => (0, 0),
        };

        if let Some(entry) = laid_out.get_mut(id) {
            entry.offset = offset;
            entry.size = size;
        }
    }

    Ok(PayloadLayout {
        catalog: laid_out,
        region,
    })
}
