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

//! Defines the binary layout of a Strata package file.
//!
//! A package starts with a fixed-width [`PackageHeader`] declaring the byte
//! length of the catalog body that follows it. The body is the
//! [`PackageCatalog`] encoded with `bincode`'s standard configuration
//! (little-endian, variable-length integers). Everything after the body is the
//! payload region.
//!
//! ```text
//! [0 .. 4)                 header_size (u32, little-endian)
//! [4 .. 4 + header_size)   entry_count, then per entry:
//!                          id (16 bytes), dep_count, dep ids, offset, size
//! [4 + header_size .. EOF) payload region
//! ```

use super::error::{DecodeError, EncodeError};
use crate::asset::{AssetGuid, CatalogEntry, PackageCatalog};
use bincode::{config::Config, error::DecodeError as CodecError, Decode};

/// Type of the header-length field.
pub type HeaderSize = u32;

/// Width in bytes of the header-length field at the start of every package.
pub const HEADER_LEN: usize = std::mem::size_of::<HeaderSize>();

/// File extension of package files.
pub const PACKAGE_EXTENSION: &str = "ap";

/// File extension of the human-readable debug mirror written next to a package.
pub const TEXT_MIRROR_EXTENSION: &str = "json";

// Smallest possible encoded entry: the id plus one byte for each of
// dep_count, offset and size.
const MIN_ENTRY_LEN: usize = AssetGuid::ENCODED_LEN + 3;

fn codec_config() -> impl Config {
    bincode::config::standard()
}

// NOTE: The header is not routed through `bincode`. It is a fixed-layout
// field that must be patched in after the body is measured, so it is written
// and read as raw little-endian bytes.
/// The fixed-width prefix of a package file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageHeader {
    /// Byte length of the catalog body following the header.
    pub body_len: HeaderSize,
}

impl PackageHeader {
    /// Builds the header for a body of `body_len` bytes.
    pub fn for_body(body_len: usize) -> Result<Self, EncodeError> {
        HeaderSize::try_from(body_len)
            .map(|body_len| Self { body_len })
            .map_err(|_| EncodeError::HeaderOverflow(body_len))
    }

    /// Parses the header from the first [`HEADER_LEN`] bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let field: [u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(DecodeError::ShortHeader {
                expected: HEADER_LEN,
                actual: bytes.len(),
            })?;

        Ok(Self {
            body_len: HeaderSize::from_le_bytes(field),
        })
    }

    /// The raw bytes of the header.
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        self.body_len.to_le_bytes()
    }

    /// Byte offset of the first payload byte in the package file.
    pub fn payload_start(self) -> u64 {
        HEADER_LEN as u64 + u64::from(self.body_len)
    }
}

/// Encodes the catalog body (without the header).
///
/// Logical paths are not part of the persisted format and are dropped.
pub fn encode_catalog(catalog: &PackageCatalog) -> Result<Vec<u8>, EncodeError> {
    Ok(bincode::encode_to_vec(catalog, codec_config())?)
}

/// Encodes a full package prefix: header-length field followed by the body.
///
/// The body is built and measured first, then the header is prepended, so the
/// result can be written in a single call.
pub fn encode_package(catalog: &PackageCatalog) -> Result<Vec<u8>, EncodeError> {
    let body = encode_catalog(catalog)?;
    let header = PackageHeader::for_body(body.len())?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decodes a catalog body produced by [`encode_catalog`].
///
/// Decoded entries have an empty logical path.
pub fn decode_catalog(body: &[u8]) -> Result<PackageCatalog, DecodeError> {
    let mut reader = BodyReader::new(body);
    let mut catalog = PackageCatalog::new();

    let entry_count = reader.read_count("entry_count", MIN_ENTRY_LEN)?;
    for _ in 0..entry_count {
        let entry = reader.read_entry()?;
        let id = entry.id;
        if catalog.insert(entry).is_some() {
            return Err(DecodeError::DuplicateIdentity(id));
        }
    }

    match reader.remaining() {
        0 => Ok(catalog),
        trailing => Err(DecodeError::TrailingBytes(trailing)),
    }
}

/// A bounds-checked cursor over a catalog body.
struct BodyReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BodyReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn read<T: Decode<()>>(&mut self, field: &'static str) -> Result<T, DecodeError> {
        let offset = self.position;
        let (value, read) = bincode::decode_from_slice(&self.bytes[offset..], codec_config())
            .map_err(|err| match err {
                CodecError::UnexpectedEnd { .. } => DecodeError::Truncated { field, offset },
                other => DecodeError::Codec(other.to_string()),
            })?;
        self.position += read;
        Ok(value)
    }

    fn read_count(&mut self, field: &'static str, min_item_len: usize) -> Result<usize, DecodeError> {
        let count: u64 = self.read(field)?;
        let remaining = self.remaining();
        if count > (remaining / min_item_len) as u64 {
            return Err(DecodeError::CountOverflow {
                field,
                count,
                remaining,
            });
        }
        // Bounded by `remaining`, so it fits in usize.
        Ok(count as usize)
    }

    fn read_entry(&mut self) -> Result<CatalogEntry, DecodeError> {
        let id: AssetGuid = self.read("id")?;

        let dep_count = self.read_count("dep_count", AssetGuid::ENCODED_LEN)?;
        let mut dependencies = Vec::with_capacity(dep_count);
        for _ in 0..dep_count {
            dependencies.push(self.read("dependency")?);
        }

        let offset = self.read("offset")?;
        let size = self.read("size")?;

        let mut entry = CatalogEntry::new(id, "");
        entry.dependencies = dependencies;
        Ok(entry.with_payload(offset, size))
    }
}
