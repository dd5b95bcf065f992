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

//! Error types of the package format codec.

use crate::asset::AssetGuid;
use thiserror::Error;

/// An error raised while decoding a package header or catalog body.
///
/// Every count read from the body is validated against the bytes that remain
/// before anything is allocated, so a corrupted file surfaces here instead of
/// reading out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The header-length field is shorter than its fixed width.
    #[error("header-length field needs {expected} bytes, got {actual}")]
    ShortHeader {
        /// The fixed width of the field.
        expected: usize,
        /// The number of bytes available.
        actual: usize,
    },

    /// The body ended in the middle of a field.
    #[error("catalog body truncated while reading {field} at byte {offset}")]
    Truncated {
        /// The field being read.
        field: &'static str,
        /// Byte offset of the field inside the body.
        offset: usize,
    },

    /// A count field announces more items than the remaining bytes can hold.
    #[error("{field} of {count} cannot fit in the {remaining} remaining bytes")]
    CountOverflow {
        /// The count field that overflowed.
        field: &'static str,
        /// The decoded count.
        count: u64,
        /// Bytes left in the body after the count.
        remaining: usize,
    },

    /// Two entries of the same catalog share an identity.
    #[error("duplicate asset identity {0} in catalog")]
    DuplicateIdentity(AssetGuid),

    /// Bytes remain after the last declared entry.
    #[error("{0} unexpected bytes after the last catalog entry")]
    TrailingBytes(usize),

    /// The underlying value codec rejected the data.
    #[error("malformed catalog: {0}")]
    Codec(String),
}

/// An error raised while encoding a package.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The underlying value codec failed.
    #[error("failed to encode catalog: {0}")]
    Codec(#[from] bincode::error::EncodeError),

    /// The catalog body is too large for the fixed-width header-length field.
    #[error("catalog body of {0} bytes does not fit the header-length field")]
    HeaderOverflow(usize),
}
