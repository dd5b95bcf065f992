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

use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A globally unique, persistent 128-bit identifier for a stored asset.
///
/// The identity names an asset independently of the logical path it was
/// registered under, so packages can be reorganised without breaking the
/// dependency lists that reference it.
///
/// On the package wire format an `AssetGuid` is always exactly
/// [`AssetGuid::ENCODED_LEN`] raw bytes, with no length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetGuid(Uuid);

impl AssetGuid {
    /// Number of bytes an identity occupies in a package catalog.
    pub const ENCODED_LEN: usize = 16;

    /// Creates a new, random (version 4) `AssetGuid`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic (version 5) `AssetGuid` from a name.
    ///
    /// The same name always yields the same identity, which lets tools derive
    /// stable ids from source file paths.
    pub fn new_v5(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// The all-zero identity.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Builds an identity from its 16 raw bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the 16 raw bytes of this identity.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for AssetGuid {
    /// Creates a new, random (version 4) `AssetGuid`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for AssetGuid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Encode for AssetGuid {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        self.as_bytes().encode(encoder)
    }
}

impl<Context> Decode<Context> for AssetGuid {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let bytes = <[u8; 16]>::decode(decoder)?;
        Ok(Self::from_bytes(bytes))
    }
}
