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

use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Separator between the owner assembly and the rest of the path.
pub const ASSEMBLY_SEPARATOR: char = ':';
/// Separator between the package prefix and the object name.
pub const OBJECT_SEPARATOR: char = '.';

/// A human-readable reference to an asset inside a package.
///
/// The text has the shape `<assembly>:<prefix>.<name>`, e.g.
/// `engine:textures/stone.albedo`:
/// - `assembly` is an optional namespace tag (`engine`, `project` or a plugin
///   name) terminated by `:`;
/// - `prefix` is the `/`-delimited location of the package file;
/// - `name` is the object inside that package, after the last `.`.
///
/// No normalization is ever performed. Two paths are equal only when their
/// text is identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Creates a logical path from its text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw text of this path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the path has no text at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The text before the first `:`, or `""` when there is no assembly tag.
    pub fn owner_assembly(&self) -> &str {
        match self.assembly_end() {
            Some(end) => &self.0[..end],
            None => "",
        }
    }

    /// The package location between the assembly tag and the last `.`.
    ///
    /// Without an assembly tag the prefix starts at the beginning of the text.
    /// When there is no `.` at all (or it sits before the `:`), the prefix is
    /// empty.
    pub fn package_prefix(&self) -> &str {
        let start = self.assembly_end().map_or(0, |end| end + 1);
        match self.object_separator() {
            Some(dot) if dot > start => &self.0[start..dot],
            _ => "",
        }
    }

    /// The text strictly after the last `.`, or `""` when there is none.
    ///
    /// Unlike [`LogicalPath::package_prefix`], a `.` inside the assembly tag
    /// still counts: `my.plugin:dir/package` gives `plugin:dir/package`.
    pub fn object_name(&self) -> &str {
        match self.object_separator() {
            Some(dot) => &self.0[dot + 1..],
            None => "",
        }
    }

    /// The logical path of the package owning this object, without the
    /// object name (`engine:textures/stone.albedo` gives `engine:textures/stone`).
    pub fn package_path(&self) -> LogicalPath {
        let assembly = self.owner_assembly();
        let prefix = self.package_prefix();
        if self.assembly_end().is_some() {
            LogicalPath(format!("{assembly}{ASSEMBLY_SEPARATOR}{prefix}"))
        } else {
            LogicalPath(prefix.to_owned())
        }
    }

    fn assembly_end(&self) -> Option<usize> {
        self.0.find(ASSEMBLY_SEPARATOR)
    }

    fn object_separator(&self) -> Option<usize> {
        self.0.rfind(OBJECT_SEPARATOR)
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalPath {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl From<String> for LogicalPath {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl FromStr for LogicalPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for LogicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
