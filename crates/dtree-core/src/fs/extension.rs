//! Extension filters for find, delete and copy-exclusion.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A validated extension filter such as `.txt`.
///
/// The extension of a path is the suffix of its final component starting at
/// the last `.`; matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension(String);

impl Extension {
    /// Validates `raw` as a filter. It must begin with `.` and name at least
    /// one character after it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidExtension`] otherwise.
    pub fn new(raw: impl Into<String>) -> CoreResult<Self> {
        let raw = raw.into();
        if !raw.starts_with('.') || raw.len() < 2 || raw.contains(['/', '\\']) {
            return Err(CoreError::InvalidExtension(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the raw bytes of the extension of `path`'s final component,
    /// dot included. `None` when the name has no `.`.
    ///
    /// Works on the encoded bytes of the name, so names that are not valid
    /// UTF-8 still have an extension.
    pub fn of(path: &Path) -> Option<&[u8]> {
        let name = path.file_name()?.as_encoded_bytes();
        name.iter().rposition(|&b| b == b'.').map(|idx| &name[idx..])
    }

    pub fn matches(&self, path: &Path) -> bool {
        Self::of(path) == Some(self.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Extension {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
