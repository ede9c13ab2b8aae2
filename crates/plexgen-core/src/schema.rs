//! Version tag written into every serialized network.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `major.minor` version of the serialized network layout.
///
/// Readers accept any payload with the same major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Bumped when a field is removed or changes meaning.
    pub major: u16,
    /// Bumped when an optional field is added.
    pub minor: u16,
}

impl SchemaVersion {
    /// Layout written by this release.
    pub const CURRENT: SchemaVersion = SchemaVersion::new(1, 0);

    /// Creates a version tag.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Returns whether a reader at `self` can load a payload written at `other`.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
