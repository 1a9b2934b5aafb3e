//! Typed identifiers for sites and logical paths.
//!
//! `SiteId` is the host-assigned numeric id of a site. `FileId` is derived,
//! never stored: UUIDv5 over the site id and the lower-cased logical path, so
//! the same node gets the same id on every run and on every host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A site identifier, as assigned by the host configuration store.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl SiteId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SiteId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SiteId({})", self.0)
    }
}

/// Fixed namespace for deriving deterministic FileIds via UUIDv5.
const SITEFS_FILE_NS: uuid::Uuid = uuid::uuid!("3f1c2a9e-5d47-4b8e-9a60-7e2d4c1b8f35");

/// Identity of a logical path within a site.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(uuid::Uuid);

impl FileId {
    /// Derive the id for `path` in `site`.
    ///
    /// Logical paths compare case-insensitively, so `/App1/Index.html` and
    /// `/app1/index.html` share an id. Backslashes and a trailing `/` are
    /// folded away first.
    pub fn new(site: SiteId, path: &str) -> Self {
        let folded = path.replace('\\', "/");
        let trimmed = folded.trim_end_matches('/');
        let key = if trimmed.is_empty() { "/" } else { trimmed };
        let name = format!("{}:{}", site.0, key.to_lowercase());
        Self(uuid::Uuid::new_v5(&SITEFS_FILE_NS, name.as_bytes()))
    }

    /// Full 32-character hex string (no hyphens).
    pub fn to_hex(&self) -> String {
        self.0.as_simple().to_string()
    }

    /// First 8 hex characters, for human display only.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }

    /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl From<FileId> for uuid::Uuid {
    fn from(id: FileId) -> uuid::Uuid {
        id.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.short())
    }
}
