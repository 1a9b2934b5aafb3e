//! Storage probe abstraction.
//!
//! The resolver never touches storage directly. Everything it needs to know
//! about the physical world goes through [`StorageProbe`]:
//!
//! - [`LocalProbe`] - the host filesystem (optionally confined to a root)
//! - [`MemoryProbe`] - an in-memory tree, for tests and dry runs
//!
//! Probes answer existence questions only. "Not there" is `Ok(false)`; an
//! `Err` always means the probe could not find out, and callers must not
//! read it as absence.

mod local;
mod memory;

use std::sync::Arc;

pub use local::LocalProbe;
pub use memory::MemoryProbe;

use crate::error::ProbeResult;

/// Existence checks against the backing storage.
///
/// Paths are physical paths as produced by the resolver, in the probe's
/// path style.
pub trait StorageProbe: Send + Sync {
    /// Returns true if a directory exists at `physical_path`.
    fn directory_exists(&self, physical_path: &str) -> ProbeResult<bool>;

    /// Returns true if a file (anything that is not a directory) exists at
    /// `physical_path`.
    fn file_exists(&self, physical_path: &str) -> ProbeResult<bool>;

    /// Physical parent of `physical_path`, or `None` at a storage root.
    fn parent_physical_path(&self, physical_path: &str) -> ProbeResult<Option<String>>;
}

impl<T: StorageProbe + ?Sized> StorageProbe for &T {
    fn directory_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        (**self).directory_exists(physical_path)
    }

    fn file_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        (**self).file_exists(physical_path)
    }

    fn parent_physical_path(&self, physical_path: &str) -> ProbeResult<Option<String>> {
        (**self).parent_physical_path(physical_path)
    }
}

impl<T: StorageProbe + ?Sized> StorageProbe for Arc<T> {
    fn directory_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        (**self).directory_exists(physical_path)
    }

    fn file_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        (**self).file_exists(physical_path)
    }

    fn parent_physical_path(&self, physical_path: &str) -> ProbeResult<Option<String>> {
        (**self).parent_physical_path(physical_path)
    }
}
