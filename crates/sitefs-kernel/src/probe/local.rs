//! Local filesystem probe.
//!
//! Answers existence questions from `std::fs` metadata. Optionally confined
//! to a root directory, in which case paths outside it are refused rather
//! than probed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ProbeError, ProbeResult};
use crate::paths::{PathStyle, lexical_normalize, parent_physical};

use super::StorageProbe;

/// Host filesystem probe.
#[derive(Debug, Clone, Default)]
pub struct LocalProbe {
    root: Option<PathBuf>,
}

impl LocalProbe {
    /// Probe anywhere on the host filesystem.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Probe only beneath `root`.
    ///
    /// The root is canonicalized at construction time to handle symlinks
    /// (e.g. macOS `/tmp` → `/private/tmp`).
    pub fn confined(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        let root = dunce::canonicalize(&root).unwrap_or(root);
        Self { root: Some(root) }
    }

    /// The confinement root, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Check `physical_path` against the confinement root.
    ///
    /// Existing paths are canonicalized so a symlink cannot lead outside;
    /// missing ones are checked lexically.
    fn check_confined(&self, physical_path: &str) -> ProbeResult<PathBuf> {
        let normalized = PathBuf::from(lexical_normalize(physical_path, PathStyle::native()));
        let Some(root) = &self.root else {
            return Ok(normalized);
        };

        let effective = match dunce::canonicalize(&normalized) {
            Ok(canonical) => canonical,
            Err(e) if is_absent(&e) => normalized.clone(),
            Err(e) => return Err(ProbeError::from_io(physical_path, e)),
        };

        if !effective.starts_with(root) {
            return Err(ProbeError::path_escapes_root(format!(
                "{} is not under {}",
                effective.display(),
                root.display()
            )));
        }
        Ok(normalized)
    }

    fn metadata(&self, physical_path: &str) -> ProbeResult<Option<fs::Metadata>> {
        let path = self.check_confined(physical_path)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "probe failed");
                Err(ProbeError::from_io(physical_path, e))
            }
        }
    }
}

/// Errors that just mean "nothing there".
///
/// A path running through a regular file (`/etc/passwd/x`) is absent, not
/// broken.
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl StorageProbe for LocalProbe {
    fn directory_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        Ok(self.metadata(physical_path)?.is_some_and(|m| m.is_dir()))
    }

    fn file_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        Ok(self.metadata(physical_path)?.is_some_and(|m| !m.is_dir()))
    }

    fn parent_physical_path(&self, physical_path: &str) -> ProbeResult<Option<String>> {
        let path = self.check_confined(physical_path)?;
        let parent = parent_physical(&path.to_string_lossy(), PathStyle::native());
        match (&self.root, parent) {
            // The confinement root has no visible parent.
            (Some(root), Some(parent)) if !Path::new(&parent).starts_with(root) => Ok(None),
            (_, parent) => Ok(parent),
        }
    }
}
