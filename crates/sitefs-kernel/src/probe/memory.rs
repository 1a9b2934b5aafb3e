//! In-memory storage probe.
//!
//! Used for tests and dry runs against configurations whose storage is not
//! mounted on this host. Paths follow the probe's [`PathStyle`]; Windows-style
//! probes compare case-insensitively.

use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

use crate::error::{ProbeError, ProbeResult};
use crate::paths::{PathStyle, lexical_normalize, parent_physical};

use super::StorageProbe;

/// Entry in the memory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    File,
    Directory,
}

/// In-memory storage probe.
///
/// Thread-safe via internal `RwLock`. Adding a path also adds its missing
/// parent directories. Individual paths can be made to fail, to exercise
/// error propagation.
#[derive(Debug)]
pub struct MemoryProbe {
    style: PathStyle,
    entries: RwLock<HashMap<String, Entry>>,
    failures: RwLock<HashMap<String, io::ErrorKind>>,
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new(PathStyle::native())
    }
}

impl MemoryProbe {
    /// Create an empty tree using `style` paths.
    pub fn new(style: PathStyle) -> Self {
        Self {
            style,
            entries: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Lookup key: normalized, and lower-cased for Windows paths.
    fn key(&self, path: &str) -> String {
        let normalized = lexical_normalize(path, self.style);
        match self.style {
            PathStyle::Windows => normalized.to_lowercase(),
            PathStyle::Unix => normalized,
        }
    }

    /// Insert `path` and any missing ancestors as directories.
    fn ensure_parents(&self, entries: &mut HashMap<String, Entry>, path: &str) {
        let mut current = parent_physical(path, self.style);
        while let Some(parent) = current {
            entries.entry(self.key(&parent)).or_insert(Entry::Directory);
            current = parent_physical(&parent, self.style);
        }
    }

    fn insert(&self, path: &str, entry: Entry) -> ProbeResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ProbeError::other("lock poisoned"))?;
        self.ensure_parents(&mut entries, path);
        entries.insert(self.key(path), entry);
        Ok(())
    }

    /// Add a directory (and its parents).
    pub fn add_dir(&self, path: &str) -> ProbeResult<()> {
        self.insert(path, Entry::Directory)
    }

    /// Add a file (and its parent directories).
    pub fn add_file(&self, path: &str) -> ProbeResult<()> {
        self.insert(path, Entry::File)
    }

    /// Make every probe of `path` fail with `kind`.
    pub fn fail_on(&self, path: &str, kind: io::ErrorKind) -> ProbeResult<()> {
        let mut failures = self
            .failures
            .write()
            .map_err(|_| ProbeError::other("lock poisoned"))?;
        failures.insert(self.key(path), kind);
        Ok(())
    }

    /// Builder form of [`add_dir`](Self::add_dir) for test fixtures.
    pub fn with_dir(self, path: &str) -> Self {
        if let Err(e) = self.add_dir(path) {
            tracing::warn!(path = %path, error = %e, "failed to add directory");
        }
        self
    }

    /// Builder form of [`add_file`](Self::add_file) for test fixtures.
    pub fn with_file(self, path: &str) -> Self {
        if let Err(e) = self.add_file(path) {
            tracing::warn!(path = %path, error = %e, "failed to add file");
        }
        self
    }

    fn lookup(&self, path: &str) -> ProbeResult<Option<Entry>> {
        let key = self.key(path);
        {
            let failures = self
                .failures
                .read()
                .map_err(|_| ProbeError::other("lock poisoned"))?;
            if let Some(kind) = failures.get(&key) {
                return Err(ProbeError::from_io(path, io::Error::from(*kind)));
            }
        }
        let entries = self
            .entries
            .read()
            .map_err(|_| ProbeError::other("lock poisoned"))?;
        Ok(entries.get(&key).copied())
    }
}

impl StorageProbe for MemoryProbe {
    fn directory_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        Ok(self.lookup(physical_path)? == Some(Entry::Directory))
    }

    fn file_exists(&self, physical_path: &str) -> ProbeResult<bool> {
        Ok(self.lookup(physical_path)? == Some(Entry::File))
    }

    fn parent_physical_path(&self, physical_path: &str) -> ProbeResult<Option<String>> {
        Ok(parent_physical(physical_path, self.style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_creates_parents() {
        let probe = MemoryProbe::new(PathStyle::Unix).with_file("/srv/site/css/app.css");
        assert!(probe.file_exists("/srv/site/css/app.css").unwrap());
        assert!(probe.directory_exists("/srv/site/css").unwrap());
        assert!(probe.directory_exists("/srv").unwrap());
        assert!(probe.directory_exists("/").unwrap());
        assert!(!probe.directory_exists("/srv/site/css/app.css").unwrap());
    }

    #[test]
    fn test_unix_is_case_sensitive() {
        let probe = MemoryProbe::new(PathStyle::Unix).with_dir("/srv/Site");
        assert!(probe.directory_exists("/srv/Site").unwrap());
        assert!(!probe.directory_exists("/srv/site").unwrap());
    }

    #[test]
    fn test_windows_ignores_case_and_slashes() {
        let probe = MemoryProbe::new(PathStyle::Windows).with_dir("D:\\Apps\\App1\\Sub");
        assert!(probe.directory_exists("d:\\apps\\app1\\sub").unwrap());
        assert!(probe.directory_exists("D:/apps/app1").unwrap());
        assert!(probe.directory_exists("D:\\").unwrap());
    }

    #[test]
    fn test_failure_injection_is_an_error() {
        let probe = MemoryProbe::new(PathStyle::Unix).with_dir("/srv/locked");
        probe
            .fail_on("/srv/locked", io::ErrorKind::PermissionDenied)
            .unwrap();
        assert!(matches!(
            probe.directory_exists("/srv/locked"),
            Err(ProbeError::PermissionDenied(_))
        ));

        probe.fail_on("/srv/flaky", io::ErrorKind::TimedOut).unwrap();
        assert!(matches!(probe.file_exists("/srv/flaky"), Err(ProbeError::Io(_))));
    }

    #[test]
    fn test_parent_physical_path() {
        let probe = MemoryProbe::new(PathStyle::Windows);
        assert_eq!(
            probe.parent_physical_path("C:\\sites\\s1").unwrap().as_deref(),
            Some("C:\\sites")
        );
        assert_eq!(probe.parent_physical_path("C:\\").unwrap(), None);
    }
}
