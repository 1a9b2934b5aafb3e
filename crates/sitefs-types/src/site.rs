//! Site configuration tree.
//!
//! These are snapshots handed over by the host configuration store. Nothing
//! in sitefs mutates them after construction; the builder-style `with_*`
//! methods exist for assembling trees in code and tests.

use serde::{Deserialize, Serialize};

use crate::ids::SiteId;

/// A host's top-level namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    /// Applications in configured order. Order decides ties between equally
    /// specific matches.
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl Site {
    pub fn new(id: impl Into<SiteId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            applications: Vec::new(),
        }
    }

    /// Add an application.
    pub fn with_application(mut self, app: Application) -> Self {
        self.applications.push(app);
        self
    }

    /// Look up an application by its exact mount path (case-insensitive).
    pub fn application(&self, path: &str) -> Option<&Application> {
        self.applications
            .iter()
            .find(|app| app.path.eq_ignore_ascii_case(path))
    }

    /// The application mounted at `/`, if configured.
    pub fn root_application(&self) -> Option<&Application> {
        self.application("/")
    }
}

/// An application mounted at a logical path within a site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Logical mount path, always starting with `/`.
    pub path: String,
    #[serde(default)]
    pub virtual_directories: Vec<VirtualDirectory>,
}

impl Application {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            virtual_directories: Vec::new(),
        }
    }

    /// Add a virtual directory.
    pub fn with_vdir(mut self, path: impl Into<String>, physical_path: impl Into<String>) -> Self {
        self.virtual_directories
            .push(VirtualDirectory::new(path, physical_path));
        self
    }

    /// Look up a virtual directory by its mount path (case-insensitive).
    pub fn virtual_directory(&self, path: &str) -> Option<&VirtualDirectory> {
        self.virtual_directories
            .iter()
            .find(|vdir| vdir.path.eq_ignore_ascii_case(path))
    }

    /// The virtual directory at `/`, which supplies the application's base
    /// physical path.
    pub fn root_virtual_directory(&self) -> Option<&VirtualDirectory> {
        self.virtual_directory("/")
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

/// A mount path (relative to its application) backed by a physical path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDirectory {
    /// Mount path relative to the owning application, starting with `/`.
    pub path: String,
    /// Absolute location on the backing storage.
    pub physical_path: String,
}

impl VirtualDirectory {
    pub fn new(path: impl Into<String>, physical_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            physical_path: physical_path.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Site {
        Site::new(1, "Default Web Site")
            .with_application(
                Application::new("/")
                    .with_vdir("/", "/srv/sites/default")
                    .with_vdir("/images", "/mnt/images"),
            )
            .with_application(Application::new("/App1").with_vdir("/", "/srv/apps/app1"))
    }

    #[test]
    fn test_application_lookup_ignores_case() {
        let site = sample();
        assert!(site.application("/app1").is_some());
        assert!(site.application("/APP1").is_some());
        assert!(site.application("/app2").is_none());
    }

    #[test]
    fn test_root_lookups() {
        let site = sample();
        let root = site.root_application().unwrap();
        assert!(root.is_root());
        assert_eq!(
            root.root_virtual_directory().unwrap().physical_path,
            "/srv/sites/default"
        );
        assert!(root.virtual_directory("/Images").is_some());
    }

    #[test]
    fn test_missing_root_vdir() {
        let app = Application::new("/bare").with_vdir("/x", "/tmp/x");
        assert!(app.root_virtual_directory().is_none());
        assert!(!app.is_root());
    }

    #[test]
    fn test_ron_parses_with_defaults() {
        let text = r#"(
            id: 5,
            name: "empty",
            applications: [
                (path: "/"),
            ],
        )"#;
        let site: Site = ron::from_str(text).unwrap();
        assert_eq!(site.id, SiteId(5));
        assert_eq!(site.applications.len(), 1);
        assert!(site.applications[0].virtual_directories.is_empty());
    }
}
