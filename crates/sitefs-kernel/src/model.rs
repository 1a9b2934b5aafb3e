//! Typed description of a resolved node.
//!
//! This is the data an API layer renders: what the node is called, what it
//! is, where it lives, and what contains it. Field selection and link
//! decoration belong to that layer, not here.

use serde::Serialize;
use sitefs_types::{Application, FileId, NodeKind, Site, SiteId, VirtualDirectory};

use crate::classify::is_exact_vdir_path;
use crate::error::ResolveResult;
use crate::paths::{last_segment, logical_path, remove_last_segment};
use crate::probe::StorageProbe;
use crate::resolve::{ResolvedLocation, SiteResolver, vdir_logical_path};

/// Short reference to a node, used for parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub name: String,
    pub id: FileId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
}

impl NodeRef {
    fn mount(site: &Site, app: &Application, vdir: &VirtualDirectory) -> Self {
        let path = vdir_logical_path(app, vdir);
        Self {
            name: path.trim_start_matches('/').to_string(),
            id: FileId::new(site.id, &path),
            kind: NodeKind::VirtualDirectory,
            path,
        }
    }

    fn directory(site: &Site, path: &str) -> Self {
        Self {
            name: last_segment(path).to_string(),
            id: FileId::new(site.id, path),
            kind: NodeKind::Directory,
            path: path.to_string(),
        }
    }
}

/// Full description of a resolved node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub name: String,
    pub id: FileId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Logical path. For a mount point this is the mount's own path.
    pub path: String,
    pub physical_path: String,
    pub site: SiteId,
    pub parent: Option<NodeRef>,
}

impl<P: StorageProbe> SiteResolver<P> {
    /// Resolve, classify and describe `path`.
    ///
    /// `None` if the path does not resolve.
    pub fn describe(&self, site: &Site, path: &str) -> ResolveResult<Option<Node>> {
        let path = logical_path(path)?;
        let location = self.resolve(site, &path)?;
        let ResolvedLocation {
            application: Some(app),
            virtual_directory: Some(vdir),
            physical_path: Some(physical_path),
        } = location
        else {
            return Ok(None);
        };

        let kind = self.classify(site, &path, &physical_path)?;
        let node = match kind {
            NodeKind::VirtualDirectory => {
                let mount = NodeRef::mount(site, app, vdir);
                Node {
                    name: mount.name,
                    id: mount.id,
                    kind,
                    path: mount.path,
                    physical_path,
                    site: site.id,
                    parent: mount_parent(site, app, vdir),
                }
            }
            NodeKind::File | NodeKind::Directory => Node {
                name: last_segment(&path).to_string(),
                id: FileId::new(site.id, &path),
                kind,
                parent: self.container_of(site, &path)?,
                path,
                physical_path,
                site: site.id,
            },
        };
        Ok(Some(node))
    }

    /// What contains `path`, if anything.
    ///
    /// A mount point's parent is the mount it hangs from; a file's or
    /// directory's parent is the mount or directory one segment up.
    pub fn parent_of(&self, site: &Site, path: &str) -> ResolveResult<Option<NodeRef>> {
        Ok(self.describe(site, path)?.and_then(|node| node.parent))
    }

    /// Parent of a plain file or directory at `path`.
    fn container_of(&self, site: &Site, path: &str) -> ResolveResult<Option<NodeRef>> {
        let Some(parent_path) = remove_last_segment(path) else {
            return Ok(None);
        };

        let location = self.resolve(site, parent_path)?;
        let (Some(app), Some(vdir)) = (location.application, location.virtual_directory) else {
            return Ok(None);
        };
        if is_exact_vdir_path(app, vdir, parent_path) {
            return Ok(Some(NodeRef::mount(site, app, vdir)));
        }

        match location.physical_path {
            Some(physical) if self.probe.directory_exists(&physical)? => {
                Ok(Some(NodeRef::directory(site, parent_path)))
            }
            _ => Ok(None),
        }
    }
}

/// Parent of a mount point.
///
/// A nested vdir hangs from its application's root vdir; an application's
/// root vdir hangs from the site root. The site root has no parent.
fn mount_parent(site: &Site, app: &Application, vdir: &VirtualDirectory) -> Option<NodeRef> {
    if !vdir.is_root() {
        app.root_virtual_directory()
            .map(|root| NodeRef::mount(site, app, root))
    } else if !app.is_root() {
        let root_app = site.root_application()?;
        let root_vdir = root_app.root_virtual_directory()?;
        Some(NodeRef::mount(site, root_app, root_vdir))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PathStyle;
    use crate::probe::MemoryProbe;

    fn site() -> Site {
        Site::new(7, "s7")
            .with_application(
                Application::new("/")
                    .with_vdir("/", "/srv/s7")
                    .with_vdir("/images", "/mnt/images"),
            )
            .with_application(
                Application::new("/app1")
                    .with_vdir("/", "/srv/app1")
                    .with_vdir("/docs", "/mnt/docs"),
            )
    }

    fn resolver() -> SiteResolver<MemoryProbe> {
        let probe = MemoryProbe::new(PathStyle::Unix)
            .with_dir("/srv/s7/css")
            .with_file("/srv/s7/css/site.css")
            .with_file("/srv/s7/index.html")
            .with_dir("/mnt/images/2024")
            .with_file("/srv/app1/web.config")
            .with_file("/mnt/docs/guide/intro.md");
        SiteResolver::with_style(probe, PathStyle::Unix)
    }

    #[test]
    fn test_site_root() {
        let node = resolver().describe(&site(), "/").unwrap().unwrap();
        assert_eq!(node.kind, NodeKind::VirtualDirectory);
        assert_eq!(node.path, "/");
        assert_eq!(node.name, "");
        assert_eq!(node.physical_path, "/srv/s7");
        assert!(node.parent.is_none());
    }

    #[test]
    fn test_file_under_directory() {
        let site = site();
        let node = resolver().describe(&site, "/css/site.css").unwrap().unwrap();
        assert_eq!(node.kind, NodeKind::File);
        assert_eq!(node.name, "site.css");
        assert_eq!(node.id, FileId::new(SiteId(7), "/css/site.css"));

        let parent = node.parent.unwrap();
        assert_eq!(parent.kind, NodeKind::Directory);
        assert_eq!(parent.path, "/css");
        assert_eq!(parent.name, "css");
    }

    #[test]
    fn test_file_at_site_root_has_root_mount_parent() {
        let node = resolver().describe(&site(), "/index.html").unwrap().unwrap();
        let parent = node.parent.unwrap();
        assert_eq!(parent.kind, NodeKind::VirtualDirectory);
        assert_eq!(parent.path, "/");
    }

    #[test]
    fn test_directory_under_mount() {
        let node = resolver().describe(&site(), "/images/2024").unwrap().unwrap();
        assert_eq!(node.kind, NodeKind::Directory);
        let parent = node.parent.unwrap();
        assert_eq!(parent.kind, NodeKind::VirtualDirectory);
        assert_eq!(parent.path, "/images");
        assert_eq!(parent.name, "images");
    }

    #[test]
    fn test_missing_parent_directory() {
        // "/mnt/docs/guide" exists, "/srv/s7/ghost" does not.
        let node = resolver().describe(&site(), "/ghost/file.txt").unwrap().unwrap();
        assert_eq!(node.kind, NodeKind::File);
        assert!(node.parent.is_none());

        let node = resolver().describe(&site(), "/app1/docs/guide/intro.md").unwrap().unwrap();
        assert_eq!(node.parent.unwrap().path, "/app1/docs/guide");
    }

    #[test]
    fn test_mount_parents() {
        let site = site();
        let r = resolver();

        let docs = r.describe(&site, "/app1/docs").unwrap().unwrap();
        assert_eq!(docs.kind, NodeKind::VirtualDirectory);
        assert_eq!(docs.name, "app1/docs");
        assert_eq!(docs.physical_path, "/mnt/docs");
        assert_eq!(docs.parent.as_ref().unwrap().path, "/app1");

        let app = r.describe(&site, "/app1").unwrap().unwrap();
        assert_eq!(app.kind, NodeKind::VirtualDirectory);
        assert_eq!(app.parent.as_ref().unwrap().path, "/");

        let images = r.describe(&site, "/images").unwrap().unwrap();
        assert_eq!(images.parent.as_ref().unwrap().path, "/");
    }

    #[test]
    fn test_parent_of() {
        let site = site();
        let r = resolver();
        assert_eq!(r.parent_of(&site, "/app1/web.config").unwrap().unwrap().path, "/app1");
        assert!(r.parent_of(&site, "/").unwrap().is_none());
    }

    #[test]
    fn test_unresolvable_is_none() {
        let site = Site::new(8, "partial").with_application(Application::new("/x").with_vdir("/", "/srv/x"));
        assert!(resolver().describe(&site, "/y").unwrap().is_none());
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let node = resolver().describe(&site(), "/index.html").unwrap().unwrap();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["parent"]["type"], "vdir");
        assert_eq!(json["site"], 7);
    }
}
