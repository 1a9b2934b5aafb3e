//! Mount points visible as children of a logical directory.
//!
//! Directory listings come from storage, which knows nothing about virtual
//! directories. This module supplies the extra entries: the mounts whose
//! parent is the listed path.

use serde::Serialize;
use sitefs_types::{Application, Site, VirtualDirectory};

use crate::error::ResolveResult;
use crate::paths::{eq_ignore_case, logical_path};
use crate::resolve::vdir_logical_path;

/// A virtual directory together with its owning application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount<'a> {
    pub application: &'a Application,
    pub virtual_directory: &'a VirtualDirectory,
    /// Full logical path of the mount point.
    pub path: String,
}

impl<'a> Mount<'a> {
    pub fn new(application: &'a Application, virtual_directory: &'a VirtualDirectory) -> Self {
        Self {
            application,
            virtual_directory,
            path: vdir_logical_path(application, virtual_directory),
        }
    }

    /// Entry name as it appears in a listing of the parent.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }
}

/// Mounts directly visible at `path`.
///
/// - At `/`: the root vdir of every application other than the root one.
/// - At an application's own path (including `/` for the root
///   application): that application's non-root vdirs, in configured order.
///
/// Any other path yields nothing.
pub fn list_mounts_at<'a>(site: &'a Site, path: &str) -> ResolveResult<Vec<Mount<'a>>> {
    let path = logical_path(path)?;
    let dir = path.trim_end_matches('/');
    let mut mounts = Vec::new();

    if dir.is_empty() {
        for app in site.applications.iter().filter(|app| !app.is_root()) {
            if let Some(root) = app.root_virtual_directory() {
                mounts.push(Mount::new(app, root));
            }
        }
    }

    if let Some(app) = site
        .applications
        .iter()
        .find(|app| eq_ignore_case(app.path.trim_end_matches('/'), dir))
    {
        mounts.extend(
            app.virtual_directories
                .iter()
                .filter(|vdir| !vdir.is_root())
                .map(|vdir| Mount::new(app, vdir)),
        );
    }

    tracing::debug!(site = %site.name, path = %path, count = mounts.len(), "listed mounts");
    Ok(mounts)
}
