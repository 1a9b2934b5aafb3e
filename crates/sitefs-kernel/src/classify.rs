//! Node classification: file, directory, or virtual directory mount point.
//!
//! A path is a mount point when two things hold:
//!
//! 1. its physical path is *remapped*: it differs from what plain traversal
//!    from the site root would give, and
//! 2. it sits exactly on a vdir boundary (application path + vdir path).
//!
//! Everything below a mount point is remapped too, which is why (2) is
//! needed. Anything that is not a mount point is a directory if the probe
//! finds one, otherwise a file. The site root is always a mount point.

use sitefs_types::{Application, NodeKind, Site, VirtualDirectory};

use crate::error::{ResolveError, ResolveResult};
use crate::paths::{
    SeparatorDirection, anchor_physical, eq_ignore_case, join_physical, logical_path,
    normalize_separators, physical_eq,
};
use crate::probe::StorageProbe;
use crate::resolve::{SiteResolver, vdir_logical_path};

/// Returns true if `path` is exactly the mount point of `vdir` in `app`.
///
/// Trailing `/` on any side is ignored; comparison is case-insensitive.
pub fn is_exact_vdir_path(app: &Application, vdir: &VirtualDirectory, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    let mount = vdir_logical_path(app, vdir);
    eq_ignore_case(path, mount.trim_end_matches('/'))
}

impl<P: StorageProbe> SiteResolver<P> {
    /// Classify `path`, whose resolved physical path is `physical_path`.
    ///
    /// Calling this for a path that does not resolve is a caller bug and
    /// yields [`ResolveError::Unresolved`]. Probe failures propagate.
    pub fn classify(&self, site: &Site, path: &str, physical_path: &str) -> ResolveResult<NodeKind> {
        let path = logical_path(path)?;
        if path == "/" {
            return Ok(NodeKind::VirtualDirectory);
        }

        let location = self.resolve(site, &path)?;
        let (Some(app), Some(vdir)) = (location.application, location.virtual_directory) else {
            return Err(ResolveError::unresolved(path));
        };

        if self.is_remapped(site, &path, physical_path)? && is_exact_vdir_path(app, vdir, &path) {
            return Ok(NodeKind::VirtualDirectory);
        }

        if self.probe.directory_exists(physical_path)? {
            Ok(NodeKind::Directory)
        } else {
            Ok(NodeKind::File)
        }
    }

    /// Resolve and classify in one step. `None` if the path does not resolve.
    pub fn kind_of(&self, site: &Site, path: &str) -> ResolveResult<Option<NodeKind>> {
        match self.resolve(site, path)?.physical_path {
            Some(physical) => self.classify(site, path, &physical).map(Some),
            None => Ok(None),
        }
    }

    /// Physical path `path` would have as a plain descendant of the site
    /// root, ignoring every application and vdir below the root.
    ///
    /// `None` if the site has no root physical path.
    pub fn naive_physical_path(&self, site: &Site, path: &str) -> ResolveResult<Option<String>> {
        let path = logical_path(path)?;
        let Some(root) = self.site_root_physical_path(site)? else {
            return Ok(None);
        };
        let relative = normalize_separators(
            path.trim_start_matches('/'),
            SeparatorDirection::ToPhysical,
            self.style,
        );
        Ok(Some(anchor_physical(
            &join_physical(&root, &relative, self.style),
            self.style,
        )))
    }

    /// Returns true if `physical_path` is not where plain traversal from the
    /// site root would put `path`.
    ///
    /// `physical_path` is a resolved path, so it is normalized but not
    /// expanded again. A site without a root physical path has nothing to
    /// traverse from, so every path counts as remapped.
    pub fn is_remapped(&self, site: &Site, path: &str, physical_path: &str) -> ResolveResult<bool> {
        let Some(naive) = self.naive_physical_path(site, path)? else {
            return Ok(true);
        };
        let physical = anchor_physical(physical_path, self.style);
        Ok(!physical_eq(&naive, &physical))
    }
}
