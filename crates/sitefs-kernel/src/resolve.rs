//! Logical path → (application, virtual directory, physical path).
//!
//! Matching is longest-prefix at both levels: first the deepest application
//! whose mount path is a segment-aligned prefix of the logical path, then the
//! deepest virtual directory of that application matching the remainder.
//! Between equally deep matches the first configured one wins; `Vec` order in
//! the configuration tree is the only tie-breaker.

use serde::Serialize;
use sitefs_types::{Application, Site, VirtualDirectory};

use crate::error::ResolveResult;
use crate::paths::{
    PathStyle, SEPARATORS, SeparatorDirection, anchor_physical, canonicalize_physical,
    join_physical, logical_path, normalize_separators, prefix_segments, trim_start,
};
use crate::probe::StorageProbe;

/// Where a logical path lands.
///
/// `physical_path` is `Some` exactly when `virtual_directory` is. A path
/// that matches nothing is not an error: all three fields are `None` and
/// the caller should report "not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation<'a> {
    pub application: Option<&'a Application>,
    pub virtual_directory: Option<&'a VirtualDirectory>,
    pub physical_path: Option<String>,
}

impl<'a> ResolvedLocation<'a> {
    fn unresolved(application: Option<&'a Application>) -> Self {
        Self {
            application,
            virtual_directory: None,
            physical_path: None,
        }
    }

    /// Returns true if the path maps onto storage.
    pub fn is_resolved(&self) -> bool {
        self.physical_path.is_some()
    }
}

/// Resolution and classification engine for one storage backend.
///
/// Holds no configuration: every call takes the site tree it should work
/// on. The probe and the physical path style are fixed at construction.
#[derive(Debug, Clone)]
pub struct SiteResolver<P> {
    pub(crate) probe: P,
    pub(crate) style: PathStyle,
}

impl<P: StorageProbe> SiteResolver<P> {
    /// Create a resolver for native physical paths.
    pub fn new(probe: P) -> Self {
        Self::with_style(probe, PathStyle::native())
    }

    /// Create a resolver for physical paths in `style`.
    pub fn with_style(probe: P, style: PathStyle) -> Self {
        Self { probe, style }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Resolve `path` within `site`.
    ///
    /// Fails only for an empty logical path or a physical path that cannot
    /// be expanded.
    pub fn resolve<'a>(&self, site: &'a Site, path: &str) -> ResolveResult<ResolvedLocation<'a>> {
        let path = logical_path(path)?;

        let Some(app) = match_application(site, &path) else {
            tracing::debug!(site = %site.name, path = %path, "no application matches");
            return Ok(ResolvedLocation::unresolved(None));
        };

        let Some(vdir) = match_virtual_directory(app, &path) else {
            tracing::debug!(site = %site.name, path = %path, app = %app.path, "no virtual directory matches");
            return Ok(ResolvedLocation::unresolved(Some(app)));
        };

        let physical = self.physical_path_in(app, vdir, &path)?;
        tracing::debug!(
            site = %site.name,
            path = %path,
            app = %app.path,
            vdir = %vdir.path,
            physical = %physical,
            "resolved"
        );

        Ok(ResolvedLocation {
            application: Some(app),
            virtual_directory: Some(vdir),
            physical_path: Some(physical),
        })
    }

    /// Physical path of `path`, or `None` if it does not resolve.
    pub fn physical_path(&self, site: &Site, path: &str) -> ResolveResult<Option<String>> {
        Ok(self.resolve(site, path)?.physical_path)
    }

    /// Physical path of `path` given its matched application and vdir.
    ///
    /// The part of `path` beyond the application and vdir mount paths is
    /// appended to the vdir's physical path. Environment references are
    /// expanded in the configured physical path only; the appended segments
    /// are taken literally.
    pub fn physical_path_in(
        &self,
        app: &Application,
        vdir: &VirtualDirectory,
        path: &str,
    ) -> ResolveResult<String> {
        let path = logical_path(path)?;
        let suffix = trim_start(
            trim_start(&path, app.path.trim_end_matches('/')),
            vdir.path.trim_end_matches('/'),
        );
        let relative = normalize_separators(
            suffix.trim_matches(SEPARATORS),
            SeparatorDirection::ToPhysical,
            self.style,
        );
        let base = canonicalize_physical(&vdir.physical_path, self.style)?;
        Ok(anchor_physical(
            &join_physical(&base, &relative, self.style),
            self.style,
        ))
    }

    /// Canonical physical path of the site root: the root application's
    /// root virtual directory. `None` if the site has no such vdir.
    pub fn site_root_physical_path(&self, site: &Site) -> ResolveResult<Option<String>> {
        site.root_application()
            .and_then(Application::root_virtual_directory)
            .map(|vdir| canonicalize_physical(&vdir.physical_path, self.style))
            .transpose()
    }
}

/// Deepest application whose mount path prefixes `path`; ties keep the
/// first configured.
fn match_application<'a>(site: &'a Site, path: &str) -> Option<&'a Application> {
    let mut best = None;
    let mut max_match = 0;
    for app in &site.applications {
        let matched = prefix_segments(&app.path, path);
        if matched > max_match {
            best = Some(app);
            max_match = matched;
        }
    }
    best
}

/// `path` relative to the application's mount path (`/` if nothing is left).
pub(crate) fn app_relative_path<'p>(app: &Application, path: &'p str) -> &'p str {
    let relative = trim_start(path, app.path.trim_end_matches('/'));
    if relative.is_empty() { "/" } else { relative }
}

fn match_virtual_directory<'a>(app: &'a Application, path: &str) -> Option<&'a VirtualDirectory> {
    let test_path = app_relative_path(app, path);
    let mut best = None;
    let mut max_match = 0;
    for vdir in &app.virtual_directories {
        let matched = prefix_segments(&vdir.path, test_path);
        if matched > max_match {
            best = Some(vdir);
            max_match = matched;
        }
    }
    best
}

/// The application `path` belongs to, if any.
pub fn resolve_application<'a>(site: &'a Site, path: &str) -> ResolveResult<Option<&'a Application>> {
    let path = logical_path(path)?;
    Ok(match_application(site, &path))
}

/// The virtual directory `path` belongs to, if any.
pub fn resolve_virtual_directory<'a>(
    site: &'a Site,
    path: &str,
) -> ResolveResult<Option<&'a VirtualDirectory>> {
    let path = logical_path(path)?;
    Ok(match_application(site, &path).and_then(|app| match_virtual_directory(app, &path)))
}

/// Full logical path of a virtual directory's mount point.
///
/// `/app1` + `/docs` → `/app1/docs`; an application's root vdir sits at the
/// application path itself.
pub fn vdir_logical_path(app: &Application, vdir: &VirtualDirectory) -> String {
    let joined = format!(
        "{}{}",
        app.path.trim_end_matches('/'),
        vdir.path.trim_end_matches('/')
    );
    if joined.is_empty() { "/".to_string() } else { joined }
}
