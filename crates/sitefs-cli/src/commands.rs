//! Subcommand implementations.
//!
//! Each command returns a [`Report`]: the JSON body to print, and whether
//! the thing asked about was found.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sitefs_kernel::{
    NodeKind, Site, SiteResolver, SitesConfig, StorageProbe, list_mounts_at,
};

pub struct Report {
    pub body: Value,
    pub found: bool,
}

impl Report {
    fn found(body: impl Serialize) -> Result<Self> {
        Ok(Self {
            body: serde_json::to_value(body)?,
            found: true,
        })
    }

    fn missing(body: impl Serialize) -> Result<Self> {
        Ok(Self {
            body: serde_json::to_value(body)?,
            found: false,
        })
    }
}

#[derive(Serialize)]
struct Resolution<'a> {
    site: &'a str,
    path: &'a str,
    application: Option<&'a str>,
    virtual_directory: Option<&'a str>,
    physical_path: Option<String>,
}

#[derive(Serialize)]
struct Classification<'a> {
    path: &'a str,
    physical_path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<NodeKind>,
}

#[derive(Serialize)]
struct MountEntry<'a> {
    name: &'a str,
    path: &'a str,
    application: &'a str,
    physical_path: &'a str,
}

#[derive(Serialize)]
struct SiteSummary<'a> {
    id: u64,
    name: &'a str,
    applications: usize,
    virtual_directories: usize,
    root_physical_path: Option<String>,
}

pub fn resolve<P: StorageProbe>(resolver: &SiteResolver<P>, site: &Site, path: &str) -> Result<Report> {
    let location = resolver
        .resolve(site, path)
        .with_context(|| format!("resolving {path}"))?;
    let body = Resolution {
        site: &site.name,
        path,
        application: location.application.map(|app| app.path.as_str()),
        virtual_directory: location.virtual_directory.map(|vdir| vdir.path.as_str()),
        physical_path: location.physical_path.clone(),
    };
    if location.is_resolved() {
        Report::found(body)
    } else {
        Report::missing(body)
    }
}

pub fn classify<P: StorageProbe>(resolver: &SiteResolver<P>, site: &Site, path: &str) -> Result<Report> {
    let Some(physical_path) = resolver.physical_path(site, path)? else {
        return Report::missing(Classification {
            path,
            physical_path: None,
            kind: None,
        });
    };
    let kind = resolver
        .classify(site, path, &physical_path)
        .with_context(|| format!("classifying {path}"))?;
    Report::found(Classification {
        path,
        physical_path: Some(physical_path),
        kind: Some(kind),
    })
}

pub fn mounts(site: &Site, path: &str) -> Result<Report> {
    let mounts = list_mounts_at(site, path)?;
    let entries: Vec<_> = mounts
        .iter()
        .map(|mount| MountEntry {
            name: mount.name(),
            path: &mount.path,
            application: &mount.application.path,
            physical_path: &mount.virtual_directory.physical_path,
        })
        .collect();
    Report::found(entries)
}

pub fn describe<P: StorageProbe>(resolver: &SiteResolver<P>, site: &Site, path: &str) -> Result<Report> {
    match resolver
        .describe(site, path)
        .with_context(|| format!("describing {path}"))?
    {
        Some(node) => Report::found(node),
        None => Report::missing(Value::Null),
    }
}

pub fn check<P: StorageProbe>(resolver: &SiteResolver<P>, config: &SitesConfig) -> Result<Report> {
    let mut summaries = Vec::with_capacity(config.sites.len());
    for site in &config.sites {
        let root_physical_path = resolver
            .site_root_physical_path(site)
            .with_context(|| format!("site '{}'", site.name))?;
        if root_physical_path.is_none() {
            tracing::warn!(site = %site.name, "site has no root physical path");
        }
        summaries.push(SiteSummary {
            id: site.id.get(),
            name: &site.name,
            applications: site.applications.len(),
            virtual_directories: site
                .applications
                .iter()
                .map(|app| app.virtual_directories.len())
                .sum(),
            root_physical_path,
        });
    }
    Report::found(summaries)
}
