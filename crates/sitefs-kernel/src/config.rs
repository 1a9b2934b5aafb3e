//! Site configuration files.
//!
//! A configuration file is RON holding every site a host serves:
//!
//! ```ron
//! (
//!     sites: [
//!         (
//!             id: 1,
//!             name: "Default Web Site",
//!             applications: [
//!                 (path: "/", virtual_directories: [
//!                     (path: "/", physical_path: "%SystemDrive%\\inetpub\\wwwroot"),
//!                 ]),
//!                 (path: "/app1", virtual_directories: [
//!                     (path: "/", physical_path: "D:\\apps\\app1"),
//!                     (path: "/docs", physical_path: "D:\\docs"),
//!                 ]),
//!             ],
//!         ),
//!     ],
//! )
//! ```
//!
//! Loading validates the tree shape; it never touches the physical paths.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sitefs_types::Site;
use thiserror::Error;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RON syntax error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid site configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Every site a host serves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl SitesConfig {
    /// Find a site by name (case-insensitive) or numeric id.
    pub fn find_site(&self, key: &str) -> Option<&Site> {
        self.sites
            .iter()
            .find(|site| site.name.eq_ignore_ascii_case(key))
            .or_else(|| {
                let id: u64 = key.parse().ok()?;
                self.sites.iter().find(|site| site.id.get() == id)
            })
    }

    /// Check the tree shape.
    ///
    /// Hard errors: mount paths not starting with `/`, duplicate application
    /// paths within a site, duplicate vdir paths within an application,
    /// duplicate site ids or names. An application without a root vdir is
    /// only logged; resolution tolerates it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        let mut site_ids = HashSet::new();
        let mut site_names = HashSet::new();

        for site in &self.sites {
            if !site_ids.insert(site.id) {
                problems.push(format!("duplicate site id {}", site.id));
            }
            if !site_names.insert(site.name.to_lowercase()) {
                problems.push(format!("duplicate site name '{}'", site.name));
            }

            let mut app_paths = HashSet::new();
            for app in &site.applications {
                if !app.path.starts_with('/') {
                    problems.push(format!(
                        "site '{}': application path '{}' must start with '/'",
                        site.name, app.path
                    ));
                }
                if !app_paths.insert(app.path.trim_end_matches('/').to_lowercase()) {
                    problems.push(format!(
                        "site '{}': duplicate application path '{}'",
                        site.name, app.path
                    ));
                }

                let mut vdir_paths = HashSet::new();
                for vdir in &app.virtual_directories {
                    if !vdir.path.starts_with('/') {
                        problems.push(format!(
                            "site '{}', application '{}': virtual directory path '{}' must start with '/'",
                            site.name, app.path, vdir.path
                        ));
                    }
                    if !vdir_paths.insert(vdir.path.trim_end_matches('/').to_lowercase()) {
                        problems.push(format!(
                            "site '{}', application '{}': duplicate virtual directory path '{}'",
                            site.name, app.path, vdir.path
                        ));
                    }
                    if vdir.physical_path.is_empty() {
                        problems.push(format!(
                            "site '{}', application '{}': virtual directory '{}' has no physical path",
                            site.name, app.path, vdir.path
                        ));
                    }
                }

                if app.root_virtual_directory().is_none() {
                    tracing::warn!(
                        site = %site.name,
                        app = %app.path,
                        "application has no root virtual directory"
                    );
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

/// Parse and validate configuration text.
pub fn parse_sites_config(text: &str) -> Result<SitesConfig, ConfigError> {
    let config: SitesConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load_sites_config(path: &Path) -> Result<SitesConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_sites_config(&text)?;
    tracing::debug!(path = %path.display(), sites = config.sites.len(), "loaded site configuration");
    Ok(config)
}
