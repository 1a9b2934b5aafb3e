//! # sitefs-kernel
//!
//! Maps logical request paths inside a hosted site onto physical storage
//! and decides what lives there.
//!
//! A site is a tree of applications, each owning virtual directories that
//! point at physical directories. Given a logical path such as
//! `/app1/docs/guide.md`, the kernel:
//!
//! 1. picks the application and vdir with the longest segment-aligned,
//!    case-insensitive prefix ([`SiteResolver::resolve`]),
//! 2. joins the remainder onto the vdir's physical path, expanding
//!    environment variables and canonicalizing lexically,
//! 3. classifies the node as a mount point, a directory, or a file
//!    ([`SiteResolver::classify`]).
//!
//! [`list_mounts_at`] supplies the mount points a directory listing must add
//! on top of what storage reports.
//!
//! All storage access goes through a [`StorageProbe`]. The resolver itself is
//! pure and synchronous; it holds no state beyond the probe and a
//! [`PathStyle`].
//!
//! ```
//! use sitefs_kernel::{Application, MemoryProbe, NodeKind, PathStyle, Site, SiteResolver};
//!
//! let site = Site::new(1, "s1")
//!     .with_application(Application::new("/").with_vdir("/", "/srv/s1"))
//!     .with_application(Application::new("/app1").with_vdir("/", "/srv/apps/app1"));
//! let probe = MemoryProbe::new(PathStyle::Unix).with_dir("/srv/apps/app1/sub");
//! let resolver = SiteResolver::with_style(probe, PathStyle::Unix);
//!
//! let physical = resolver.physical_path(&site, "/app1/sub").unwrap().unwrap();
//! assert_eq!(physical, "/srv/apps/app1/sub");
//! assert_eq!(resolver.classify(&site, "/app1/sub", &physical).unwrap(), NodeKind::Directory);
//! assert_eq!(resolver.kind_of(&site, "/app1").unwrap(), Some(NodeKind::VirtualDirectory));
//! ```

pub mod classify;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod paths;
pub mod probe;
pub mod resolve;

pub use classify::is_exact_vdir_path;
pub use config::{ConfigError, SitesConfig, load_sites_config, parse_sites_config};
pub use enumerate::{Mount, list_mounts_at};
pub use error::{ProbeError, ProbeResult, ResolveError, ResolveResult};
pub use model::{Node, NodeRef};
pub use paths::PathStyle;
pub use probe::{LocalProbe, MemoryProbe, StorageProbe};
pub use resolve::{
    ResolvedLocation, SiteResolver, resolve_application, resolve_virtual_directory,
    vdir_logical_path,
};

pub use sitefs_types::{Application, FileId, NodeKind, Site, SiteId, VirtualDirectory};
