//! Shared configuration and identity types for sitefs.
//!
//! This crate is the read-only view of a host's site configuration: sites,
//! the applications mounted inside them, and the virtual directories each
//! application maps onto physical storage. It has **no internal sitefs
//! dependencies** and performs no I/O.
//!
//! # Configuration Tree
//!
//! ```text
//! Site (SiteId)
//!     └── Application  "/"          ← the root application
//!     │       └── VirtualDirectory "/"        → /srv/sites/s1
//!     │       └── VirtualDirectory "/images"  → /mnt/images
//!     └── Application  "/app1"
//!             └── VirtualDirectory "/"        → /srv/apps/app1
//! ```
//!
//! Application paths are logical paths within the site. Virtual directory
//! paths are relative to their owning application.
//!
//! # Key Types
//!
//! |----------------------|----------------------------------------------|
//! | Type                 | Purpose                                      |
//! |----------------------|----------------------------------------------|
//! | [`Site`]             | Top-level namespace, owns applications       |
//! | [`Application`]      | Mounted at a logical path, owns vdirs        |
//! | [`VirtualDirectory`] | Mount path → physical path                   |
//! | [`NodeKind`]         | File / Directory / VirtualDirectory          |
//! | [`SiteId`]           | Which site                                   |
//! | [`FileId`]           | Stable id of a logical path within a site    |
//! |----------------------|----------------------------------------------|

pub mod ids;
pub mod node;
pub mod site;

pub use ids::{FileId, SiteId};
pub use node::NodeKind;
pub use site::{Application, Site, VirtualDirectory};
