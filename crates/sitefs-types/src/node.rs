//! Node classification.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// What a resolved logical path denotes.
///
/// Exactly one kind applies to any resolvable path. A `VirtualDirectory` is a
/// mount point: the logical location where a virtual directory is attached,
/// not the paths beneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum NodeKind {
    /// Plain file on storage.
    File,
    /// Plain directory on storage.
    Directory,
    /// Mount point of a virtual directory.
    #[serde(rename = "vdir")]
    #[strum(serialize = "vdir", serialize = "virtual_directory", serialize = "virtualdirectory")]
    VirtualDirectory,
}

impl NodeKind {
    /// Parse from string (case-insensitive).
    ///
    /// Accepts `vdir` and `virtual_directory` for mount points.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
            NodeKind::VirtualDirectory => "vdir",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
