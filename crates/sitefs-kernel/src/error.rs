//! Error types for probing and resolution.

use std::io;
use thiserror::Error;

/// Failure reported by a [`StorageProbe`](crate::probe::StorageProbe).
///
/// "Does not exist" is never an error: probes answer `Ok(false)` for it.
/// Everything here means the probe could not find out.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Access to the path was denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Path lies outside the probe's confinement root.
    #[error("path escapes root: {0}")]
    PathEscapesRoot(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ProbeError {
    /// Create a PermissionDenied error.
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Create a PathEscapesRoot error.
    pub fn path_escapes_root(path: impl Into<String>) -> Self {
        Self::PathEscapesRoot(path.into())
    }

    /// Create an Other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Map an I/O error for `path`, keeping permission failures distinct.
    pub fn from_io(path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_string()),
            _ => Self::Io(err),
        }
    }
}

/// Probe result type.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Resolution error type.
///
/// A path that matches no application or virtual directory is not an error;
/// resolution reports it as an empty [`ResolvedLocation`](crate::ResolvedLocation).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Caller passed an unusable argument (empty logical path).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configured physical path could not be expanded or normalized.
    #[error("invalid physical path: {0}")]
    InvalidPhysicalPath(String),

    /// Classification was requested for a path that does not resolve.
    #[error("path does not resolve: {0}")]
    Unresolved(String),

    /// The storage probe failed.
    #[error("storage probe failed: {0}")]
    Probe(#[from] ProbeError),
}

impl ResolveError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an InvalidPhysicalPath error.
    pub fn invalid_physical_path(msg: impl Into<String>) -> Self {
        Self::InvalidPhysicalPath(msg.into())
    }

    /// Create an Unresolved error.
    pub fn unresolved(path: impl Into<String>) -> Self {
        Self::Unresolved(path.into())
    }
}

/// Convert ResolveError to std::io::Error for compatibility.
impl From<ResolveError> for io::Error {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::InvalidArgument(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            ResolveError::InvalidPhysicalPath(msg) => {
                io::Error::new(io::ErrorKind::InvalidInput, msg)
            }
            ResolveError::Unresolved(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            ResolveError::Probe(ProbeError::Io(e)) => e,
            ResolveError::Probe(ProbeError::PermissionDenied(msg))
            | ResolveError::Probe(ProbeError::PathEscapesRoot(msg)) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            ResolveError::Probe(ProbeError::Other(msg)) => io::Error::other(msg),
        }
    }
}

/// Resolution result type.
pub type ResolveResult<T> = Result<T, ResolveError>;
