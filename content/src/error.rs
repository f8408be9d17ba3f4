//! Content error types.

use hearth_graphics::GraphicsError;
use thiserror::Error;

/// Errors from the asset store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested path was not found in the source.
    #[error("not found: {0}")]
    NotFound(String),
    /// An IO error occurred while accessing a source.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),
    /// The path is invalid (empty, contains `..`, or other normalization failure).
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// No source is mounted under the given name and there is no default.
    #[error("no such source: {0}")]
    NoSuchSource(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound(err.to_string())
        } else {
            StoreError::Io(err)
        }
    }
}

/// Errors from loading content.
///
/// A failed load never yields a placeholder object: callers always get
/// either the asset or one of these.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The store has no asset under this name.
    #[error("asset not found: {name}")]
    AssetNotFound {
        /// Requested asset name.
        name: String,
    },
    /// The bytes were found but could not be decoded.
    #[error("asset '{name}' has an invalid format: {reason}")]
    AssetFormat {
        /// Requested asset name.
        name: String,
        /// Decoder message.
        reason: String,
    },
    /// The asset name could not be normalized.
    #[error("invalid asset name '{name}': {reason}")]
    InvalidName {
        /// Requested asset name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// No reader is registered for the requested asset type.
    #[error("no reader registered for {type_name}")]
    NoReader {
        /// Rust type name of the requested asset.
        type_name: &'static str,
    },
    /// Reading from the store failed for a reason other than absence.
    #[error("asset store error: {0}")]
    Store(#[source] StoreError),
    /// Creating the GPU resource failed.
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}

impl ContentError {
    /// Map a store error for `name`, separating absence from other failures.
    pub(crate) fn from_store(name: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) | StoreError::NoSuchSource(_) => ContentError::AssetNotFound {
                name: name.to_string(),
            },
            StoreError::InvalidPath(reason) => ContentError::InvalidName {
                name: name.to_string(),
                reason,
            },
            other => ContentError::Store(other),
        }
    }

    /// Shorthand for a format error.
    pub fn format(name: &str, reason: impl Into<String>) -> Self {
        ContentError::AssetFormat {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by device loss.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, ContentError::Graphics(GraphicsError::DeviceLost))
    }
}
