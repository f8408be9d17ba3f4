//! Host error types.

use hearth_content::ContentError;
use hearth_graphics::GraphicsError;
use thiserror::Error;

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No suitable device could be created.
    DeviceCreation,
    /// The device was lost and could not be recovered.
    DeviceLost,
    /// A named asset does not exist.
    AssetNotFound,
    /// A named asset exists but could not be decoded.
    AssetFormat,
    /// A resource from an older device generation, or an already released
    /// one, was used.
    ResourceStale,
    /// Invalid configuration or arguments.
    InvalidInput,
    /// The window system failed.
    Window,
    /// Anything else.
    Other,
}

/// Errors surfaced by the frame pump and the application runner.
#[derive(Debug, Error)]
pub enum AppError {
    /// Device or resource failure.
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    /// Asset loading failure.
    #[error(transparent)]
    Content(#[from] ContentError),
    /// The device kept being lost past the retry budget.
    #[error("device lost {attempts} times without a successful present")]
    DeviceLostRetriesExhausted {
        /// Recovery attempts made before giving up.
        attempts: u32,
    },
    /// Window creation or event handling failed.
    #[error("window error: {0}")]
    Window(String),
    /// Invalid pump or application configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Failure raised by application code.
    #[error("{0}")]
    Handler(String),
}

impl AppError {
    /// Error raised from handler code.
    pub fn handler(message: impl Into<String>) -> Self {
        AppError::Handler(message.into())
    }

    /// Coarse error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Graphics(err) => graphics_kind(err),
            AppError::Content(err) => match err {
                ContentError::AssetNotFound { .. } => ErrorKind::AssetNotFound,
                ContentError::AssetFormat { .. } => ErrorKind::AssetFormat,
                ContentError::InvalidName { .. } => ErrorKind::InvalidInput,
                ContentError::Graphics(err) => graphics_kind(err),
                ContentError::NoReader { .. } | ContentError::Store(_) => ErrorKind::Other,
            },
            AppError::DeviceLostRetriesExhausted { .. } => ErrorKind::DeviceLost,
            AppError::Window(_) => ErrorKind::Window,
            AppError::Config(_) => ErrorKind::InvalidInput,
            AppError::Handler(_) => ErrorKind::Other,
        }
    }

    /// Whether this is a recoverable device loss reported by a device call.
    ///
    /// [`AppError::DeviceLostRetriesExhausted`] is not recoverable.
    pub fn is_device_lost(&self) -> bool {
        match self {
            AppError::Graphics(err) => err.is_device_lost(),
            AppError::Content(err) => err.is_device_lost(),
            _ => false,
        }
    }
}

fn graphics_kind(err: &GraphicsError) -> ErrorKind {
    match err {
        GraphicsError::DeviceCreation(_) | GraphicsError::InitStep { .. } => {
            ErrorKind::DeviceCreation
        }
        GraphicsError::DeviceLost => ErrorKind::DeviceLost,
        GraphicsError::ResourceStale { .. } | GraphicsError::ResourceReleased(_) => {
            ErrorKind::ResourceStale
        }
        GraphicsError::InvalidParameter(_) => ErrorKind::InvalidInput,
        GraphicsError::ResourceCreation(_) | GraphicsError::InvalidState(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            AppError::from(GraphicsError::DeviceCreation("none".into())).kind(),
            ErrorKind::DeviceCreation
        );
        assert_eq!(
            AppError::from(ContentError::format("a.png", "bad header")).kind(),
            ErrorKind::AssetFormat
        );
        assert_eq!(
            AppError::from(ContentError::Graphics(GraphicsError::DeviceLost)).kind(),
            ErrorKind::DeviceLost
        );
        assert_eq!(
            AppError::DeviceLostRetriesExhausted { attempts: 3 }.kind(),
            ErrorKind::DeviceLost
        );
    }

    #[test]
    fn test_retries_exhausted_is_not_recoverable() {
        assert!(AppError::from(GraphicsError::DeviceLost).is_device_lost());
        assert!(!AppError::DeviceLostRetriesExhausted { attempts: 3 }.is_device_lost());
        assert!(!AppError::handler("boom").is_device_lost());
    }
}
