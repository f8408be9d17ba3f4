//! Graphics error types.

use thiserror::Error;

use crate::registry::ResourceId;

/// Errors that can occur in the graphics system.
///
/// Device loss observed while presenting or submitting is reported as a
/// [`PresentStatus`](crate::PresentStatus), not through this type. The
/// [`DeviceLost`](GraphicsError::DeviceLost) variant is returned when code
/// tries to *use* the device while the provider is in the lost state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// No usable device could be created for the surface.
    #[error("device creation failed: {0}")]
    DeviceCreation(String),
    /// The device is lost and must be re-initialized before use.
    #[error("GPU device lost")]
    DeviceLost,
    /// A resource from an older device generation was used.
    #[error(
        "resource {id} is stale (created on device generation {resource_generation}, current generation is {device_generation})"
    )]
    ResourceStale {
        /// Registry id of the resource.
        id: ResourceId,
        /// Generation the resource was created on.
        resource_generation: u64,
        /// Generation of the current device.
        device_generation: u64,
    },
    /// The resource has already been released.
    #[error("resource {0} has been released")]
    ResourceReleased(ResourceId),
    /// A resource could not be created on the device.
    #[error("resource creation failed: {0}")]
    ResourceCreation(String),
    /// An initialization step failed after the device was created.
    #[error("initialization step '{step}' failed: {reason}")]
    InitStep {
        /// Name the step was registered under.
        step: String,
        /// Failure reported by the step.
        reason: String,
    },
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The operation is not valid in the provider's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl GraphicsError {
    /// Whether this error means the device must be recreated.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Self::DeviceLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphicsError::DeviceLost;
        assert_eq!(err.to_string(), "GPU device lost");

        let err = GraphicsError::DeviceCreation("no adapter".to_string());
        assert_eq!(err.to_string(), "device creation failed: no adapter");
    }

    #[test]
    fn test_stale_display_names_generations() {
        let err = GraphicsError::ResourceStale {
            id: ResourceId::new(7),
            resource_generation: 1,
            device_generation: 2,
        };
        let text = err.to_string();
        assert!(text.contains("#7"));
        assert!(text.contains("generation 1"));
        assert!(text.contains("generation is 2"));
    }
}
