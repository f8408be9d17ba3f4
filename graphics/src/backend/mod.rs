//! GPU backend abstraction layer.
//!
//! This module provides a trait-based abstraction for GPU backends,
//! allowing the provider and registry to work with different GPU APIs.
//!
//! # Available Backends
//!
//! - `dummy` (default): Headless backend with fault injection, used by tests,
//!   CI and `--headless` runs
//!
//! # Architecture
//!
//! Each backend implements the [`GpuBackend`] trait, which provides:
//! - Device creation and destruction for a surface
//! - Presentation target configuration
//! - Resource creation (buffers, textures, shader modules)
//! - Command submission and presentation, reporting device loss as a status

#[cfg(feature = "dummy")]
pub mod dummy;

use std::fmt;
use std::sync::Arc;

use crate::commands::CommandList;
use crate::device::DeviceCapabilities;
use crate::error::GraphicsError;
use crate::surface::SurfaceDescriptor;
use crate::swapchain::{PresentStatus, TargetConfiguration};
use crate::types::{BufferDescriptor, ShaderDescriptor, TextureDescriptor};

#[cfg(feature = "dummy")]
pub use dummy::{BackendEvent, DummyBackend, DummyConfig};

/// Backend-side identifier of a created device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendDeviceId(pub(crate) u64);

/// Backend-side identifier of a created resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuResourceId(pub(crate) u64);

/// Information about the adapter a device was created on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    /// Adapter name.
    pub name: String,
    /// What the device can do.
    pub capabilities: DeviceCapabilities,
}

/// Graphics backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendType {
    /// Pick the best backend compiled in.
    #[default]
    Auto,
    /// Headless backend without GPU access.
    Dummy,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Dummy => write!(f, "dummy"),
        }
    }
}

/// Interface every GPU backend implements.
///
/// Backends are shared between the provider and the release callbacks the
/// registry holds, so they use interior mutability and must be `Send + Sync`.
///
/// Loss is reported by [`submit`](Self::submit) and [`present`](Self::present)
/// as [`PresentStatus::DeviceLost`]. Creation calls on a lost device return
/// [`GraphicsError::DeviceLost`].
pub trait GpuBackend: Send + Sync + fmt::Debug {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Create a device able to present into `surface`.
    fn create_device(
        &self,
        surface: &SurfaceDescriptor,
    ) -> Result<(BackendDeviceId, AdapterInfo), GraphicsError>;

    /// Destroy a device together with every resource still alive on it.
    fn destroy_device(&self, device: BackendDeviceId);

    /// (Re)configure the device's presentation target.
    fn configure_target(
        &self,
        device: BackendDeviceId,
        config: &TargetConfiguration,
    ) -> Result<(), GraphicsError>;

    /// Whether `device` cannot serve `surface` and must be recreated.
    fn requires_device_recreation(
        &self,
        device: BackendDeviceId,
        surface: &SurfaceDescriptor,
    ) -> bool;

    /// Create a buffer, optionally initialized with `data`.
    fn create_buffer(
        &self,
        device: BackendDeviceId,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<GpuResourceId, GraphicsError>;

    /// Create a 2D texture, optionally initialized with tightly packed `data`.
    fn create_texture(
        &self,
        device: BackendDeviceId,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<GpuResourceId, GraphicsError>;

    /// Create a shader module from validated source.
    fn create_shader_module(
        &self,
        device: BackendDeviceId,
        descriptor: &ShaderDescriptor,
    ) -> Result<GpuResourceId, GraphicsError>;

    /// Destroy a resource. Unknown ids are ignored.
    fn destroy_resource(&self, device: BackendDeviceId, resource: GpuResourceId);

    /// Execute recorded commands.
    fn submit(&self, device: BackendDeviceId, commands: &CommandList) -> PresentStatus;

    /// Present the current back-buffer.
    fn present(&self, device: BackendDeviceId) -> PresentStatus;

    /// Force the device into the lost state, for testing recovery paths.
    ///
    /// Backends that cannot do this log a warning and do nothing.
    fn simulate_device_loss(&self) {
        log::warn!("{}: simulated device loss is not supported", self.name());
    }
}

/// Create a backend of the requested type.
///
/// # Errors
///
/// Returns [`GraphicsError::DeviceCreation`] if the requested backend was
/// not compiled in.
pub fn create_backend(backend: BackendType) -> Result<Arc<dyn GpuBackend>, GraphicsError> {
    match backend {
        #[cfg(feature = "dummy")]
        BackendType::Auto | BackendType::Dummy => Ok(Arc::new(DummyBackend::new())),
        #[allow(unreachable_patterns)]
        other => Err(GraphicsError::DeviceCreation(format!(
            "backend '{other}' is not available in this build"
        ))),
    }
}
