//! # Hearth Graphics
//!
//! Device and resource lifecycle for the Hearth rendering host.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`DeviceProvider`] - Creates the device and presentation target for a
//!   surface and reports device loss as a [`PresentStatus`]
//! - [`ResourceRegistry`] - Owns every device-dependent resource and tears
//!   them down in reverse registration order
//! - [`GpuBackend`] - Trait for graphics backend implementations
//! - [`DummyBackend`] - Headless backend with fault injection for testing
//!
//! ## Example
//!
//! ```ignore
//! use hearth_graphics::{DeviceProvider, ProviderConfig, ResourceRegistry, SurfaceDescriptor};
//!
//! let backend = hearth_graphics::create_backend(BackendType::Auto)?;
//! let mut provider = DeviceProvider::new(backend, ProviderConfig::default());
//! let mut registry = ResourceRegistry::attached(provider.epoch());
//!
//! provider.initialize(&SurfaceDescriptor::offscreen(800, 600))?;
//! ```

pub mod backend;
pub mod commands;
pub mod device;
pub mod error;
pub mod provider;
pub mod registry;
pub mod resources;
pub mod surface;
pub mod swapchain;
pub mod types;

// Re-export main types for convenience
pub use backend::{AdapterInfo, BackendType, GpuBackend, create_backend};
#[cfg(feature = "dummy")]
pub use backend::{BackendEvent, DummyBackend, DummyConfig};
pub use commands::{Command, CommandList};
pub use device::{Device, DeviceCapabilities, FeatureTier};
pub use error::GraphicsError;
pub use provider::{DeviceProvider, ProviderConfig, ProviderState, SurfaceChange};
pub use registry::{DeviceEpoch, ReleaseFn, ResourceHandle, ResourceId, ResourceKind, ResourceRegistry};
pub use resources::{Buffer, ShaderModule, Texture};
pub use surface::{SurfaceDescriptor, SurfaceTarget};
pub use swapchain::{PresentMode, PresentStatus, PresentationTarget, TargetConfiguration};
pub use types::{
    BufferDescriptor, BufferUsage, ShaderDescriptor, ShaderStage, TextureDescriptor,
    TextureFormat,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    log::info!("Hearth Graphics v{} initialized", VERSION);
}
