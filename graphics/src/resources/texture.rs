//! GPU texture resource.

use crate::registry::ResourceHandle;
use crate::types::{TextureDescriptor, TextureFormat};

/// A GPU texture resource.
///
/// Textures are created by [`DeviceProvider::create_texture`](crate::DeviceProvider::create_texture)
/// and owned by the registry through their [`handle`](Self::handle).
///
/// # Example
///
/// ```ignore
/// let texture = provider.create_texture(
///     &mut registry,
///     &TextureDescriptor::new_2d(256, 256, TextureFormat::Rgba8UnormSrgb),
///     Some(&pixels),
/// )?;
/// println!("Texture size: {}x{}", texture.width(), texture.height());
/// ```
pub struct Texture {
    handle: ResourceHandle,
    descriptor: TextureDescriptor,
}

impl Texture {
    pub(crate) fn new(handle: ResourceHandle, descriptor: TextureDescriptor) -> Self {
        Self { handle, descriptor }
    }

    /// Registry handle.
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    /// Device generation the texture lives on.
    pub fn generation(&self) -> u64 {
        self.handle.generation()
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Get the texture width.
    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    /// Get the texture height.
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// Get the texture label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("handle", &self.handle)
            .field("size", &(self.descriptor.width, self.descriptor.height))
            .field("format", &self.descriptor.format)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Ensure Texture is Send + Sync
static_assertions::assert_impl_all!(Texture: Send, Sync);
