//! Asset readers.
//!
//! An [`AssetReader`] turns the raw bytes of one asset into a GPU-backed
//! object. Readers run on the main thread with a [`LoadContext`], which
//! gives them the provider to create resources and the registry that will
//! own them.
//!
//! Built-in readers:
//! - [`TextureReader`] - PNG/JPEG images into a [`Texture`] (feature `texture`)
//! - [`ShaderReader`] - WGSL source into a [`ShaderModule`] (feature `wgsl`)
//! - [`BlobReader`] - Raw bytes into a [`Buffer`]

use std::any::Any;
use std::sync::Arc;

use hearth_graphics::{
    Buffer, BufferDescriptor, BufferUsage, DeviceProvider, ResourceRegistry,
};
#[cfg(feature = "wgsl")]
use hearth_graphics::{ShaderDescriptor, ShaderModule, ShaderStage};
#[cfg(feature = "texture")]
use hearth_graphics::{Texture, TextureDescriptor, TextureFormat};

use crate::error::ContentError;

/// Access to the device for readers creating resources.
pub struct LoadContext<'a> {
    /// Provider used to create resources.
    pub provider: &'a mut DeviceProvider,
    /// Registry that takes ownership of created resources.
    pub registry: &'a mut ResourceRegistry,
}

impl<'a> LoadContext<'a> {
    /// Bundle a provider and registry.
    pub fn new(provider: &'a mut DeviceProvider, registry: &'a mut ResourceRegistry) -> Self {
        Self { provider, registry }
    }
}

/// Converts asset bytes into a typed asset.
pub trait AssetReader: Send + Sync + 'static {
    /// The asset type produced; `load::<Self::Asset>` dispatches here.
    type Asset: Send + Sync + 'static;

    /// Decode `bytes` and create the asset.
    ///
    /// Decode failures must be reported as [`ContentError::AssetFormat`].
    fn read(
        &self,
        name: &str,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, ContentError>;
}

pub(crate) type AnyAsset = Arc<dyn Any + Send + Sync>;

/// Object-safe view of an [`AssetReader`].
pub(crate) trait ErasedReader: Send + Sync {
    fn read_erased(
        &self,
        name: &str,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<AnyAsset, ContentError>;
}

impl<R: AssetReader> ErasedReader for R {
    fn read_erased(
        &self,
        name: &str,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<AnyAsset, ContentError> {
        let asset = self.read(name, bytes, ctx)?;
        Ok(Arc::new(asset))
    }
}

// ============================================================================
// Textures
// ============================================================================

/// Decodes PNG and JPEG images into sRGB RGBA textures.
#[cfg(feature = "texture")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureReader;

#[cfg(feature = "texture")]
impl AssetReader for TextureReader {
    type Asset = Texture;

    fn read(
        &self,
        name: &str,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<Texture, ContentError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| ContentError::format(name, e.to_string()))?;
        let rgba = image.to_rgba8();
        let descriptor =
            TextureDescriptor::new_2d(rgba.width(), rgba.height(), TextureFormat::Rgba8UnormSrgb)
                .with_label(name);

        log::debug!(
            "TextureReader: decoded '{}' ({}x{})",
            name,
            rgba.width(),
            rgba.height()
        );
        Ok(ctx
            .provider
            .create_texture(ctx.registry, &descriptor, Some(rgba.as_raw()))?)
    }
}

// ============================================================================
// Shaders
// ============================================================================

/// Parses and validates WGSL, then creates a shader module.
#[cfg(feature = "wgsl")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderReader;

#[cfg(feature = "wgsl")]
impl AssetReader for ShaderReader {
    type Asset = ShaderModule;

    fn read(
        &self,
        name: &str,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<ShaderModule, ContentError> {
        use naga::valid::{Capabilities, ValidationFlags, Validator};

        let source = std::str::from_utf8(bytes)
            .map_err(|e| ContentError::format(name, format!("not UTF-8: {e}")))?;

        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| ContentError::format(name, e.emit_to_string(source)))?;
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| ContentError::format(name, e.emit_to_string(source)))?;

        if module.entry_points.is_empty() {
            return Err(ContentError::format(name, "module declares no entry points"));
        }

        let mut descriptor = ShaderDescriptor::new(source).with_label(name);
        for entry in &module.entry_points {
            let stage = match entry.stage {
                naga::ShaderStage::Vertex => ShaderStage::Vertex,
                naga::ShaderStage::Fragment => ShaderStage::Fragment,
                naga::ShaderStage::Compute => ShaderStage::Compute,
            };
            descriptor = descriptor.with_entry_point(entry.name.clone(), stage);
        }

        Ok(ctx
            .provider
            .create_shader_module(ctx.registry, &descriptor)?)
    }
}

// ============================================================================
// Raw data
// ============================================================================

/// Uploads raw bytes into a buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobReader {
    usage: BufferUsage,
}

impl BlobReader {
    /// Reader creating buffers with the given usage.
    pub fn new(usage: BufferUsage) -> Self {
        Self { usage }
    }
}

impl AssetReader for BlobReader {
    type Asset = Buffer;

    fn read(
        &self,
        name: &str,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<Buffer, ContentError> {
        if bytes.is_empty() {
            return Err(ContentError::format(name, "empty blob"));
        }
        let descriptor = BufferDescriptor::new(bytes.len() as u64, self.usage).with_label(name);
        Ok(ctx
            .provider
            .create_buffer(ctx.registry, &descriptor, Some(bytes))?)
    }
}
