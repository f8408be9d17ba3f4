//! GPU resources.
//!
//! This module contains the GPU resource types created through the
//! [`DeviceProvider`](crate::DeviceProvider):
//! - [`Buffer`] - GPU memory buffer
//! - [`Texture`] - GPU texture/image
//! - [`ShaderModule`] - Validated shader module
//!
//! A resource object is only a description plus a [`ResourceHandle`]. The
//! backing memory is owned by the [`ResourceRegistry`], which frees it when
//! the handle is released. Dropping the object itself frees nothing.
//!
//! [`ResourceHandle`]: crate::ResourceHandle
//! [`ResourceRegistry`]: crate::ResourceRegistry

mod buffer;
mod shader;
mod texture;

pub use buffer::Buffer;
pub use shader::ShaderModule;
pub use texture::Texture;
