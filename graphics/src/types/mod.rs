//! Plain descriptor types shared by the provider, the backends and the
//! resource wrappers.

mod buffer;
mod shader;
mod texture;

pub use buffer::{BufferDescriptor, BufferUsage};
pub use shader::{ShaderDescriptor, ShaderStage};
pub use texture::{TextureDescriptor, TextureFormat};
