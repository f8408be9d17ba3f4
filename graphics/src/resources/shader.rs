//! Shader module resource.

use crate::registry::ResourceHandle;
use crate::types::{ShaderDescriptor, ShaderStage};

/// A shader module created from validated source.
#[derive(Debug)]
pub struct ShaderModule {
    handle: ResourceHandle,
    descriptor: ShaderDescriptor,
}

impl ShaderModule {
    pub(crate) fn new(handle: ResourceHandle, descriptor: ShaderDescriptor) -> Self {
        Self { handle, descriptor }
    }

    /// Registry handle.
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    /// Get the shader descriptor.
    pub fn descriptor(&self) -> &ShaderDescriptor {
        &self.descriptor
    }

    /// Name of the first entry point for a stage.
    pub fn entry_point(&self, stage: ShaderStage) -> Option<&str> {
        self.descriptor
            .entry_points
            .iter()
            .find(|(_, s)| *s == stage)
            .map(|(name, _)| name.as_str())
    }

    /// Get the shader label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

static_assertions::assert_impl_all!(ShaderModule: Send, Sync);
