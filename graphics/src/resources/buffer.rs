//! GPU buffer resource.

use crate::registry::ResourceHandle;
use crate::types::{BufferDescriptor, BufferUsage};

/// A GPU buffer resource.
#[derive(Debug)]
pub struct Buffer {
    handle: ResourceHandle,
    descriptor: BufferDescriptor,
}

impl Buffer {
    pub(crate) fn new(handle: ResourceHandle, descriptor: BufferDescriptor) -> Self {
        Self { handle, descriptor }
    }

    /// Registry handle.
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    /// Get the buffer descriptor.
    pub fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    /// Get the buffer size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    /// Get the buffer usage.
    pub fn usage(&self) -> BufferUsage {
        self.descriptor.usage
    }

    /// Get the buffer label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

static_assertions::assert_impl_all!(Buffer: Send, Sync);
