//! Recorded draw commands.
//!
//! Draw callbacks record into a [`CommandList`]; the provider validates every
//! referenced resource against the registry before the backend sees it.

use crate::registry::ResourceHandle;

/// A single recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Clear the back-buffer to a color.
    Clear([f32; 4]),
    /// Draw `vertex_count` vertices with a shader and optional bindings.
    Draw {
        /// Shader module handle.
        shader: ResourceHandle,
        /// Bound texture, if any.
        texture: Option<ResourceHandle>,
        /// Bound vertex buffer, if any.
        vertex_buffer: Option<ResourceHandle>,
        /// Number of vertices.
        vertex_count: u32,
    },
}

/// Ordered list of commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    /// Create an empty command list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clear.
    pub fn clear(&mut self, color: [f32; 4]) -> &mut Self {
        self.commands.push(Command::Clear(color));
        self
    }

    /// Record a draw with only a shader bound.
    pub fn draw(&mut self, shader: ResourceHandle, vertex_count: u32) -> &mut Self {
        self.commands.push(Command::Draw {
            shader,
            texture: None,
            vertex_buffer: None,
            vertex_count,
        });
        self
    }

    /// Record a textured draw.
    pub fn draw_textured(
        &mut self,
        shader: ResourceHandle,
        texture: ResourceHandle,
        vertex_count: u32,
    ) -> &mut Self {
        self.commands.push(Command::Draw {
            shader,
            texture: Some(texture),
            vertex_buffer: None,
            vertex_count,
        });
        self
    }

    /// Record a draw sourcing vertices from a buffer.
    pub fn draw_buffer(
        &mut self,
        shader: ResourceHandle,
        vertex_buffer: ResourceHandle,
        vertex_count: u32,
    ) -> &mut Self {
        self.commands.push(Command::Draw {
            shader,
            texture: None,
            vertex_buffer: Some(vertex_buffer),
            vertex_count,
        });
        self
    }

    /// Recorded commands, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every resource handle referenced by the list.
    pub fn referenced_handles(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.commands.iter().flat_map(|command| {
            let handles: [Option<ResourceHandle>; 3] = match command {
                Command::Clear(_) => [None, None, None],
                Command::Draw {
                    shader,
                    texture,
                    vertex_buffer,
                    ..
                } => [Some(*shader), *texture, *vertex_buffer],
            };
            handles.into_iter().flatten()
        })
    }
}
