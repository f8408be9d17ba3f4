//! Surface descriptors.
//!
//! A [`SurfaceDescriptor`] is the only thing the graphics side knows about a
//! window: its physical size and an opaque id. Window adapters produce
//! descriptors; the [`DeviceProvider`](crate::DeviceProvider) consumes them.

/// What a surface presents into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceTarget {
    /// An on-screen window, identified by the platform window id.
    Window(u64),
    /// An off-screen image with no window behind it.
    Offscreen,
}

/// Size and identity of a presentable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceDescriptor {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Window or off-screen target.
    pub target: SurfaceTarget,
}

impl SurfaceDescriptor {
    /// Descriptor for an off-screen surface.
    pub fn offscreen(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            target: SurfaceTarget::Offscreen,
        }
    }

    /// Descriptor for a window surface.
    pub fn window(id: u64, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            target: SurfaceTarget::Window(id),
        }
    }

    /// Same target with a different size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// True when either dimension is zero (e.g. a minimized window).
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height, or 1.0 for a zero-area surface.
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_zero_area() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}
