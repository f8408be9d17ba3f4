//! Per-frame contexts handed to the application handler.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use hearth_content::{ContentError, ContentLoader, LoadContext};
use hearth_graphics::{
    CommandList, Device, DeviceProvider, GraphicsError, ResourceRegistry, SurfaceDescriptor,
};

use crate::clock::FrameClock;
use crate::pump::StopHandle;

/// Access to the device, resources, content and timing during a callback.
///
/// Everything the handler needs is reached through this context; there is
/// no global state.
pub struct FrameContext<'a> {
    pub(crate) provider: &'a mut DeviceProvider,
    pub(crate) registry: &'a mut ResourceRegistry,
    pub(crate) loader: &'a mut ContentLoader,
    pub(crate) clock: &'a FrameClock,
    pub(crate) stop: &'a StopHandle,
    pub(crate) surface: SurfaceDescriptor,
    pub(crate) step: Duration,
}

impl<'a> FrameContext<'a> {
    /// Load an asset through the content loader.
    pub fn load<T: Send + Sync + 'static>(&mut self, name: &str) -> Result<Arc<T>, ContentError> {
        let mut ctx = LoadContext::new(&mut *self.provider, &mut *self.registry);
        self.loader.load(name, &mut ctx)
    }

    /// Fetch an asset in the background; see [`ContentLoader::request`].
    pub fn request<T: Send + Sync + 'static>(&mut self, name: &str) -> Result<bool, ContentError> {
        self.loader.request::<T>(name)
    }

    /// The current device.
    pub fn device(&self) -> Result<Arc<Device>, GraphicsError> {
        self.provider.device()
    }

    /// The device provider.
    pub fn provider(&self) -> &DeviceProvider {
        &*self.provider
    }

    /// The resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &*self.registry
    }

    /// Provider and registry together, for creating resources directly.
    pub fn graphics(&mut self) -> (&mut DeviceProvider, &mut ResourceRegistry) {
        (&mut *self.provider, &mut *self.registry)
    }

    /// The content loader.
    pub fn loader(&mut self) -> &mut ContentLoader {
        &mut *self.loader
    }

    /// Time step of the current update. In draw callbacks this is the
    /// elapsed time of the frame.
    pub fn delta(&self) -> Duration {
        self.step
    }

    /// Time step of the current update in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Total time since the pump started.
    pub fn elapsed(&self) -> Duration {
        self.clock.total()
    }

    /// Number of frames the clock has advanced.
    pub fn frame_number(&self) -> u64 {
        self.clock.frame()
    }

    /// Current surface size and identity.
    pub fn surface(&self) -> SurfaceDescriptor {
        self.surface
    }

    /// Current surface width.
    pub fn width(&self) -> u32 {
        self.surface.width
    }

    /// Current surface height.
    pub fn height(&self) -> u32 {
        self.surface.height
    }

    /// Surface aspect ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface.aspect_ratio()
    }

    /// Ask the pump to stop after the current iteration.
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }
}

/// Context for recording a frame's commands.
///
/// Dereferences to [`FrameContext`] for everything else.
pub struct DrawContext<'a> {
    pub(crate) frame: FrameContext<'a>,
    pub(crate) commands: &'a mut CommandList,
    pub(crate) alpha: f32,
}

impl<'a> DrawContext<'a> {
    /// Command list submitted after this callback returns.
    pub fn commands(&mut self) -> &mut CommandList {
        &mut *self.commands
    }

    /// Interpolation factor between the last two fixed updates.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl<'a> Deref for DrawContext<'a> {
    type Target = FrameContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.frame
    }
}

impl DerefMut for DrawContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.frame
    }
}
