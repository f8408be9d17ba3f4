//! Application handler trait.

use hearth_content::LoadOutcome;

use crate::context::{DrawContext, FrameContext};
use crate::error::AppError;

/// Trait for application logic driven by the frame pump.
///
/// # Lifecycle
///
/// 1. `on_init` - Once, after the first device is created
/// 2. `on_update` - Zero or more times per frame (fixed step) or once
///    (variable step)
/// 3. `on_draw` - Once per frame, records commands
/// 4. `on_resize` - When the presentation target changes size
/// 5. `on_device_reset` - After the device was lost or replaced and a new
///    one is ready; every handle held from before is stale
/// 6. `on_shutdown` - Once, during teardown, before resources are released
///
/// Returning an error from any callback stops the pump, except
/// device-loss errors, which trigger recovery instead.
///
/// # Example
///
/// ```ignore
/// use hearth_app::{AppError, AppHandler, DrawContext, FrameContext};
/// use hearth_graphics::{ShaderModule, Texture};
///
/// struct MyApp {
///     angle: f32,
/// }
///
/// impl AppHandler for MyApp {
///     fn on_update(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
///         self.angle += ctx.delta_secs();
///         Ok(())
///     }
///
///     fn on_draw(&mut self, ctx: &mut DrawContext) -> Result<(), AppError> {
///         let shader = ctx.load::<ShaderModule>("shaders/quad.wgsl")?;
///         let texture = ctx.load::<Texture>("textures/brick.png")?;
///         ctx.commands()
///             .draw_textured(shader.handle(), texture.handle(), 6);
///         Ok(())
///     }
/// }
/// ```
pub trait AppHandler {
    /// Called once when the first device is ready.
    fn on_init(&mut self, _ctx: &mut FrameContext) -> Result<(), AppError> {
        Ok(())
    }

    /// Advance the simulation by `ctx.delta()`.
    fn on_update(&mut self, _ctx: &mut FrameContext) -> Result<(), AppError> {
        Ok(())
    }

    /// Record this frame's commands.
    fn on_draw(&mut self, ctx: &mut DrawContext) -> Result<(), AppError>;

    /// Called after the presentation target was resized.
    fn on_resize(&mut self, _ctx: &mut FrameContext) -> Result<(), AppError> {
        Ok(())
    }

    /// Called after a new device replaced a lost or incompatible one.
    ///
    /// Drop every handle and cached asset obtained before; reload lazily.
    fn on_device_reset(&mut self, _ctx: &mut FrameContext) -> Result<(), AppError> {
        Ok(())
    }

    /// Called for each finished background load.
    fn on_content_ready(
        &mut self,
        _ctx: &mut FrameContext,
        _outcome: &LoadOutcome,
    ) -> Result<(), AppError> {
        Ok(())
    }

    /// Called when the user asks to close the window.
    ///
    /// Return `false` to keep running.
    fn on_close_requested(&mut self, _ctx: &mut FrameContext) -> bool {
        true
    }

    /// Called once during teardown, before resources are released.
    fn on_shutdown(&mut self, _ctx: &mut FrameContext) {}
}

/// Handler built from an update and a draw closure.
pub struct FnHandler<U, D> {
    update: U,
    draw: D,
}

impl<U, D> FnHandler<U, D>
where
    U: FnMut(&mut FrameContext) -> Result<(), AppError>,
    D: FnMut(&mut DrawContext) -> Result<(), AppError>,
{
    /// Wrap the two closures.
    pub fn new(update: U, draw: D) -> Self {
        Self { update, draw }
    }
}

impl<U, D> AppHandler for FnHandler<U, D>
where
    U: FnMut(&mut FrameContext) -> Result<(), AppError>,
    D: FnMut(&mut DrawContext) -> Result<(), AppError>,
{
    fn on_update(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        (self.update)(ctx)
    }

    fn on_draw(&mut self, ctx: &mut DrawContext) -> Result<(), AppError> {
        (self.draw)(ctx)
    }
}
