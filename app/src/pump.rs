//! The frame pump.
//!
//! One logical thread runs every iteration in strict order:
//!
//! 1. Pump platform events (resizes are coalesced, latest wins)
//! 2. Stop if cancellation was requested
//! 3. Recover the device if it is lost
//! 4. Finish background loads
//! 5. Update, zero or more times
//! 6. Draw, submit and present once
//!
//! Teardown always runs when the loop ends, whatever the reason: the
//! handler's `on_shutdown`, then `release_all` on the registry, then
//! `dispose` on the provider. The registry follows the provider's device
//! epoch, so resources of a device that was already destroyed are dropped
//! without calling into the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hearth_content::{ContentLoader, LoadContext};
use hearth_graphics::{
    CommandList, DeviceProvider, GraphicsError, PresentStatus, ResourceRegistry, SurfaceChange,
    SurfaceDescriptor,
};

use crate::clock::{FrameClock, RealTimeSource, StepMode, TimeSource};
use crate::context::{DrawContext, FrameContext};
use crate::error::AppError;
use crate::handler::{AppHandler, FnHandler};
use crate::surface::{SurfaceAdapter, SurfaceEvent};

// ============================================================================
// Configuration
// ============================================================================

/// Frame pump configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpConfig {
    /// Fixed-step updates (`true`) or one variable update per frame.
    pub fixed_timestep: bool,
    /// Update step in fixed mode.
    pub target_step: Duration,
    /// Maximum updates per frame in fixed mode; older backlog is dropped.
    pub max_catchup_steps: u32,
    /// Consecutive recovery attempts allowed without a successful present.
    pub device_lost_retries: u32,
    /// Stop after this many presented frames.
    pub max_frames: Option<u64>,
    /// Color the command list is cleared to at the start of each frame.
    pub clear_color: [f32; 4],
    /// Ask the backend to lose its device after every N-th presented frame.
    pub simulate_device_loss_every: Option<u64>,
    /// How long to wait for events while there is nothing to draw.
    pub idle_wait: Duration,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: true,
            target_step: Duration::from_secs_f64(1.0 / 60.0),
            max_catchup_steps: 10,
            device_lost_retries: 3,
            max_frames: None,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            simulate_device_loss_every: None,
            idle_wait: Duration::from_millis(16),
        }
    }
}

impl PumpConfig {
    /// Use fixed steps of `step`.
    pub fn with_fixed_step(mut self, step: Duration) -> Self {
        self.fixed_timestep = true;
        self.target_step = step;
        self
    }

    /// Use fixed steps at `hz` updates per second.
    pub fn with_step_hz(self, hz: f64) -> Self {
        self.with_fixed_step(Duration::from_secs_f64(1.0 / hz))
    }

    /// Use one variable-length update per frame.
    pub fn with_variable_step(mut self) -> Self {
        self.fixed_timestep = false;
        self
    }

    /// Set the catch-up cap.
    pub fn with_max_catchup_steps(mut self, steps: u32) -> Self {
        self.max_catchup_steps = steps;
        self
    }

    /// Set the device-loss retry budget.
    pub fn with_device_lost_retries(mut self, retries: u32) -> Self {
        self.device_lost_retries = retries;
        self
    }

    /// Stop after `frames` presented frames.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Set the clear color.
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Lose the device after every `frames` presented frames.
    pub fn with_simulated_device_loss(mut self, frames: u64) -> Self {
        self.simulate_device_loss_every = Some(frames);
        self
    }

    /// Set the idle wait.
    pub fn with_idle_wait(mut self, wait: Duration) -> Self {
        self.idle_wait = wait;
        self
    }

    /// Check the configuration for values the pump cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.fixed_timestep && self.target_step.is_zero() {
            return Err(AppError::Config("fixed step must be non-zero".into()));
        }
        if self.max_catchup_steps == 0 {
            return Err(AppError::Config("max_catchup_steps must be at least 1".into()));
        }
        if self.simulate_device_loss_every == Some(0) {
            return Err(AppError::Config(
                "simulated device loss interval must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn step_mode(&self) -> StepMode {
        if self.fixed_timestep {
            StepMode::Fixed(self.target_step)
        } else {
            StepMode::Variable
        }
    }
}

// ============================================================================
// Stop handle and summary
// ============================================================================

/// Cloneable flag that stops the pump at the next iteration.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// New, unset handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the pump to stop.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

static_assertions::assert_impl_all!(StopHandle: Send, Sync);

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames presented.
    pub frames: u64,
    /// Update callbacks run.
    pub updates: u64,
    /// Times a new device replaced a lost or incompatible one.
    pub device_resets: u64,
    /// Iterations without Draw/Present (minimized, surface unavailable or
    /// device lost).
    pub skipped_frames: u64,
    /// Time accounted by the frame clock.
    pub total_time: Duration,
}

// ============================================================================
// Frame pump
// ============================================================================

/// Drives update, draw and present, and owns the device's resources.
pub struct FramePump {
    config: PumpConfig,
    provider: DeviceProvider,
    registry: ResourceRegistry,
    loader: ContentLoader,
    clock: FrameClock,
    time: Box<dyn TimeSource>,
    stop: StopHandle,
    commands: CommandList,
    surface: SurfaceDescriptor,
    surface_available: bool,
    loss_streak: u32,
    handler_initialized: bool,
    summary: RunSummary,
}

/// How an iteration ended.
enum Frame {
    Presented,
    Skipped,
    Stop,
}

impl FramePump {
    /// Create a pump over an uninitialized provider.
    pub fn new(config: PumpConfig, provider: DeviceProvider, loader: ContentLoader) -> Self {
        let clock = FrameClock::new(config.step_mode(), config.max_catchup_steps);
        let registry = ResourceRegistry::attached(provider.epoch());
        Self {
            config,
            provider,
            registry,
            loader,
            clock,
            time: Box::new(RealTimeSource::new()),
            stop: StopHandle::new(),
            commands: CommandList::new(),
            surface: SurfaceDescriptor::offscreen(0, 0),
            surface_available: true,
            loss_streak: 0,
            handler_initialized: false,
            summary: RunSummary::default(),
        }
    }

    /// Replace the wall clock, e.g. with a
    /// [`ManualTimeSource`](crate::clock::ManualTimeSource).
    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Box::new(time);
        self
    }

    /// Handle that stops the pump from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The configuration.
    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// The device provider.
    pub fn provider_mut(&mut self) -> &mut DeviceProvider {
        &mut self.provider
    }

    /// Run until stopped, then tear down.
    ///
    /// # Errors
    ///
    /// The first non-recoverable error from the handler, the device or the
    /// surface, returned after teardown has completed.
    pub fn run<H, S>(mut self, handler: &mut H, surface: &mut S) -> Result<RunSummary, AppError>
    where
        H: AppHandler + ?Sized,
        S: SurfaceAdapter + ?Sized,
    {
        self.config.validate()?;
        self.surface = surface.current_descriptor();
        self.surface_available = surface.is_available();
        log::info!(
            "FramePump: starting ({}, {}x{})",
            match self.clock.mode() {
                StepMode::Fixed(step) => format!("fixed step {step:?}"),
                StepMode::Variable => "variable step".to_string(),
            },
            self.surface.width,
            self.surface.height
        );

        let result = self.run_loop(handler, surface);
        if let Err(err) = &result {
            log::error!("FramePump: stopping on error: {}", err);
        }
        self.teardown(handler);

        self.summary.total_time = self.clock.total();
        log::info!(
            "FramePump: finished ({} frames, {} updates, {} device resets)",
            self.summary.frames,
            self.summary.updates,
            self.summary.device_resets
        );
        result.map(|()| self.summary)
    }

    fn run_loop<H, S>(&mut self, handler: &mut H, surface: &mut S) -> Result<(), AppError>
    where
        H: AppHandler + ?Sized,
        S: SurfaceAdapter + ?Sized,
    {
        let mut idle = false;
        loop {
            let wait = if idle {
                self.config.idle_wait
            } else {
                Duration::ZERO
            };
            let events = surface.pump_events(wait)?;
            self.handle_events(handler, events)?;

            if self.stop.is_stop_requested() {
                log::info!("FramePump: stop requested");
                return Ok(());
            }

            match self.frame(handler)? {
                Frame::Presented => {
                    idle = false;
                    if let Some(max) = self.config.max_frames
                        && self.summary.frames >= max
                    {
                        log::info!("FramePump: reached max frames limit ({})", max);
                        return Ok(());
                    }
                }
                Frame::Skipped => {
                    idle = true;
                    self.summary.skipped_frames += 1;
                }
                Frame::Stop => return Ok(()),
            }
        }
    }

    fn handle_events<H>(&mut self, handler: &mut H, events: Vec<SurfaceEvent>) -> Result<(), AppError>
    where
        H: AppHandler + ?Sized,
    {
        let mut resized = None;
        for event in events {
            match event {
                SurfaceEvent::Resized(descriptor) => resized = Some(descriptor),
                SurfaceEvent::SurfaceDestroyed => {
                    log::warn!("FramePump: surface destroyed");
                    self.surface_available = false;
                    self.provider.mark_lost("surface destroyed");
                }
                SurfaceEvent::SurfaceRestored => {
                    log::info!("FramePump: surface restored");
                    self.surface_available = true;
                }
                SurfaceEvent::CloseRequested => {
                    let close = handler.on_close_requested(&mut self.frame_context(Duration::ZERO));
                    if close {
                        self.stop.request_stop();
                    } else {
                        log::info!("FramePump: close request declined by handler");
                    }
                }
            }
        }

        if let Some(descriptor) = resized {
            self.apply_resize(handler, descriptor)?;
        }
        Ok(())
    }

    fn apply_resize<H>(&mut self, handler: &mut H, descriptor: SurfaceDescriptor) -> Result<(), AppError>
    where
        H: AppHandler + ?Sized,
    {
        self.surface = descriptor;
        if descriptor.is_zero_area() {
            log::debug!("FramePump: surface minimized");
            return Ok(());
        }
        if !self.provider.is_ready() {
            // Picked up by the next recovery.
            return Ok(());
        }

        match self.provider.on_surface_changed(&descriptor) {
            Ok(SurfaceChange::Unchanged) => Ok(()),
            Ok(SurfaceChange::TargetReplaced) => {
                let result = handler.on_resize(&mut self.frame_context(Duration::ZERO));
                self.guard(result)
            }
            Ok(SurfaceChange::DeviceRecreated { generation }) => {
                self.device_replaced(generation);
                let result = handler.on_device_reset(&mut self.frame_context(Duration::ZERO));
                self.guard(result)?;
                let result = handler.on_resize(&mut self.frame_context(Duration::ZERO));
                self.guard(result)
            }
            Err(_) if self.provider.is_lost() => {
                log::warn!("FramePump: device lost while resizing");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn frame<H>(&mut self, handler: &mut H) -> Result<Frame, AppError>
    where
        H: AppHandler + ?Sized,
    {
        if !self.surface_available || self.surface.is_zero_area() {
            return Ok(Frame::Skipped);
        }
        if !self.provider.is_ready() && !self.recover(handler)? {
            return Ok(Frame::Skipped);
        }

        self.poll_content(handler)?;

        let plan = self.clock.advance(self.time.delta());
        for _ in 0..plan.updates {
            let result = handler.on_update(&mut self.frame_context(plan.step));
            self.summary.updates += 1;
            self.guard(result)?;
            if !self.provider.is_ready() {
                return Ok(Frame::Skipped);
            }
            if self.stop.is_stop_requested() {
                return Ok(Frame::Stop);
            }
        }

        self.commands = CommandList::new();
        self.commands.clear(self.config.clear_color);
        let result = handler.on_draw(&mut self.draw_context(plan.alpha));
        self.guard(result)?;
        if !self.provider.is_ready() {
            return Ok(Frame::Skipped);
        }

        if self.provider.submit(&self.commands, &self.registry)? == PresentStatus::DeviceLost {
            log::warn!("FramePump: device lost during submit");
            return Ok(Frame::Skipped);
        }
        match self.provider.present()? {
            PresentStatus::Presented => {}
            PresentStatus::DeviceLost => {
                log::warn!("FramePump: device lost during present");
                return Ok(Frame::Skipped);
            }
        }

        self.loss_streak = 0;
        self.summary.frames += 1;

        if let Some(every) = self.config.simulate_device_loss_every
            && self.summary.frames % every == 0
        {
            log::warn!(
                "FramePump: simulating device loss after frame {}",
                self.summary.frames
            );
            self.provider.backend().simulate_device_loss();
        }
        Ok(Frame::Presented)
    }

    /// Create the first device, or replace a lost one.
    ///
    /// Returns `Ok(false)` when this attempt failed but another is allowed.
    fn recover<H>(&mut self, handler: &mut H) -> Result<bool, AppError>
    where
        H: AppHandler + ?Sized,
    {
        let first = !self.handler_initialized;
        if !first {
            if self.loss_streak >= self.config.device_lost_retries {
                return Err(AppError::DeviceLostRetriesExhausted {
                    attempts: self.loss_streak,
                });
            }
            self.loss_streak += 1;
            log::warn!(
                "FramePump: recovering device (attempt {}/{})",
                self.loss_streak,
                self.config.device_lost_retries
            );
        }

        let device = match self.provider.initialize(&self.surface) {
            Ok(device) => device,
            Err(err) if !first && is_transient(&err) => {
                log::warn!("FramePump: device recreation failed: {}", err);
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        if first {
            self.handler_initialized = true;
            let result = handler.on_init(&mut self.frame_context(Duration::ZERO));
            self.guard(result)?;
        } else {
            self.device_replaced(device.generation());
            let result = handler.on_device_reset(&mut self.frame_context(Duration::ZERO));
            self.guard(result)?;
        }
        Ok(self.provider.is_ready())
    }

    fn device_replaced(&mut self, generation: u64) {
        let dropped = self.registry.sync();
        self.loader.invalidate();
        self.summary.device_resets += 1;
        log::info!(
            "FramePump: device generation {} ready, {} stale resources dropped",
            generation,
            dropped
        );
    }

    fn poll_content<H>(&mut self, handler: &mut H) -> Result<(), AppError>
    where
        H: AppHandler + ?Sized,
    {
        let outcomes = {
            let mut ctx = LoadContext::new(&mut self.provider, &mut self.registry);
            self.loader.poll_completed(&mut ctx)
        };
        for outcome in &outcomes {
            let result = handler.on_content_ready(&mut self.frame_context(Duration::ZERO), outcome);
            self.guard(result)?;
        }
        Ok(())
    }

    /// Turn device loss raised by handler code into a provider state change.
    fn guard(&mut self, result: Result<(), AppError>) -> Result<(), AppError> {
        match result {
            Err(err) if err.is_device_lost() => {
                log::warn!("FramePump: device lost inside a callback: {}", err);
                self.provider.mark_lost("device lost inside a callback");
                Ok(())
            }
            other => other,
        }
    }

    fn teardown<H>(&mut self, handler: &mut H)
    where
        H: AppHandler + ?Sized,
    {
        log::info!("FramePump: tearing down");
        if self.handler_initialized {
            handler.on_shutdown(&mut self.frame_context(Duration::ZERO));
        }
        self.loader.invalidate();
        let released = self.registry.release_all();
        log::debug!("FramePump: released {} resources", released);
        self.provider.dispose();
    }

    fn frame_context(&mut self, step: Duration) -> FrameContext<'_> {
        FrameContext {
            provider: &mut self.provider,
            registry: &mut self.registry,
            loader: &mut self.loader,
            clock: &self.clock,
            stop: &self.stop,
            surface: self.surface,
            step,
        }
    }

    fn draw_context(&mut self, alpha: f32) -> DrawContext<'_> {
        DrawContext {
            frame: FrameContext {
                provider: &mut self.provider,
                registry: &mut self.registry,
                loader: &mut self.loader,
                clock: &self.clock,
                stop: &self.stop,
                surface: self.surface,
                step: self.clock.delta(),
            },
            commands: &mut self.commands,
            alpha,
        }
    }
}

/// Errors after which another recovery attempt makes sense.
fn is_transient(err: &GraphicsError) -> bool {
    matches!(
        err,
        GraphicsError::DeviceCreation(_) | GraphicsError::DeviceLost | GraphicsError::InitStep { .. }
    )
}

/// Run `update` and `draw` closures on a new frame pump.
pub fn run<S, U, D>(
    config: PumpConfig,
    provider: DeviceProvider,
    loader: ContentLoader,
    surface: &mut S,
    update: U,
    draw: D,
) -> Result<RunSummary, AppError>
where
    S: SurfaceAdapter + ?Sized,
    U: FnMut(&mut FrameContext) -> Result<(), AppError>,
    D: FnMut(&mut DrawContext) -> Result<(), AppError>,
{
    let mut handler = FnHandler::new(update, draw);
    FramePump::new(config, provider, loader).run(&mut handler, surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PumpConfig::default();
        assert!(config.fixed_timestep);
        assert_eq!(config.max_catchup_steps, 10);
        assert_eq!(config.device_lost_retries, 3);
        assert_eq!(config.max_frames, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(PumpConfig::default().with_fixed_step(Duration::ZERO).validate().is_err());
        assert!(PumpConfig::default().with_max_catchup_steps(0).validate().is_err());
        assert!(PumpConfig::default().with_simulated_device_loss(0).validate().is_err());
        assert!(
            PumpConfig::default()
                .with_fixed_step(Duration::ZERO)
                .with_variable_step()
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_stop_handle_is_shared() {
        let stop = StopHandle::new();
        let clone = stop.clone();
        assert!(!stop.is_stop_requested());
        clone.request_stop();
        assert!(stop.is_stop_requested());
    }
}
