//! Shared fixtures for frame pump integration tests.

use std::sync::Arc;
use std::time::Duration;

use hearth_app::{
    AppError, AppHandler, DrawContext, FrameContext, FramePump, ManualTimeSource, PumpConfig,
};
use hearth_content::{AssetStore, ContentLoader, LoadOutcome, MemorySource};
use hearth_graphics::{Buffer, DeviceProvider, DummyBackend, ProviderConfig, ShaderModule};

pub const QUAD_WGSL: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    let x = f32(i32(index) - 1);
    let y = f32(i32(index & 1u) * 2 - 1);
    return vec4<f32>(x, y, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.2, 0.4, 0.8, 1.0);
}
"#;

pub const SHADER: &str = "shaders/quad.wgsl";
pub const VERTICES: &str = "data/quad.bin";

pub fn step() -> Duration {
    Duration::from_secs_f64(1.0 / 60.0)
}

/// Dummy backend, an uninitialized provider over it, and a loader over an
/// in-memory store holding a shader and a vertex buffer.
pub fn parts() -> (Arc<DummyBackend>, DeviceProvider, ContentLoader) {
    let source = MemorySource::new();
    source.insert(SHADER, QUAD_WGSL);
    source.insert(VERTICES, vec![0u8; 36]);

    let mut store = AssetStore::new();
    store.mount("game", source);
    store.set_default("game");

    let backend = Arc::new(DummyBackend::new());
    let provider = DeviceProvider::new(backend.clone(), ProviderConfig::default());
    let loader = ContentLoader::with_default_readers(Arc::new(store));
    (backend, provider, loader)
}

/// Build a pump whose clock advances exactly one fixed step per frame.
pub fn pump(config: PumpConfig) -> (Arc<DummyBackend>, FramePump) {
    let (backend, provider, loader) = parts();
    let pump = FramePump::new(config, provider, loader)
        .with_time_source(ManualTimeSource::fixed(step()));
    (backend, pump)
}

// ============================================================================
// Recording Handler
// ============================================================================

/// Handler that loads a shader and a vertex buffer, draws with them, and
/// records every callback it receives.
#[derive(Default)]
pub struct Recorder {
    /// Callback names in the order they ran; updates are not recorded.
    pub calls: Vec<&'static str>,
    pub updates: u64,
    pub draws: u64,
    pub update_steps: Vec<Duration>,
    /// Surface size seen by each `on_resize`.
    pub resizes: Vec<(u32, u32)>,
    /// Every distinct vertex buffer instance drawn with.
    pub buffers: Vec<Arc<Buffer>>,
    /// Whether handles from before each reset had turned stale.
    pub stale_after_reset: Vec<bool>,
    /// Registry size observed during `on_shutdown`.
    pub live_at_shutdown: Option<usize>,
    /// Finished background loads as (name, succeeded).
    pub outcomes: Vec<(String, bool)>,
    /// Keep the first shader and buffer forever instead of reloading.
    pub hold_handles: bool,
    pub fail_update_at: Option<u64>,
    pub stop_at_draw: Option<u64>,
    pub decline_close: bool,
    pub(crate) shader: Option<Arc<ShaderModule>>,
    pub(crate) buffer: Option<Arc<Buffer>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn ensure_loaded(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        if self.shader.is_none() {
            self.shader = Some(ctx.load::<ShaderModule>(SHADER)?);
        }
        if self.buffer.is_none() {
            let buffer = ctx.load::<Buffer>(VERTICES)?;
            if !self.buffers.iter().any(|seen| Arc::ptr_eq(seen, &buffer)) {
                self.buffers.push(buffer.clone());
            }
            self.buffer = Some(buffer);
        }
        Ok(())
    }
}

impl AppHandler for Recorder {
    fn on_init(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        self.calls.push("init");
        self.ensure_loaded(ctx)
    }

    fn on_update(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        self.updates += 1;
        self.update_steps.push(ctx.delta());
        if self.fail_update_at == Some(self.updates) {
            return Err(AppError::handler("simulation diverged"));
        }
        Ok(())
    }

    fn on_draw(&mut self, ctx: &mut DrawContext) -> Result<(), AppError> {
        self.draws += 1;
        self.ensure_loaded(ctx)?;
        if let (Some(shader), Some(buffer)) = (&self.shader, &self.buffer) {
            ctx.commands().draw_buffer(shader.handle(), buffer.handle(), 3);
        }
        if self.stop_at_draw == Some(self.draws) {
            ctx.request_stop();
        }
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        self.calls.push("resize");
        self.resizes.push((ctx.width(), ctx.height()));
        Ok(())
    }

    fn on_device_reset(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        self.calls.push("reset");
        if let Some(buffer) = &self.buffer {
            self.stale_after_reset
                .push(ctx.registry().validate(buffer.handle()).is_err());
        }
        if !self.hold_handles {
            self.shader = None;
            self.buffer = None;
        }
        Ok(())
    }

    fn on_content_ready(
        &mut self,
        ctx: &mut FrameContext,
        outcome: &LoadOutcome,
    ) -> Result<(), AppError> {
        self.calls.push("content");
        self.outcomes
            .push((outcome.name.clone(), outcome.result.is_ok()));
        ctx.request_stop();
        Ok(())
    }

    fn on_close_requested(&mut self, _ctx: &mut FrameContext) -> bool {
        self.calls.push("close");
        !self.decline_close
    }

    fn on_shutdown(&mut self, ctx: &mut FrameContext) {
        self.calls.push("shutdown");
        self.live_at_shutdown = Some(ctx.registry().len());
        self.shader = None;
        self.buffer = None;
    }
}
