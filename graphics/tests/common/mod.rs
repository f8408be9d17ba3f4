//! Common utilities for device lifecycle integration tests.

use std::sync::Arc;

use hearth_graphics::{
    DeviceProvider, DummyBackend, ProviderConfig, ReleaseFn, ResourceRegistry, SurfaceDescriptor,
};
use parking_lot::Mutex;

/// Route `log` output through the test harness; `RUST_LOG` enables it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Test Context
// ============================================================================

/// Provider, registry and the dummy backend behind them.
pub struct TestContext {
    /// Backend handle kept for fault injection.
    pub backend: Arc<DummyBackend>,
    /// Provider under test.
    pub provider: DeviceProvider,
    /// Registry paired with the provider.
    pub registry: ResourceRegistry,
}

impl TestContext {
    /// Create an uninitialized context.
    pub fn new() -> Self {
        init_logging();
        let backend = Arc::new(DummyBackend::new());
        let provider = DeviceProvider::new(backend.clone(), ProviderConfig::default());
        let registry = ResourceRegistry::attached(provider.epoch());
        Self {
            backend,
            provider,
            registry,
        }
    }

    /// Create a context with a device for `width`x`height`.
    pub fn initialized(width: u32, height: u32) -> Self {
        let mut ctx = Self::new();
        ctx.initialize(SurfaceDescriptor::offscreen(width, height));
        ctx
    }

    /// Initialize the provider and return the new generation.
    pub fn initialize(&mut self, surface: SurfaceDescriptor) -> u64 {
        self.provider
            .initialize(&surface)
            .expect("device creation should succeed")
            .generation()
    }
}

// ============================================================================
// Release Recording
// ============================================================================

/// Records the order release callbacks run in.
#[derive(Clone, Default)]
pub struct ReleaseLog(Arc<Mutex<Vec<u64>>>);

impl ReleaseLog {
    /// Callback that appends `tag` when run.
    pub fn callback(&self, tag: u64) -> ReleaseFn {
        let log = self.0.clone();
        Box::new(move || log.lock().push(tag))
    }

    /// Tags released so far, in order.
    pub fn released(&self) -> Vec<u64> {
        self.0.lock().clone()
    }
}

/// Small deterministic generator for operation sequences.
pub struct Lcg(u64);

impl Lcg {
    /// Seeded generator.
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    /// Next value in `0..bound`.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}
