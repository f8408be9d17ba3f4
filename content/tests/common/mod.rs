//! Shared fixtures for content loading tests.

use std::io::Cursor;
use std::sync::Arc;

use hearth_content::{AssetStore, ContentLoader, LoadContext, MemorySource};
use hearth_graphics::{DeviceProvider, DummyBackend, ProviderConfig, ResourceRegistry, SurfaceDescriptor};
use image::{ImageFormat, Rgba, RgbaImage};

pub const QUAD_WGSL: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    let x = f32(i32(index) - 1);
    let y = f32(i32(index & 1u) * 2 - 1);
    return vec4<f32>(x, y, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.5, 0.2, 1.0);
}
"#;

/// Encode a solid-color PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("PNG encoding should succeed");
    bytes.into_inner()
}

/// Loader over an in-memory store, plus a live device to build on.
pub struct Harness {
    pub backend: Arc<DummyBackend>,
    pub provider: DeviceProvider,
    pub registry: ResourceRegistry,
    pub source: MemorySource,
    pub loader: ContentLoader,
}

impl Harness {
    pub fn new() -> Self {
        let source = MemorySource::new();
        source.insert("textures/brick.png", png(4, 2));
        source.insert("textures/corrupt.png", b"\x89PNG but not really".to_vec());
        source.insert("shaders/quad.wgsl", QUAD_WGSL);
        source.insert("shaders/broken.wgsl", "@vertex fn main( -> {");
        source.insert("data/mesh.bin", vec![0u8; 48]);
        source.insert("data/empty.bin", Vec::<u8>::new());

        let mut store = AssetStore::new();
        store.mount("game", source.clone());
        store.set_default("game");

        let backend = Arc::new(DummyBackend::new());
        let mut provider = DeviceProvider::new(backend.clone(), ProviderConfig::default());
        provider
            .initialize(&SurfaceDescriptor::offscreen(800, 600))
            .expect("device creation should succeed");

        let registry = ResourceRegistry::attached(provider.epoch());
        Self {
            backend,
            provider,
            registry,
            source,
            loader: ContentLoader::with_default_readers(Arc::new(store)),
        }
    }

    /// Borrow the provider and registry as a load context.
    pub fn ctx(&mut self) -> (&mut ContentLoader, LoadContext<'_>) {
        (
            &mut self.loader,
            LoadContext::new(&mut self.provider, &mut self.registry),
        )
    }

    /// Lose the device, notice it through `present`, and create a new one.
    pub fn replace_device(&mut self) -> u64 {
        self.backend.lose_device();
        assert!(self.provider.present().unwrap().is_device_lost());
        self.provider
            .initialize(&SurfaceDescriptor::offscreen(800, 600))
            .expect("device recreation should succeed")
            .generation()
    }
}
