//! # Host Demo
//!
//! Demonstrates:
//! - Loading a WGSL shader and a PNG texture through the content loader
//! - Recording a textured draw every frame
//! - Fetching an asset in the background and reacting when it is ready
//! - Reloading everything after the device is lost or replaced
//!
//! Assets come from an in-memory source unless `--assets DIR` points at a
//! directory (try `--assets demos/assets`). Pass `--simulate-device-loss 120`
//! to watch the host recover every two seconds.

use std::io::Cursor;
use std::sync::Arc;

use hearth_app::{App, AppArgs, AppError, AppHandler, DefaultAppArgs, DrawContext, FrameContext};
use hearth_content::{LoadOutcome, MemorySource};
use hearth_graphics::{Buffer, ShaderModule, Texture};
use image::{ImageFormat, Rgba, RgbaImage};

const QUAD_SHADER: &str = "shaders/quad.wgsl";
const CHECKER_TEXTURE: &str = "textures/checker.png";
const PARTICLES: &str = "data/particles.bin";

// === Embedded Assets ===

fn checker_png(size: u32, cell: u32) -> Result<Vec<u8>, image::ImageError> {
    let image = RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba([230, 120, 40, 255])
        } else {
            Rgba([30, 30, 40, 255])
        }
    });
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

fn demo_assets() -> Result<MemorySource, image::ImageError> {
    let source = MemorySource::new();
    source.insert(QUAD_SHADER, include_str!("../../assets/shaders/quad.wgsl"));
    source.insert(CHECKER_TEXTURE, checker_png(64, 8)?);
    source.insert(
        PARTICLES,
        (0..1024u32).flat_map(|i| i.to_le_bytes()).collect::<Vec<u8>>(),
    );
    Ok(source)
}

// === Demo Application ===

#[derive(Default)]
struct HostDemo {
    shader: Option<Arc<ShaderModule>>,
    texture: Option<Arc<Texture>>,
    particles: Option<Arc<Buffer>>,
    angle: f32,
    resets: u32,
}

impl HostDemo {
    fn load_resources(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        if self.shader.is_none() {
            self.shader = Some(ctx.load::<ShaderModule>(QUAD_SHADER)?);
        }
        if self.texture.is_none() {
            let texture = ctx.load::<Texture>(CHECKER_TEXTURE)?;
            log::info!(
                "Loaded {} ({}x{}, generation {})",
                CHECKER_TEXTURE,
                texture.width(),
                texture.height(),
                texture.generation()
            );
            self.texture = Some(texture);
        }
        Ok(())
    }
}

impl AppHandler for HostDemo {
    fn on_init(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        log::info!(
            "Host demo starting on {} ({}x{})",
            ctx.device()?.name(),
            ctx.width(),
            ctx.height()
        );
        self.load_resources(ctx)?;
        ctx.request::<Buffer>(PARTICLES)?;
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        self.angle = (self.angle + ctx.delta_secs()) % std::f32::consts::TAU;
        Ok(())
    }

    fn on_draw(&mut self, ctx: &mut DrawContext) -> Result<(), AppError> {
        self.load_resources(ctx)?;

        if let (Some(shader), Some(texture)) = (&self.shader, &self.texture) {
            ctx.commands()
                .draw_textured(shader.handle(), texture.handle(), 6);
        }
        if let (Some(shader), Some(particles)) = (&self.shader, &self.particles) {
            let count = (particles.size() / 4) as u32;
            ctx.commands().draw_buffer(shader.handle(), particles.handle(), count);
        }

        if ctx.frame_number() % 120 == 0 {
            log::info!(
                "Frame {}: angle {:.2} rad, alpha {:.2}",
                ctx.frame_number(),
                self.angle,
                ctx.alpha()
            );
        }
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        log::info!("Resized to {}x{}", ctx.width(), ctx.height());
        Ok(())
    }

    fn on_device_reset(&mut self, ctx: &mut FrameContext) -> Result<(), AppError> {
        self.resets += 1;
        log::warn!(
            "Device replaced (reset #{}), reloading content for generation {}",
            self.resets,
            ctx.device()?.generation()
        );
        self.shader = None;
        self.texture = None;
        self.particles = None;
        ctx.request::<Buffer>(PARTICLES)?;
        Ok(())
    }

    fn on_content_ready(
        &mut self,
        ctx: &mut FrameContext,
        outcome: &LoadOutcome,
    ) -> Result<(), AppError> {
        if let Err(err) = &outcome.result {
            log::error!("Background load of {} failed: {}", outcome.name, err);
            return Ok(());
        }
        if outcome.name == PARTICLES {
            self.particles = Some(ctx.load::<Buffer>(PARTICLES)?);
            log::info!("Particle buffer ready");
        }
        Ok(())
    }

    fn on_shutdown(&mut self, _ctx: &mut FrameContext) {
        log::info!("Shutting down host demo after {} device resets", self.resets);
    }
}

// === Entry Point ===

fn main() {
    let args = DefaultAppArgs::parse();

    let assets = match demo_assets() {
        Ok(assets) => assets,
        Err(err) => {
            eprintln!("Failed to build demo assets: {err}");
            std::process::exit(1);
        }
    };

    let app = App::new(args)
        .with_source("demo", assets)
        .with_default_source("demo");

    match app.run(&mut HostDemo::default()) {
        Ok(summary) => log::info!(
            "Host demo finished: {} frames, {} updates, {} device resets",
            summary.frames,
            summary.updates,
            summary.device_resets
        ),
        Err(err) => {
            log::error!("Host demo failed: {}", err);
            std::process::exit(1);
        }
    }
}
