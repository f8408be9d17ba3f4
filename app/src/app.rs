//! Application runner.

use std::sync::Arc;

use hearth_content::{AssetSource, AssetStore, ContentLoader};
#[cfg(not(target_arch = "wasm32"))]
use hearth_content::DirectorySource;
use hearth_graphics::{DeviceProvider, GpuBackend, create_backend};

use crate::args::AppArgs;
use crate::error::AppError;
use crate::handler::AppHandler;
use crate::pump::{FramePump, RunSummary};
use crate::surface::HeadlessSurface;

/// Mount name of the directory given by [`AppArgs::assets_dir`].
pub const ASSETS_MOUNT: &str = "assets";

/// Wires backend, provider, content and surface together from [`AppArgs`]
/// and runs a handler on a [`FramePump`].
///
/// # Example
///
/// ```ignore
/// use hearth_app::{App, AppArgs, DefaultAppArgs};
///
/// fn main() -> Result<(), hearth_app::AppError> {
///     let args = DefaultAppArgs::parse();
///     let summary = App::new(args).run(&mut MyApp::default())?;
///     log::info!("{} frames", summary.frames);
///     Ok(())
/// }
/// ```
pub struct App<A: AppArgs> {
    args: A,
    backend: Option<Arc<dyn GpuBackend>>,
    store: AssetStore,
}

impl<A: AppArgs> App<A> {
    /// Create a runner from parsed arguments.
    pub fn new(args: A) -> Self {
        Self {
            args,
            backend: None,
            store: AssetStore::new(),
        }
    }

    /// Use this backend instead of the one selected by the arguments.
    pub fn with_backend(mut self, backend: Arc<dyn GpuBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Mount an asset source.
    pub fn with_source(mut self, name: &str, source: impl AssetSource) -> Self {
        self.store.mount(name, source);
        self
    }

    /// Set the source used for names without a mount prefix.
    pub fn with_default_source(mut self, name: &str) -> Self {
        self.store.set_default(name);
        self
    }

    /// The arguments.
    pub fn args(&self) -> &A {
        &self.args
    }

    /// Initialize logging, build the host and run `handler` until it stops.
    ///
    /// # Errors
    ///
    /// Backend selection or window creation failures, and anything the
    /// frame pump returns.
    pub fn run<H: AppHandler + ?Sized>(self, handler: &mut H) -> Result<RunSummary, AppError> {
        #[cfg(not(target_arch = "wasm32"))]
        init_logging();

        hearth_graphics::init();
        hearth_content::init();
        crate::init();

        let App {
            args,
            backend,
            mut store,
        } = self;

        let backend = match backend {
            Some(backend) => backend,
            None => create_backend(args.backend())?,
        };
        let provider = DeviceProvider::new(backend, args.provider_config());

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(dir) = args.assets_dir() {
            log::info!("Mounting assets from {}", dir.display());
            store.mount(ASSETS_MOUNT, DirectorySource::new(dir));
            store.set_default(ASSETS_MOUNT);
        }
        let loader = ContentLoader::with_default_readers(Arc::new(store));
        let pump = FramePump::new(args.pump_config(), provider, loader);

        let (width, height) = (args.window_width(), args.window_height());
        if args.headless() {
            log::info!("Running headless ({}x{})", width, height);
            let mut surface = HeadlessSurface::new(width, height);
            return pump.run(handler, &mut surface);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut surface = crate::window::WinitSurface::new(args.window_title(), width, height)?;
            pump.run(handler, &mut surface)
        }

        #[cfg(target_arch = "wasm32")]
        {
            Err(AppError::Window(
                "windowed mode is not supported on this target".into(),
            ))
        }
    }
}

/// Install `env_logger` with an `info` default filter.
///
/// Safe to call more than once; later calls do nothing.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
