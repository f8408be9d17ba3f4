//! # Hearth App
//!
//! Frame pump and window hosting for the Hearth rendering host.
//!
//! ## Overview
//!
//! - [`FramePump`] - Runs update, draw and present, recovers from device loss
//!   and tears everything down in order
//! - [`AppHandler`] - Trait for application logic
//! - [`SurfaceAdapter`] - Boundary to the window system: [`HeadlessSurface`]
//!   for tests and CI, `WinitSurface` for desktop windows
//! - [`AppArgs`] - Host settings, parsed from the command line by
//!   [`DefaultAppArgs`]
//! - [`App`] - Builds all of the above from arguments and runs a handler
//!
//! ## Example
//!
//! ```ignore
//! use hearth_app::{App, AppArgs, AppError, AppHandler, DefaultAppArgs, DrawContext};
//!
//! struct MyApp;
//!
//! impl AppHandler for MyApp {
//!     fn on_draw(&mut self, ctx: &mut DrawContext) -> Result<(), AppError> {
//!         ctx.commands().clear([0.1, 0.1, 0.1, 1.0]);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     let args = DefaultAppArgs::parse();
//!     App::new(args).run(&mut MyApp)?;
//!     Ok(())
//! }
//! ```

mod app;
mod args;
pub mod clock;
mod context;
mod error;
mod handler;
pub mod pump;
pub mod surface;
#[cfg(not(target_arch = "wasm32"))]
mod window;

#[cfg(not(target_arch = "wasm32"))]
pub use app::init_logging;
pub use app::{ASSETS_MOUNT, App};
pub use args::{AppArgs, DefaultAppArgs};
pub use clock::{FrameClock, ManualTimeSource, RealTimeSource, StepMode, StepPlan, TimeSource};
pub use context::{DrawContext, FrameContext};
pub use error::{AppError, ErrorKind};
pub use handler::{AppHandler, FnHandler};
pub use pump::{FramePump, PumpConfig, RunSummary, StopHandle, run};
pub use surface::{HeadlessSurface, SurfaceAdapter, SurfaceEvent};
#[cfg(not(target_arch = "wasm32"))]
pub use window::WinitSurface;

/// App library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the app subsystem.
///
/// This should be called before using any app functionality.
pub fn init() {
    log::info!("Hearth App v{} initialized", VERSION);
}
