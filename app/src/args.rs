//! Command line arguments trait and default implementation.
//!
//! Uses clap for CLI parsing on native targets with:
//! - Help text (`--help`)
//! - Validation and clear error messages

use std::path::{Path, PathBuf};

use hearth_graphics::{BackendType, PresentMode, ProviderConfig};

use crate::pump::PumpConfig;

/// Trait for host settings, usually parsed from the command line.
///
/// Every method has a default, so an implementation only overrides what it
/// needs. [`pump_config`](Self::pump_config) and
/// [`provider_config`](Self::provider_config) assemble the settings into the
/// structs the host runs with.
///
/// # Example
///
/// ```ignore
/// use hearth_app::AppArgs;
///
/// struct MyArgs;
///
/// impl AppArgs for MyArgs {
///     fn parse() -> Self {
///         MyArgs
///     }
///
///     fn headless(&self) -> bool {
///         true
///     }
///
///     fn max_frames(&self) -> Option<u64> {
///         Some(120)
///     }
/// }
/// ```
pub trait AppArgs: Sized {
    /// Parse command line arguments.
    fn parse() -> Self;

    /// Graphics backend to use.
    ///
    /// Default: `BackendType::Auto`
    fn backend(&self) -> BackendType {
        BackendType::Auto
    }

    /// Render off-screen instead of opening a window.
    ///
    /// Default: false
    fn headless(&self) -> bool {
        false
    }

    /// Initial surface width.
    ///
    /// Default: 1280
    fn window_width(&self) -> u32 {
        1280
    }

    /// Initial surface height.
    ///
    /// Default: 720
    fn window_height(&self) -> u32 {
        720
    }

    /// Window title.
    ///
    /// Default: "Hearth"
    fn window_title(&self) -> &str {
        "Hearth"
    }

    /// Whether presentation waits for vertical blank.
    ///
    /// Default: true
    fn vsync(&self) -> bool {
        true
    }

    /// Fixed-step updates.
    ///
    /// Default: true
    fn fixed_timestep(&self) -> bool {
        true
    }

    /// Fixed update rate in Hz.
    ///
    /// Default: 60
    fn step_hz(&self) -> f64 {
        60.0
    }

    /// Maximum updates per frame.
    ///
    /// Default: 10
    fn max_catchup_steps(&self) -> u32 {
        10
    }

    /// Consecutive device recovery attempts before giving up.
    ///
    /// Default: 3
    fn device_lost_retries(&self) -> u32 {
        3
    }

    /// Number of frames to present before exiting.
    ///
    /// Useful for automated testing to verify that the host can start and
    /// render without errors.
    ///
    /// Default: `None` (run indefinitely)
    fn max_frames(&self) -> Option<u64> {
        None
    }

    /// Directory mounted as the default asset source.
    ///
    /// Default: `None`
    fn assets_dir(&self) -> Option<&Path> {
        None
    }

    /// Lose the device after every N presented frames.
    ///
    /// Default: `None`
    fn simulate_device_loss(&self) -> Option<u64> {
        None
    }

    /// Frame pump settings built from the other options.
    fn pump_config(&self) -> PumpConfig {
        let mut config = PumpConfig::default()
            .with_max_catchup_steps(self.max_catchup_steps())
            .with_device_lost_retries(self.device_lost_retries());
        config = if self.fixed_timestep() {
            config.with_step_hz(self.step_hz())
        } else {
            config.with_variable_step()
        };
        config.max_frames = self.max_frames();
        config.simulate_device_loss_every = self.simulate_device_loss();
        config
    }

    /// Device provider settings built from the other options.
    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::default().with_present_mode(PresentMode::from_vsync(self.vsync()))
    }
}

// ============================================================================
// Default App Args (with clap on native)
// ============================================================================

/// Default command line arguments implementation.
///
/// On native platforms, uses clap for CLI parsing with help text.
/// On WASM, uses defaults.
///
/// # Examples
///
/// ```bash
/// # Show help
/// ./host_demo --help
///
/// # Run headless for 100 frames then exit
/// ./host_demo --headless --max-frames 100
///
/// # Lose the device every 30 frames to exercise recovery
/// ./host_demo --simulate-device-loss 30
///
/// # Load assets from a directory
/// ./host_demo --assets ./assets
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultAppArgs {
    backend: BackendType,
    headless: bool,
    width: u32,
    height: u32,
    title: String,
    vsync: bool,
    fixed_timestep: bool,
    step_hz: f64,
    max_catchup_steps: u32,
    device_lost_retries: u32,
    max_frames: Option<u64>,
    assets: Option<PathBuf>,
    simulate_device_loss: Option<u64>,
}

impl Default for DefaultAppArgs {
    fn default() -> Self {
        Self {
            backend: BackendType::Auto,
            headless: false,
            width: 1280,
            height: 720,
            title: "Hearth".to_string(),
            vsync: true,
            fixed_timestep: true,
            step_hz: 60.0,
            max_catchup_steps: 10,
            device_lost_retries: 3,
            max_frames: None,
            assets: None,
            simulate_device_loss: None,
        }
    }
}

impl DefaultAppArgs {
    /// Create new default args with a custom title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the surface size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the graphics backend.
    pub fn with_backend(mut self, backend: BackendType) -> Self {
        self.backend = backend;
        self
    }

    /// Render off-screen.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the maximum number of frames.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Mount `dir` as the default asset source.
    pub fn with_assets(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets = Some(dir.into());
        self
    }

    /// Lose the device every `frames` presented frames.
    pub fn with_simulated_device_loss(mut self, frames: u64) -> Self {
        self.simulate_device_loss = Some(frames);
        self
    }
}

// ============================================================================
// Native implementation using clap
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use clap::Parser;

    /// Graphics backend selection for CLI.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
    pub(super) enum CliBackend {
        /// Best available backend.
        #[default]
        Auto,
        /// Headless backend for testing and CI.
        Dummy,
    }

    impl From<CliBackend> for BackendType {
        fn from(cli: CliBackend) -> Self {
            match cli {
                CliBackend::Auto => BackendType::Auto,
                CliBackend::Dummy => BackendType::Dummy,
            }
        }
    }

    /// Hearth host arguments.
    #[derive(Parser, Debug)]
    #[command(
        name = "Hearth",
        about = "Minimal real-time rendering host",
        long_about = "A render loop host with device-loss recovery.\n\n\
            EXAMPLES:\n\
              # Run headless for 10 frames\n\
              ./app --headless --max-frames 10\n\
            \n\
              # Drill device-loss recovery every 30 frames\n\
              ./app --simulate-device-loss 30\n\
            \n\
              # Variable timestep, assets from disk\n\
              ./app --variable-timestep --assets ./assets",
        version
    )]
    pub(super) struct ClapArgs {
        /// Graphics backend to use.
        #[arg(long, default_value = "auto", value_enum)]
        pub backend: CliBackend,

        /// Render off-screen without opening a window.
        #[arg(long)]
        pub headless: bool,

        /// Initial surface width in pixels.
        #[arg(long, default_value = "1280")]
        pub width: u32,

        /// Initial surface height in pixels.
        #[arg(long, default_value = "720")]
        pub height: u32,

        /// Window title.
        #[arg(long, default_value = "Hearth")]
        pub title: String,

        /// Disable vertical sync (may cause tearing).
        #[arg(long)]
        pub no_vsync: bool,

        /// Run one update per frame with the real elapsed time.
        #[arg(long)]
        pub variable_timestep: bool,

        /// Fixed update rate in Hz.
        #[arg(long, default_value = "60", conflicts_with = "variable_timestep")]
        pub step_hz: f64,

        /// Maximum fixed updates per frame.
        #[arg(long, default_value = "10")]
        pub max_catchup: u32,

        /// Consecutive device recovery attempts before giving up.
        #[arg(long, default_value = "3")]
        pub device_lost_retries: u32,

        /// Exit after presenting N frames (useful for testing).
        #[arg(long)]
        pub max_frames: Option<u64>,

        /// Directory to load assets from.
        #[arg(long, value_name = "DIR")]
        pub assets: Option<PathBuf>,

        /// Lose the device after every N presented frames.
        #[arg(long, value_name = "N")]
        pub simulate_device_loss: Option<u64>,
    }

    impl From<ClapArgs> for DefaultAppArgs {
        fn from(args: ClapArgs) -> Self {
            if args.step_hz <= 0.0 {
                log::warn!("--step-hz must be positive, using 60");
            }

            Self {
                backend: args.backend.into(),
                headless: args.headless,
                width: args.width,
                height: args.height,
                title: args.title,
                vsync: !args.no_vsync,
                fixed_timestep: !args.variable_timestep,
                step_hz: if args.step_hz > 0.0 { args.step_hz } else { 60.0 },
                max_catchup_steps: args.max_catchup,
                device_lost_retries: args.device_lost_retries,
                max_frames: args.max_frames,
                assets: args.assets,
                simulate_device_loss: args.simulate_device_loss,
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> DefaultAppArgs {
            let mut argv = vec!["hearth"];
            argv.extend_from_slice(args);
            ClapArgs::try_parse_from(argv).unwrap().into()
        }

        #[test]
        fn test_defaults() {
            let args = parse(&[]);
            assert_eq!(args, DefaultAppArgs::default());
            assert_eq!(args.pump_config(), PumpConfig::default().with_step_hz(60.0));
        }

        #[test]
        fn test_flags() {
            let args = parse(&[
                "--headless",
                "--backend",
                "dummy",
                "--width",
                "640",
                "--height",
                "480",
                "--no-vsync",
                "--max-frames",
                "5",
                "--simulate-device-loss",
                "2",
                "--assets",
                "data",
            ]);
            assert!(args.headless());
            assert_eq!(args.backend(), BackendType::Dummy);
            assert_eq!((args.window_width(), args.window_height()), (640, 480));
            assert_eq!(args.provider_config().present_mode, PresentMode::Immediate);
            assert_eq!(args.assets_dir(), Some(Path::new("data")));

            let pump = args.pump_config();
            assert_eq!(pump.max_frames, Some(5));
            assert_eq!(pump.simulate_device_loss_every, Some(2));
        }

        #[test]
        fn test_variable_timestep() {
            let args = parse(&["--variable-timestep", "--max-catchup", "4"]);
            let pump = args.pump_config();
            assert!(!pump.fixed_timestep);
            assert_eq!(pump.max_catchup_steps, 4);
        }

        #[test]
        fn test_step_hz_conflicts_with_variable() {
            let argv = ["hearth", "--variable-timestep", "--step-hz", "30"];
            assert!(ClapArgs::try_parse_from(argv).is_err());
        }
    }
}

impl AppArgs for DefaultAppArgs {
    fn parse() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use clap::Parser;
            let clap_args = native::ClapArgs::parse();
            clap_args.into()
        }

        #[cfg(target_arch = "wasm32")]
        {
            Self::default()
        }
    }

    fn backend(&self) -> BackendType {
        self.backend
    }

    fn headless(&self) -> bool {
        self.headless
    }

    fn window_width(&self) -> u32 {
        self.width
    }

    fn window_height(&self) -> u32 {
        self.height
    }

    fn window_title(&self) -> &str {
        &self.title
    }

    fn vsync(&self) -> bool {
        self.vsync
    }

    fn fixed_timestep(&self) -> bool {
        self.fixed_timestep
    }

    fn step_hz(&self) -> f64 {
        self.step_hz
    }

    fn max_catchup_steps(&self) -> u32 {
        self.max_catchup_steps
    }

    fn device_lost_retries(&self) -> u32 {
        self.device_lost_retries
    }

    fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }

    fn assets_dir(&self) -> Option<&Path> {
        self.assets.as_deref()
    }

    fn simulate_device_loss(&self) -> Option<u64> {
        self.simulate_device_loss
    }
}
