//! # Hearth Demos
//!
//! Demo programs for the Hearth rendering host.
//!
//! ## Available Demos
//!
//! - `host_demo` - Loads a shader and a texture, draws them every frame and
//!   survives device loss (`--simulate-device-loss N`)

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
