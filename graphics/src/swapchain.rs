//! Presentation targets.
//!
//! This module describes what frames are presented into.
//!
//! # Overview
//!
//! - [`PresentationTarget`] - The configured back-buffer chain of a surface
//! - [`TargetConfiguration`] - Format, size and present mode for a target
//! - [`PresentMode`] - Controls vsync behavior
//! - [`PresentStatus`] - Outcome of presenting or submitting a frame
//!
//! A target is never resized in place. When the surface changes, the
//! [`DeviceProvider`](crate::DeviceProvider) builds a new target from a new
//! configuration and drops the old one.

use crate::surface::{SurfaceDescriptor, SurfaceTarget};
use crate::types::TextureFormat;

/// Presentation mode for the target.
///
/// Controls how frames are synchronized with the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentMode {
    /// No synchronization. May cause tearing but has lowest latency.
    Immediate,
    /// Triple buffering. Low latency without tearing.
    Mailbox,
    /// VSync enabled. No tearing, but may have higher latency.
    #[default]
    Fifo,
}

impl PresentMode {
    /// Present mode for a vsync setting.
    pub fn from_vsync(vsync: bool) -> Self {
        if vsync { Self::Fifo } else { Self::Immediate }
    }
}

/// Configuration for a presentation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetConfiguration {
    /// The texture format of the back-buffers.
    pub format: TextureFormat,
    /// Width of the target in pixels.
    pub width: u32,
    /// Height of the target in pixels.
    pub height: u32,
    /// Presentation mode (vsync behavior).
    pub present_mode: PresentMode,
}

impl TargetConfiguration {
    /// Create a new target configuration.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            format: TextureFormat::Bgra8UnormSrgb,
            width,
            height,
            present_mode: PresentMode::default(),
        }
    }

    /// Set the texture format.
    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the present mode.
    pub fn with_present_mode(mut self, present_mode: PresentMode) -> Self {
        self.present_mode = present_mode;
        self
    }
}

/// Result of handing a frame to the device.
///
/// Device loss is a status, not an error: the caller is expected to
/// re-initialize the provider and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum PresentStatus {
    /// The frame was accepted.
    Presented,
    /// The device was lost; nothing was presented.
    DeviceLost,
}

impl PresentStatus {
    /// True if the device was lost.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Self::DeviceLost)
    }
}

/// A configured presentation target bound to one surface and one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationTarget {
    config: TargetConfiguration,
    surface: SurfaceTarget,
    device_generation: u64,
}

impl PresentationTarget {
    pub(crate) fn new(
        config: TargetConfiguration,
        surface: SurfaceTarget,
        device_generation: u64,
    ) -> Self {
        Self {
            config,
            surface,
            device_generation,
        }
    }

    /// Target width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Target height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Back-buffer format.
    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    /// Vsync policy.
    pub fn present_mode(&self) -> PresentMode {
        self.config.present_mode
    }

    /// Full configuration.
    pub fn config(&self) -> &TargetConfiguration {
        &self.config
    }

    /// The surface this target presents into.
    pub fn surface(&self) -> SurfaceTarget {
        self.surface
    }

    /// Generation of the device that owns this target.
    pub fn device_generation(&self) -> u64 {
        self.device_generation
    }

    /// Whether this target already matches a surface descriptor.
    pub fn matches(&self, descriptor: &SurfaceDescriptor) -> bool {
        self.surface == descriptor.target
            && self.config.width == descriptor.width
            && self.config.height == descriptor.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_builder() {
        let config = TargetConfiguration::new(800, 600)
            .with_format(TextureFormat::Rgba16Float)
            .with_present_mode(PresentMode::Mailbox);
        assert_eq!(config.width, 800);
        assert_eq!(config.format, TextureFormat::Rgba16Float);
        assert_eq!(config.present_mode, PresentMode::Mailbox);
    }

    #[test]
    fn test_present_mode_from_vsync() {
        assert_eq!(PresentMode::from_vsync(true), PresentMode::Fifo);
        assert_eq!(PresentMode::from_vsync(false), PresentMode::Immediate);
    }

    #[test]
    fn test_target_matches_descriptor() {
        let target =
            PresentationTarget::new(TargetConfiguration::new(800, 600), SurfaceTarget::Offscreen, 1);
        assert!(target.matches(&SurfaceDescriptor::offscreen(800, 600)));
        assert!(!target.matches(&SurfaceDescriptor::offscreen(1024, 768)));
        assert!(!target.matches(&SurfaceDescriptor::window(1, 800, 600)));
    }
}
