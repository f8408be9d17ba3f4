//! Graphics device.
//!
//! A [`Device`] is created by the [`DeviceProvider`](crate::DeviceProvider)
//! and never mutated afterwards. When the underlying device is lost or can
//! no longer serve the surface, the provider builds a new `Device` with the
//! next generation number instead of patching the old one.

use crate::backend::BackendDeviceId;

/// Coarse capability level of a device.
///
/// Ordered, so a minimum requirement is a simple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FeatureTier {
    /// Fixed-function class hardware or software rasterizers.
    Basic,
    /// Programmable vertex and fragment stages.
    #[default]
    Standard,
    /// Compute and storage resources on top of `Standard`.
    Advanced,
}

/// Capabilities of a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceCapabilities {
    /// Capability tier.
    pub feature_tier: FeatureTier,
    /// Maximum texture dimension.
    pub max_texture_dimension: u32,
    /// Maximum buffer size.
    pub max_buffer_size: u64,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            feature_tier: FeatureTier::Standard,
            max_texture_dimension: 8192,
            max_buffer_size: 1 << 28, // 256 MB
        }
    }
}

/// A created graphics device.
///
/// Held behind `Arc` by anyone who needs to read its properties. Holding an
/// `Arc<Device>` does not keep the device current: compare
/// [`generation`](Self::generation) with the provider's to find out.
#[derive(Debug)]
pub struct Device {
    name: String,
    capabilities: DeviceCapabilities,
    generation: u64,
    raw: BackendDeviceId,
}

impl Device {
    pub(crate) fn new(
        name: String,
        capabilities: DeviceCapabilities,
        generation: u64,
        raw: BackendDeviceId,
    ) -> Self {
        Self {
            name,
            capabilities,
            generation,
            raw,
        }
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the device capabilities.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Capability tier of the device.
    pub fn feature_tier(&self) -> FeatureTier {
        self.capabilities.feature_tier
    }

    /// Generation number, incremented every time the provider creates a device.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn raw(&self) -> BackendDeviceId {
        self.raw
    }
}

static_assertions::assert_impl_all!(Device: Send, Sync);
