//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations but keeps enough
//! bookkeeping to behave like one: devices can be lost, creation can fail,
//! and every created or destroyed object is recorded in an event log so
//! tests can assert on lifecycle order.
//!
//! # Fault injection
//!
//! - [`DummyBackend::lose_device`] marks every live device as lost
//! - [`DummyBackend::fail_next_device_creations`] makes device creation fail
//! - [`DummyBackend::set_available`] simulates a machine with no adapter
//! - [`DummyBackend::require_recreation_on_next_change`] makes the next
//!   surface change demand a new device

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::commands::CommandList;
use crate::device::{DeviceCapabilities, FeatureTier};
use crate::error::GraphicsError;
use crate::surface::{SurfaceDescriptor, SurfaceTarget};
use crate::swapchain::{PresentStatus, TargetConfiguration};
use crate::types::{BufferDescriptor, ShaderDescriptor, TextureDescriptor};

use super::{AdapterInfo, BackendDeviceId, GpuBackend, GpuResourceId};

/// Something the dummy backend did, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// A device was created.
    DeviceCreated(BackendDeviceId),
    /// A device was destroyed.
    DeviceDestroyed(BackendDeviceId),
    /// A device transitioned to the lost state.
    DeviceLost(BackendDeviceId),
    /// The presentation target was configured.
    TargetConfigured {
        /// Owning device.
        device: BackendDeviceId,
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// A resource was created.
    ResourceCreated {
        /// Resource id.
        id: GpuResourceId,
        /// Debug label, empty if none.
        label: String,
    },
    /// A resource was destroyed explicitly.
    ResourceDestroyed {
        /// Resource id.
        id: GpuResourceId,
        /// Debug label, empty if none.
        label: String,
    },
    /// A frame was presented.
    Presented(BackendDeviceId),
}

/// Configuration for the dummy backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyConfig {
    /// Adapter name reported to the provider.
    pub adapter_name: String,
    /// Capabilities of created devices.
    pub capabilities: DeviceCapabilities,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            adapter_name: "Dummy Adapter".to_string(),
            capabilities: DeviceCapabilities::default(),
        }
    }
}

impl DummyConfig {
    /// Set the reported feature tier.
    pub fn with_feature_tier(mut self, tier: FeatureTier) -> Self {
        self.capabilities.feature_tier = tier;
        self
    }

    /// Set the maximum texture dimension.
    pub fn with_max_texture_dimension(mut self, dimension: u32) -> Self {
        self.capabilities.max_texture_dimension = dimension;
        self
    }
}

#[derive(Debug)]
struct DeviceRecord {
    surface: SurfaceTarget,
    lost: bool,
    resources: HashMap<GpuResourceId, String>,
}

#[derive(Debug)]
struct DummyState {
    next_id: u64,
    devices: HashMap<BackendDeviceId, DeviceRecord>,
    available: bool,
    pending_creation_failures: u32,
    force_recreation: bool,
    events: Vec<BackendEvent>,
    devices_created: u64,
    presents: u64,
    submits: u64,
    stray_destroys: u64,
}

/// Dummy GPU backend.
#[derive(Debug)]
pub struct DummyBackend {
    config: DummyConfig,
    state: Mutex<DummyState>,
}

impl DummyBackend {
    /// Create a new dummy backend with default capabilities.
    pub fn new() -> Self {
        Self::with_config(DummyConfig::default())
    }

    /// Create a dummy backend with custom capabilities.
    pub fn with_config(config: DummyConfig) -> Self {
        Self {
            config,
            state: Mutex::new(DummyState {
                next_id: 1,
                devices: HashMap::new(),
                available: true,
                pending_creation_failures: 0,
                force_recreation: false,
                events: Vec::new(),
                devices_created: 0,
                presents: 0,
                submits: 0,
                stray_destroys: 0,
            }),
        }
    }

    /// Mark every live device as lost.
    pub fn lose_device(&self) {
        let mut state = self.state.lock();
        let mut lost = Vec::new();
        for (id, record) in state.devices.iter_mut() {
            if !record.lost {
                record.lost = true;
                lost.push(*id);
            }
        }
        for id in lost {
            log::debug!("DummyBackend: device {:?} lost", id);
            state.events.push(BackendEvent::DeviceLost(id));
        }
    }

    /// Make the next `count` device creations fail.
    pub fn fail_next_device_creations(&self, count: u32) {
        self.state.lock().pending_creation_failures = count;
    }

    /// Simulate whether an adapter exists at all.
    pub fn set_available(&self, available: bool) {
        self.state.lock().available = available;
    }

    /// Make the next surface change require a new device.
    pub fn require_recreation_on_next_change(&self) {
        self.state.lock().force_recreation = true;
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<BackendEvent> {
        self.state.lock().events.clone()
    }

    /// Clear the event log.
    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    /// Number of devices created so far.
    pub fn devices_created(&self) -> u64 {
        self.state.lock().devices_created
    }

    /// Number of devices currently alive.
    pub fn live_device_count(&self) -> usize {
        self.state.lock().devices.len()
    }

    /// Number of resources alive across all devices.
    pub fn live_resource_count(&self) -> usize {
        self.state
            .lock()
            .devices
            .values()
            .map(|record| record.resources.len())
            .sum()
    }

    /// Number of successful presents.
    pub fn presents(&self) -> u64 {
        self.state.lock().presents
    }

    /// Number of accepted submissions.
    pub fn submits(&self) -> u64 {
        self.state.lock().submits
    }

    /// Number of resource destructions aimed at a device that no longer
    /// exists.
    pub fn stray_destroys(&self) -> u64 {
        self.state.lock().stray_destroys
    }

    fn create_resource(
        &self,
        device: BackendDeviceId,
        label: Option<&str>,
    ) -> Result<GpuResourceId, GraphicsError> {
        let mut state = self.state.lock();
        let id = GpuResourceId(state.next_id);
        let record = state.devices.get_mut(&device).ok_or_else(|| {
            GraphicsError::InvalidState(format!("device {device:?} does not exist"))
        })?;
        if record.lost {
            return Err(GraphicsError::DeviceLost);
        }

        let label = label.unwrap_or_default().to_string();
        record.resources.insert(id, label.clone());
        state.next_id += 1;
        state.events.push(BackendEvent::ResourceCreated { id, label });
        Ok(id)
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn create_device(
        &self,
        surface: &SurfaceDescriptor,
    ) -> Result<(BackendDeviceId, AdapterInfo), GraphicsError> {
        let mut state = self.state.lock();
        if !state.available {
            return Err(GraphicsError::DeviceCreation(
                "no compatible adapter found".to_string(),
            ));
        }
        if state.pending_creation_failures > 0 {
            state.pending_creation_failures -= 1;
            return Err(GraphicsError::DeviceCreation(
                "adapter refused device creation".to_string(),
            ));
        }

        let id = BackendDeviceId(state.next_id);
        state.next_id += 1;
        state.devices.insert(
            id,
            DeviceRecord {
                surface: surface.target,
                lost: false,
                resources: HashMap::new(),
            },
        );
        state.devices_created += 1;
        state.events.push(BackendEvent::DeviceCreated(id));
        log::trace!(
            "DummyBackend: created device {:?} for {}x{}",
            id,
            surface.width,
            surface.height
        );

        Ok((
            id,
            AdapterInfo {
                name: self.config.adapter_name.clone(),
                capabilities: self.config.capabilities,
            },
        ))
    }

    fn destroy_device(&self, device: BackendDeviceId) {
        let mut state = self.state.lock();
        if let Some(record) = state.devices.remove(&device) {
            log::trace!(
                "DummyBackend: destroyed device {:?} ({} resources went with it)",
                device,
                record.resources.len()
            );
            state.events.push(BackendEvent::DeviceDestroyed(device));
        }
    }

    fn configure_target(
        &self,
        device: BackendDeviceId,
        config: &TargetConfiguration,
    ) -> Result<(), GraphicsError> {
        if config.width == 0 || config.height == 0 {
            return Err(GraphicsError::InvalidParameter(format!(
                "target size {}x{} has zero area",
                config.width, config.height
            )));
        }

        let mut state = self.state.lock();
        let record = state.devices.get(&device).ok_or_else(|| {
            GraphicsError::InvalidState(format!("device {device:?} does not exist"))
        })?;
        if record.lost {
            return Err(GraphicsError::DeviceLost);
        }
        state.events.push(BackendEvent::TargetConfigured {
            device,
            width: config.width,
            height: config.height,
        });
        Ok(())
    }

    fn requires_device_recreation(
        &self,
        device: BackendDeviceId,
        surface: &SurfaceDescriptor,
    ) -> bool {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.force_recreation) {
            return true;
        }
        // A device is bound to the window it was created for.
        state
            .devices
            .get(&device)
            .is_none_or(|record| record.surface != surface.target)
    }

    fn create_buffer(
        &self,
        device: BackendDeviceId,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<GpuResourceId, GraphicsError> {
        if descriptor.size == 0 {
            return Err(GraphicsError::InvalidParameter(
                "buffer size cannot be zero".to_string(),
            ));
        }
        if descriptor.size > self.config.capabilities.max_buffer_size {
            return Err(GraphicsError::InvalidParameter(format!(
                "buffer size {} exceeds maximum {}",
                descriptor.size, self.config.capabilities.max_buffer_size
            )));
        }
        if let Some(data) = data
            && data.len() as u64 > descriptor.size
        {
            return Err(GraphicsError::InvalidParameter(format!(
                "initial data ({} bytes) larger than buffer ({} bytes)",
                data.len(),
                descriptor.size
            )));
        }
        self.create_resource(device, descriptor.label.as_deref())
    }

    fn create_texture(
        &self,
        device: BackendDeviceId,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<GpuResourceId, GraphicsError> {
        let max = self.config.capabilities.max_texture_dimension;
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(GraphicsError::InvalidParameter(
                "texture dimensions cannot be zero".to_string(),
            ));
        }
        if descriptor.width > max || descriptor.height > max {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture {}x{} exceeds maximum dimension {}",
                descriptor.width, descriptor.height, max
            )));
        }
        if let Some(data) = data
            && data.len() as u64 != descriptor.byte_size()
        {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture data is {} bytes, expected {}",
                data.len(),
                descriptor.byte_size()
            )));
        }
        self.create_resource(device, descriptor.label.as_deref())
    }

    fn create_shader_module(
        &self,
        device: BackendDeviceId,
        descriptor: &ShaderDescriptor,
    ) -> Result<GpuResourceId, GraphicsError> {
        if descriptor.source.trim().is_empty() {
            return Err(GraphicsError::InvalidParameter(
                "shader source is empty".to_string(),
            ));
        }
        self.create_resource(device, descriptor.label.as_deref())
    }

    fn destroy_resource(&self, device: BackendDeviceId, resource: GpuResourceId) {
        let mut state = self.state.lock();
        let Some(record) = state.devices.get_mut(&device) else {
            log::warn!(
                "DummyBackend: destroying {:?} on destroyed device {:?}",
                resource,
                device
            );
            state.stray_destroys += 1;
            return;
        };
        if let Some(label) = record.resources.remove(&resource) {
            state.events.push(BackendEvent::ResourceDestroyed {
                id: resource,
                label,
            });
        }
    }

    fn submit(&self, device: BackendDeviceId, commands: &CommandList) -> PresentStatus {
        let mut state = self.state.lock();
        match state.devices.get(&device) {
            Some(record) if !record.lost => {
                state.submits += 1;
                log::trace!("DummyBackend: submitted {} commands", commands.len());
                PresentStatus::Presented
            }
            _ => PresentStatus::DeviceLost,
        }
    }

    fn present(&self, device: BackendDeviceId) -> PresentStatus {
        let mut state = self.state.lock();
        match state.devices.get(&device) {
            Some(record) if !record.lost => {
                state.presents += 1;
                state.events.push(BackendEvent::Presented(device));
                PresentStatus::Presented
            }
            _ => PresentStatus::DeviceLost,
        }
    }

    fn simulate_device_loss(&self) {
        self.lose_device();
    }
}

static_assertions::assert_impl_all!(DummyBackend: Send, Sync);
