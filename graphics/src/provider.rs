//! Device provider.
//!
//! The [`DeviceProvider`] owns the current [`Device`] and its
//! [`PresentationTarget`] and drives their lifecycle:
//!
//! ```text
//! Uninitialized ──initialize──► Ready ──loss──► Lost
//!                                 ▲               │
//!                                 └──initialize───┘
//!          (any state) ──dispose──► Disposed
//! ```
//!
//! Loss is observed by [`present`](DeviceProvider::present) and
//! [`submit`](DeviceProvider::submit), which return
//! [`PresentStatus::DeviceLost`] instead of an error. While lost, every call
//! that needs the device fails fast with [`GraphicsError::DeviceLost`] until
//! [`initialize`](DeviceProvider::initialize) succeeds again.
//!
//! # Example
//!
//! ```ignore
//! let mut provider = DeviceProvider::new(backend, ProviderConfig::default());
//! let device = provider.initialize(&SurfaceDescriptor::offscreen(800, 600))?;
//!
//! loop {
//!     // ... record and submit ...
//!     if provider.present()?.is_device_lost() {
//!         provider.initialize(&surface)?;
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::backend::{BackendDeviceId, GpuBackend, GpuResourceId};
use crate::commands::CommandList;
use crate::device::{Device, FeatureTier};
use crate::error::GraphicsError;
use crate::registry::{DeviceEpoch, ResourceHandle, ResourceKind, ResourceRegistry};
use crate::resources::{Buffer, ShaderModule, Texture};
use crate::surface::SurfaceDescriptor;
use crate::swapchain::{PresentMode, PresentStatus, PresentationTarget, TargetConfiguration};
use crate::types::{BufferDescriptor, ShaderDescriptor, TextureDescriptor, TextureFormat};

/// Lifecycle state of a [`DeviceProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// No device has been created yet.
    Uninitialized,
    /// A device and target are ready for use.
    Ready,
    /// The device was lost; `initialize` must be called again.
    Lost,
    /// The provider was disposed and cannot be used again.
    Disposed,
}

/// What [`DeviceProvider::on_surface_changed`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceChange {
    /// The target already matched the surface.
    Unchanged,
    /// Only the presentation target was replaced; resources stay valid.
    TargetReplaced,
    /// The device itself was recreated; all resources are stale.
    DeviceRecreated {
        /// Generation of the new device.
        generation: u64,
    },
}

/// Configuration for device creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Devices below this tier are rejected.
    pub min_feature_tier: FeatureTier,
    /// Back-buffer format.
    pub format: TextureFormat,
    /// Vsync policy.
    pub present_mode: PresentMode,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            min_feature_tier: FeatureTier::Basic,
            format: TextureFormat::Bgra8UnormSrgb,
            present_mode: PresentMode::Fifo,
        }
    }
}

impl ProviderConfig {
    /// Set the minimum feature tier.
    pub fn with_min_feature_tier(mut self, tier: FeatureTier) -> Self {
        self.min_feature_tier = tier;
        self
    }

    /// Set the back-buffer format.
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

type InitFn = Box<dyn FnMut(&Device) -> Result<(), GraphicsError> + Send>;

struct InitStep {
    name: String,
    run: InitFn,
}

/// Owner of the current device and presentation target.
pub struct DeviceProvider {
    backend: Arc<dyn GpuBackend>,
    config: ProviderConfig,
    state: ProviderState,
    device: Option<Arc<Device>>,
    target: Option<PresentationTarget>,
    surface: Option<SurfaceDescriptor>,
    generation: u64,
    epoch: DeviceEpoch,
    init_steps: Vec<InitStep>,
    frames_presented: u64,
}

impl DeviceProvider {
    /// Create a provider on top of a backend. No device is created yet.
    pub fn new(backend: Arc<dyn GpuBackend>, config: ProviderConfig) -> Self {
        log::info!("Creating DeviceProvider on {}", backend.name());
        Self {
            backend,
            config,
            state: ProviderState::Uninitialized,
            device: None,
            target: None,
            surface: None,
            generation: 0,
            epoch: DeviceEpoch::new(),
            init_steps: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Append a step that runs, in insertion order, after every device creation.
    ///
    /// A failing step fails the whole [`initialize`](Self::initialize) call.
    pub fn add_init_step(
        &mut self,
        name: impl Into<String>,
        step: impl FnMut(&Device) -> Result<(), GraphicsError> + Send + 'static,
    ) {
        self.init_steps.push(InitStep {
            name: name.into(),
            run: Box::new(step),
        });
    }

    /// Create a device and presentation target for `surface`.
    ///
    /// Any previous device is destroyed first. On success the generation
    /// counter advances and the provider becomes [`ProviderState::Ready`].
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::DeviceCreation`] if no device of at least the
    ///   configured tier can be created
    /// - [`GraphicsError::InitStep`] if an initialization step fails
    /// - [`GraphicsError::InvalidParameter`] for a zero-area surface
    /// - [`GraphicsError::InvalidState`] after [`dispose`](Self::dispose)
    pub fn initialize(&mut self, surface: &SurfaceDescriptor) -> Result<Arc<Device>, GraphicsError> {
        if self.state == ProviderState::Disposed {
            return Err(GraphicsError::InvalidState(
                "provider has been disposed".to_string(),
            ));
        }
        if surface.is_zero_area() {
            return Err(GraphicsError::InvalidParameter(format!(
                "cannot initialize on a {}x{} surface",
                surface.width, surface.height
            )));
        }

        self.destroy_current();

        match self.create_device(surface) {
            Ok(device) => {
                self.state = ProviderState::Ready;
                Ok(device)
            }
            Err(err) => {
                self.state = if self.generation > 0 {
                    ProviderState::Lost
                } else {
                    ProviderState::Uninitialized
                };
                log::error!("Device initialization failed: {}", err);
                Err(err)
            }
        }
    }

    fn create_device(&mut self, surface: &SurfaceDescriptor) -> Result<Arc<Device>, GraphicsError> {
        let (raw, adapter) = self.backend.create_device(surface)?;

        if adapter.capabilities.feature_tier < self.config.min_feature_tier {
            self.backend.destroy_device(raw);
            return Err(GraphicsError::DeviceCreation(format!(
                "adapter '{}' supports {:?}, {:?} required",
                adapter.name, adapter.capabilities.feature_tier, self.config.min_feature_tier
            )));
        }

        let config = self.target_config(surface);
        if let Err(err) = self.backend.configure_target(raw, &config) {
            self.backend.destroy_device(raw);
            return Err(err);
        }

        let generation = self.generation + 1;
        let device = Arc::new(Device::new(
            adapter.name,
            adapter.capabilities,
            generation,
            raw,
        ));

        for step in &mut self.init_steps {
            log::debug!("Running init step '{}'", step.name);
            if let Err(err) = (step.run)(&device) {
                self.backend.destroy_device(raw);
                return Err(GraphicsError::InitStep {
                    step: step.name.clone(),
                    reason: err.to_string(),
                });
            }
        }

        self.generation = generation;
        self.epoch.set(generation);
        self.device = Some(Arc::clone(&device));
        self.target = Some(PresentationTarget::new(config, surface.target, generation));
        self.surface = Some(*surface);

        log::info!(
            "Device initialized: {} (generation {}, {}x{}, format={:?}, present_mode={:?})",
            device.name(),
            generation,
            surface.width,
            surface.height,
            config.format,
            config.present_mode
        );
        Ok(device)
    }

    /// Present the current back-buffer.
    ///
    /// Returns [`PresentStatus::DeviceLost`] when the device is or becomes
    /// lost; the provider is then in [`ProviderState::Lost`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::InvalidState`] before the first
    /// `initialize` or after `dispose`.
    pub fn present(&mut self) -> Result<PresentStatus, GraphicsError> {
        let raw = match self.live_raw()? {
            Some(raw) => raw,
            None => return Ok(PresentStatus::DeviceLost),
        };

        let status = self.backend.present(raw);
        match status {
            PresentStatus::Presented => self.frames_presented += 1,
            PresentStatus::DeviceLost => self.enter_lost("device lost during present"),
        }
        Ok(status)
    }

    /// Validate and submit recorded commands.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::ResourceStale`] / [`GraphicsError::ResourceReleased`]
    ///   if a command references a resource that may not be used
    /// - [`GraphicsError::InvalidState`] before `initialize` or after `dispose`
    pub fn submit(
        &mut self,
        commands: &CommandList,
        registry: &ResourceRegistry,
    ) -> Result<PresentStatus, GraphicsError> {
        let raw = match self.live_raw()? {
            Some(raw) => raw,
            None => return Ok(PresentStatus::DeviceLost),
        };

        for handle in commands.referenced_handles() {
            registry.validate(handle)?;
        }

        let status = self.backend.submit(raw, commands);
        if status.is_device_lost() {
            self.enter_lost("device lost during submit");
        }
        Ok(status)
    }

    /// React to a new surface size or identity.
    ///
    /// Replaces only the presentation target unless the backend reports that
    /// the device cannot serve the new surface, in which case the device is
    /// recreated and [`SurfaceChange::DeviceRecreated`] is returned so the
    /// caller can invalidate its resources.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::InvalidParameter`] for a zero-area surface
    /// - [`GraphicsError::DeviceLost`] if the device is lost
    /// - any error from device recreation
    pub fn on_surface_changed(
        &mut self,
        surface: &SurfaceDescriptor,
    ) -> Result<SurfaceChange, GraphicsError> {
        if surface.is_zero_area() {
            return Err(GraphicsError::InvalidParameter(format!(
                "cannot present into a {}x{} surface",
                surface.width, surface.height
            )));
        }

        let device = self.device()?;
        if self.target.as_ref().is_some_and(|t| t.matches(surface)) {
            return Ok(SurfaceChange::Unchanged);
        }

        if self.backend.requires_device_recreation(device.raw(), surface) {
            log::info!(
                "Surface change to {}x{} requires a new device",
                surface.width,
                surface.height
            );
            let device = self.initialize(surface)?;
            return Ok(SurfaceChange::DeviceRecreated {
                generation: device.generation(),
            });
        }

        let config = self.target_config(surface);
        match self.backend.configure_target(device.raw(), &config) {
            Ok(()) => {
                log::debug!(
                    "Presentation target replaced: {}x{}",
                    surface.width,
                    surface.height
                );
                self.target = Some(PresentationTarget::new(
                    config,
                    surface.target,
                    device.generation(),
                ));
                self.surface = Some(*surface);
                Ok(SurfaceChange::TargetReplaced)
            }
            Err(GraphicsError::DeviceLost) => {
                self.enter_lost("device lost while reconfiguring target");
                Err(GraphicsError::DeviceLost)
            }
            Err(err) => Err(err),
        }
    }

    /// Report that the device can no longer be used, e.g. because the
    /// surface it presents into was destroyed.
    pub fn mark_lost(&mut self, reason: &str) {
        if self.state == ProviderState::Ready {
            self.enter_lost(reason);
        }
    }

    /// Release the target and device. The provider cannot be used afterwards.
    pub fn dispose(&mut self) {
        if self.state == ProviderState::Disposed {
            return;
        }
        self.destroy_current();
        self.state = ProviderState::Disposed;
        log::info!(
            "DeviceProvider disposed after {} generations, {} frames presented",
            self.generation,
            self.frames_presented
        );
    }

    /// The current device.
    ///
    /// # Errors
    ///
    /// Fails fast with [`GraphicsError::DeviceLost`] while lost, and with
    /// [`GraphicsError::InvalidState`] before `initialize` or after `dispose`.
    pub fn device(&self) -> Result<Arc<Device>, GraphicsError> {
        match (self.state, &self.device) {
            (ProviderState::Ready, Some(device)) => Ok(Arc::clone(device)),
            (ProviderState::Lost, _) => Err(GraphicsError::DeviceLost),
            (state, _) => Err(GraphicsError::InvalidState(format!(
                "no device available in state {state:?}"
            ))),
        }
    }

    /// The current presentation target.
    ///
    /// # Errors
    ///
    /// Same as [`device`](Self::device).
    pub fn target(&self) -> Result<&PresentationTarget, GraphicsError> {
        match (self.state, &self.target) {
            (ProviderState::Ready, Some(target)) => Ok(target),
            (ProviderState::Lost, _) => Err(GraphicsError::DeviceLost),
            (state, _) => Err(GraphicsError::InvalidState(format!(
                "no presentation target in state {state:?}"
            ))),
        }
    }

    /// Create a texture and register it.
    pub fn create_texture(
        &mut self,
        registry: &mut ResourceRegistry,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<Texture, GraphicsError> {
        let handle = self.create_tracked(
            registry,
            ResourceKind::Texture,
            descriptor.label.as_deref(),
            |backend, device| backend.create_texture(device, descriptor, data),
        )?;
        Ok(Texture::new(handle, descriptor.clone()))
    }

    /// Create a buffer and register it.
    pub fn create_buffer(
        &mut self,
        registry: &mut ResourceRegistry,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<Buffer, GraphicsError> {
        let handle = self.create_tracked(
            registry,
            ResourceKind::Buffer,
            descriptor.label.as_deref(),
            |backend, device| backend.create_buffer(device, descriptor, data),
        )?;
        Ok(Buffer::new(handle, descriptor.clone()))
    }

    /// Create a shader module and register it.
    pub fn create_shader_module(
        &mut self,
        registry: &mut ResourceRegistry,
        descriptor: &ShaderDescriptor,
    ) -> Result<ShaderModule, GraphicsError> {
        let handle = self.create_tracked(
            registry,
            ResourceKind::Shader,
            descriptor.label.as_deref(),
            |backend, device| backend.create_shader_module(device, descriptor),
        )?;
        Ok(ShaderModule::new(handle, descriptor.clone()))
    }

    fn create_tracked(
        &mut self,
        registry: &mut ResourceRegistry,
        kind: ResourceKind,
        label: Option<&str>,
        create: impl FnOnce(&dyn GpuBackend, BackendDeviceId) -> Result<GpuResourceId, GraphicsError>,
    ) -> Result<ResourceHandle, GraphicsError> {
        let device = self.device()?;
        registry.attach(self.epoch.clone());

        let raw_device = device.raw();
        let resource = match create(self.backend.as_ref(), raw_device) {
            Ok(resource) => resource,
            Err(GraphicsError::DeviceLost) => {
                self.enter_lost("device lost during resource creation");
                return Err(GraphicsError::DeviceLost);
            }
            Err(err) => return Err(err),
        };

        let backend = Arc::clone(&self.backend);
        let label = label.map_or_else(|| format!("{kind:?}"), str::to_string);
        Ok(registry.register(kind, label, move || {
            backend.destroy_resource(raw_device, resource)
        }))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProviderState {
        self.state
    }

    /// True when a usable device exists.
    pub fn is_ready(&self) -> bool {
        self.state == ProviderState::Ready
    }

    /// True when the device was lost and must be re-initialized.
    pub fn is_lost(&self) -> bool {
        self.state == ProviderState::Lost
    }

    /// Generation of the most recently created device (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shared view of the live device generation.
    ///
    /// Registries attached to it forget their entries as soon as the device
    /// they were created on is destroyed.
    pub fn epoch(&self) -> DeviceEpoch {
        self.epoch.clone()
    }

    /// The last surface the provider was configured for.
    pub fn surface(&self) -> Option<SurfaceDescriptor> {
        self.surface
    }

    /// Device creation settings.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Number of frames presented over the provider's lifetime.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The backend devices are created on.
    pub fn backend(&self) -> &Arc<dyn GpuBackend> {
        &self.backend
    }

    fn target_config(&self, surface: &SurfaceDescriptor) -> TargetConfiguration {
        TargetConfiguration::new(surface.width, surface.height)
            .with_format(self.config.format)
            .with_present_mode(self.config.present_mode)
    }

    /// `Some(raw)` when ready, `None` when lost, error otherwise.
    fn live_raw(&self) -> Result<Option<BackendDeviceId>, GraphicsError> {
        match self.device() {
            Ok(device) => Ok(Some(device.raw())),
            Err(GraphicsError::DeviceLost) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn enter_lost(&mut self, reason: &str) {
        log::warn!("Device generation {} lost: {}", self.generation, reason);
        self.state = ProviderState::Lost;
    }

    fn destroy_current(&mut self) {
        self.target = None;
        if let Some(device) = self.device.take() {
            log::debug!("Destroying device generation {}", device.generation());
            self.epoch.set(0);
            self.backend.destroy_device(device.raw());
        }
    }
}

impl std::fmt::Debug for DeviceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceProvider")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish()
    }
}

static_assertions::assert_impl_all!(DeviceProvider: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;
    use crate::device::DeviceCapabilities;
    use crate::DummyConfig;

    fn provider() -> (Arc<DummyBackend>, DeviceProvider) {
        let backend = Arc::new(DummyBackend::new());
        let provider = DeviceProvider::new(backend.clone(), ProviderConfig::default());
        (backend, provider)
    }

    #[test]
    fn test_initialize_sets_ready() {
        let (_, mut provider) = provider();
        assert_eq!(provider.state(), ProviderState::Uninitialized);

        let device = provider
            .initialize(&SurfaceDescriptor::offscreen(800, 600))
            .unwrap();
        assert_eq!(device.generation(), 1);
        assert!(provider.is_ready());

        let target = provider.target().unwrap();
        assert_eq!((target.width(), target.height()), (800, 600));
        assert_eq!(target.device_generation(), 1);
    }

    #[test]
    fn test_uninitialized_present_is_invalid_state() {
        let (_, mut provider) = provider();
        assert!(matches!(
            provider.present(),
            Err(GraphicsError::InvalidState(_))
        ));
    }

    #[test]
    fn test_feature_tier_too_low() {
        let backend = Arc::new(DummyBackend::with_config(
            DummyConfig::default().with_feature_tier(FeatureTier::Basic),
        ));
        let mut provider = DeviceProvider::new(
            backend.clone(),
            ProviderConfig::default().with_min_feature_tier(FeatureTier::Advanced),
        );

        let err = provider
            .initialize(&SurfaceDescriptor::offscreen(64, 64))
            .unwrap_err();
        assert!(matches!(err, GraphicsError::DeviceCreation(_)));
        assert_eq!(provider.state(), ProviderState::Uninitialized);
        assert_eq!(backend.live_device_count(), 0);
    }

    #[test]
    fn test_zero_area_rejected() {
        let (_, mut provider) = provider();
        assert!(matches!(
            provider.initialize(&SurfaceDescriptor::offscreen(0, 600)),
            Err(GraphicsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_device_fails_fast_while_lost() {
        let (backend, mut provider) = provider();
        provider
            .initialize(&SurfaceDescriptor::offscreen(64, 64))
            .unwrap();
        backend.lose_device();

        assert_eq!(provider.present().unwrap(), PresentStatus::DeviceLost);
        assert!(provider.is_lost());
        assert_eq!(provider.device().unwrap_err(), GraphicsError::DeviceLost);
        assert_eq!(provider.target().unwrap_err(), GraphicsError::DeviceLost);
        // Presenting again while lost keeps reporting the status.
        assert_eq!(provider.present().unwrap(), PresentStatus::DeviceLost);
    }

    #[test]
    fn test_resize_replaces_target_only() {
        let (backend, mut provider) = provider();
        provider
            .initialize(&SurfaceDescriptor::offscreen(800, 600))
            .unwrap();

        let change = provider
            .on_surface_changed(&SurfaceDescriptor::offscreen(1024, 768))
            .unwrap();
        assert_eq!(change, SurfaceChange::TargetReplaced);
        assert_eq!(provider.generation(), 1);
        assert_eq!(backend.devices_created(), 1);
        assert_eq!(provider.target().unwrap().width(), 1024);

        let change = provider
            .on_surface_changed(&SurfaceDescriptor::offscreen(1024, 768))
            .unwrap();
        assert_eq!(change, SurfaceChange::Unchanged);
    }

    #[test]
    fn test_surface_change_can_recreate_device() {
        let (backend, mut provider) = provider();
        provider
            .initialize(&SurfaceDescriptor::window(1, 800, 600))
            .unwrap();

        let change = provider
            .on_surface_changed(&SurfaceDescriptor::window(2, 800, 600))
            .unwrap();
        assert_eq!(change, SurfaceChange::DeviceRecreated { generation: 2 });
        assert_eq!(backend.devices_created(), 2);
        assert_eq!(backend.live_device_count(), 1);
    }

    #[test]
    fn test_init_steps_run_in_order() {
        let (_, mut provider) = provider();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = order.clone();
            provider.add_init_step(name, move |device| {
                order.lock().push((name, device.generation()));
                Ok(())
            });
        }

        let surface = SurfaceDescriptor::offscreen(64, 64);
        provider.initialize(&surface).unwrap();
        provider.initialize(&surface).unwrap();
        assert_eq!(
            *order.lock(),
            vec![
                ("first", 1),
                ("second", 1),
                ("third", 1),
                ("first", 2),
                ("second", 2),
                ("third", 2)
            ]
        );
    }

    #[test]
    fn test_failing_init_step_fails_initialize() {
        let (backend, mut provider) = provider();
        provider.add_init_step("check limits", |device| {
            if device.capabilities().max_texture_dimension < DeviceCapabilities::default().max_texture_dimension * 2 {
                Err(GraphicsError::InvalidParameter("texture limit too low".to_string()))
            } else {
                Ok(())
            }
        });

        let err = provider
            .initialize(&SurfaceDescriptor::offscreen(64, 64))
            .unwrap_err();
        assert!(matches!(err, GraphicsError::InitStep { ref step, .. } if step == "check limits"));
        assert_eq!(provider.state(), ProviderState::Uninitialized);
        assert_eq!(provider.generation(), 0);
        assert_eq!(backend.live_device_count(), 0);
    }

    #[test]
    fn test_dispose_is_terminal() {
        let (backend, mut provider) = provider();
        provider
            .initialize(&SurfaceDescriptor::offscreen(64, 64))
            .unwrap();
        provider.dispose();
        provider.dispose();

        assert_eq!(provider.state(), ProviderState::Disposed);
        assert_eq!(backend.live_device_count(), 0);
        assert!(matches!(
            provider.initialize(&SurfaceDescriptor::offscreen(64, 64)),
            Err(GraphicsError::InvalidState(_))
        ));
    }

    #[test]
    fn test_created_resources_are_registered() {
        let (backend, mut provider) = provider();
        let mut registry = ResourceRegistry::new();
        provider
            .initialize(&SurfaceDescriptor::offscreen(64, 64))
            .unwrap();

        let texture = provider
            .create_texture(
                &mut registry,
                &TextureDescriptor::new_2d(4, 4, TextureFormat::Rgba8Unorm).with_label("white"),
                None,
            )
            .unwrap();
        assert_eq!(texture.generation(), 1);
        assert_eq!(registry.label(texture.handle()), Some("white"));
        assert_eq!(backend.live_resource_count(), 1);

        registry.release(texture.handle());
        assert_eq!(backend.live_resource_count(), 0);
    }

    #[test]
    fn test_submit_rejects_stale_handles() {
        let (backend, mut provider) = provider();
        let mut registry = ResourceRegistry::new();
        let surface = SurfaceDescriptor::offscreen(64, 64);
        provider.initialize(&surface).unwrap();
        let shader = provider
            .create_shader_module(&mut registry, &ShaderDescriptor::new("fn main() {}"))
            .unwrap();

        backend.lose_device();
        provider.initialize(&surface).unwrap();

        let mut commands = CommandList::new();
        commands.draw(shader.handle(), 3);
        assert!(matches!(
            provider.submit(&commands, &registry),
            Err(GraphicsError::ResourceStale { .. })
        ));
    }
}
