//! Resource registry.
//!
//! The [`ResourceRegistry`] is the single owner of every device-dependent
//! resource. It hands out [`ResourceHandle`]s stamped with the device
//! generation they were created on and is responsible for tearing resources
//! down in a well-defined order.
//!
//! # Ordering
//!
//! Entries are kept in registration order. [`ResourceRegistry::release_all`]
//! runs release callbacks in strict reverse of that order, so a resource is
//! always released before anything registered ahead of it.
//!
//! # Device replacement
//!
//! When the device is destroyed, the backing memory of every resource is
//! already gone. A registry attached to a provider's [`DeviceEpoch`] notices
//! this by itself and forgets those entries without running their callbacks,
//! even if no new device could be created. Registries used without a
//! provider switch explicitly with [`ResourceRegistry::begin_generation`].
//! Handles that outlive the switch report [`GraphicsError::ResourceStale`]
//! from [`ResourceRegistry::validate`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::GraphicsError;

/// Callback that frees a resource's backing memory.
pub type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Registration-order identifier of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Wrap a raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of resource a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// GPU buffer.
    Buffer,
    /// GPU texture.
    Texture,
    /// Shader module.
    Shader,
    /// Anything else a caller wants torn down with the device.
    Custom,
}

/// Handle to a registered resource.
///
/// Cheap to copy. Carries the device generation it was created on so
/// staleness can be detected without touching the resource itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: ResourceId,
    generation: u64,
    kind: ResourceKind,
}

impl ResourceHandle {
    /// Registry id.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Device generation the resource was created on.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

/// Generation of the device a provider currently owns, shared with the
/// registries its resources live in.
///
/// Reads 0 while no device exists, e.g. after the old device was destroyed
/// and its replacement failed.
#[derive(Debug, Clone, Default)]
pub struct DeviceEpoch(Arc<AtomicU64>);

impl DeviceEpoch {
    /// New epoch with no device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the live device, 0 if there is none.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, generation: u64) {
        self.0.store(generation, Ordering::Release);
    }

    fn same_as(&self, other: &DeviceEpoch) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

struct Entry {
    handle: ResourceHandle,
    label: String,
    release: ReleaseFn,
}

/// Owner of all device-dependent resources.
pub struct ResourceRegistry {
    generation: u64,
    next_id: u64,
    entries: BTreeMap<ResourceId, Entry>,
    epoch: Option<DeviceEpoch>,
}

impl ResourceRegistry {
    /// Create an empty registry for generation 0 (no device yet).
    pub fn new() -> Self {
        Self {
            generation: 0,
            next_id: 1,
            entries: BTreeMap::new(),
            epoch: None,
        }
    }

    /// Create an empty registry following a provider's device.
    pub fn attached(epoch: DeviceEpoch) -> Self {
        let mut registry = Self::new();
        registry.attach(epoch);
        registry
    }

    /// Follow `epoch` from now on.
    ///
    /// The [`DeviceProvider`](crate::DeviceProvider) attaches every registry
    /// it creates resources in, so this is only needed to track the device
    /// before the first resource exists.
    pub fn attach(&mut self, epoch: DeviceEpoch) {
        if !self.epoch.as_ref().is_some_and(|current| current.same_as(&epoch)) {
            self.epoch = Some(epoch);
        }
        self.sync();
    }

    /// Forget entries of a device that no longer exists.
    ///
    /// Returns how many were dropped. Unattached registries only change
    /// generation through [`begin_generation`](Self::begin_generation).
    pub fn sync(&mut self) -> usize {
        match self.epoch.as_ref().map(DeviceEpoch::current) {
            Some(current) if current != self.generation => self.switch_to(current),
            _ => 0,
        }
    }

    /// Device generation new registrations are stamped with.
    pub fn generation(&self) -> u64 {
        self.epoch
            .as_ref()
            .map_or(self.generation, DeviceEpoch::current)
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        if self.is_current() { self.entries.len() } else { 0 }
    }

    /// True if no resources are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_current(&self) -> bool {
        self.generation() == self.generation
    }

    /// Register a resource and the callback that frees it.
    pub fn register(
        &mut self,
        kind: ResourceKind,
        label: impl Into<String>,
        release: impl FnOnce() + Send + 'static,
    ) -> ResourceHandle {
        self.sync();
        let id = ResourceId(self.next_id);
        self.next_id += 1;

        let handle = ResourceHandle {
            id,
            generation: self.generation,
            kind,
        };
        let label = label.into();
        log::trace!(
            "ResourceRegistry: registered {:?} '{}' as {} (generation {})",
            kind,
            label,
            id,
            self.generation
        );

        self.entries.insert(
            id,
            Entry {
                handle,
                label,
                release: Box::new(release),
            },
        );
        handle
    }

    /// Release a single resource.
    ///
    /// Returns `true` if a release callback ran. Releasing an unknown,
    /// already released or stale handle does nothing.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        self.sync();
        if handle.generation != self.generation {
            log::trace!(
                "ResourceRegistry: ignoring release of stale {} (generation {} != {})",
                handle.id,
                handle.generation,
                self.generation
            );
            return false;
        }

        match self.entries.remove(&handle.id) {
            Some(entry) => {
                log::trace!("ResourceRegistry: releasing {} '{}'", handle.id, entry.label);
                (entry.release)();
                true
            }
            None => false,
        }
    }

    /// Release every live resource in reverse registration order.
    ///
    /// Returns the number of callbacks that ran.
    /// Entries of a destroyed device are dropped without running their
    /// callbacks.
    pub fn release_all(&mut self) -> usize {
        self.sync();
        let mut released = 0;
        while let Some((id, entry)) = self.entries.pop_last() {
            log::trace!("ResourceRegistry: releasing {} '{}'", id, entry.label);
            (entry.release)();
            released += 1;
        }
        if released > 0 {
            log::debug!("ResourceRegistry: released {} resources", released);
        }
        released
    }

    /// Switch to a new device generation.
    ///
    /// Entries from the previous generation are forgotten without running
    /// their callbacks. Returns how many were dropped. Asking for the
    /// current generation again is a no-op. An attached registry follows its
    /// epoch and ignores this call.
    pub fn begin_generation(&mut self, generation: u64) -> usize {
        if self.epoch.is_some() {
            return self.sync();
        }
        if generation == self.generation {
            return 0;
        }
        if generation < self.generation {
            log::warn!(
                "ResourceRegistry: generation going backwards ({} -> {})",
                self.generation,
                generation
            );
        }
        self.switch_to(generation)
    }

    fn switch_to(&mut self, generation: u64) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        if dropped > 0 {
            log::info!(
                "ResourceRegistry: dropped {} resources of generation {}",
                dropped,
                self.generation
            );
        }
        self.generation = generation;
        dropped
    }

    /// Check that a handle may still be used.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::ResourceStale`] if the handle is from another generation
    /// - [`GraphicsError::ResourceReleased`] if the resource was released
    pub fn validate(&self, handle: ResourceHandle) -> Result<(), GraphicsError> {
        let current = self.generation();
        if handle.generation != current {
            return Err(GraphicsError::ResourceStale {
                id: handle.id,
                resource_generation: handle.generation,
                device_generation: current,
            });
        }
        if self.is_current() && self.entries.contains_key(&handle.id) {
            Ok(())
        } else {
            Err(GraphicsError::ResourceReleased(handle.id))
        }
    }

    /// Label a live resource was registered with.
    pub fn label(&self, handle: ResourceHandle) -> Option<&str> {
        self.entries
            .get(&handle.id)
            .filter(|entry| entry.handle == handle && self.is_current())
            .map(|entry| entry.label.as_str())
    }

    /// Live handles in registration order.
    pub fn live_handles(&self) -> Vec<ResourceHandle> {
        if !self.is_current() {
            return Vec::new();
        }
        self.entries.values().map(|entry| entry.handle).collect()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("generation", &self.generation())
            .field("live", &self.len())
            .field("attached", &self.epoch.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(ResourceRegistry: Send);
