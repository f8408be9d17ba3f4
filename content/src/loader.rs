//! Generation-aware content loading.
//!
//! [`ContentLoader`] maps `(name, asset type)` to a constructed, shared
//! asset. Within one device generation every load of the same key returns
//! the same `Arc`. When the provider reports a new generation, the whole
//! cache is dropped before the lookup, so stale GPU objects are never
//! handed out.

use std::any::{TypeId, type_name};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hearth_graphics::BufferUsage;

use crate::error::{ContentError, StoreError};
use crate::queue::{FetchQueue, FetchRequest, Fetched};
use crate::reader::{AnyAsset, AssetReader, BlobReader, ErasedReader, LoadContext};
#[cfg(feature = "texture")]
use crate::reader::TextureReader;
#[cfg(feature = "wgsl")]
use crate::reader::ShaderReader;
use crate::store::{AssetStore, path};

type CacheKey = (String, TypeId);

struct RegisteredReader {
    reader: Arc<dyn ErasedReader>,
    type_name: &'static str,
}

/// Result of one background request, reported by
/// [`ContentLoader::poll_completed`].
///
/// On success the asset is in the cache; fetch it with
/// [`ContentLoader::load`].
#[derive(Debug)]
pub struct LoadOutcome {
    /// Normalized asset name.
    pub name: String,
    /// Rust type name of the requested asset.
    pub type_name: &'static str,
    /// Whether construction succeeded.
    pub result: Result<(), ContentError>,
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Loads answered from the cache.
    pub hits: u64,
    /// Loads that constructed a new asset.
    pub misses: u64,
    /// Times a non-empty cache was dropped, either explicitly or because
    /// the device generation changed.
    pub invalidations: u64,
}

/// Loads named assets into GPU-backed objects and caches them per device
/// generation.
pub struct ContentLoader {
    store: Arc<AssetStore>,
    readers: HashMap<TypeId, RegisteredReader>,
    cache: HashMap<CacheKey, AnyAsset>,
    generation: Option<u64>,
    queue: Option<FetchQueue>,
    pending: HashSet<CacheKey>,
    deferred: Vec<Fetched>,
    stats: LoaderStats,
}

impl ContentLoader {
    /// Loader with no readers registered.
    pub fn new(store: Arc<AssetStore>) -> Self {
        Self {
            store,
            readers: HashMap::new(),
            cache: HashMap::new(),
            generation: None,
            queue: None,
            pending: HashSet::new(),
            deferred: Vec::new(),
            stats: LoaderStats::default(),
        }
    }

    /// Loader with the built-in readers for textures, shaders and blobs.
    pub fn with_default_readers(store: Arc<AssetStore>) -> Self {
        let mut loader = Self::new(store);
        #[cfg(feature = "texture")]
        loader.register_reader(TextureReader);
        #[cfg(feature = "wgsl")]
        loader.register_reader(ShaderReader);
        loader.register_reader(BlobReader::new(BufferUsage::Storage));
        loader
    }

    /// Register a reader for its asset type, replacing any previous one.
    pub fn register_reader<R: AssetReader>(&mut self, reader: R) {
        let type_name = type_name::<R::Asset>();
        log::debug!("ContentLoader: registered reader for {}", type_name);
        self.readers.insert(
            TypeId::of::<R::Asset>(),
            RegisteredReader {
                reader: Arc::new(reader),
                type_name,
            },
        );
    }

    /// The store assets are read from.
    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    /// Load an asset, constructing it on first use in this device generation.
    ///
    /// # Errors
    ///
    /// - [`ContentError::Graphics`] with `DeviceLost` while the device is lost
    /// - [`ContentError::AssetNotFound`] if the store has no such asset
    /// - [`ContentError::AssetFormat`] if the bytes cannot be decoded
    /// - [`ContentError::NoReader`] if no reader produces `T`
    pub fn load<T: Send + Sync + 'static>(
        &mut self,
        name: &str,
        ctx: &mut LoadContext<'_>,
    ) -> Result<Arc<T>, ContentError> {
        let name = normalize(name)?;
        let device = ctx.provider.device()?;
        self.sync_generation(device.generation());

        let key = (name, TypeId::of::<T>());
        if let Some(asset) = self.cache.get(&key) {
            self.stats.hits += 1;
            return downcast::<T>(Arc::clone(asset));
        }

        let reader = Arc::clone(&self.reader_for::<T>()?.reader);
        let bytes = self
            .store
            .read(&key.0)
            .map_err(|e| ContentError::from_store(&key.0, e))?;
        let asset = self.construct(reader, key, &bytes, ctx)?;
        downcast::<T>(asset)
    }

    /// Whether `name` is cached as a `T` for the current generation.
    pub fn is_cached<T: 'static>(&self, name: &str) -> bool {
        path::normalize(name)
            .is_ok_and(|name| self.cache.contains_key(&(name, TypeId::of::<T>())))
    }

    /// Drop every cached asset.
    ///
    /// The GPU resources stay in the registry; only the loader's references
    /// are released. Clearing an empty cache is not counted.
    pub fn invalidate(&mut self) {
        if self.cache.is_empty() {
            return;
        }
        log::debug!("ContentLoader: dropping {} cached assets", self.cache.len());
        self.cache.clear();
        self.stats.invalidations += 1;
    }

    /// Number of cached assets.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Generation the cache was built against, if any load has happened.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Cache statistics.
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    // ========================================================================
    // Background requests
    // ========================================================================

    /// Fetch an asset's bytes in the background.
    ///
    /// Returns `Ok(false)` if the same request is already pending. The asset
    /// is constructed by a later [`poll_completed`](Self::poll_completed).
    pub fn request<T: Send + Sync + 'static>(&mut self, name: &str) -> Result<bool, ContentError> {
        let name = normalize(name)?;
        let type_name = self.reader_for::<T>()?.type_name;
        let key = (name, TypeId::of::<T>());
        if self.pending.contains(&key) {
            return Ok(false);
        }

        if self.queue.is_none() {
            self.queue = Some(FetchQueue::spawn(Arc::clone(&self.store))?);
        }
        let Some(queue) = &self.queue else {
            return Ok(false);
        };

        let request = FetchRequest {
            name: key.0.clone(),
            type_id: key.1,
            type_name,
        };
        if !queue.submit(request) {
            return Err(ContentError::Store(StoreError::Io(std::io::Error::other(
                "content fetch worker stopped",
            ))));
        }
        self.pending.insert(key);
        Ok(true)
    }

    /// Number of requests not yet reported by `poll_completed`.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Construct every fetched asset and report the outcomes.
    ///
    /// While no device is available, fetched bytes are held and retried on
    /// the next poll.
    pub fn poll_completed(&mut self, ctx: &mut LoadContext<'_>) -> Vec<LoadOutcome> {
        let mut ready = std::mem::take(&mut self.deferred);
        if let Some(queue) = &self.queue {
            ready.extend(queue.drain());
        }
        if ready.is_empty() {
            return Vec::new();
        }

        let device = match ctx.provider.device() {
            Ok(device) => device,
            Err(_) => {
                log::debug!(
                    "ContentLoader: no device, deferring {} fetched assets",
                    ready.len()
                );
                self.deferred = ready;
                return Vec::new();
            }
        };
        self.sync_generation(device.generation());

        let mut outcomes = Vec::with_capacity(ready.len());
        for fetched in ready {
            let key = (fetched.name, fetched.type_id);
            self.pending.remove(&key);

            let result = match fetched.bytes {
                Err(err) => Err(ContentError::from_store(&key.0, err)),
                Ok(_) if self.cache.contains_key(&key) => Ok(()),
                Ok(bytes) => match self.readers.get(&key.1) {
                    Some(registered) => {
                        let reader = Arc::clone(&registered.reader);
                        self.construct(reader, key.clone(), &bytes, ctx).map(|_| ())
                    }
                    None => Err(ContentError::NoReader {
                        type_name: fetched.type_name,
                    }),
                },
            };

            if let Err(err) = &result {
                log::warn!("ContentLoader: background load of '{}' failed: {}", key.0, err);
            }
            outcomes.push(LoadOutcome {
                name: key.0,
                type_name: fetched.type_name,
                result,
            });
        }
        outcomes
    }

    /// Poll until every pending request completes or `timeout` elapses.
    pub fn wait_completed(
        &mut self,
        ctx: &mut LoadContext<'_>,
        timeout: Duration,
    ) -> Vec<LoadOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = Vec::new();

        loop {
            outcomes.extend(self.poll_completed(ctx));
            if self.pending.is_empty() {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let Some(fetched) = self.queue.as_ref().and_then(|q| q.recv_timeout(remaining)) else {
                break;
            };
            self.deferred.push(fetched);
        }
        outcomes
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn sync_generation(&mut self, generation: u64) {
        match self.generation {
            Some(current) if current == generation => {}
            Some(current) => {
                log::info!(
                    "ContentLoader: device generation {} -> {}, invalidating cache",
                    current,
                    generation
                );
                self.invalidate();
                self.generation = Some(generation);
            }
            None => self.generation = Some(generation),
        }
    }

    fn reader_for<T: 'static>(&self) -> Result<&RegisteredReader, ContentError> {
        self.readers
            .get(&TypeId::of::<T>())
            .ok_or(ContentError::NoReader {
                type_name: type_name::<T>(),
            })
    }

    fn construct(
        &mut self,
        reader: Arc<dyn ErasedReader>,
        key: CacheKey,
        bytes: &[u8],
        ctx: &mut LoadContext<'_>,
    ) -> Result<AnyAsset, ContentError> {
        let asset = reader.read_erased(&key.0, bytes, ctx)?;
        self.stats.misses += 1;
        log::debug!("ContentLoader: loaded '{}'", key.0);
        self.cache.insert(key, Arc::clone(&asset));
        Ok(asset)
    }
}

fn normalize(name: &str) -> Result<String, ContentError> {
    path::normalize(name).map_err(|e| ContentError::from_store(name, e))
}

fn downcast<T: Send + Sync + 'static>(asset: AnyAsset) -> Result<Arc<T>, ContentError> {
    asset.downcast::<T>().map_err(|_| ContentError::NoReader {
        type_name: type_name::<T>(),
    })
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("readers", &self.readers.len())
            .field("cached", &self.cache.len())
            .field("generation", &self.generation)
            .field("pending", &self.pending.len())
            .field("stats", &self.stats)
            .finish()
    }
}

static_assertions::assert_impl_all!(ContentLoader: Send);
