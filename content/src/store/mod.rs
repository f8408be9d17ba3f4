//! Named asset lookup.
//!
//! The [`AssetStore`] routes asset names to mounted [`AssetSource`]s. Names
//! are structured as `"source_name/rest/of/path"`: the first segment selects
//! the source. If it matches no mount, the default source (if set) is tried
//! with the full name.
//!
//! # Sources
//!
//! - [`MemorySource`] - In-memory storage for tests and embedded assets
//! - [`DirectorySource`] - Files under a directory on disk (native only)

#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
mod directory;
mod memory;
pub mod path;
mod source;

use std::collections::HashMap;

use crate::error::StoreError;

#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
pub use directory::DirectorySource;
pub use memory::MemorySource;
pub use source::AssetSource;

/// Router from asset names to mounted sources.
///
/// Configure it with [`mount`](Self::mount) and
/// [`set_default`](Self::set_default), then share it behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// let mut store = AssetStore::new();
/// store.mount("assets", DirectorySource::new("./assets"));
/// store.mount("builtin", MemorySource::new());
/// store.set_default("assets");
///
/// // Reads ./assets/textures/brick.png
/// let bytes = store.read("assets/textures/brick.png")?;
///
/// // With the default source, so does this:
/// let bytes = store.read("textures/brick.png")?;
/// ```
#[derive(Default)]
pub struct AssetStore {
    sources: HashMap<String, Box<dyn AssetSource>>,
    default_source: Option<String>,
}

impl AssetStore {
    /// Create an empty store with no mounted sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a source under the given name, replacing any previous one.
    pub fn mount(&mut self, name: impl Into<String>, source: impl AssetSource) {
        let name = name.into();
        log::debug!("AssetStore: mounted source '{}'", name);
        self.sources.insert(name, Box::new(source));
    }

    /// Set the source used when a name does not start with a mount name.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default_source = Some(name.into());
    }

    /// Names of mounted sources, sorted.
    pub fn mounts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Read the entire contents of an asset.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let (source, path) = self.resolve(name)?;
        source.read(&path)
    }

    /// Check whether an asset exists.
    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let (source, path) = self.resolve(name)?;
        source.exists(&path)
    }

    /// List the immediate children of a directory.
    pub fn list(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let (source, path) = self.resolve(name)?;
        source.list(&path)
    }

    fn resolve(&self, name: &str) -> Result<(&dyn AssetSource, String), StoreError> {
        let normalized = path::normalize(name)?;
        let (first, rest) = path::split_source(&normalized);

        if let Some(source) = self.sources.get(first) {
            return Ok((source.as_ref(), rest.to_owned()));
        }

        if let Some(default_name) = &self.default_source
            && let Some(source) = self.sources.get(default_name)
        {
            return Ok((source.as_ref(), normalized));
        }

        Err(StoreError::NoSuchSource(first.to_owned()))
    }
}

static_assertions::assert_impl_all!(AssetStore: Send, Sync);
