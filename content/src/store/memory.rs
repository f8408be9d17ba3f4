use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;

use super::source::AssetSource;

/// In-memory asset source for tests and embedded assets.
///
/// Cloning shares the underlying map, so assets can still be inserted after
/// the source has been mounted in an [`AssetStore`](super::AssetStore).
/// Directories are implicit: they exist whenever an asset name has them
/// as a prefix.
///
/// # Example
///
/// ```ignore
/// let builtin = MemorySource::new();
/// builtin.insert("shaders/quad.wgsl", include_bytes!("quad.wgsl").to_vec());
///
/// let mut store = AssetStore::new();
/// store.mount("builtin", builtin);
/// ```
#[derive(Clone, Default)]
pub struct MemorySource {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySource {
    /// Create an empty in-memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset, overwriting any existing one with the same name.
    pub fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.write().insert(path.into(), data.into());
    }

    /// Remove an asset, returning its bytes if it existed.
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.files.write().remove(path)
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_owned()))
    }

    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.files.read().contains_key(path))
    }

    fn list(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let files = self.files.read();
        let children: BTreeSet<&str> = files
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .filter(|child| !child.is_empty())
            .collect();
        Ok(children.into_iter().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_read() {
        let mem = MemorySource::new();
        mem.insert("a/b.txt", b"hello".to_vec());
        assert_eq!(mem.read("a/b.txt").unwrap(), b"hello");
        assert!(matches!(mem.read("a/c.txt"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_children() {
        let mem = MemorySource::new();
        mem.insert("shaders/quad.wgsl", "");
        mem.insert("shaders/post/blur.wgsl", "");
        mem.insert("textures/brick.png", "");

        assert_eq!(mem.list("").unwrap(), vec!["shaders", "textures"]);
        assert_eq!(mem.list("shaders").unwrap(), vec!["post", "quad.wgsl"]);
        assert!(mem.list("missing").unwrap().is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let mem = MemorySource::new();
        let other = mem.clone();
        other.insert("late.bin", vec![1u8, 2, 3]);
        assert!(mem.exists("late.bin").unwrap());
        assert_eq!(mem.remove("late.bin"), Some(vec![1, 2, 3]));
        assert!(other.is_empty());
    }
}
