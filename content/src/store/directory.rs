use std::path::PathBuf;

use crate::error::StoreError;

use super::source::AssetSource;

/// Asset source reading from a directory on disk.
///
/// The root path is joined with the asset path to form the actual file
/// path. Path traversal is prevented by name normalization in the
/// [`AssetStore`](super::AssetStore), which rejects `..` before a path
/// reaches the source.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at the given directory.
    ///
    /// The directory does not need to exist yet; it is checked at read time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl AssetSource for DirectorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.resolve(path).is_file())
    }

    fn list(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let full_path = self.resolve(path);
        if !full_path.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(full_path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_owned());
            }
        }
        entries.sort();
        Ok(entries)
    }
}
