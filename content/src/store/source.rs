use crate::error::StoreError;

/// A place asset bytes come from.
///
/// Sources are read from the main thread and from the loader's worker
/// thread, so they must be `Send + Sync`. All calls are blocking.
///
/// # Path Contract
///
/// Paths passed to source methods are already normalized by the
/// [`AssetStore`](super::AssetStore): forward slashes, no leading or
/// trailing slashes, no `..` or `.` segments, mount prefix stripped.
pub trait AssetSource: Send + Sync + 'static {
    /// Read the entire contents of an asset.
    fn read(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Check whether an asset exists.
    fn exists(&self, path: &str) -> Result<bool, StoreError>;

    /// List the immediate children of a directory, sorted.
    ///
    /// Returns an empty vec for non-existent directories.
    fn list(&self, path: &str) -> Result<Vec<String>, StoreError>;
}
