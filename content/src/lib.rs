//! # Hearth Content
//!
//! Named assets turned into GPU-backed objects.
//!
//! - [`AssetStore`] - Routes asset names to mounted sources
//! - [`ContentLoader`] - Builds assets with registered [`AssetReader`]s and
//!   caches them for the lifetime of one device generation
//!
//! ## Example
//!
//! ```ignore
//! use hearth_content::{AssetStore, ContentLoader, DirectorySource, LoadContext};
//! use hearth_graphics::Texture;
//!
//! let mut store = AssetStore::new();
//! store.mount("assets", DirectorySource::new("./assets"));
//! store.set_default("assets");
//!
//! let mut loader = ContentLoader::with_default_readers(Arc::new(store));
//! let mut ctx = LoadContext::new(&mut provider, &mut registry);
//! let brick = loader.load::<Texture>("textures/brick.png", &mut ctx)?;
//! ```

pub mod error;
pub mod loader;
mod queue;
pub mod reader;
pub mod store;

pub use error::{ContentError, StoreError};
pub use loader::{ContentLoader, LoadOutcome, LoaderStats};
pub use reader::{AssetReader, BlobReader, LoadContext};
#[cfg(feature = "wgsl")]
pub use reader::ShaderReader;
#[cfg(feature = "texture")]
pub use reader::TextureReader;
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
pub use store::DirectorySource;
pub use store::{AssetSource, AssetStore, MemorySource};

/// Content library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the content subsystem.
pub fn init() {
    log::info!("Hearth Content v{} initialized", VERSION);
}
