//! Content loaders for reading battle data from files.
//!
//! Every loader offers `load(path)` for files and `parse(str)` for in-memory
//! content.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod session;

pub use catalog::{CatalogLoader, WeaponEntry};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use session::SessionLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
