//! Content loaders for reading behavior tree data from files.
//!
//! Record files (`.ron`, `.json`) become [`behavior_tree::Record`]s, which the
//! key-set and tree loaders hand to the core. Driver configuration is TOML.

pub mod config;
pub mod factory;
pub mod keys;
pub mod record;
pub mod tree;

pub use config::{ConfigLoader, SimConfig};
pub use factory::{ContentFactory, Storage};
pub use keys::KeySetLoader;
pub use record::{RecordFormat, RecordLoader};
pub use tree::TreeFileLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
