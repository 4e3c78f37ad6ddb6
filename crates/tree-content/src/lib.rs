//! Data-driven behavior tree content.
//!
//! This crate reads the files a simulation is built from:
//! - Access key sets (RON/JSON records)
//! - Behavior tree definitions (RON/JSON records)
//! - Driver configuration (TOML)
//!
//! Everything is parsed into [`behavior_tree::Record`]s first and handed to
//! the core loaders, so the core never touches the filesystem.

pub mod loaders;

pub use loaders::{
    ConfigLoader, ContentFactory, KeySetLoader, LoadResult, RecordFormat, RecordLoader, SimConfig,
    Storage, TreeFileLoader,
};
