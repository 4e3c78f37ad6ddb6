//! Content factory for building registries and trees from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use behavior_tree::{
    AccessKeyProvider, BehaviorTree, Clock, HandlerRegistry, Record, SharedAccessKeys, SystemClock,
};

use crate::loaders::{
    ConfigLoader, KeySetLoader, LoadResult, RecordFormat, RecordLoader, SimConfig, TreeFileLoader,
};

/// Source of key sets and tree definitions, addressed by source id.
pub trait Storage {
    /// Load a raw record file.
    fn load_record(&self, path: &Path) -> LoadResult<Record>;

    /// Load the access key registry stored under `source_id`.
    fn load_registry(&self, source_id: &str) -> LoadResult<SharedAccessKeys>;

    /// Load the tree stored under `source_id`, binding its handlers and
    /// resolving its access keys against `registry`.
    fn load_tree<C: Send + 'static>(
        &self,
        source_id: &str,
        tree_name: &str,
        registry: &dyn AccessKeyProvider,
        handlers: &HandlerRegistry<C>,
        context: C,
    ) -> LoadResult<BehaviorTree<C>>;
}

/// Content factory that loads all simulation content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── keys.ron
/// └── trees/
///     ├── guard.ron
///     └── smith.json
/// ```
///
/// A source id is a file stem; `.ron` is preferred over `.json` when both
/// exist.
pub struct ContentFactory {
    data_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Replaces the clock handed to time-limited keys.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load driver configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resolve(&self, dir: &Path, source_id: &str) -> LoadResult<PathBuf> {
        RecordFormat::EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", source_id, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                anyhow::anyhow!("No record file for `{}` in {}", source_id, dir.display())
            })
    }
}

impl Storage for ContentFactory {
    fn load_record(&self, path: &Path) -> LoadResult<Record> {
        RecordLoader::load(path)
    }

    fn load_registry(&self, source_id: &str) -> LoadResult<SharedAccessKeys> {
        let path = self.resolve(&self.data_dir, source_id)?;
        KeySetLoader::load(&path, Arc::clone(&self.clock))
    }

    fn load_tree<C: Send + 'static>(
        &self,
        source_id: &str,
        tree_name: &str,
        registry: &dyn AccessKeyProvider,
        handlers: &HandlerRegistry<C>,
        context: C,
    ) -> LoadResult<BehaviorTree<C>> {
        let path = self.resolve(&self.data_dir.join("trees"), source_id)?;
        let loaded = TreeFileLoader::load(&path, tree_name, handlers, registry, context)?;
        Ok(loaded.tree)
    }
}
