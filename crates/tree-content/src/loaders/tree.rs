//! Behavior tree file loader.

use std::path::Path;

use behavior_tree::{AccessKeyProvider, HandlerRegistry, LoadedTree, TreeLoader};

use crate::loaders::{LoadResult, RecordLoader};

/// Loader for behavior tree definitions.
pub struct TreeFileLoader;

impl TreeFileLoader {
    /// Load the root record at `path` and bind it into a tree named `name`.
    ///
    /// Skipped elements are logged and kept in [`LoadedTree::issues`].
    pub fn load<C: Send + 'static>(
        path: &Path,
        name: &str,
        handlers: &HandlerRegistry<C>,
        keys: &dyn AccessKeyProvider,
        context: C,
    ) -> LoadResult<LoadedTree<C>> {
        let record = RecordLoader::load(path)?;
        let loaded = TreeLoader::new(handlers, keys).load(name, &record, context);
        for issue in &loaded.issues {
            tracing::warn!(tree = name, file = %path.display(), %issue, "skipped tree element");
        }
        if !loaded.tree.has_root() {
            tracing::warn!(tree = name, file = %path.display(), "tree has no root");
        }
        Ok(loaded)
    }
}
