//! Access key set loader.

use std::path::Path;
use std::sync::Arc;

use behavior_tree::{Clock, SharedAccessKeys};

use crate::loaders::{LoadResult, RecordLoader};

/// Loader for shared access key registries.
pub struct KeySetLoader;

impl KeySetLoader {
    /// Load a key set record and build the registry from it.
    ///
    /// Entries the registry skips are logged, not returned as errors.
    pub fn load(path: &Path, clock: Arc<dyn Clock>) -> LoadResult<SharedAccessKeys> {
        let record = RecordLoader::load(path)?;
        let registry = SharedAccessKeys::load(&record, clock);
        for issue in registry.issues() {
            tracing::warn!(file = %path.display(), %issue, "skipped access key entry");
        }
        tracing::debug!(registry = registry.name(), keys = registry.len(), "access keys loaded");
        Ok(registry)
    }
}
