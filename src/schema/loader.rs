use std::path::Path;
use std::sync::Arc;

use super::{find_schema_file, parse_schema_source, Clock, Schema, SchemaCache, SystemClock};
use crate::config::{RuleOptions, SchemaFallback};
use crate::error::SchemaError;
use crate::extract::PropertyValue;

/// Finds, parses and caches the project's sprinkles schema.
pub struct SchemaLoader {
    options: RuleOptions,
    cache: SchemaCache,
    clock: Arc<dyn Clock>,
}

impl SchemaLoader {
    pub fn new(options: RuleOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    pub fn with_clock(options: RuleOptions, clock: Arc<dyn Clock>) -> Self {
        let cache = SchemaCache::new(options.cache_ttl());
        Self { options, cache, clock }
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// Cached schema for `project_root`. The cache is keyed by load time only,
    /// so a different root inside the expiry window still gets the cached
    /// table. Never fails: problems are logged and yield the fallback table.
    pub fn load(&self, project_root: &Path) -> Arc<Schema> {
        let now = self.clock.now();
        self.cache.get_or_refresh(now, || self.load_uncached(project_root))
    }

    /// Schema for the configured project root.
    pub fn schema(&self) -> Arc<Schema> {
        self.load(&self.options.project_root())
    }

    pub fn is_known_property(&self, name: &str) -> bool {
        self.schema().is_known_property(name)
    }

    pub fn is_allowed_value(&self, name: &str, value: &PropertyValue) -> bool {
        self.schema().is_allowed_value(name, value)
    }

    /// Drop the cached table so the next query reloads.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Locate and parse the schema module, bypassing the cache.
    pub fn read_schema(&self, project_root: &Path) -> Result<Schema, SchemaError> {
        let path = find_schema_file(
            project_root,
            &self.options.schema_patterns,
            &self.options.ignored_dirs,
        )
        .ok_or_else(|| SchemaError::NotFound {
            root: project_root.to_path_buf(),
        })?;
        let text = std::fs::read_to_string(&path).map_err(|source| SchemaError::Io {
            path: path.clone(),
            source,
        })?;
        let schema = parse_schema_source(&path, &text, &self.options)?;
        tracing::debug!(path = %path.display(), properties = schema.len(), "loaded sprinkles schema");
        Ok(schema)
    }

    fn load_uncached(&self, project_root: &Path) -> Schema {
        match self.read_schema(project_root) {
            Ok(schema) => schema,
            Err(err @ SchemaError::NotFound { .. }) => {
                tracing::warn!(%err, "sprinkles schema unavailable");
                self.fallback()
            }
            Err(err) => {
                tracing::error!(%err, "sprinkles schema unusable");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Schema {
        match self.options.fallback {
            SchemaFallback::Empty => Schema::empty(),
            SchemaFallback::Builtin => Schema::builtin(),
        }
    }
}
