//! Read-only projections over the upstream configuration query.

pub mod color;
pub mod query;
pub mod source;

pub use color::Rgb;
pub use query::{AppConfig, QueryResult};
pub use source::{FileQuerySource, HttpQuerySource, QuerySource, StaticQuerySource};

use crate::error::Result;
use tracing::{debug, warn};

/// Caches the last query result. `colorscale`, `config` and `color_pool` are
/// all views of that one result.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    result: QueryResult,
    revision: u64,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_result(result: QueryResult) -> Self {
        Self {
            result,
            revision: 1,
        }
    }

    /// Fetches a fresh result. Returns `true` when it differs from the cached
    /// one; the revision only moves on change.
    pub fn load(&mut self, source: &dyn QuerySource) -> Result<bool> {
        let result = source.fetch()?;
        if result == self.result && self.revision > 0 {
            debug!(revision = self.revision, "app config unchanged");
            return Ok(false);
        }
        self.result = result;
        self.revision += 1;
        debug!(revision = self.revision, "app config updated");
        Ok(true)
    }

    /// Like `load`, but keeps the cached result when the fetch fails.
    pub fn load_or_keep(&mut self, source: &dyn QuerySource) -> bool {
        match self.load(source) {
            Ok(changed) => changed,
            Err(err) => {
                warn!(error = %err, "failed to load app config; keeping previous values");
                false
            }
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn colorscale(&self) -> &[Rgb] {
        &self.result.colorscale
    }

    pub fn config(&self) -> &AppConfig {
        &self.result.config
    }

    pub fn color_pool(&self) -> &[String] {
        &self.result.config.color_pool
    }
}
