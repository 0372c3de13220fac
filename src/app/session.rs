// GolNumeros - app/session.rs
//
// Load-and-hold cache for the two source tables.
//
// Tables are loaded once per source pair and then treated as read-only for
// the rest of the session. Refresh policy:
// - `RefreshPolicy::Never` (default): held until `invalidate()` is called.
// - `RefreshPolicy::Ttl(d)`: reloaded on the first request after `d` elapsed.
// Nothing is written to disk.

use crate::core::model::{Dataset, Table};
use crate::util::error::LoadError;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Something that can produce a normalised table from a source identifier
/// (a file path for the CSV loader).
pub trait TableSource {
    fn load(&self, source: &str) -> Result<Table, LoadError>;
}

/// Identity of a dataset: the two sources it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub analysis: String,
    pub day_matches: String,
}

impl SourceKey {
    pub fn new(analysis: impl Into<String>, day_matches: impl Into<String>) -> Self {
        Self {
            analysis: analysis.into(),
            day_matches: day_matches.into(),
        }
    }
}

/// When a cached dataset is considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Keep until explicitly invalidated.
    #[default]
    Never,
    /// Reload once the entry is older than this.
    Ttl(Duration),
}

#[derive(Debug)]
struct CachedDataset {
    dataset: Dataset,
    loaded_at: DateTime<Utc>,
}

/// Memoised loader keyed by `SourceKey`.
#[derive(Debug)]
pub struct DatasetCache<S: TableSource> {
    source: S,
    policy: RefreshPolicy,
    entries: HashMap<SourceKey, CachedDataset>,
}

impl<S: TableSource> DatasetCache<S> {
    pub fn new(source: S, policy: RefreshPolicy) -> Self {
        Self {
            source,
            policy,
            entries: HashMap::new(),
        }
    }

    /// Dataset for `key`, loading it on first use or when stale.
    pub fn get(&mut self, key: &SourceKey) -> Result<&Dataset, LoadError> {
        self.get_at(key, Utc::now())
    }

    /// As `get`, with an explicit clock reading.
    pub fn get_at(&mut self, key: &SourceKey, now: DateTime<Utc>) -> Result<&Dataset, LoadError> {
        let fresh = self
            .entries
            .get(key)
            .is_some_and(|entry| !is_stale(self.policy, entry.loaded_at, now));

        if fresh {
            tracing::debug!(analysis = %key.analysis, games = %key.day_matches, "Dataset cache hit");
        } else {
            let dataset = Dataset {
                analysis: self.source.load(&key.analysis)?,
                day_matches: self.source.load(&key.day_matches)?,
            };
            tracing::info!(
                analysis = %key.analysis,
                analysis_rows = dataset.analysis.len(),
                games = %key.day_matches,
                game_rows = dataset.day_matches.len(),
                "Dataset loaded"
            );
            self.entries.insert(
                key.clone(),
                CachedDataset {
                    dataset,
                    loaded_at: now,
                },
            );
        }

        Ok(&self.entries[key].dataset)
    }

    /// Drop every cached dataset; the next `get` reloads.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(entries = self.entries.len(), "Dataset cache invalidated");
        }
        self.entries.clear();
    }

    pub fn is_cached(&self, key: &SourceKey) -> bool {
        self.entries.contains_key(key)
    }
}

fn is_stale(policy: RefreshPolicy, loaded_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match policy {
        RefreshPolicy::Never => false,
        RefreshPolicy::Ttl(ttl) => now - loaded_at >= ttl,
    }
}

// =============================================================================
// Unit tests
// =============================================================================
