// Memoized growth series per (dataset fingerprint, region, metric)
use shared::models::{Metric, Region};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrowthKey {
    pub fingerprint: u64,
    pub region: Region,
    pub metric: Metric,
}

pub type GrowthSeries = Arc<Vec<Option<f64>>>;

#[derive(Debug, Default)]
pub struct GrowthCache {
    entries: RwLock<HashMap<GrowthKey, GrowthSeries>>,
}

impl GrowthCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached series for `key`, computing and storing it on a miss.
    pub fn get_or_compute<F>(&self, key: GrowthKey, compute: F) -> GrowthSeries
    where
        F: FnOnce() -> Vec<Option<f64>>,
    {
        // A poisoned lock only means another caller panicked mid-insert; entries stay valid.
        if let Some(hit) = self.entries.read().unwrap_or_else(|e| e.into_inner()).get(&key) {
            tracing::trace!(region = %key.region, metric = %key.metric, "Growth cache hit");
            return Arc::clone(hit);
        }

        let computed = Arc::new(compute());
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(entries.entry(key).or_insert(computed))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry computed for another dataset.
    pub fn retain_fingerprint(&self, fingerprint: u64) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|k, _| k.fingerprint == fingerprint);
    }
}
