use crate::classifier::EventClass;
use crate::counter::CountMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

type CacheKey = (PathBuf, EventClass);

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Per-file count memo for log files that no longer change.
///
/// Entries live for the lifetime of the cache and are never evicted. Two
/// callers racing on the same key may both compute the counts; the second
/// insert overwrites the first with an equal value.
#[derive(Debug, Default)]
pub struct CountCache {
    data: RwLock<HashMap<CacheKey, Arc<CountMapping>>>,
    stats: RwLock<CacheStats>,
}

impl CountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path, class: EventClass) -> Option<Arc<CountMapping>> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        let found = data.get(&(path.to_path_buf(), class)).cloned();

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    pub fn put(&self, path: &Path, class: EventClass, counts: Arc<CountMapping>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.insert((path.to_path_buf(), class), counts);

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.entries = data.len();
    }

    pub fn contains(&self, path: &Path, class: EventClass) -> bool {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(path.to_path_buf(), class))
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
