use crate::cache::{CacheStats, CountCache};
use crate::classifier::EventClass;
use crate::counter::{count_file, merge_counts, CountMapping};
use crate::error::Result;
use crate::log_dir::{Clock, LogDirectory, LogFile};
use chrono::NaiveDate;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Event counts over a directory of daily chat logs.
///
/// Counts for past days are computed once and kept for the lifetime of the
/// value. Today's file is still being written to and is re-read on every
/// query without touching the cache.
#[derive(Debug)]
pub struct ChatLog {
    dir: LogDirectory,
    clock: Clock,
    cache: CountCache,
    log_start: OnceLock<NaiveDate>,
}

impl ChatLog {
    pub fn new(dir: LogDirectory) -> Self {
        Self::with_clock(dir, Clock::System)
    }

    pub fn with_clock(dir: LogDirectory, clock: Clock) -> Self {
        Self {
            dir,
            clock,
            cache: CountCache::new(),
            log_start: OnceLock::new(),
        }
    }

    pub fn directory(&self) -> &LogDirectory {
        &self.dir
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn cache(&self) -> &CountCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Counts for one file, honouring the today-file bypass.
    pub fn file_counts(&self, file: &LogFile, class: EventClass) -> Result<Arc<CountMapping>> {
        if file.date == self.today() {
            debug!("Reading today's log {} uncached", file.path.display());
            return Ok(Arc::new(count_file(&file.path, class)?));
        }

        if let Some(counts) = self.cache.get(&file.path, class) {
            return Ok(counts);
        }

        let counts = Arc::new(count_file(&file.path, class)?);
        self.cache.put(&file.path, class, Arc::clone(&counts));
        Ok(counts)
    }

    /// Counts summed over every log file in the directory, oldest file first.
    pub fn totals(&self, class: EventClass) -> Result<CountMapping> {
        let mut total = CountMapping::new();
        for file in self.dir.scan()? {
            let counts = self.file_counts(&file, class)?;
            merge_counts(&mut total, &counts);
        }
        debug!("Aggregated {} {} users", total.len(), class);
        Ok(total)
    }

    /// Date of the oldest log file, looked up once.
    pub fn log_start_date(&self) -> Result<NaiveDate> {
        if let Some(date) = self.log_start.get() {
            return Ok(*date);
        }
        let date = self.dir.earliest_date()?;
        Ok(*self.log_start.get_or_init(|| date))
    }
}
