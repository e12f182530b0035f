use crate::classifier::EventClass;
use crate::error::{ChatRankError, Result};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Lowercased username to event count, in first-seen order.
pub type CountMapping = IndexMap<String, u64>;

/// Count the events of one class in a single log file.
pub fn count_file(path: &Path, class: EventClass) -> Result<CountMapping> {
    let file = File::open(path).map_err(|e| ChatRankError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut counts = CountMapping::new();
    for line in reader.lines() {
        let line = line.map_err(|e| ChatRankError::io(path, e))?;
        if let Some(user) = class.extract_user(&line) {
            *counts.entry(user).or_insert(0) += 1;
        }
    }

    debug!(
        "Counted {} users for {} in {}",
        counts.len(),
        class,
        path.display()
    );
    Ok(counts)
}

/// Add every count of `other` into `total`, keeping `total`'s key order and
/// appending new users at the end.
pub fn merge_counts(total: &mut CountMapping, other: &CountMapping) {
    for (user, count) in other {
        *total.entry(user.clone()).or_insert(0) += count;
    }
}
