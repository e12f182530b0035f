use crate::error::{ChatRankError, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_EXTENSION: &str = "log";

/// Source of "today" for the today-file cache bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Local calendar date, read on every call
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// One daily log file, `<YYYY-MM-DD>.log`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

impl LogFile {
    /// Parse a log file from its path, returning `None` if the file name is not
    /// an ISO date with a `.log` extension.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(LOG_EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let date = NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()?;
        Some(Self { date, path })
    }

    pub fn file_name(date: NaiveDate) -> String {
        format!("{}.{}", date.format("%Y-%m-%d"), LOG_EXTENSION)
    }
}

/// A directory of daily chat logs.
#[derive(Debug, Clone)]
pub struct LogDirectory {
    root: PathBuf,
}

impl LogDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.root.join(LogFile::file_name(date))
    }

    /// All daily log files, oldest first.
    pub fn scan(&self) -> Result<Vec<LogFile>> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| ChatRankError::io(&self.root, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ChatRankError::io(&self.root, e))?;
            let path = entry.path();
            match LogFile::from_path(path) {
                Some(file) => files.push(file),
                None => debug!("Skipping non-log entry {}", entry.path().display()),
            }
        }

        files.sort();
        debug!("Found {} log files in {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Date of the oldest log file.
    pub fn earliest_date(&self) -> Result<NaiveDate> {
        self.scan()?
            .first()
            .map(|file| file.date)
            .ok_or_else(|| ChatRankError::InvalidLogDirectory(self.root.clone()))
    }
}
