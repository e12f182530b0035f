use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatRankError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no log files found in {}", .0.display())]
    InvalidLogDirectory(PathBuf),
    #[error("need at least 2 data points, got {points}")]
    InsufficientData { points: usize },
    #[error("cannot fit a line: all day offsets are identical")]
    DegenerateFit,
    #[error("chart request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid chart response: {0}")]
    Chart(String),
}

impl ChatRankError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChatRankError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should be shown to the user as a "not enough data" reply
    /// rather than propagated.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            ChatRankError::InsufficientData { .. } | ChatRankError::DegenerateFit
        )
    }
}

pub type Result<T> = std::result::Result<T, ChatRankError>;
