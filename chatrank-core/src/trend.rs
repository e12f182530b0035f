use crate::aggregate::ChatLog;
use crate::classifier::EventClass;
use crate::error::{ChatRankError, Result};
use serde::{Deserialize, Serialize};

/// One day of activity: days since the first log file, and the count that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: i64,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares line through `series`.
///
/// Uses the closed-form solution over the sums of x, x², y and xy.
pub fn linear_fit(series: &[DailyPoint]) -> Result<LinearFit> {
    if series.len() < 2 {
        return Err(ChatRankError::InsufficientData {
            points: series.len(),
        });
    }

    let n = series.len() as f64;
    let (mut sum_x, mut sum_xx, mut sum_y, mut sum_xy) = (0.0, 0.0, 0.0, 0.0);
    for point in series {
        let x = point.day as f64;
        let y = point.count as f64;
        sum_x += x;
        sum_xx += x * x;
        sum_y += y;
        sum_xy += x * y;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(ChatRankError::DegenerateFit);
    }

    Ok(LinearFit {
        slope: (n * sum_xy - sum_x * sum_y) / denominator,
        intercept: (sum_y * sum_xx - sum_x * sum_xy) / denominator,
    })
}

impl ChatLog {
    /// Chat messages per day for `user`, excluding today.
    ///
    /// Days before the user's first message are left out; after that every
    /// day is present, including days with no messages.
    pub fn series_for(&self, user: &str) -> Result<Vec<DailyPoint>> {
        let user = user.to_lowercase();
        let start = self.log_start_date()?;
        let today = self.today();

        let mut series = Vec::new();
        for file in self.directory().scan()? {
            if file.date == today {
                continue;
            }
            let counts = self.file_counts(&file, EventClass::ChatMessage)?;
            let count = counts.get(&user).copied().unwrap_or(0);
            if !series.is_empty() || count > 0 {
                series.push(DailyPoint {
                    day: (file.date - start).num_days(),
                    count,
                });
            }
        }
        Ok(series)
    }
}
