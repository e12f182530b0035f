// ChatRank Library - Rankings and trends from daily chat logs
//
// Scans a directory of `<YYYY-MM-DD>.log` files, counts chat lines and bonks
// per user, and answers rank, top-N and activity-trend queries.

pub mod aggregate;
pub mod cache;
pub mod chart;
pub mod classifier;
pub mod commands;
pub mod config;
pub mod counter;
pub mod error;
pub mod log_dir;
pub mod rank;
pub mod trend;

pub use aggregate::ChatLog;
pub use cache::{CacheStats, CountCache};
pub use chart::{ChartRenderer, ChartSpec, QuickChartRenderer, DEFAULT_CHART_ENDPOINT};
pub use classifier::EventClass;
pub use commands::{ChatRankBot, Command, ReplySettings};
pub use config::Config;
pub use counter::{count_file, CountMapping};
pub use error::{ChatRankError, Result};
pub use log_dir::{Clock, LogDirectory, LogFile};
pub use rank::{Rank, RankedGroup};
pub use trend::{linear_fit, DailyPoint, LinearFit};
