// TOML configuration for ChatRank

use crate::chart::DEFAULT_CHART_ENDPOINT;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const CONFIG_ENV: &str = "CHATRANK_CONFIG";
pub const LOG_DIR_ENV: &str = "CHATRANK_LOG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logs: LogsSection,
    #[serde(default)]
    pub ranking: RankingSection,
    #[serde(default)]
    pub chart: ChartSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsSection {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSection {
    #[serde(default = "default_top_chat")]
    pub top_chat: usize,
    #[serde(default = "default_top_bonk")]
    pub top_bonk: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub channel: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_top_chat() -> usize {
    10
}

fn default_top_bonk() -> usize {
    5
}

fn default_endpoint() -> String {
    DEFAULT_CHART_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LogsSection {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            top_chat: default_top_chat(),
            top_bonk: default_top_bonk(),
        }
    }
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            channel: String::new(),
        }
    }
}

impl ChartSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Serialize to TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
    }

    /// Deserialize from TOML string
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
    }

    /// Load configuration from file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to read {}: {}", path.as_ref().display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Default config file location, `~/.config/chatrank/config.toml` on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatrank").join("config.toml"))
    }

    /// Resolve the configuration.
    ///
    /// Priority:
    /// 1. `explicit` path (must exist)
    /// 2. CHATRANK_CONFIG env var (must exist)
    /// 3. The default config file, if present
    /// 4. Built-in defaults
    ///
    /// CHATRANK_LOG_DIR then overrides the log directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::load_from(path)?
        } else if let Ok(path) = env::var(CONFIG_ENV) {
            Self::load_from(path)?
        } else {
            match Self::default_path() {
                Some(path) if path.exists() => {
                    debug!("Loading config from {}", path.display());
                    Self::load_from(path)?
                }
                _ => Self::default(),
            }
        };

        if let Ok(dir) = env::var(LOG_DIR_ENV) {
            debug!("Log directory overridden by {}: {}", LOG_DIR_ENV, dir);
            config.logs.dir = PathBuf::from(dir);
        }

        if config.chart.channel.is_empty() {
            warn!("No chart channel configured; chart titles will omit it");
        }
        Ok(config)
    }
}
