use crate::aggregate::ChatLog;
use crate::chart::{ChartRenderer, ChartSpec};
use crate::classifier::EventClass;
use crate::config::Config;
use crate::error::{ChatRankError, Result};
use crate::rank::RankedGroup;
use crate::trend::linear_fit;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The chat commands backed by the ranking engine. Commands carrying a user
/// fall back to the invoking user when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ChatRank { user: Option<String> },
    TopChat,
    BonkRank { user: Option<String> },
    TopBonkers,
    BonkedRank { user: Option<String> },
    TopBonked,
    ChatPlot { user: Option<String> },
}

impl Command {
    /// The chat trigger for this command, e.g. `!chatrank`.
    pub fn trigger(&self) -> &'static str {
        match self {
            Command::ChatRank { .. } => "!chatrank",
            Command::TopChat => "!top10chat",
            Command::BonkRank { .. } => "!bonkrank",
            Command::TopBonkers => "!top5bonkers",
            Command::BonkedRank { .. } => "!bonkedrank",
            Command::TopBonked => "!top5bonked",
            Command::ChatPlot { .. } => "!chatplot",
        }
    }
}

/// Settings the replies need beyond the logs themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplySettings {
    pub top_chat: usize,
    pub top_bonk: usize,
    pub channel: String,
}

impl From<&Config> for ReplySettings {
    fn from(config: &Config) -> Self {
        Self {
            top_chat: config.ranking.top_chat,
            top_bonk: config.ranking.top_bonk,
            channel: config.chart.channel.clone(),
        }
    }
}

pub struct ChatRankBot {
    log: ChatLog,
    settings: ReplySettings,
    renderer: Box<dyn ChartRenderer>,
}

impl ChatRankBot {
    pub fn new(log: ChatLog, settings: ReplySettings, renderer: Box<dyn ChartRenderer>) -> Self {
        Self {
            log,
            settings,
            renderer,
        }
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// Produce the reply text for `command` issued by `invoking_user`.
    pub async fn reply(&self, command: &Command, invoking_user: &str) -> Result<String> {
        debug!("Running {} for {}", command.trigger(), invoking_user);
        let or_invoker = |user: &Option<String>| -> String {
            user.clone().unwrap_or_else(|| invoking_user.to_string())
        };

        match command {
            Command::ChatRank { user } => {
                let user = or_invoker(user);
                match self.log.rank_of(&user, EventClass::ChatMessage)? {
                    Some(rank) => Ok(format!(
                        "{} is ranked #{} with {} messages (since {})",
                        user,
                        rank.rank,
                        rank.count,
                        self.log.log_start_date()?
                    )),
                    None => Ok(not_found(&user)),
                }
            }
            Command::TopChat => {
                let groups = self.log.top_n(EventClass::ChatMessage, self.settings.top_chat)?;
                Ok(format!(
                    "{} (since {})",
                    join_groups(&groups),
                    self.log.log_start_date()?
                ))
            }
            Command::BonkRank { user } => {
                let user = or_invoker(user);
                match self.log.rank_of(&user, EventClass::BonkIssued)? {
                    Some(rank) => Ok(format!(
                        "{} is ranked #{}, has bonked others {} times",
                        user, rank.rank, rank.count
                    )),
                    None => Ok(not_found(&user)),
                }
            }
            Command::TopBonkers => {
                let groups = self.log.top_n(EventClass::BonkIssued, self.settings.top_bonk)?;
                Ok(join_groups(&groups))
            }
            Command::BonkedRank { user } => {
                let user = or_invoker(user);
                match self.log.rank_of(&user, EventClass::BonkReceived)? {
                    Some(rank) => Ok(format!(
                        "{} is ranked #{}, has been bonked {} times",
                        user, rank.rank, rank.count
                    )),
                    None => Ok(not_found(&user)),
                }
            }
            Command::TopBonked => {
                let groups = self.log.top_n(EventClass::BonkReceived, self.settings.top_bonk)?;
                Ok(join_groups(&groups))
            }
            Command::ChatPlot { user } => self.chat_plot(&or_invoker(user).to_lowercase()).await,
        }
    }

    async fn chat_plot(&self, user: &str) -> Result<String> {
        let series = self.log.series_for(user)?;
        let fit = match linear_fit(&series) {
            Ok(fit) => fit,
            Err(ChatRankError::InsufficientData { points }) => {
                info!("Not enough data to plot {} ({} days)", user, points);
                return Ok(format!("sorry {}, need at least 2 days of data", user));
            }
            Err(ChatRankError::DegenerateFit) => {
                return Ok(format!("sorry {}, cannot fit a trend to that data", user));
            }
            Err(e) => return Err(e),
        };

        let start = self.log.log_start_date()?;
        let chart = ChartSpec::build(user, &self.settings.channel, start, &series, &fit)?;
        let url = self.renderer.render(&chart).await?;
        Ok(format!("{}: {}", user, url))
    }
}

fn not_found(user: &str) -> String {
    format!("user not found {}", user)
}

fn join_groups(groups: &[RankedGroup]) -> String {
    groups
        .iter()
        .map(|group| group.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
