// ChatRank CLI - Chat rankings and activity plots from daily chat logs

use anyhow::Result;
use chatrank_core::{
    linear_fit, ChatLog, ChatRankBot, Command, Config, LogDirectory, QuickChartRenderer,
    ReplySettings,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chatrank")]
#[command(about = "Chat rankings and trends from daily chat logs", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $CHATRANK_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of <YYYY-MM-DD>.log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// User the commands run on behalf of
    #[arg(long, global = true, env = "USER", default_value = "anonymous")]
    as_user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank by chat messages
    ChatRank { user: Option<String> },

    /// Top chatters
    TopChat,

    /// Rank by bonks given
    BonkRank { user: Option<String> },

    /// Top bonkers
    TopBonkers,

    /// Rank by bonks received
    BonkedRank { user: Option<String> },

    /// Most bonked users
    TopBonked,

    /// Plot daily chat messages with a trend line
    ChatPlot {
        user: Option<String>,

        /// Channel shown in the chart title
        #[arg(long)]
        channel: Option<String>,
    },

    /// Print the daily message series and its trend line as JSON
    Series { user: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chatrank=info".parse()?)
                .add_directive("chatrank_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.log_dir {
        config.logs.dir = dir;
    }
    if let Commands::ChatPlot {
        channel: Some(channel),
        ..
    } = &cli.command
    {
        config.chart.channel = channel.clone();
    }
    info!("Reading logs from {}", config.logs.dir.display());

    let log = ChatLog::new(LogDirectory::new(&config.logs.dir));

    let command = match cli.command {
        Commands::ChatRank { user } => Command::ChatRank { user },
        Commands::TopChat => Command::TopChat,
        Commands::BonkRank { user } => Command::BonkRank { user },
        Commands::TopBonkers => Command::TopBonkers,
        Commands::BonkedRank { user } => Command::BonkedRank { user },
        Commands::TopBonked => Command::TopBonked,
        Commands::ChatPlot { user, .. } => Command::ChatPlot { user },
        Commands::Series { user } => {
            let user = user.unwrap_or_else(|| cli.as_user.clone());
            return print_series(&log, &user);
        }
    };

    let renderer = QuickChartRenderer::new(&config.chart.endpoint, config.chart.timeout())?;
    let bot = ChatRankBot::new(log, ReplySettings::from(&config), Box::new(renderer));

    match bot.reply(&command, &cli.as_user).await {
        Ok(reply) => {
            println!("{}", reply);
            Ok(())
        }
        Err(e) => {
            error!("{} failed: {}", command.trigger(), e);
            Err(e.into())
        }
    }
}

fn print_series(log: &ChatLog, user: &str) -> Result<()> {
    let series = log.series_for(user)?;
    let fit = match linear_fit(&series) {
        Ok(fit) => Some(fit),
        Err(e) if e.is_insufficient_data() => None,
        Err(e) => return Err(e.into()),
    };

    let output = serde_json::json!({
        "user": user.to_lowercase(),
        "log_start": log.log_start_date()?.to_string(),
        "series": series,
        "fit": fit,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
