use chatrank_core::{
    ChartRenderer, ChartSpec, ChatLog, ChatRankBot, ChatRankError, Clock, Command, DailyPoint,
    EventClass, LogDirectory, Rank, ReplySettings,
};
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn write_log(dir: &Path, day: &str, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(dir.join(format!("{}.log", day)), content).unwrap();
}

fn append_line(dir: &Path, day: &str, line: &str) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(dir.join(format!("{}.log", day)))
        .unwrap();
    writeln!(file, "{}", line).unwrap();
}

/// Three days of logs; 2024-03-03 is "today".
fn sample_logs() -> TempDir {
    let temp_dir = tempdir().unwrap();
    write_log(
        temp_dir.path(),
        "2024-03-01",
        &[
            "[10:00:00] <Alice> good morning",
            "[10:00:05] <bob> !bonk @alice",
            "[10:00:09] * alice hides",
            "[10:01:00] <carol> hi",
            "[10:02:00] <alice> anyone?",
        ],
    );
    write_log(
        temp_dir.path(),
        "2024-03-02",
        &[
            "[09:00:00] <bob> !bonk carol",
            "[09:00:01] <ALICE> !bonk bob",
            "[09:00:02] <dave> lurking",
        ],
    );
    write_log(
        temp_dir.path(),
        "2024-03-03",
        &["[08:00:00] <carol> back again", "[08:00:01] <carol> !bonk"],
    );
    temp_dir
}

fn chat_log(dir: &Path) -> ChatLog {
    ChatLog::with_clock(LogDirectory::new(dir), Clock::Fixed(date("2024-03-03")))
}

#[test]
fn test_chat_ranking() {
    let logs = sample_logs();
    let log = chat_log(logs.path());

    // alice 4, bob 2, carol 3, dave 1
    assert_eq!(
        log.rank_of("Alice", EventClass::ChatMessage).unwrap(),
        Some(Rank { rank: 1, count: 4 })
    );
    assert_eq!(
        log.rank_of("carol", EventClass::ChatMessage).unwrap(),
        Some(Rank { rank: 2, count: 3 })
    );
    assert_eq!(log.rank_of("nobody", EventClass::ChatMessage).unwrap(), None);

    let top: Vec<String> = log
        .top_n(EventClass::ChatMessage, 10)
        .unwrap()
        .iter()
        .map(|g| g.to_string())
        .collect();
    assert_eq!(top, vec!["1. alice (4)", "2. carol (3)", "3. bob (2)", "4. dave (1)"]);
}

#[test]
fn test_bonk_rankings() {
    let logs = sample_logs();
    let log = chat_log(logs.path());

    // bonkers: bob 2, alice 1, carol 1
    let bonkers = log.top_n(EventClass::BonkIssued, 5).unwrap();
    assert_eq!(bonkers.len(), 2);
    assert_eq!(bonkers[0].users, vec!["bob"]);
    assert_eq!(bonkers[1].rank, 2);
    assert_eq!(bonkers[1].count, 1);
    assert_eq!(bonkers[1].users.len(), 2);

    // bonked: alice 1, carol 1, bob 1
    assert_eq!(
        log.rank_of("BOB", EventClass::BonkReceived).unwrap(),
        Some(Rank { rank: 1, count: 1 })
    );
    assert_eq!(log.rank_of("dave", EventClass::BonkReceived).unwrap(), None);
}

#[test]
fn test_recomputing_is_idempotent() {
    let logs = sample_logs();
    let log = chat_log(logs.path());

    for class in EventClass::ALL {
        let first = log.totals(class).unwrap();
        let second = log.totals(class).unwrap();
        assert_eq!(first, second);
        assert_eq!(log.top_n(class, 10).unwrap(), log.top_n(class, 10).unwrap());
    }
}

#[test]
fn test_today_is_fresh_and_past_days_are_cached() {
    let logs = sample_logs();
    let log = chat_log(logs.path());

    assert_eq!(
        log.rank_of("dave", EventClass::ChatMessage).unwrap(),
        Some(Rank { rank: 4, count: 1 })
    );

    // Today's file grows: the new line is seen on the next query
    append_line(logs.path(), "2024-03-03", "[08:10:00] <dave> now talking");
    assert_eq!(
        log.rank_of("dave", EventClass::ChatMessage).unwrap(),
        Some(Rank { rank: 3, count: 2 })
    );

    // A past file changes behind our back: the cached counts stand
    append_line(logs.path(), "2024-03-02", "[23:59:00] <dave> late line");
    assert_eq!(
        log.rank_of("dave", EventClass::ChatMessage).unwrap(),
        Some(Rank { rank: 3, count: 2 })
    );

    let today = logs.path().join("2024-03-03.log");
    assert!(!log.cache().contains(&today, EventClass::ChatMessage));
    assert!(log.cache_stats().hits > 0);
}

#[test]
fn test_unreadable_log_fails_the_query() {
    let logs = sample_logs();
    // A directory named like a log file cannot be read line by line
    std::fs::create_dir(logs.path().join("2024-02-29.log")).unwrap();

    let log = chat_log(logs.path());
    assert!(matches!(
        log.totals(EventClass::ChatMessage),
        Err(ChatRankError::Io { .. })
    ));
}

#[test]
fn test_series_skips_leading_days_and_today() {
    let temp_dir = tempdir().unwrap();
    write_log(temp_dir.path(), "2024-03-01", &["[00:00] <alice> hi"]);
    write_log(temp_dir.path(), "2024-03-02", &["[00:00] <bob> hi", "[00:01] <bob> hi"]);
    write_log(temp_dir.path(), "2024-03-03", &["[00:00] <alice> hi"]);
    write_log(temp_dir.path(), "2024-03-05", &["[00:00] <Bob> hi"]);
    write_log(temp_dir.path(), "2024-03-06", &["[00:00] <bob> today"]);

    let log = ChatLog::with_clock(
        LogDirectory::new(temp_dir.path()),
        Clock::Fixed(date("2024-03-06")),
    );

    assert_eq!(log.log_start_date().unwrap(), date("2024-03-01"));
    assert_eq!(
        log.series_for("BOB").unwrap(),
        vec![
            DailyPoint { day: 1, count: 2 },
            DailyPoint { day: 2, count: 0 },
            DailyPoint { day: 4, count: 1 },
        ]
    );
    assert!(log.series_for("nobody").unwrap().is_empty());
}

struct MockRenderer {
    charts: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ChartRenderer for MockRenderer {
    async fn render(&self, chart: &ChartSpec) -> chatrank_core::Result<String> {
        self.charts.lock().unwrap().push(chart.as_str().to_string());
        Ok("https://charts.example/abc".to_string())
    }
}

struct SharedRenderer(Arc<MockRenderer>);

#[async_trait::async_trait]
impl ChartRenderer for SharedRenderer {
    async fn render(&self, chart: &ChartSpec) -> chatrank_core::Result<String> {
        self.0.render(chart).await
    }
}

fn bot(dir: &Path) -> (ChatRankBot, Arc<MockRenderer>) {
    let renderer = Arc::new(MockRenderer {
        charts: Mutex::new(Vec::new()),
    });
    let settings = ReplySettings {
        top_chat: 2,
        top_bonk: 5,
        channel: "somechannel".to_string(),
    };
    let bot = ChatRankBot::new(
        chat_log(dir),
        settings,
        Box::new(SharedRenderer(Arc::clone(&renderer))),
    );
    (bot, renderer)
}

#[tokio::test]
async fn test_rank_replies() {
    let logs = sample_logs();
    let (bot, _) = bot(logs.path());

    assert_eq!(
        bot.reply(&Command::ChatRank { user: None }, "Carol").await.unwrap(),
        "Carol is ranked #2 with 3 messages (since 2024-03-01)"
    );
    assert_eq!(
        bot.reply(&Command::BonkRank { user: Some("bob".to_string()) }, "carol")
            .await
            .unwrap(),
        "bob is ranked #1, has bonked others 2 times"
    );
    assert_eq!(
        bot.reply(&Command::BonkedRank { user: None }, "alice").await.unwrap(),
        "alice is ranked #1, has been bonked 1 times"
    );
    assert_eq!(
        bot.reply(&Command::ChatRank { user: Some("ghost".to_string()) }, "carol")
            .await
            .unwrap(),
        "user not found ghost"
    );
}

#[tokio::test]
async fn test_top_replies() {
    let logs = sample_logs();
    let (bot, _) = bot(logs.path());

    assert_eq!(
        bot.reply(&Command::TopChat, "carol").await.unwrap(),
        "1. alice (4), 2. carol (3) (since 2024-03-01)"
    );
    assert_eq!(
        bot.reply(&Command::TopBonkers, "carol").await.unwrap(),
        "1. bob (2), 2. alice, carol (1)"
    );
}

#[tokio::test]
async fn test_chat_plot_reply() {
    let logs = sample_logs();
    let (bot, renderer) = bot(logs.path());

    assert_eq!(
        bot.reply(&Command::ChatPlot { user: Some("Alice".to_string()) }, "carol")
            .await
            .unwrap(),
        "alice: https://charts.example/abc"
    );

    let charts = renderer.charts.lock().unwrap();
    assert_eq!(charts.len(), 1);
    assert!(charts[0].contains("alice's chat in twitch.tv/somechannel"));
    assert!(charts[0].contains("new Date('2024-03-01')"));
}

#[tokio::test]
async fn test_chat_plot_needs_two_days() {
    let logs = sample_logs();
    let (bot, renderer) = bot(logs.path());

    // dave only spoke on the last past day
    assert_eq!(
        bot.reply(&Command::ChatPlot { user: None }, "dave").await.unwrap(),
        "sorry dave, need at least 2 days of data"
    );
    assert!(renderer.charts.lock().unwrap().is_empty());
}
