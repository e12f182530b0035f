use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::error;

// Compile regexes once at startup for performance
static CHAT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]+\][^<*]*(?:<(?P<chat_user>[^>]+)>|\* (?P<action_user>[^ ]+))")
        .expect("Failed to compile chat line regex")
});

static BONKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]+\][^<*]*<(?P<chat_user>[^>]+)> !bonk\b")
        .expect("Failed to compile bonker regex")
});

static BONKED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]+\][^<*]*<[^>]+> !bonk @?(?P<chat_user>\w+)")
        .expect("Failed to compile bonked regex")
});

/// The kinds of events counted from chat logs. Each variant carries its own
/// line-matching rule and doubles as the cache tag for per-file counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventClass {
    /// `<user> message` or `* user action`
    ChatMessage,
    /// The poster of a `!bonk` command
    BonkIssued,
    /// The target of a `!bonk @user` command
    BonkReceived,
}

impl EventClass {
    pub const ALL: [EventClass; 3] = [
        EventClass::ChatMessage,
        EventClass::BonkIssued,
        EventClass::BonkReceived,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            EventClass::ChatMessage => &CHAT_LINE_REGEX,
            EventClass::BonkIssued => &BONKER_REGEX,
            EventClass::BonkReceived => &BONKED_REGEX,
        }
    }

    /// Extract the lowercased username this line counts towards, if any.
    pub fn extract_user(self, line: &str) -> Option<String> {
        let caps = self.regex().captures(line)?;

        let user = caps
            .name("chat_user")
            .or_else(|| caps.name("action_user"))
            .map(|m| m.as_str())
            .filter(|user| !user.is_empty());

        match user {
            Some(user) => Some(user.to_lowercase()),
            None => {
                // Both alternatives of the chat rule require a non-empty capture
                debug_assert!(false, "{} line matched without a username: {:?}", self, line);
                error!("{} line matched without a username: {:?}", self, line);
                None
            }
        }
    }
}

impl std::fmt::Display for EventClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventClass::ChatMessage => write!(f, "chat-message"),
            EventClass::BonkIssued => write!(f, "bonk-issued"),
            EventClass::BonkReceived => write!(f, "bonk-received"),
        }
    }
}

impl std::str::FromStr for EventClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "chat-message" | "chat" => Ok(EventClass::ChatMessage),
            "bonk-issued" | "bonker" => Ok(EventClass::BonkIssued),
            "bonk-received" | "bonked" => Ok(EventClass::BonkReceived),
            _ => Err(anyhow::anyhow!("Invalid event class: {}", s)),
        }
    }
}
