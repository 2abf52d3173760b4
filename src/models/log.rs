use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on retained log entries per session. Appending beyond the cap
/// evicts the oldest entries, so a long-running shift cannot grow without bound.
pub const MAX_LOG_ENTRIES: usize = 1000;

/// Severity tag on a log entry. Untagged entries carry `None` at the
/// [`LogEntry`] level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTag {
    Info,
    Error,
    Warning,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// One timestamped entry in a session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub tag: Option<LogTag>,
    pub text: String,
}

/// Per-session append-only log, capped at [`MAX_LOG_ENTRIES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an untagged entry.
    pub fn append(&mut self, text: impl Into<String>) {
        self.push(None, text.into());
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Some(LogTag::Info), text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Some(LogTag::Error), text.into());
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Some(LogTag::Warning), text.into());
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, tag: Option<LogTag>, text: String) {
        self.entries.push(LogEntry {
            at: Utc::now(),
            tag,
            text,
        });
        if self.entries.len() > MAX_LOG_ENTRIES {
            let excess = self.entries.len() - MAX_LOG_ENTRIES;
            self.entries.drain(..excess);
        }
    }
}
