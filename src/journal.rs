//! Append-only journal of pipeline events.
//!
//! The journal is what front ends show as "history". It is observational
//! only: no component reads it back to decide anything. Each entry is also
//! forwarded to the `log` facade so it shows up in the process log.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{read, write};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JournalLevel {
    Info,
    Warn,
    Error,
}

impl JournalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalLevel::Info => "INFO",
            JournalLevel::Warn => "WARN",
            JournalLevel::Error => "ERROR",
        }
    }

    fn as_log_level(&self) -> log::Level {
        match self {
            JournalLevel::Info => log::Level::Info,
            JournalLevel::Warn => log::Level::Warn,
            JournalLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for JournalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub level: JournalLevel,
    pub message: String,
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.message
        )
    }
}

#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&self, message: impl Into<String>, level: JournalLevel) {
        let message = message.into();
        log::log!(target: "journal", level.as_log_level(), "{message}");
        write(&self.entries).push(JournalEntry {
            timestamp: Utc::now(),
            level,
            message,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add_entry(message, JournalLevel::Info);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.add_entry(message, JournalLevel::Warn);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add_entry(message, JournalLevel::Error);
    }

    /// Snapshot of every entry, oldest first.
    pub fn view_history(&self) -> Vec<JournalEntry> {
        read(&self.entries).clone()
    }

    /// The last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<JournalEntry> {
        let guard = read(&self.entries);
        let start = guard.len().saturating_sub(n);
        guard[start..].to_vec()
    }

    pub fn count_at(&self, level: JournalLevel) -> usize {
        read(&self.entries)
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }

    pub fn len(&self) -> usize {
        read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear_history(&self) {
        write(&self.entries).clear();
    }
}

impl fmt::Debug for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Journal").field("len", &self.len()).finish()
    }
}
