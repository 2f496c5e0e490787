//! Structured event log: one JSON line per terminal command, stats load and
//! assistant call.
//!
//! Log file: `~/.folio/events.jsonl`
//!
//! Writing is best-effort: an unwritable home directory or a full disk never
//! turns into a user-visible error.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::FolioConfig;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// Which part of folio produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Terminal,
    Stats,
    Assistant,
}

/// A single line in `events.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: String,
    pub source: Source,
    /// `"ok"`, `"error"`, `"not_found"`, `"clear"`, `"cancelled"`, ...
    pub outcome: String,
    /// Command name, endpoint summary, or error text.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

impl Event {
    pub fn new(source: Source, outcome: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            source,
            outcome: outcome.into(),
            detail: None,
            latency_ms: None,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(summarize(&detail.into()));
        self
    }

    pub fn latency_ms(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Flatten newlines and cap the length of free text going into the log.
fn summarize(raw: &str) -> String {
    let flat = raw.replace(['\r', '\n'], " ");
    match flat.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Handle to the JSONL event log. Cheap to clone and pass around.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// Log at the default location, or a disabled log if turned off in config.
    pub fn from_config(config: &FolioConfig) -> Self {
        if config.logging.enabled {
            Self {
                path: events_log_path(),
            }
        } else {
            Self::disabled()
        }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that drops every event.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an event. Failures are silently ignored.
    pub fn record(&self, event: &Event) {
        let _ = self.append(event);
    }

    fn append(&self, event: &Event) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    /// Read every event, skipping malformed lines.
    ///
    /// Returns an empty vec if the log is disabled or the file is missing.
    pub fn read_all(&self) -> Vec<Event> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<Event>(&line).ok())
            .collect()
    }

    /// The last `limit` events, oldest first.
    pub fn read_recent(&self, limit: usize) -> Vec<Event> {
        let mut events = self.read_all();
        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
        events
    }
}

/// Return the path to the default event log file.
pub fn events_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".folio").join("events.jsonl"))
}
