//! Chat-style portfolio assistant backed by a generative-language API.
//!
//! The session owns the conversation transcript and is its only writer. Each
//! [`AssistantSession::send`] sends a single user turn plus the fixed system
//! instruction; earlier turns are kept for display only. Every failure is
//! contained: the user sees one fixed fallback line instead of a model reply.
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;
pub use prompts::build_system_instruction;

use crate::analytics::{Event, EventLog, Source};

pub const GREETING: &str = "Hello! I'm the portfolio assistant. Ask me anything about the \
                            projects, skills, or experience listed here.";
pub const RESET_MESSAGE: &str = "Memory wiped. Ready for a new query.";
pub const EMPTY_REPLY: &str = "I couldn't process that request.";
pub const CONNECTION_ERROR: &str = "Connection error. Please try again later.";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("no API key configured (set FOLIO_API_KEY or GEMINI_API_KEY)")]
    MissingCredential,

    #[error("assistant request failed: {0}")]
    Transport(String),

    #[error("unexpected assistant response: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Model seam
// ---------------------------------------------------------------------------

/// Anything that turns a system instruction and one user turn into text.
pub trait GenerativeModel {
    fn generate(&self, system: &str, user: &str) -> Result<String, AssistantError>;

    /// Model identifier for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// One conversation with the assistant.
#[derive(Debug, Clone)]
pub struct AssistantSession {
    system: String,
    messages: Vec<ChatMessage>,
    events: EventLog,
}

impl AssistantSession {
    /// Start a session seeded with the greeting.
    pub fn new(system: impl Into<String>, events: EventLog) -> Self {
        Self {
            system: system.into(),
            messages: vec![ChatMessage::model(GREETING)],
            events,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send one user turn and append the reply.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the reply that
    /// was appended is returned: the model's text, [`EMPTY_REPLY`] when the
    /// model answered with nothing, or [`CONNECTION_ERROR`] on any failure.
    pub fn send(&mut self, input: &str, model: &dyn GenerativeModel) -> Option<&str> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));

        let start = Instant::now();
        let result = model.generate(&self.system, text);
        let latency_ms = start.elapsed().as_millis() as u64;

        let (reply, event) = match result {
            Ok(reply) if reply.trim().is_empty() => (
                EMPTY_REPLY.to_string(),
                Event::new(Source::Assistant, "empty").detail(model.name()),
            ),
            Ok(reply) => (
                reply.trim().to_string(),
                Event::new(Source::Assistant, "ok").detail(model.name()),
            ),
            Err(e) => (
                CONNECTION_ERROR.to_string(),
                Event::new(Source::Assistant, "error").detail(e.to_string()),
            ),
        };
        self.events.record(&event.latency_ms(latency_ms));

        self.messages.push(ChatMessage::model(reply));
        self.messages.last().map(|m| m.text.as_str())
    }

    /// Drop the conversation and start over.
    pub fn reset(&mut self) {
        self.messages = vec![ChatMessage::model(RESET_MESSAGE)];
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Scripted {
        reply: Result<String, AssistantError>,
        seen: RefCell<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(reply: Result<&str, AssistantError>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerativeModel for Scripted {
        fn generate(&self, system: &str, user: &str) -> Result<String, AssistantError> {
            self.seen
                .borrow_mut()
                .push((system.to_string(), user.to_string()));
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn session() -> AssistantSession {
        AssistantSession::new("SYSTEM", EventLog::disabled())
    }

    #[test]
    fn starts_with_greeting() {
        let s = session();
        assert_eq!(s.messages(), &[ChatMessage::model(GREETING)]);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut s = session();
        let model = Scripted::new(Ok("never"));
        assert_eq!(s.send("   ", &model), None);
        assert_eq!(s.messages().len(), 1);
        assert!(model.seen.borrow().is_empty());
    }

    #[test]
    fn reply_is_appended_after_trimmed_user_turn() {
        let mut s = session();
        let model = Scripted::new(Ok("  Rust and C++.  "));
        assert_eq!(s.send("  what stack? ", &model), Some("Rust and C++."));
        assert_eq!(
            &s.messages()[1..],
            &[ChatMessage::user("what stack?"), ChatMessage::model("Rust and C++.")]
        );
        assert_eq!(
            model.seen.borrow()[0],
            ("SYSTEM".to_string(), "what stack?".to_string())
        );
    }

    #[test]
    fn failure_appends_connection_error() {
        let mut s = session();
        let model = Scripted::new(Err(AssistantError::Transport("HTTP 500".into())));
        assert_eq!(s.send("hi", &model), Some(CONNECTION_ERROR));
    }

    #[test]
    fn empty_reply_gets_placeholder() {
        let mut s = session();
        let model = Scripted::new(Ok(" \n"));
        assert_eq!(s.send("hi", &model), Some(EMPTY_REPLY));
    }

    #[test]
    fn reset_replaces_history() {
        let mut s = session();
        s.send("hi", &Scripted::new(Ok("hello")));
        s.reset();
        assert_eq!(s.messages(), &[ChatMessage::model(RESET_MESSAGE)]);
    }
}
