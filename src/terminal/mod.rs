//! Simulated command-line widget.
//!
//! [`evaluate`] is a pure function: it takes one typed line, the command table
//! and the current transcript, and returns the next transcript plus a
//! [`SideEffect`] telling the owner whether the screen should be cleared. It
//! performs no I/O, so it is exercised directly by tests and reused unchanged
//! by the interactive `folio shell` loop and the `POST /api/terminal` handler.

pub mod commands;

use serde::{Deserialize, Serialize};

pub use commands::{CLEAR_COMMAND, CommandTable};

/// Default banner printed when a shell session starts.
pub const WELCOME_BANNER: &str = "Welcome to folio. Type 'help' to start.";

/// Prefix of the message emitted for unknown commands.
pub const NOT_FOUND_PREFIX: &str = "command not found: ";

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Whether a transcript line was typed by the user or printed by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Input,
    Output,
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

impl Entry {
    pub fn input(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Input,
            text: text.into(),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Output,
            text: text.into(),
        }
    }
}

/// Ordered, append-only log of the session. Replaced wholesale on `clear`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript holding a single banner line.
    pub fn welcome(banner: &str) -> Self {
        Self {
            entries: vec![Entry::output(banner)],
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }
}

impl From<Vec<Entry>> for Transcript {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Out-of-band signal for whoever owns the display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideEffect {
    #[default]
    None,
    /// The whole transcript was discarded; the screen should be wiped.
    Clear,
}

/// Result of evaluating a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub transcript: Transcript,
    pub effect: SideEffect,
}

impl Evaluation {
    /// The output line appended by this evaluation, if any.
    pub fn reply(&self) -> Option<&str> {
        match self.transcript.entries.last() {
            Some(entry) if entry.kind == EntryKind::Output => Some(&entry.text),
            _ => None,
        }
    }
}

/// Fold a raw line into the form used for lookup.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Evaluate one typed line against `table`.
///
/// - Blank input leaves the transcript untouched.
/// - `clear` returns an empty transcript and [`SideEffect::Clear`].
/// - A known command appends the verbatim input followed by its canned text.
/// - Anything else appends the input followed by `command not found: <cmd>`,
///   where `<cmd>` is the folded form.
pub fn evaluate(raw: &str, table: &CommandTable, transcript: Transcript) -> Evaluation {
    let command = normalize(raw);

    if command.is_empty() {
        return Evaluation {
            transcript,
            effect: SideEffect::None,
        };
    }

    if command == CLEAR_COMMAND {
        return Evaluation {
            transcript: Transcript::new(),
            effect: SideEffect::Clear,
        };
    }

    let reply = match table.get(&command) {
        Some(text) => text.to_string(),
        None => format!("{NOT_FOUND_PREFIX}{command}"),
    };

    let mut next = transcript;
    next.push(Entry::input(raw));
    next.push(Entry::output(reply));

    Evaluation {
        transcript: next,
        effect: SideEffect::None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::new([("whoami", "me"), ("stack", "rust")])
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let start = Transcript::welcome("hi");
        for raw in ["", "   ", "\t\n"] {
            let eval = evaluate(raw, &table(), start.clone());
            assert_eq!(eval.transcript, start);
            assert_eq!(eval.effect, SideEffect::None);
            assert_eq!(eval.reply(), None);
        }
    }

    #[test]
    fn known_command_keeps_raw_input() {
        let eval = evaluate("  WhoAmI ", &table(), Transcript::new());
        assert_eq!(
            eval.transcript.entries(),
            &[Entry::input("  WhoAmI "), Entry::output("me")]
        );
        assert_eq!(eval.reply(), Some("me"));
    }

    #[test]
    fn unknown_command_uses_folded_form() {
        let eval = evaluate("LS -la", &table(), Transcript::new());
        assert_eq!(eval.reply(), Some("command not found: ls -la"));
        assert_eq!(eval.transcript.entries()[0], Entry::input("LS -la"));
    }

    #[test]
    fn clear_discards_everything() {
        let start = evaluate("whoami", &table(), Transcript::welcome("hi")).transcript;
        let eval = evaluate(" CLEAR ", &table(), start);
        assert!(eval.transcript.is_empty());
        assert_eq!(eval.effect, SideEffect::Clear);
    }

    #[test]
    fn transcript_serializes_as_a_plain_array() {
        let transcript = Transcript::from(vec![Entry::input("x")]);
        let json = serde_json::to_string(&transcript).unwrap();
        assert_eq!(json, r#"[{"kind":"input","text":"x"}]"#);
    }
}
