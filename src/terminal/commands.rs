/// Canned command table for the simulated terminal.
///
/// Maps a case-folded command name to the fixed text it prints. The table is
/// built once (usually from the [`Catalog`]) and shared by reference; it is
/// never modified after construction.
use std::collections::BTreeMap;

use crate::catalog::Catalog;

/// Name of the reserved command that wipes the transcript.
pub const CLEAR_COMMAND: &str = "clear";

/// Immutable lookup table of built-in commands.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: BTreeMap<String, String>,
}

impl CommandTable {
    /// Build a table from `(name, response)` pairs.
    ///
    /// Names are case-folded on insert so lookups with a folded key always
    /// match. A `clear` entry is ignored since that name is reserved.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, text)| (name.as_ref().trim().to_lowercase(), text.into()))
            .filter(|(name, _)| !name.is_empty() && name != CLEAR_COMMAND)
            .collect();
        Self { entries }
    }

    /// The standard portfolio commands, rendered from the catalog.
    pub fn builtin(catalog: &Catalog) -> Self {
        let owner = &catalog.owner;

        let whoami = format!("{}. {}", owner.name, owner.headline);
        let stack = format!(
            "Languages: {}.\nTools: {}.",
            owner.languages.join(", "),
            owner.tools.join(", ")
        );
        let contact = format!("Email: {}\nGitHub: {}", owner.email, owner.source_profile);
        let projects = catalog
            .projects
            .iter()
            .map(|p| format!("{:<24} {}", p.title, p.tags.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");
        let experience = catalog
            .experience
            .iter()
            .map(|e| format!("{:<20} {:<18} {}", e.period, e.company, e.role))
            .collect::<Vec<_>>()
            .join("\n");

        let listed = ["whoami", "stack", "contact", "projects", "experience"];
        let help = format!(
            "Available commands: {}, {}",
            listed.join(", "),
            CLEAR_COMMAND
        );

        Self::new([
            ("help", help),
            ("whoami", whoami),
            ("stack", stack),
            ("contact", contact),
            ("projects", projects),
            ("experience", experience),
        ])
    }

    /// Look up the response for an already case-folded command name.
    pub fn get(&self, folded: &str) -> Option<&str> {
        self.entries.get(folded).map(String::as_str)
    }

    /// All command names in sorted order (excluding the reserved `clear`).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
