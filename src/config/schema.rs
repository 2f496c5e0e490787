/// Configuration schema and defaults for folio.
///
/// Defines the TOML-serializable configuration structure with sections
/// `[identity]`, `[judge]`, `[source_host]`, `[assistant]` and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override. The assistant credential is deliberately absent: it is
/// only ever read from the environment.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level folio configuration.
///
/// Maps directly to `~/.folio/config.toml` and `.folio.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub identity: IdentityConfig,
    pub judge: JudgeConfig,
    pub source_host: SourceHostConfig,
    pub assistant: AssistantConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [identity]
// ---------------------------------------------------------------------------

/// Account names used against the upstream services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Username on the coding-judge service.
    pub judge_username: String,
    /// Username on the source-hosting service.
    pub source_host_username: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            judge_username: "iustus".to_string(),
            source_host_username: "waougri".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [judge]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Denominator for the "capacity" percentage shown next to the solved count.
    pub capacity: u32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://leetcode-api-pied.vercel.app".to_string(),
            timeout_ms: 10_000,
            capacity: 2500,
        }
    }
}

// ---------------------------------------------------------------------------
// [source_host]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceHostConfig {
    /// Include the repository listing in the stats load.
    pub enabled: bool,
    pub base_url: String,
    pub per_page: u32,
    /// How many languages survive in the breakdown.
    pub top_languages: usize,
    pub timeout_ms: u64,
}

impl Default for SourceHostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.github.com".to_string(),
            per_page: 100,
            top_languages: 6,
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [assistant]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.7,
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write JSONL events to `~/.folio/events.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl FolioConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Written by `folio config init`. Must stay parseable into a
    /// [`FolioConfig`] equal to [`FolioConfig::default()`].
    pub fn default_toml() -> String {
        r#"# folio configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (FOLIO_*)
#   2. Project config (.folio.toml in current directory)
#   3. User global config (~/.folio/config.toml)
#   4. Built-in defaults
#
# The assistant API key is never read from this file.
# Export FOLIO_API_KEY (or GEMINI_API_KEY) instead.

[identity]
judge_username = "iustus"
source_host_username = "waougri"

[judge]
base_url = "https://leetcode-api-pied.vercel.app"
timeout_ms = 10000
capacity = 2500                       # denominator of the capacity percentage

[source_host]
enabled = true                        # false = profile + daily only
base_url = "https://api.github.com"
per_page = 100
top_languages = 6
timeout_ms = 10000

[assistant]
model = "gemini-3-flash-preview"
base_url = "https://generativelanguage.googleapis.com"
temperature = 0.7
timeout_ms = 30000

[logging]
enabled = true                        # JSONL events in ~/.folio/events.jsonl
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = FolioConfig::default();
        assert_eq!(config.identity.judge_username, "iustus");
        assert_eq!(config.identity.source_host_username, "waougri");
        assert_eq!(config.judge.capacity, 2500);
        assert!(config.source_host.enabled);
        assert_eq!(config.source_host.per_page, 100);
        assert_eq!(config.source_host.top_languages, 6);
        assert_eq!(config.assistant.model, "gemini-3-flash-preview");
        assert!(config.logging.enabled);
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[identity]
judge_username = "someone"
"#;
        let config: FolioConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.identity.judge_username, "someone");
        // Everything else falls back to defaults
        assert_eq!(config.identity.source_host_username, "waougri");
        assert_eq!(config.source_host.top_languages, 6);
    }

    #[test]
    fn deserialize_empty_toml() {
        let config: FolioConfig = toml::from_str("").unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: FolioConfig = toml::from_str(&FolioConfig::default_toml()).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn identity_holds_only_account_names() {
        let value = toml::Value::try_from(FolioConfig::default()).unwrap();
        let keys: Vec<&str> = value["identity"]
            .as_table()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["judge_username", "source_host_username"]);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = FolioConfig::default();
        config.source_host.enabled = false;
        config.assistant.temperature = 0.2;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: FolioConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
