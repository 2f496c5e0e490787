//! Generative-language API client for the portfolio assistant.
//!
//! Calls `POST <base>/v1beta/models/<model>:generateContent` with the synchronous
//! `ureq` client. The request and response shapes belong to the vendor; only
//! the fields folio reads or sets are modelled here.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AssistantError, GenerativeModel};
use crate::config::FolioConfig;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate (empty if there is none).
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous client for the generative-language API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    timeout: Duration,
}

impl GeminiClient {
    /// Build a client from the resolved config and an optional credential.
    ///
    /// A missing key is not an error here: the first call reports it, so the
    /// session can fall back to its connection-error message.
    pub fn from_config(config: &FolioConfig, api_key: Option<String>) -> Self {
        Self {
            base_url: config.assistant.base_url.trim_end_matches('/').to_string(),
            model: config.assistant.model.clone(),
            api_key,
            temperature: config.assistant.temperature,
            timeout: Duration::from_millis(config.assistant.timeout_ms),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, system: &str, user: &str) -> Result<String, AssistantError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential)?;

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part { text: system }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: user }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let resp = ureq::post(&self.endpoint())
            .set("x-goog-api-key", key)
            .timeout(self.timeout)
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => AssistantError::Transport(format!("HTTP {code}")),
                ureq::Error::Transport(t) => AssistantError::Transport(t.to_string()),
            })?;

        let parsed: GenerateResponse = resp
            .into_json()
            .map_err(|e| AssistantError::Malformed(e.to_string()))?;

        Ok(parsed.text())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
