//! JSON API handlers for the local server.
//!
//! Handlers return an [`ApiResponse`] (status + JSON body) so they can be
//! exercised without a socket. The server in `mod.rs` turns them into
//! `tiny_http` responses.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::stats::{CancelToken, Difficulty, StatsViewModel};
use crate::terminal::{self, Transcript};

use super::AppState;

/// Status code and serialized body of a handler result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, data: &T) -> Result<Self> {
        let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
        Ok(Self { status, body })
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Stats response: the view-model plus the derived display numbers.
#[derive(Serialize)]
struct StatsResponse<'a> {
    #[serde(flatten)]
    view_model: &'a StatsViewModel,
    derived: Derived,
}

#[derive(Serialize)]
struct Derived {
    capacity_pct: u64,
    rank_thousands: u64,
    easy_share_pct: f64,
    medium_share_pct: f64,
    hard_share_pct: f64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    upstream_endpoints: usize,
    assistant_configured: bool,
}

/// Body of `POST /api/terminal`.
#[derive(Deserialize)]
struct TerminalRequest {
    input: String,
    #[serde(default)]
    transcript: Transcript,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/stats`: fresh upstream load on every request.
///
/// 502 when any upstream call fails; no partial body is ever sent.
pub fn get_stats(state: &AppState) -> Result<ApiResponse> {
    let cancel = CancelToken::new();
    match state.aggregator.load(&cancel) {
        Ok(vm) => {
            let derived = Derived {
                capacity_pct: vm.capacity_pct(state.aggregator.capacity()),
                rank_thousands: vm.rank_thousands(),
                easy_share_pct: vm.difficulty_share(Difficulty::Easy),
                medium_share_pct: vm.difficulty_share(Difficulty::Medium),
                hard_share_pct: vm.difficulty_share(Difficulty::Hard),
            };
            ApiResponse::json(
                200,
                &StatsResponse {
                    view_model: &vm,
                    derived,
                },
            )
        }
        Err(e) => Ok(ApiResponse::error(502, &e.to_string())),
    }
}

/// `GET /api/projects?limit=N`
pub fn get_projects(state: &AppState, url: &str) -> Result<ApiResponse> {
    let limit = parse_usize_param(url, "limit");
    ApiResponse::json(200, &state.catalog.projects(limit))
}

/// `GET /api/experience`
pub fn get_experience(state: &AppState) -> Result<ApiResponse> {
    ApiResponse::json(200, &state.catalog.experience)
}

/// `GET /api/health`
pub fn get_health(state: &AppState) -> Result<ApiResponse> {
    ApiResponse::json(
        200,
        &HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            upstream_endpoints: state.aggregator.endpoint_count(),
            assistant_configured: state.assistant_configured,
        },
    )
}

/// `POST /api/terminal`: evaluate one line against a client-held transcript.
///
/// The server keeps no session: the client sends its transcript and gets the
/// next one back.
pub fn post_terminal(state: &AppState, body: &str) -> Result<ApiResponse> {
    let request: TerminalRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(ApiResponse::error(400, &format!("invalid request: {e}"))),
    };

    let evaluation = terminal::evaluate(&request.input, &state.table, request.transcript);
    ApiResponse::json(200, &evaluation)
}

/// Parse a numeric query parameter from a URL.
fn parse_usize_param(url: &str, name: &str) -> Option<usize> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == name { v.parse().ok() } else { None }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_usize_param_extracts_value() {
        assert_eq!(parse_usize_param("/api/projects?limit=3", "limit"), Some(3));
        assert_eq!(parse_usize_param("/api/projects?a=b&limit=2", "limit"), Some(2));
        assert_eq!(parse_usize_param("/api/projects", "limit"), None);
        assert_eq!(parse_usize_param("/api/projects?limit=x", "limit"), None);
    }

    #[test]
    fn error_body_is_json() {
        let resp = ApiResponse::error(502, "judge-profile: request failed");
        let value: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(value["error"], "judge-profile: request failed");
        assert_eq!(resp.status, 502);
    }
}
