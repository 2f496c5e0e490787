//! Local read-only JSON server for folio.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) exposing the
//! portfolio data and the terminal evaluator to a browser front end:
//!
//! - `GET  /api/stats`: aggregated upstream stats (fresh load per request)
//! - `GET  /api/projects[?limit=N]`, `GET /api/experience`: catalog data
//! - `GET  /api/health`
//! - `POST /api/terminal`: evaluate one line, `{ input, transcript }`
//!
//! Launched via `folio serve` (default: `http://127.0.0.1:9747`).

pub mod api;

use std::io::Cursor;

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::catalog::Catalog;
use crate::stats::StatsAggregator;
use crate::terminal::CommandTable;

pub use api::ApiResponse;

pub const DEFAULT_ADDR: &str = "127.0.0.1:9747";

/// Everything the handlers read. Built once and shared immutably.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub table: CommandTable,
    pub aggregator: StatsAggregator,
    pub assistant_configured: bool,
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the server on the given address.
///
/// Blocks the current thread and handles requests sequentially. Errors are
/// answered per request and never stop the server.
pub fn serve(addr: &str, state: &AppState) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("folio API listening on http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Post) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let api = dispatch(state, &method, &url, body.as_deref())
            .unwrap_or_else(|e| ApiResponse::error(500, &e.to_string()));
        let status = api.status;
        let _ = request.respond(to_response(api));

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub fn dispatch(
    state: &AppState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<ApiResponse> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/api/stats") => api::get_stats(state),
        (&Method::Get, "/api/projects") => api::get_projects(state, url),
        (&Method::Get, "/api/experience") => api::get_experience(state),
        (&Method::Get, "/api/health") => api::get_health(state),
        (&Method::Post, "/api/terminal") => api::post_terminal(state, body.unwrap_or("{}")),
        _ => Ok(ApiResponse::error(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn to_response(api: ApiResponse) -> Response<Cursor<Vec<u8>>> {
    let resp = Response::from_data(api.body.into_bytes()).with_status_code(StatusCode(api.status));
    match content_type_json() {
        Some(header) => resp.with_header(header),
        None => resp,
    }
}

/// JSON content type header.
fn content_type_json() -> Option<Header> {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").ok()
}
