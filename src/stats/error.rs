//! Error taxonomy for the stats load.

use thiserror::Error;

/// Result type for stats operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Why a stats load produced no view-model.
///
/// The load is all-or-nothing, so a single variant describes the whole
/// failure even when several upstream calls went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("{endpoint}: request failed: {message}")]
    Transport { endpoint: &'static str, message: String },

    #[error("{endpoint}: unexpected response: {message}")]
    Malformed { endpoint: &'static str, message: String },

    #[error("stats load cancelled")]
    Cancelled,

    #[error("{endpoint}: worker thread panicked")]
    Worker { endpoint: &'static str },
}

impl StatsError {
    pub fn transport(endpoint: &'static str, message: impl Into<String>) -> Self {
        StatsError::Transport {
            endpoint,
            message: message.into(),
        }
    }

    pub fn malformed(endpoint: &'static str, message: impl Into<String>) -> Self {
        StatsError::Malformed {
            endpoint,
            message: message.into(),
        }
    }

    /// Short machine-friendly label used in the event log.
    pub fn kind(&self) -> &'static str {
        match self {
            StatsError::Transport { .. } => "transport",
            StatsError::Malformed { .. } => "malformed",
            StatsError::Cancelled => "cancelled",
            StatsError::Worker { .. } => "worker",
        }
    }
}

/// Map a `ureq` failure onto the taxonomy.
///
/// Non-2xx statuses count as transport failures; the body is not inspected.
pub(crate) fn from_ureq(endpoint: &'static str, err: ureq::Error) -> StatsError {
    match err {
        ureq::Error::Status(code, _) => StatsError::transport(endpoint, format!("HTTP {code}")),
        ureq::Error::Transport(t) => StatsError::transport(endpoint, t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_endpoint() {
        let err = StatsError::malformed("judge-daily", "missing field `question`");
        assert_eq!(
            err.to_string(),
            "judge-daily: unexpected response: missing field `question`"
        );
        assert_eq!(err.kind(), "malformed");
    }
}
