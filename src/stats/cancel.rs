/// Cancellation token for an in-flight stats load.
///
/// Upstream calls are blocking and cannot be interrupted mid-request. A
/// deadline bounds them instead: every request's timeout is clamped to the
/// time left on the token. An explicit [`CancelToken::cancel`] decides
/// whether results are still wanted once they land; a load that observes a
/// cancelled token discards everything it fetched.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also reports cancelled once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Shorten a request timeout so it cannot outlive the deadline.
    pub fn clamp(&self, timeout: Duration) -> Duration {
        match self.remaining() {
            Some(left) => timeout.min(left),
            None => timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn past_deadline_counts_as_cancelled() {
        let token = CancelToken::with_deadline(Instant::now());
        assert!(token.is_cancelled());

        let token = CancelToken::with_deadline(Instant::now() + Duration::from_secs(3600));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn clamp_respects_deadline() {
        let ten = Duration::from_secs(10);
        assert_eq!(CancelToken::new().clamp(ten), ten);

        let token = CancelToken::with_deadline(Instant::now() + Duration::from_millis(200));
        assert!(token.clamp(ten) <= Duration::from_millis(200));

        let expired = CancelToken::with_deadline(Instant::now());
        assert_eq!(expired.clamp(ten), Duration::ZERO);
        assert_eq!(expired.remaining(), Some(Duration::ZERO));
    }
}
