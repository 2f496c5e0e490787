/// Stats aggregator: judge profile, daily challenge and source-host
/// language breakdown merged into one view-model.
///
/// # Load model
///
/// [`StatsAggregator::load`] fans the upstream requests out onto scoped
/// threads, joins every one of them, and only then builds a
/// [`StatsViewModel`]. The load is all-or-nothing:
///
/// - any transport or parse failure fails the whole load with the first
///   error in endpoint order (profile, daily, repositories);
/// - each request's timeout is clamped to the [`CancelToken`] deadline, so a
///   deadline bounds the whole load;
/// - a cancelled token discards whatever was fetched;
/// - there is no retry, backoff, or cache.
///
/// Concurrent loads are not coalesced. Two callers loading at the same time
/// issue two full sets of requests.
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;

pub mod aggregate;
pub mod cancel;
pub mod error;
pub mod judge;
pub mod source_host;

pub use aggregate::{LanguageCount, SourceHostSummary, StatsViewModel, summarize_repositories};
pub use cancel::CancelToken;
pub use error::{StatsError, StatsResult};
pub use judge::{DailyChallenge, Difficulty, JudgeClient, JudgeProfile};
pub use source_host::{Repository, SourceHostClient};

use crate::analytics::{Event, EventLog, Source};
use crate::config::FolioConfig;

/// Owns the upstream clients and the aggregation settings.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    judge: JudgeClient,
    source_host: Option<SourceHostClient>,
    top_languages: usize,
    capacity: u32,
    events: EventLog,
}

impl StatsAggregator {
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            judge: JudgeClient::from_config(config),
            source_host: config
                .source_host
                .enabled
                .then(|| SourceHostClient::from_config(config)),
            top_languages: config.source_host.top_languages,
            capacity: config.judge.capacity,
            events: EventLog::from_config(config),
        }
    }

    /// Replace the event log (tests point it at a temp file or disable it).
    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    /// Denominator for [`StatsViewModel::capacity_pct`].
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of upstream requests one load issues.
    pub fn endpoint_count(&self) -> usize {
        if self.source_host.is_some() { 3 } else { 2 }
    }

    /// Fetch everything concurrently and build the view-model.
    pub fn load(&self, cancel: &CancelToken) -> StatsResult<StatsViewModel> {
        let start = Instant::now();
        let result = self.load_inner(cancel);
        let latency_ms = start.elapsed().as_millis() as u64;

        let event = match &result {
            Ok(_) => Event::new(Source::Stats, "ok"),
            Err(e) => Event::new(Source::Stats, e.kind()).detail(e.to_string()),
        };
        self.events.record(&event.latency_ms(latency_ms));

        result
    }

    fn load_inner(&self, cancel: &CancelToken) -> StatsResult<StatsViewModel> {
        if cancel.is_cancelled() {
            return Err(StatsError::Cancelled);
        }

        let (profile, daily, repos) = thread::scope(|scope| {
            let profile = scope.spawn(|| self.judge.profile(cancel));
            let daily = scope.spawn(|| self.judge.daily(cancel));
            let repos = self
                .source_host
                .as_ref()
                .map(|client| scope.spawn(move || client.repositories(cancel)));

            (
                join(profile, judge::PROFILE_ENDPOINT),
                join(daily, judge::DAILY_ENDPOINT),
                repos.map(|handle| join(handle, source_host::REPOS_ENDPOINT)),
            )
        });

        if cancel.is_cancelled() {
            return Err(StatsError::Cancelled);
        }

        let profile = profile?;
        let daily = daily?;
        let source_host = repos
            .transpose()?
            .map(|repos| summarize_repositories(&repos, self.top_languages));

        Ok(StatsViewModel {
            profile,
            daily,
            source_host,
        })
    }
}

/// Join a fetch worker, turning a panic into [`StatsError::Worker`].
fn join<T>(
    handle: ScopedJoinHandle<'_, StatsResult<T>>,
    endpoint: &'static str,
) -> StatsResult<T> {
    handle
        .join()
        .unwrap_or(Err(StatsError::Worker { endpoint }))
}
