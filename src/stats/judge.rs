/// Coding-judge HTTP client: profile and daily-challenge endpoints.
///
/// Talks to a read-only JSON proxy in front of the judge:
///
/// - `GET <base>/user/<username>`: profile plus accepted-submission counts
/// - `GET <base>/daily`: today's challenge
///
/// Wire types are private; callers only see [`JudgeProfile`] and
/// [`DailyChallenge`].
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::cancel::CancelToken;
use super::error::{StatsError, StatsResult, from_ureq};
use crate::config::FolioConfig;

pub const PROFILE_ENDPOINT: &str = "judge-profile";
pub const DAILY_ENDPOINT: &str = "judge-daily";

/// Base used to absolutize relative challenge links.
const JUDGE_SITE: &str = "https://leetcode.com";

// ---------------------------------------------------------------------------
// Public model
// ---------------------------------------------------------------------------

/// Difficulty tier of a judge problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse the judge's tier label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Accepted and attempted submissions for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCount {
    pub solved: u64,
    pub submissions: u64,
}

/// Per-tier solved counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SolvedCounts {
    pub easy: TierCount,
    pub medium: TierCount,
    pub hard: TierCount,
}

impl SolvedCounts {
    pub fn tier(&self, difficulty: Difficulty) -> TierCount {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn tier_mut(&mut self, difficulty: Difficulty) -> &mut TierCount {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    pub fn sum(&self) -> u64 {
        self.easy.solved + self.medium.solved + self.hard.solved
    }
}

/// Judge profile as shown on the stats card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeProfile {
    pub username: String,
    pub display_name: String,
    pub ranking: u64,
    pub avatar_url: String,
    pub solved: SolvedCounts,
    /// Total accepted, taken from the judge's `All` row when present.
    pub total_solved: u64,
    /// Solutions the user has published.
    pub authored: u64,
}

/// Pointer to today's challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyChallenge {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub link: String,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    username: String,
    #[serde(default)]
    profile: ProfileFields,
    submit_stats: SubmitStats,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFields {
    real_name: Option<String>,
    user_avatar: Option<String>,
    ranking: Option<u64>,
    solution_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    ac_submission_num: Vec<DifficultyRow>,
}

#[derive(Debug, Deserialize)]
struct DifficultyRow {
    difficulty: String,
    count: u64,
    #[serde(default)]
    submissions: u64,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    link: String,
    question: DailyQuestion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyQuestion {
    question_id: String,
    title: String,
    difficulty: String,
}

impl ProfileResponse {
    fn into_profile(self) -> JudgeProfile {
        let mut solved = SolvedCounts::default();
        let mut all_row = None;

        for row in &self.submit_stats.ac_submission_num {
            if row.difficulty.eq_ignore_ascii_case("all") {
                all_row = Some(row.count);
            } else if let Some(tier) = Difficulty::parse(&row.difficulty) {
                *solved.tier_mut(tier) = TierCount {
                    solved: row.count,
                    submissions: row.submissions,
                };
            }
        }

        let display_name = self
            .profile
            .real_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.username.clone());

        JudgeProfile {
            total_solved: all_row.unwrap_or_else(|| solved.sum()),
            username: self.username,
            display_name,
            ranking: self.profile.ranking.unwrap_or(0),
            avatar_url: self.profile.user_avatar.unwrap_or_default(),
            authored: self.profile.solution_count.unwrap_or(0),
            solved,
        }
    }
}

impl DailyResponse {
    fn into_challenge(self) -> StatsResult<DailyChallenge> {
        let difficulty = Difficulty::parse(&self.question.difficulty).ok_or_else(|| {
            StatsError::malformed(
                DAILY_ENDPOINT,
                format!("unknown difficulty '{}'", self.question.difficulty),
            )
        })?;

        Ok(DailyChallenge {
            id: self.question.question_id,
            title: self.question.title,
            difficulty,
            link: absolutize(&self.link),
        })
    }
}

/// Resolve a site-relative challenge link.
fn absolutize(link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("{JUDGE_SITE}/{}", link.trim_start_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous judge client. One instance serves both endpoints.
#[derive(Debug, Clone)]
pub struct JudgeClient {
    base_url: String,
    username: String,
    timeout: Duration,
}

impl JudgeClient {
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            base_url: config.judge.base_url.trim_end_matches('/').to_string(),
            username: config.identity.judge_username.clone(),
            timeout: Duration::from_millis(config.judge.timeout_ms),
        }
    }

    pub fn profile_url(&self) -> String {
        format!("{}/user/{}", self.base_url, self.username)
    }

    pub fn daily_url(&self) -> String {
        format!("{}/daily", self.base_url)
    }

    /// Fetch the profile for the configured username.
    ///
    /// The request timeout never outlives the token's deadline.
    pub fn profile(&self, cancel: &CancelToken) -> StatsResult<JudgeProfile> {
        let resp = ureq::get(&self.profile_url())
            .timeout(cancel.clamp(self.timeout))
            .call()
            .map_err(|e| from_ureq(PROFILE_ENDPOINT, e))?;

        let parsed: ProfileResponse = resp
            .into_json()
            .map_err(|e| StatsError::malformed(PROFILE_ENDPOINT, e.to_string()))?;

        Ok(parsed.into_profile())
    }

    /// Fetch today's challenge.
    pub fn daily(&self, cancel: &CancelToken) -> StatsResult<DailyChallenge> {
        let resp = ureq::get(&self.daily_url())
            .timeout(cancel.clamp(self.timeout))
            .call()
            .map_err(|e| from_ureq(DAILY_ENDPOINT, e))?;

        let parsed: DailyResponse = resp
            .into_json()
            .map_err(|e| StatsError::malformed(DAILY_ENDPOINT, e.to_string()))?;

        parsed.into_challenge()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{
        "username": "iustus",
        "profile": {
            "realName": "Ayman",
            "userAvatar": "https://a/x.png",
            "ranking": 1300512,
            "solutionCount": 4
        },
        "submitStats": { "acSubmissionNum": [
            { "difficulty": "All", "count": 120, "submissions": 300 },
            { "difficulty": "Easy", "count": 70, "submissions": 150 },
            { "difficulty": "Medium", "count": 45, "submissions": 130 },
            { "difficulty": "Hard", "count": 5, "submissions": 20 }
        ] }
    }"#;

    #[test]
    fn profile_maps_tiers_and_total() {
        let parsed: ProfileResponse = serde_json::from_str(PROFILE_JSON).unwrap();
        let profile = parsed.into_profile();

        assert_eq!(profile.display_name, "Ayman");
        assert_eq!(profile.ranking, 1_300_512);
        assert_eq!(profile.authored, 4);
        assert_eq!(profile.total_solved, 120);
        assert_eq!(profile.solved.easy, TierCount { solved: 70, submissions: 150 });
        assert_eq!(profile.solved.tier(Difficulty::Hard).solved, 5);
    }

    #[test]
    fn profile_without_all_row_sums_tiers() {
        let json = r#"{
            "username": "u",
            "submitStats": { "acSubmissionNum": [
                { "difficulty": "Easy", "count": 3 },
                { "difficulty": "Hard", "count": 1 }
            ] }
        }"#;
        let profile = serde_json::from_str::<ProfileResponse>(json)
            .unwrap()
            .into_profile();

        assert_eq!(profile.total_solved, 4);
        assert_eq!(profile.solved.medium, TierCount::default());
        // Falls back to username when no real name is set
        assert_eq!(profile.display_name, "u");
        assert_eq!(profile.ranking, 0);
        assert_eq!(profile.authored, 0);
    }

    #[test]
    fn profile_missing_submit_stats_is_malformed_json() {
        let json = r#"{ "username": "u", "profile": {} }"#;
        assert!(serde_json::from_str::<ProfileResponse>(json).is_err());
    }

    #[test]
    fn daily_resolves_relative_link() {
        let json = r#"{
            "date": "2026-10-15",
            "link": "/problems/two-sum/",
            "question": { "questionId": "1", "title": "Two Sum", "titleSlug": "two-sum", "difficulty": "Easy" }
        }"#;
        let daily = serde_json::from_str::<DailyResponse>(json)
            .unwrap()
            .into_challenge()
            .unwrap();

        assert_eq!(daily.id, "1");
        assert_eq!(daily.difficulty, Difficulty::Easy);
        assert_eq!(daily.link, "https://leetcode.com/problems/two-sum/");
    }

    #[test]
    fn daily_with_unknown_difficulty_is_rejected() {
        let json = r#"{
            "link": "https://x/p",
            "question": { "questionId": "9", "title": "T", "difficulty": "Impossible" }
        }"#;
        let err = serde_json::from_str::<DailyResponse>(json)
            .unwrap()
            .into_challenge()
            .unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn client_strips_trailing_slash() {
        let mut config = FolioConfig::default();
        config.judge.base_url = "http://judge.local/".to_string();
        let client = JudgeClient::from_config(&config);
        assert_eq!(client.profile_url(), "http://judge.local/user/iustus");
        assert_eq!(client.daily_url(), "http://judge.local/daily");
    }
}
