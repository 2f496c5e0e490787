//! Pure aggregation over fetched upstream data.
//!
//! Nothing here performs I/O. The view-model is assembled once every fetch
//! has landed and is never patched afterwards; derived numbers are computed on
//! demand from the snapshot.

use std::collections::HashMap;

use serde::Serialize;

use super::judge::{DailyChallenge, Difficulty, JudgeProfile};
use super::source_host::Repository;

/// Default number of languages kept in the breakdown.
pub const DEFAULT_TOP_LANGUAGES: usize = 6;

/// Repository count for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub repos: u64,
}

/// Source-host side of the view-model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceHostSummary {
    /// Sorted by count descending, truncated to the configured top N.
    pub languages: Vec<LanguageCount>,
    pub total_stars: u64,
    pub total_repos: u64,
}

impl SourceHostSummary {
    /// Share of classified repositories held by `entry`, as a percentage of
    /// the languages kept in the table.
    pub fn language_share(&self, entry: &LanguageCount) -> f64 {
        let kept: u64 = self.languages.iter().map(|l| l.repos).sum();
        percent(entry.repos, kept)
    }
}

/// Group repositories by primary language.
///
/// Repositories without a language are left out of the table but still count
/// toward `total_repos` and `total_stars`. Ties are broken by language name so
/// the output is stable.
pub fn summarize_repositories(repos: &[Repository], top_n: usize) -> SourceHostSummary {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for repo in repos {
        if let Some(lang) = repo.language.as_deref() {
            *counts.entry(lang).or_insert(0) += 1;
        }
    }

    let mut languages: Vec<LanguageCount> = counts
        .into_iter()
        .map(|(language, repos)| LanguageCount {
            language: language.to_string(),
            repos,
        })
        .collect();
    languages.sort_by(|a, b| b.repos.cmp(&a.repos).then_with(|| a.language.cmp(&b.language)));
    languages.truncate(top_n);

    SourceHostSummary {
        languages,
        total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
        total_repos: repos.len() as u64,
    }
}

/// Render-ready snapshot of every upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsViewModel {
    pub profile: JudgeProfile,
    pub daily: DailyChallenge,
    /// `None` when the source-host listing is switched off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_host: Option<SourceHostSummary>,
}

impl StatsViewModel {
    /// Solved count as a rounded percentage of `capacity`.
    pub fn capacity_pct(&self, capacity: u32) -> u64 {
        if capacity == 0 {
            return 0;
        }
        (self.profile.total_solved as f64 / f64::from(capacity) * 100.0).round() as u64
    }

    /// Global rank expressed in thousands, floored (`1_300_512` → `1300`).
    pub fn rank_thousands(&self) -> u64 {
        self.profile.ranking / 1000
    }

    /// Share of the total solved count that falls in `difficulty`.
    pub fn difficulty_share(&self, difficulty: Difficulty) -> f64 {
        percent(
            self.profile.solved.tier(difficulty).solved,
            self.profile.total_solved,
        )
    }

    /// Accepted submissions over all submissions for `difficulty`.
    pub fn acceptance_rate(&self, difficulty: Difficulty) -> f64 {
        let tier = self.profile.solved.tier(difficulty);
        percent(tier.solved, tier.submissions)
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::judge::{SolvedCounts, TierCount};
    use super::*;

    fn repo(language: Option<&str>, stars: u64) -> Repository {
        Repository {
            name: "r".to_string(),
            language: language.map(str::to_string),
            stargazers_count: stars,
            forks_count: 0,
        }
    }

    fn view_model(ranking: u64, total: u64, easy: TierCount) -> StatsViewModel {
        StatsViewModel {
            profile: JudgeProfile {
                username: "u".into(),
                display_name: "U".into(),
                ranking,
                avatar_url: String::new(),
                solved: SolvedCounts {
                    easy,
                    ..SolvedCounts::default()
                },
                total_solved: total,
                authored: 0,
            },
            daily: DailyChallenge {
                id: "1".into(),
                title: "Two Sum".into(),
                difficulty: Difficulty::Easy,
                link: "https://x".into(),
            },
            source_host: None,
        }
    }

    #[test]
    fn null_language_counts_toward_totals_only() {
        let repos = [
            repo(Some("Rust"), 5),
            repo(Some("Rust"), 2),
            repo(None, 1),
            repo(Some("Go"), 0),
        ];
        let summary = summarize_repositories(&repos, DEFAULT_TOP_LANGUAGES);

        assert_eq!(
            summary.languages,
            vec![
                LanguageCount { language: "Rust".into(), repos: 2 },
                LanguageCount { language: "Go".into(), repos: 1 },
            ]
        );
        assert_eq!(summary.total_stars, 8);
        assert_eq!(summary.total_repos, 4);
    }

    #[test]
    fn keeps_only_top_n_languages() {
        let mut repos = Vec::new();
        for (lang, n) in [("A", 1), ("B", 7), ("C", 3), ("D", 5), ("E", 2), ("F", 6), ("G", 4)] {
            for _ in 0..n {
                repos.push(repo(Some(lang), 0));
            }
        }
        let summary = summarize_repositories(&repos, 6);

        let names: Vec<&str> = summary.languages.iter().map(|l| l.language.as_str()).collect();
        assert_eq!(names, vec!["B", "F", "D", "G", "C", "E"]);
        assert_eq!(summary.total_repos, 28);
    }

    #[test]
    fn ties_sort_by_name() {
        let repos = [repo(Some("Zig"), 0), repo(Some("C"), 0)];
        let summary = summarize_repositories(&repos, 6);
        assert_eq!(summary.languages[0].language, "C");
    }

    #[test]
    fn empty_listing_is_all_zero() {
        let summary = summarize_repositories(&[], 6);
        assert_eq!(summary, SourceHostSummary::default());
    }

    #[test]
    fn derived_fields_are_plain_arithmetic() {
        let vm = view_model(1_300_512, 125, TierCount { solved: 50, submissions: 200 });
        assert_eq!(vm.capacity_pct(2500), 5);
        assert_eq!(vm.capacity_pct(0), 0);
        assert_eq!(vm.rank_thousands(), 1300);
        assert!((vm.difficulty_share(Difficulty::Easy) - 40.0).abs() < 1e-9);
        assert!((vm.acceptance_rate(Difficulty::Easy) - 25.0).abs() < 1e-9);
        assert_eq!(vm.difficulty_share(Difficulty::Hard), 0.0);
    }

    #[test]
    fn zero_totals_do_not_divide_by_zero() {
        let vm = view_model(0, 0, TierCount::default());
        assert_eq!(vm.difficulty_share(Difficulty::Easy), 0.0);
        assert_eq!(vm.acceptance_rate(Difficulty::Easy), 0.0);
    }

    #[test]
    fn language_share_uses_kept_languages() {
        let repos = [repo(Some("Rust"), 0), repo(Some("Go"), 0), repo(None, 0)];
        let summary = summarize_repositories(&repos, 6);
        let rust = &summary.languages[0];
        assert!((summary.language_share(rust) - 50.0).abs() < 1e-9);
    }
}
