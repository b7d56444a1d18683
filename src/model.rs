use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// One calendar day of the GitHub contribution calendar (UTC-anchored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

/// Streak scan result. `current_streak` is non-zero only when the streak
/// includes the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub current_streak_start: Option<NaiveDate>,
    pub longest_streak: u32,
    pub longest_streak_start: Option<NaiveDate>,
    pub longest_streak_end: Option<NaiveDate>,
}

/// Per-repository overview used by the stats card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOverview {
    pub name_with_owner: String,
    pub stargazer_count: u64,
    pub fork_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserOverview {
    pub display_name: String,
    pub total_repos: u64,
    pub total_commit_contributions: u64,
    pub repos: Vec<RepoOverview>,
}

/// Aggregated numbers behind the overall statistics card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub display_name: String,
    pub stars: u64,
    pub forks: u64,
    pub contributions: u64,
    pub lines_changed: u64,
    pub views: u64,
    pub repos: u64,
}

/// One language slice of the languages card, percentage of all bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    pub color: String,
    pub size: u64,
    pub percent: f64,
}

/// One row of the traffic card: unique visitors over the trailing two weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTraffic {
    pub name: String,
    pub uniques: u64,
    pub date_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub username: String,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub username: String,
    pub languages: Vec<LanguageStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub username: String,
    pub total_contributions: u64,
    pub account_created: NaiveDate,
    pub streaks: StreakStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub username: String,
    pub repos: Vec<RepoTraffic>,
}
