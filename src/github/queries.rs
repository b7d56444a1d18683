//! GraphQL documents and the raw response shapes they come back in.
//!
//! Everything the API returns is deserialized into the types below and
//! validated here, at the boundary; aggregation code only ever sees the
//! typed domain structs from `model`.

use crate::error::{GhcardError, Result};
use crate::model::{ContributionDay, RepoOverview, UserOverview};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const USER_CREATED_AT: &str = "
query ($username: String!) {
  user(login: $username) {
    createdAt
  }
}";

pub const CONTRIBUTION_CALENDAR: &str = "
query ($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}";

pub const USER_OVERVIEW: &str = "
query ($username: String!) {
  user(login: $username) {
    name
    repositories(first: 100, isFork: false) {
      totalCount
      nodes {
        nameWithOwner
        stargazers {
          totalCount
        }
        forkCount
      }
    }
    contributionsCollection {
      totalCommitContributions
    }
  }
}";

pub const REPO_LANGUAGES: &str = "
query ($username: String!) {
  user(login: $username) {
    repositories(first: 100, ownerAffiliations: OWNER, isFork: false) {
      nodes {
        languages(first: 20, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              name
              color
            }
          }
        }
      }
    }
  }
}";

#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

impl<T> UserData<T> {
    /// GraphQL renders an unknown login as `"user": null` rather than an error.
    pub fn into_user(self, username: &str) -> Result<T> {
        self.user
            .ok_or_else(|| GhcardError::Api(format!("unknown GitHub user: {username}")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAtUser {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUser {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: RawCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendar {
    pub weeks: Vec<RawWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeek {
    pub contribution_days: Vec<RawContributionDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContributionDay {
    pub date: chrono::NaiveDate,
    pub contribution_count: u32,
}

impl RawCalendar {
    /// Flatten the weekly batches into plain days, in API order.
    pub fn into_days(self) -> Vec<ContributionDay> {
        self.weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| ContributionDay {
                date: day.date,
                contribution_count: day.contribution_count,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewUser {
    pub name: Option<String>,
    pub repositories: RawRepositories,
    pub contributions_collection: RawCommitContributions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepositories {
    pub total_count: u64,
    pub nodes: Vec<RawRepoNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepoNode {
    pub name_with_owner: String,
    pub stargazers: RawStargazers,
    pub fork_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStargazers {
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommitContributions {
    pub total_commit_contributions: u64,
}

impl OverviewUser {
    pub fn into_overview(self, username: &str) -> UserOverview {
        UserOverview {
            display_name: self.name.unwrap_or_else(|| username.to_string()),
            total_repos: self.repositories.total_count,
            total_commit_contributions: self
                .contributions_collection
                .total_commit_contributions,
            repos: self
                .repositories
                .nodes
                .into_iter()
                .map(|node| RepoOverview {
                    name_with_owner: node.name_with_owner,
                    stargazer_count: node.stargazers.total_count,
                    fork_count: node.fork_count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LanguagesUser {
    pub repositories: RawLanguageRepos,
}

#[derive(Debug, Deserialize)]
pub struct RawLanguageRepos {
    pub nodes: Vec<RawLanguageNode>,
}

#[derive(Debug, Deserialize)]
pub struct RawLanguageNode {
    pub languages: RawLanguageEdges,
}

#[derive(Debug, Deserialize)]
pub struct RawLanguageEdges {
    pub edges: Vec<RawLanguageEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RawLanguageEdge {
    pub size: u64,
    pub node: RawLanguageName,
}

#[derive(Debug, Deserialize)]
pub struct RawLanguageName {
    pub name: String,
    pub color: Option<String>,
}

/// One language occurrence in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEdge {
    pub name: String,
    pub color: Option<String>,
    pub size: u64,
}

impl LanguagesUser {
    pub fn into_edges(self) -> Vec<LanguageEdge> {
        self.repositories
            .nodes
            .into_iter()
            .flat_map(|node| node.languages.edges)
            .map(|edge| LanguageEdge {
                name: edge.node.name,
                color: edge.node.color,
                size: edge.size,
            })
            .collect()
    }
}

// REST response shapes.

/// `/repos/{owner}/{repo}/stats/contributors` entry. The author can be null
/// for commits GitHub cannot attribute.
#[derive(Debug, Deserialize)]
pub struct ContributorStats {
    pub author: Option<ContributorAuthor>,
    #[serde(default)]
    pub weeks: Vec<ContributorWeek>,
}

#[derive(Debug, Deserialize)]
pub struct ContributorAuthor {
    pub login: Option<String>,
}

/// Weekly additions/deletions bucket; `a`/`d`/`c` are the API's field names.
#[derive(Debug, Deserialize)]
pub struct ContributorWeek {
    #[serde(default)]
    pub a: u64,
    #[serde(default)]
    pub d: u64,
}

/// `/repos/{owner}/{repo}/traffic/views` payload (trailing two weeks).
#[derive(Debug, Deserialize)]
pub struct TrafficViews {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
    #[serde(default)]
    pub views: Vec<TrafficSample>,
}

#[derive(Debug, Deserialize)]
pub struct TrafficSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
}

/// `/users/{user}/repos` listing entry; only the name is consumed.
#[derive(Debug, Deserialize)]
pub struct RepoListEntry {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn calendar_flattens_weeks_in_order() {
        let raw: UserData<CalendarUser> = serde_json::from_str(
            r#"{
                "user": {
                    "contributionsCollection": {
                        "contributionCalendar": {
                            "weeks": [
                                {"contributionDays": [
                                    {"date": "2024-01-01", "contributionCount": 3},
                                    {"date": "2024-01-02", "contributionCount": 0}
                                ]},
                                {"contributionDays": [
                                    {"date": "2024-01-08", "contributionCount": 4}
                                ]}
                            ]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let calendar = raw
            .into_user("octocat")
            .unwrap()
            .contributions_collection
            .contribution_calendar;
        let days = calendar.into_days();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[0].contribution_count, 3);
        assert_eq!(days[2].contribution_count, 4);
    }

    #[test]
    fn null_user_is_an_api_error() {
        let raw: UserData<CreatedAtUser> = serde_json::from_str(r#"{"user": null}"#).unwrap();
        let err = raw.into_user("nobody").unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn overview_falls_back_to_login_when_name_is_null() {
        let raw: UserData<OverviewUser> = serde_json::from_str(
            r#"{
                "user": {
                    "name": null,
                    "repositories": {
                        "totalCount": 2,
                        "nodes": [
                            {"nameWithOwner": "octocat/a", "stargazers": {"totalCount": 5}, "forkCount": 1},
                            {"nameWithOwner": "octocat/b", "stargazers": {"totalCount": 2}, "forkCount": 0}
                        ]
                    },
                    "contributionsCollection": {"totalCommitContributions": 123}
                }
            }"#,
        )
        .unwrap();

        let overview = raw.into_user("octocat").unwrap().into_overview("octocat");
        assert_eq!(overview.display_name, "octocat");
        assert_eq!(overview.total_repos, 2);
        assert_eq!(overview.total_commit_contributions, 123);
        assert_eq!(overview.repos[1].name_with_owner, "octocat/b");
    }

    #[test]
    fn language_edges_flatten_across_repos() {
        let raw: UserData<LanguagesUser> = serde_json::from_str(
            r##"{
                "user": {
                    "repositories": {
                        "nodes": [
                            {"languages": {"edges": [
                                {"size": 100, "node": {"name": "Rust", "color": "#dea584"}}
                            ]}},
                            {"languages": {"edges": [
                                {"size": 40, "node": {"name": "Rust", "color": "#dea584"}},
                                {"size": 10, "node": {"name": "Vimscript", "color": null}}
                            ]}}
                        ]
                    }
                }
            }"##,
        )
        .unwrap();

        let edges = raw.into_user("octocat").unwrap().into_edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2].name, "Vimscript");
        assert_eq!(edges[2].color, None);
    }

    #[test]
    fn contributor_stats_tolerate_missing_fields() {
        let stats: Vec<ContributorStats> = serde_json::from_str(
            r#"[
                {"author": null, "weeks": [{"a": 1, "d": 2, "c": 1}]},
                {"author": {"login": "octocat"}, "weeks": [{"w": 1700000000, "a": 10, "d": 5}]}
            ]"#,
        )
        .unwrap();
        assert!(stats[0].author.is_none());
        assert_eq!(stats[1].weeks[0].a, 10);
        assert_eq!(stats[1].weeks[0].d, 5);
    }

    #[test]
    fn traffic_views_default_when_empty() {
        let views: TrafficViews = serde_json::from_str(r#"{"count": 0, "uniques": 0}"#).unwrap();
        assert_eq!(views.uniques, 0);
        assert!(views.views.is_empty());
    }
}
