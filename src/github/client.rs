use crate::config::Config;
use crate::error::{GhcardError, Result};
use crate::model::{ContributionDay, UserOverview};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::queries;

const USER_AGENT: &str = concat!("ghcard/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub answers 202 while a statistics job runs server-side; poll with a
/// fixed pause, bounded so a stuck job cannot hang a card forever.
const ACCEPTED_RETRY_LIMIT: u32 = 10;
const ACCEPTED_RETRY_DELAY: Duration = Duration::from_secs(1);

pub struct GitHubClient {
    http: reqwest::blocking::Client,
    config: Config,
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GitHubClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    pub fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http
            .post(&self.config.graphql_url)
            .bearer_auth(&self.config.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GhcardError::Api(format!(
                "GraphQL request failed with {status}: {body}"
            )));
        }

        let envelope: GraphQlEnvelope<T> = response.json()?;
        if let Some(errors) = envelope.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(GhcardError::Api(format!(
                "GraphQL errors: {}",
                messages.join("; ")
            )));
        }
        envelope
            .data
            .ok_or_else(|| GhcardError::Api("GraphQL response carried no data".to_string()))
    }

    pub fn rest<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.config.rest_url, endpoint);
        for _ in 0..ACCEPTED_RETRY_LIMIT {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.token)
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .send()?;

            let status = response.status();
            if status == reqwest::StatusCode::ACCEPTED {
                std::thread::sleep(ACCEPTED_RETRY_DELAY);
                continue;
            }
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(GhcardError::Api(format!(
                    "GET {endpoint} failed with {status}: {body}"
                )));
            }
            return Ok(response.json()?);
        }
        Err(GhcardError::Api(format!(
            "GET {endpoint} still computing after {ACCEPTED_RETRY_LIMIT} attempts"
        )))
    }

    pub fn user_created_at(&self) -> Result<DateTime<Utc>> {
        let data: queries::UserData<queries::CreatedAtUser> = self.graphql(
            queries::USER_CREATED_AT,
            json!({ "username": self.config.username }),
        )?;
        Ok(data.into_user(&self.config.username)?.created_at)
    }

    /// Fetch one contribution-calendar window, flattened to days; the API
    /// caps `from..to` at a year, so callers chunk the account lifetime.
    pub fn contribution_calendar(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ContributionDay>> {
        let data: queries::UserData<queries::CalendarUser> = self.graphql(
            queries::CONTRIBUTION_CALENDAR,
            json!({
                "username": self.config.username,
                "from": from.to_rfc3339(),
                "to": to.to_rfc3339(),
            }),
        )?;
        Ok(data
            .into_user(&self.config.username)?
            .contributions_collection
            .contribution_calendar
            .into_days())
    }

    pub fn user_overview(&self) -> Result<UserOverview> {
        let data: queries::UserData<queries::OverviewUser> = self.graphql(
            queries::USER_OVERVIEW,
            json!({ "username": self.config.username }),
        )?;
        Ok(data
            .into_user(&self.config.username)?
            .into_overview(&self.config.username))
    }

    pub fn language_edges(&self) -> Result<Vec<queries::LanguageEdge>> {
        let data: queries::UserData<queries::LanguagesUser> = self.graphql(
            queries::REPO_LANGUAGES,
            json!({ "username": self.config.username }),
        )?;
        Ok(data.into_user(&self.config.username)?.into_edges())
    }

    pub fn contributor_stats(&self, name_with_owner: &str) -> Result<Vec<queries::ContributorStats>> {
        self.rest(&format!("/repos/{name_with_owner}/stats/contributors"))
    }

    pub fn traffic_views(&self, name_with_owner: &str) -> Result<queries::TrafficViews> {
        self.rest(&format!("/repos/{name_with_owner}/traffic/views"))
    }

    /// All repository names for the user, walking the paginated listing.
    pub fn list_repo_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1u32;
        loop {
            let entries: Vec<queries::RepoListEntry> = self.rest(&format!(
                "/users/{}/repos?page={page}&per_page=100",
                self.config.username
            ))?;
            if entries.is_empty() {
                break;
            }
            names.extend(entries.into_iter().map(|entry| entry.name));
            page += 1;
        }
        Ok(names)
    }
}
