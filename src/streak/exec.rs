use crate::cache::Cache;
use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::{GhcardError, Result};
use crate::github::GitHubClient;
use crate::model::ContributionDay;
use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use super::{calc, output};

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::resolve(&common).context("Failed to resolve configuration")?;
    let client = GitHubClient::new(config).context("Failed to create GitHub client")?;
    let mut cache = Cache::new(common.cache.as_deref()).context("Failed to initialize cache")?;

    let created_at = client
        .user_created_at()
        .context("Failed to fetch account creation date")?;
    let now = Utc::now();

    let mut days = fetch_all_contributions(&client, &mut cache, created_at, now)
        .context("Failed to fetch contribution calendar")?;

    // Window edges can hand back the same day twice; the calendar has one
    // count per day, so keep the first.
    days.sort_by_key(|day| day.date);
    days.dedup_by_key(|day| day.date);

    let total_contributions: u64 = days.iter().map(|day| day.contribution_count as u64).sum();

    // GitHub's calendar is UTC-anchored; evaluating "today" in UTC keeps the
    // active-streak check aligned with it across local midnights.
    let today = now.date_naive();
    let streaks = calc::compute_streaks(&days, today);

    if json {
        output::output_json(
            client.username(),
            total_contributions,
            created_at.date_naive(),
            &streaks,
        )?;
    } else {
        let svg = output::render_svg(
            total_contributions,
            created_at.date_naive(),
            today,
            &streaks,
            now,
        );
        crate::svg::write_card(&common.out_dir, "streak_stats.svg", &svg)?;
        output::output_summary(total_contributions, &streaks);
    }

    Ok(())
}

/// Pull the whole account lifetime, one calendar year per request (the API
/// caps a window at one year). Completed years come from the cache when
/// available and are recorded there after a fetch; the current year is
/// always refetched.
fn fetch_all_contributions(
    client: &GitHubClient,
    cache: &mut Cache,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<ContributionDay>> {
    let first_year = created_at.year();
    let current_year = now.year();

    let pb = ProgressBar::new((current_year - first_year + 1) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Fetching contributions");

    let mut all_days = Vec::new();
    for year in first_year..=current_year {
        if year < current_year {
            if let Some(cached) = cache.get_year(client.username(), year)? {
                all_days.extend(cached);
                pb.inc(1);
                continue;
            }
        }

        let from = year_start(year)?.max(created_at);
        let to = year_end(year)?.min(now);
        let days = client
            .contribution_calendar(from, to)
            .with_context(|| format!("Failed to fetch contributions for {year}"))?;

        if year < current_year {
            cache.store_year(client.username(), year, &days)?;
        }
        all_days.extend(days);
        pb.inc(1);
    }

    pb.finish_with_message("Contributions fetched");
    Ok(all_days)
}

fn year_start(year: i32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| GhcardError::InvalidDate(format!("{year}-01-01")))
}

fn year_end(year: i32) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| GhcardError::InvalidDate(format!("{year}-12-31")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bounds_cover_the_whole_year() {
        let start = year_start(2024).unwrap();
        let end = year_end(2024).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-12-31T23:59:59+00:00");
        assert!(start < end);
    }
}
