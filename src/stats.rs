use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::github::{queries::ContributorStats, GitHubClient};
use crate::model::{StatsOutput, UserStats, SCHEMA_VERSION};
use crate::svg::{escape, DARK_MODE_ID};
use anyhow::Context;
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

struct Palette {
    background: &'static str,
    stroke: &'static str,
    title: &'static str,
    text_primary: &'static str,
    icon: &'static str,
}

const LIGHT: Palette = Palette {
    background: "none",
    stroke: "rgb(225, 228, 232)",
    title: "rgb(0, 106, 255)",
    text_primary: "rgb(88, 96, 105)",
    icon: "rgb(88, 96, 105)",
};

const DARK: Palette = Palette {
    background: "none",
    stroke: "rgba(225, 228, 232, 0.5)",
    title: "#006AFF",
    text_primary: "#c9d1d9",
    icon: "#8b949e",
};

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::resolve(&common).context("Failed to resolve configuration")?;
    let client = GitHubClient::new(config).context("Failed to create GitHub client")?;

    let overview = client
        .user_overview()
        .context("Failed to fetch user overview")?;
    let repo_names: Vec<&str> = overview
        .repos
        .iter()
        .map(|repo| repo.name_with_owner.as_str())
        .collect();

    let lines_changed = fetch_lines_changed(&client, &repo_names);
    let views = fetch_views(&client, &repo_names);

    let stats = UserStats {
        display_name: overview.display_name.clone(),
        stars: overview.repos.iter().map(|r| r.stargazer_count).sum(),
        forks: overview.repos.iter().map(|r| r.fork_count).sum(),
        contributions: overview.total_commit_contributions,
        lines_changed,
        views,
        repos: overview.total_repos,
    };

    if json {
        output_json(client.username(), &stats)?;
    } else {
        let svg = render_svg(&stats);
        crate::svg::write_card(&common.out_dir, "github_stats.svg", &svg)?;
        output_summary(&stats);
    }

    Ok(())
}

/// Additions + deletions authored by `username` in one repository's
/// contributor statistics.
pub fn lines_changed_for(username: &str, stats: &[ContributorStats]) -> u64 {
    stats
        .iter()
        .filter(|entry| {
            entry
                .author
                .as_ref()
                .and_then(|author| author.login.as_deref())
                .map(|login| login == username)
                .unwrap_or(false)
        })
        .flat_map(|entry| &entry.weeks)
        .map(|week| week.a + week.d)
        .sum()
}

fn fetch_lines_changed(client: &GitHubClient, repo_names: &[&str]) -> u64 {
    let pb = progress_bar(repo_names.len(), "Fetching contributor statistics");
    let mut total = 0u64;
    for name in repo_names {
        match client.contributor_stats(name) {
            Ok(stats) => total += lines_changed_for(client.username(), &stats),
            Err(err) => skip_repo(name, &err),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    total
}

fn fetch_views(client: &GitHubClient, repo_names: &[&str]) -> u64 {
    let pb = progress_bar(repo_names.len(), "Fetching traffic");
    let mut total = 0u64;
    for name in repo_names {
        match client.traffic_views(name) {
            Ok(traffic) => total += traffic.views.iter().map(|sample| sample.count).sum::<u64>(),
            Err(err) => skip_repo(name, &err),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    total
}

fn progress_bar(len: usize, msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(msg);
    pb
}

/// Per-repository statistics are best effort: traffic needs push access and
/// contributor stats can be unavailable, so a failing repository is skipped
/// rather than failing the card.
fn skip_repo(name: &str, err: &crate::error::GhcardError) {
    eprintln!("{} skipping {name}: {err}", style("warning:").yellow());
}

fn output_json(username: &str, stats: &UserStats) -> Result<()> {
    let output = StatsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        username: username.to_string(),
        stats: stats.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_summary(stats: &UserStats) {
    println!("{}", style("GitHub Statistics").bold());
    println!("{}", "─".repeat(50));
    println!("Stars: {}", style(stats.stars).cyan());
    println!("Forks: {}", style(stats.forks).cyan());
    println!("All-time contributions: {}", style(stats.contributions).cyan());
    println!("Lines of code changed: {}", style(stats.lines_changed).cyan());
    println!("Repository views (past two weeks): {}", style(stats.views).cyan());
    println!("Repositories: {}", style(stats.repos).cyan());
}

fn render_svg(stats: &UserStats) -> String {
    format!(
        r##"<svg id="{id}" width="360" height="210" viewBox="0 0 360 210" preserveAspectRatio="xMinYMin meet" xmlns="http://www.w3.org/2000/svg">
<style>
  .card {{
    width: 350px;
    height: 200px;
    fill: {light_background};
    stroke: {light_stroke};
    stroke-width: 1px;
    rx: 6px;
    ry: 6px;
  }}

  .header {{
    font-size: 16px;
    font-weight: 600;
    fill: {light_title};
    text-anchor: start;
  }}

  .stat-row {{
    font-size: 12px;
    fill: {light_text};
    transform: translateX(-200%);
    animation: slideIn 1s ease-out forwards;
  }}

  .stat-label {{
    text-anchor: start;
  }}

  .stat-value {{
    text-anchor: end;
    font-weight: bold;
  }}

  .icon {{
    fill: {light_icon};
  }}

  /* Dark theme */
  #{id}:target .card {{
    stroke: {dark_stroke};
  }}

  #{id}:target .header {{
    fill: {dark_title};
  }}

  #{id}:target .stat-row {{
    fill: {dark_text};
  }}

  #{id}:target .icon {{
    fill: {dark_icon};
  }}

  @keyframes slideIn {{
    to {{
      transform: translateX(0);
    }}
  }}
</style>

<rect x="5" y="5" class="card" />

<!-- Header -->
<text x="20" y="30" class="header">{name}'s GitHub Statistics</text>

<!-- Stars -->
<g class="stat-row" style="animation-delay: 0ms" transform="translate(20, 50)">
  <svg class="icon" width="16" height="16" viewBox="0 0 16 16" y="-11">
    <path fill-rule="evenodd" d="M8 .25a.75.75 0 01.673.418l1.882 3.815 4.21.612a.75.75 0 01.416 1.279l-3.046 2.97.719 4.192a.75.75 0 01-1.088.791L8 12.347l-3.766 1.98a.75.75 0 01-1.088-.79l.72-4.194L.818 6.374a.75.75 0 01.416-1.28l4.21-.611L7.327.668A.75.75 0 018 .25zm0 2.445L6.615 5.5a.75.75 0 01-.564.41l-3.097.45 2.24 2.184a.75.75 0 01.216.664l-.528 3.084 2.769-1.456a.75.75 0 01.698 0l2.77 1.456-.53-3.084a.75.75 0 01.216-.664l2.24-2.183-3.096-.45a.75.75 0 01-.564-.41L8 2.694v.001z"></path>
  </svg>
  <text x="20" y="0">
    <tspan class="stat-label">Stars</tspan>
    <tspan x="320" class="stat-value">{stars}</tspan>
  </text>
</g>

<!-- Forks -->
<g class="stat-row" style="animation-delay: 150ms" transform="translate(20, 75)">
  <svg class="icon" width="16" height="16" viewBox="0 0 16 16" y="-11">
    <path fill-rule="evenodd" d="M5 3.25a.75.75 0 11-1.5 0 .75.75 0 011.5 0zm0 2.122a2.25 2.25 0 10-1.5 0v.878A2.25 2.25 0 005.75 8.5h1.5v2.128a2.251 2.251 0 101.5 0V8.5h1.5a2.25 2.25 0 002.25-2.25v-.878a2.25 2.25 0 10-1.5 0v.878a.75.75 0 01-.75.75h-4.5A.75.75 0 015 6.25v-.878zm3.75 7.378a.75.75 0 11-1.5 0 .75.75 0 011.5 0zm3-8.75a.75.75 0 100-1.5.75.75 0 000 1.5z"></path>
  </svg>
  <text x="20" y="0">
    <tspan class="stat-label">Forks</tspan>
    <tspan x="320" class="stat-value">{forks}</tspan>
  </text>
</g>

<!-- Contributions -->
<g class="stat-row" style="animation-delay: 300ms" transform="translate(20, 100)">
  <svg class="icon" width="16" height="16" viewBox="0 0 16 16" y="-11">
    <path fill-rule="evenodd" d="M1 2.5A2.5 2.5 0 013.5 0h8.75a.75.75 0 01.75.75v3.5a.75.75 0 01-1.5 0V1.5h-8a1 1 0 00-1 1v6.708A2.492 2.492 0 013.5 9h3.25a.75.75 0 010 1.5H3.5a1 1 0 100 2h5.75a.75.75 0 010 1.5H3.5A2.5 2.5 0 011 11.5v-9zm13.23 7.79a.75.75 0 001.06-1.06l-2.505-2.505a.75.75 0 00-1.06 0L9.22 9.229a.75.75 0 001.06 1.061l1.225-1.224v6.184a.75.75 0 001.5 0V9.066l1.224 1.224z"></path>
  </svg>
  <text x="20" y="0">
    <tspan class="stat-label">All-time contributions</tspan>
    <tspan x="320" class="stat-value">{contributions}</tspan>
  </text>
</g>

<!-- Lines changed -->
<g class="stat-row" style="animation-delay: 450ms" transform="translate(20, 125)">
  <svg class="icon" width="16" height="16" viewBox="0 0 16 16" y="-11">
    <path fill-rule="evenodd" d="M8.75 1.75a.75.75 0 00-1.5 0V5H4a.75.75 0 000 1.5h3.25v3.25a.75.75 0 001.5 0V6.5H12A.75.75 0 0012 5H8.75V1.75zM4 13a.75.75 0 000 1.5h8a.75.75 0 100-1.5H4z"></path>
  </svg>
  <text x="20" y="0">
    <tspan class="stat-label">Lines of code changed</tspan>
    <tspan x="320" class="stat-value">{lines_changed}</tspan>
  </text>
</g>

<!-- Views -->
<g class="stat-row" style="animation-delay: 600ms" transform="translate(20, 150)">
  <svg class="icon" width="16" height="16" viewBox="0 0 16 16" y="-11">
    <path fill-rule="evenodd" d="M1.679 7.932c.412-.621 1.242-1.75 2.366-2.717C5.175 4.242 6.527 3.5 8 3.5c1.473 0 2.824.742 3.955 1.715 1.124.967 1.954 2.096 2.366 2.717a.119.119 0 010 .136c-.412.621-1.242 1.75-2.366 2.717C10.825 11.758 9.473 12.5 8 12.5c-1.473 0-2.824-.742-3.955-1.715C2.92 9.818 2.09 8.69 1.679 8.068a.119.119 0 010-.136zM8 2c-1.981 0-3.67.992-4.933 2.078C1.797 5.169.88 6.423.43 7.1a1.619 1.619 0 000 1.798c.45.678 1.367 1.932 2.637 3.024C4.329 13.008 6.019 14 8 14c1.981 0 3.67-.992 4.933-2.078 1.27-1.091 2.187-2.345 2.637-3.023a1.619 1.619 0 000-1.798c-.45-.678-1.367-1.932-2.637-3.023C11.671 2.992 9.981 2 8 2zm0 8a2 2 0 100-4 2 2 0 000 4z"></path>
  </svg>
  <text x="20" y="0">
    <tspan class="stat-label">Repository views (past two weeks)</tspan>
    <tspan x="330" class="stat-value">{views}</tspan>
  </text>
</g>

<!-- Repositories -->
<g class="stat-row" style="animation-delay: 750ms" transform="translate(20, 175)">
  <svg class="icon" width="16" height="16" viewBox="0 0 16 16" y="-11">
    <path fill-rule="evenodd" d="M2 2.5A2.5 2.5 0 014.5 0h8.75a.75.75 0 01.75.75v12.5a.75.75 0 01-.75.75h-2.5a.75.75 0 110-1.5h1.75v-2h-8a1 1 0 00-.714 1.7.75.75 0 01-1.072 1.05A2.495 2.495 0 012 11.5v-9zm10.5-1V9h-8c-.356 0-.694.074-1 .208V2.5a1 1 0 011-1h8zM5 12.25v3.25a.25.25 0 00.4.2l1.45-1.087a.25.25 0 01.3 0L8.6 15.7a.25.25 0 00.4-.2v-3.25a.25.25 0 00-.25-.25h-3.5a.25.25 0 00-.25.25z"></path>
  </svg>
  <text x="20" y="0">
    <tspan class="stat-label">Repositories with contributions</tspan>
    <tspan x="330" class="stat-value">{repos}</tspan>
  </text>
</g>

</svg>
"##,
        id = DARK_MODE_ID,
        light_background = LIGHT.background,
        light_stroke = LIGHT.stroke,
        light_title = LIGHT.title,
        light_text = LIGHT.text_primary,
        light_icon = LIGHT.icon,
        dark_stroke = DARK.stroke,
        dark_title = DARK.title,
        dark_text = DARK.text_primary,
        dark_icon = DARK.icon,
        name = escape(&stats.display_name),
        stars = stats.stars,
        forks = stats.forks,
        contributions = stats.contributions,
        lines_changed = stats.lines_changed,
        views = stats.views,
        repos = stats.repos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::queries::ContributorStats;

    fn parse_stats(json: &str) -> Vec<ContributorStats> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn lines_changed_filters_to_the_user() {
        let stats = parse_stats(
            r#"[
                {"author": {"login": "octocat"}, "weeks": [{"a": 10, "d": 5}, {"a": 1, "d": 0}]},
                {"author": {"login": "hubot"}, "weeks": [{"a": 1000, "d": 1000}]},
                {"author": null, "weeks": [{"a": 7, "d": 7}]}
            ]"#,
        );
        assert_eq!(lines_changed_for("octocat", &stats), 16);
        assert_eq!(lines_changed_for("nobody", &stats), 0);
    }

    #[test]
    fn lines_changed_empty_weeks() {
        let stats = parse_stats(r#"[{"author": {"login": "octocat"}}]"#);
        assert_eq!(lines_changed_for("octocat", &stats), 0);
    }

    #[test]
    fn svg_embeds_values_and_escapes_the_name() {
        let stats = UserStats {
            display_name: "Ada <Lovelace>".to_string(),
            stars: 42,
            forks: 7,
            contributions: 1234,
            lines_changed: 99999,
            views: 314,
            repos: 12,
        };
        let svg = render_svg(&stats);
        assert!(svg.contains("Ada &lt;Lovelace&gt;'s GitHub Statistics"));
        assert!(svg.contains(">42<"));
        assert!(svg.contains(">99999<"));
        assert!(!svg.contains("<Lovelace>"));
    }
}
