use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::github::{queries::TrafficViews, GitHubClient};
use crate::model::{RepoTraffic, TrafficOutput, SCHEMA_VERSION};
use crate::svg::{escape, format_day_month, DARK_MODE_ID};
use anyhow::Context;
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const TOP_REPOS: usize = 5;

struct Palette {
    background: &'static str,
    stroke: &'static str,
    icon_github: &'static str,
    title_cards: &'static str,
    text_title: &'static str,
    border_color: &'static str,
    folder_icons: &'static str,
    folder_icon_outline: &'static str,
    repository_text: &'static str,
    unique_count: &'static str,
    date_range: &'static str,
}

const LIGHT: Palette = Palette {
    background: "none",
    stroke: "rgb(225, 228, 232)",
    icon_github: "rgb(88, 96, 105)",
    title_cards: "#006AFF",
    text_title: "#FFFFFF",
    border_color: "rgb(88, 96, 105)",
    folder_icons: "rgb(88, 96, 105)",
    folder_icon_outline: "rgb(88, 96, 105)",
    repository_text: "#000000",
    unique_count: "#000000",
    date_range: "#000000",
};

const DARK: Palette = Palette {
    background: "none",
    stroke: "rgb(225, 228, 232)",
    icon_github: "#8b949e",
    title_cards: "#006AFF",
    text_title: "#000000",
    border_color: "#8b949e",
    folder_icons: "#8b949e",
    folder_icon_outline: "#8b949e",
    repository_text: "#c9d1d9",
    unique_count: "#c9d1d9",
    date_range: "#c9d1d9",
};

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::resolve(&common).context("Failed to resolve configuration")?;
    let client = GitHubClient::new(config).context("Failed to create GitHub client")?;

    let repo_names = client
        .list_repo_names()
        .context("Failed to list repositories")?;

    let pb = ProgressBar::new(repo_names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Fetching traffic");

    let mut repos = Vec::new();
    for name in &repo_names {
        let name_with_owner = format!("{}/{}", client.username(), name);
        match client.traffic_views(&name_with_owner) {
            Ok(traffic) => repos.extend(summarize_traffic(name, &traffic)),
            // traffic requires push access; repositories without it are skipped
            Err(err) => {
                eprintln!("{} skipping {name}: {err}", style("warning:").yellow());
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let top = top_repos(repos, TOP_REPOS);

    if json {
        output_json(client.username(), &top)?;
    } else {
        let svg = render_svg(&top);
        crate::svg::write_card(&common.out_dir, "traffic_stats.svg", &svg)?;
        output_summary(&top);
    }

    Ok(())
}

/// A table row for one repository, or `None` when nobody visited it.
pub fn summarize_traffic(name: &str, traffic: &TrafficViews) -> Option<RepoTraffic> {
    if traffic.uniques == 0 {
        return None;
    }
    let date_range = match (traffic.views.first(), traffic.views.last()) {
        (Some(first), Some(last)) => format!(
            "{} - {}",
            format_day_month(first.timestamp.date_naive()),
            format_day_month(last.timestamp.date_naive())
        ),
        _ => "N/A".to_string(),
    };
    Some(RepoTraffic {
        name: name.to_string(),
        uniques: traffic.uniques,
        date_range,
    })
}

/// Most-visited repositories first, capped at `n`; name breaks ties so equal
/// counts render in a stable order.
pub fn top_repos(mut repos: Vec<RepoTraffic>, n: usize) -> Vec<RepoTraffic> {
    repos.sort_by(|a, b| b.uniques.cmp(&a.uniques).then_with(|| a.name.cmp(&b.name)));
    repos.truncate(n);
    repos
}

fn output_json(username: &str, repos: &[RepoTraffic]) -> Result<()> {
    let output = TrafficOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        username: username.to_string(),
        repos: repos.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_summary(repos: &[RepoTraffic]) {
    println!("{}", style("Top Repositories by Traffic").bold());
    println!("{}", "─".repeat(50));
    if repos.is_empty() {
        println!("No visitors in the past two weeks");
        return;
    }
    for repo in repos {
        println!(
            "{:<30} {:>6} uniques  {}",
            repo.name,
            style(repo.uniques).cyan(),
            style(&repo.date_range).dim()
        );
    }
}

fn render_svg(repos: &[RepoTraffic]) -> String {
    let icon_column_width = 30u32;
    let repo_column_width = 140u32;
    let uniques_column_width = 100u32;
    let date_column_width = 110u32;

    let rows: String = repos
        .iter()
        .enumerate()
        .map(|(index, repo)| {
            format!(
                r#"
<tr class="repo-row" style="animation-delay: {delay:.1}s;">
  <td class="repo-name" style="width: {repo_w}px; text-align: left; padding-left: 11.5px;">
    <div style="display: flex; align-items: center;">
      <svg class="folder-icons" width="14" height="14" viewBox="0 0 50 50" xmlns="http://www.w3.org/2000/svg">
        <path d="M 6 4 C 4.3545455 4 3 5.3545455 3 7 L 3 16 L 3 43 C 3 44.645455 4.3545455 46 6 46 L 44 46 C 45.645455 46 47 44.645455 47 43 L 47 16 L 47 11 C 47 9.3545455 45.645455 8 44 8 L 19 8 C 19.06944 8 18.95032 7.99708 18.705078 7.7167969 C 18.459833 7.4365165 18.160156 6.9707031 17.847656 6.4707031 C 17.535156 5.9707031 17.209833 5.4365165 16.798828 4.9667969 C 16.387823 4.4970773 15.819444 4 15 4 L 6 4 z M 6 6 L 15 6 C 14.93056 6 15.04968 6.00292 15.294922 6.2832031 C 15.540167 6.5634835 15.839844 7.0292969 16.152344 7.5292969 C 16.464844 8.0292969 16.790167 8.5634835 17.201172 9.0332031 C 17.612177 9.5029227 18.180556 10 19 10 L 44 10 C 44.554545 10 45 10.445455 45 11 L 45 13.1875 C 44.685079 13.07397 44.351946 13 44 13 L 6 13 C 5.6480538 13 5.3149207 13.07397 5 13.1875 L 5 7 C 5 6.4454545 5.4454545 6 6 6 z M 6 15 L 44 15 C 44.554545 15 45 15.445455 45 16 L 45 43 C 45 43.554545 44.554545 44 44 44 L 6 44 C 5.4454545 44 5 43.554545 5 43 L 5 16 C 5 15.445455 5.4454545 15 6 15 z" transform="translate(0, -4)" />
      </svg>
      <span style="margin-left: 8px; max-width: {name_w}px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">{name}</span>
    </div>
  </td>
  <td class="unique-count" style="width: {uniques_w}px; text-align: center; padding-right: 28px;">{uniques}</td>
  <td class="date-range" style="width: {date_w}px; text-align: center;">{date_range}</td>
</tr>
"#,
                delay = index as f64 * 0.2,
                repo_w = repo_column_width,
                name_w = repo_column_width - icon_column_width - 16,
                name = escape(&repo.name),
                uniques_w = uniques_column_width,
                uniques = repo.uniques,
                date_w = date_column_width,
                date_range = repo.date_range,
            )
        })
        .collect();

    format!(
        r##"<svg id="{id}" width="385" height="180" xmlns="http://www.w3.org/2000/svg">
  <style>
    svg {{
      font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, sans-serif, Apple Color Emoji, Segoe UI Emoji;
    }}

    #background {{
      fill: {light_background};
      stroke: {light_stroke};
      stroke-width: 1.7px;
      rx: 6px;
      ry: 6px;
    }}

    #{id}:target #background {{
      fill: {dark_background};
      stroke: {dark_stroke};
    }}

    .header-outline {{
      fill: none;
      stroke: {light_stroke};
      stroke-width: 0.7px;
      rx: 5px;
      ry: 5px;
    }}
    #{id}:target .header-outline {{
      stroke: {dark_stroke};
    }}

    .title-cards {{
      font-size: 15px;
      font-weight: bold;
      fill: {light_title};
    }}

    #{id}:target .title-cards {{
      fill: {dark_title};
    }}

    .github-icon path {{
      fill: {light_github_icon};
    }}

    #{id}:target .github-icon path {{
      fill: {dark_github_icon};
    }}

    th {{
      font-size: 11.5px;
      font-weight: 600;
      color: {light_text_title};
      text-shadow:
        1px 1px 0px {light_border},
        -1px -1px 0px {light_border},
        1px -1px 0px {light_border},
        -1px 1px 0px {light_border};
      padding-bottom: 5px;
    }}

    #{id}:target th {{
      color: {dark_text_title};
      text-shadow:
        0.7px 0.7px 0px {dark_border},
        -0.7px -0.7px 0px {dark_border},
        0.7px -0.7px 0px {dark_border},
        -0.7px 0.7px 0px {dark_border};
    }}

    .folder-icons {{
      vertical-align: middle;
    }}

    .folder-icons path {{
      fill: {light_folder};
      stroke: {light_folder_outline};
      stroke-width: 1;
    }}

    #{id}:target .folder-icons path {{
      fill: {dark_folder};
      stroke: {dark_folder_outline};
    }}

    .repo-name {{
      font-size: 12px;
      font-weight: 600;
      color: {light_repo_text};
      line-height: 1.6;
    }}

    #{id}:target .repo-name {{
      color: {dark_repo_text};
    }}

    .unique-count {{
      font-size: 11.5px;
      font-weight: 600;
      color: {light_uniques};
    }}

    #{id}:target .unique-count {{
      color: {dark_uniques};
    }}

    .date-range {{
      font-size: 11.5px;
      font-weight: 600;
      color: {light_dates};
    }}

    #{id}:target .date-range {{
      color: {dark_dates};
    }}

    @keyframes fadein {{
      0% {{ opacity: 0; }}
      100% {{ opacity: 1; }}
    }}

    .repo-row {{
      opacity: 0;
      animation: fadein 0.5s ease-in forwards;
    }}
  </style>
  <g>
    <rect id="background" x="0" y="0" width="385" height="180" />

    <rect class="header-outline" x="3" y="3" width="379" height="35" />
    <g transform="translate(16, 15)">
      <svg class="github-icon" width="16" height="16" viewBox="0 0 16 16" xmlns="http://www.w3.org/2000/svg">
        <path fill-rule="evenodd" d="M8 0C3.58 0 0 3.58 0 8c0 3.54 2.29 6.53 5.47 7.59.4.07.55-.17.55-.38 0-.19-.01-.82-.01-1.49-2.01.37-2.53-.49-2.69-.94-.09-.23-.48-.94-.82-1.13-.28-.15-.68-.52-.01-.53.63-.01 1.08.58 1.23.82.72 1.21 1.87.87 2.33.66.07-.52.28-.87.51-1.07-1.78-.2-3.64-.89-3.64-3.95 0-.87.31-1.59.82-2.15-.08-.2-.36-1.02.08-2.12 0 0 .67-.21 2.2.82.64-.18 1.32-.27 2-.27.68 0 1.36.09 2 .27 1.53-1.04 2.2-.82 2.2-.82.44 1.1.16 1.92.08 2.12.51.56.82 1.27.82 2.15 0 3.07-1.87 3.75-3.65 3.95.29.25.54.73.54 1.48 0 1.07-.01 1.93-.01 2.2 0 .21.15.46.55.38A8.013 8.013 0 0016 8c0-4.42-3.58-8-8-8z"></path>
      </svg>
      <text class="title-cards" x="22" y="10" font-family="Arial">Top 5 Repositories by Traffic (past two weeks)</text>
    </g>

    <rect class="header-outline" x="3" y="41" width="141" height="136" />
    <rect class="header-outline" x="147" y="41" width="116" height="136" />
    <rect class="header-outline" x="266" y="41" width="116" height="136" />

    <foreignObject x="0" y="45" width="380" height="110">
      <table xmlns="http://www.w3.org/1999/xhtml" style="width: 100%; border-collapse: collapse;">
        <thead>
          <tr>
            <th style="width: {repo_w}px; text-align: left; padding-left: 35px;">Repository</th>
            <th style="width: {uniques_w}px; text-align: center; padding-right: 28px;">Uniques</th>
            <th style="width: {date_w}px; text-align: center; padding-right: 28px;">Date Range</th>
          </tr>
        </thead>
        <tbody>
          {rows}
        </tbody>
      </table>
    </foreignObject>
  </g>
</svg>
"##,
        id = DARK_MODE_ID,
        light_background = LIGHT.background,
        dark_background = DARK.background,
        light_stroke = LIGHT.stroke,
        dark_stroke = DARK.stroke,
        light_title = LIGHT.title_cards,
        dark_title = DARK.title_cards,
        light_github_icon = LIGHT.icon_github,
        dark_github_icon = DARK.icon_github,
        light_text_title = LIGHT.text_title,
        dark_text_title = DARK.text_title,
        light_border = LIGHT.border_color,
        dark_border = DARK.border_color,
        light_folder = LIGHT.folder_icons,
        dark_folder = DARK.folder_icons,
        light_folder_outline = LIGHT.folder_icon_outline,
        dark_folder_outline = DARK.folder_icon_outline,
        light_repo_text = LIGHT.repository_text,
        dark_repo_text = DARK.repository_text,
        light_uniques = LIGHT.unique_count,
        dark_uniques = DARK.unique_count,
        light_dates = LIGHT.date_range,
        dark_dates = DARK.date_range,
        repo_w = repo_column_width,
        uniques_w = uniques_column_width,
        date_w = date_column_width,
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn traffic(json: &str) -> TrafficViews {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn no_uniques_means_no_row() {
        let views = traffic(r#"{"count": 10, "uniques": 0, "views": []}"#);
        assert!(summarize_traffic("quiet-repo", &views).is_none());
    }

    #[test]
    fn row_carries_uniques_and_date_range() {
        let views = traffic(
            r#"{
                "count": 30,
                "uniques": 12,
                "views": [
                    {"timestamp": "2024-01-22T00:00:00Z", "count": 10, "uniques": 4},
                    {"timestamp": "2024-01-29T00:00:00Z", "count": 20, "uniques": 8}
                ]
            }"#,
        );
        let row = summarize_traffic("busy-repo", &views).unwrap();
        assert_eq!(row.uniques, 12);
        assert_eq!(row.date_range, "22.01 - 29.01");
    }

    #[test]
    fn uniques_without_samples_render_na() {
        let views = traffic(r#"{"count": 0, "uniques": 3, "views": []}"#);
        let row = summarize_traffic("odd-repo", &views).unwrap();
        assert_eq!(row.date_range, "N/A");
    }

    #[test]
    fn top_repos_sorts_and_caps() {
        let repos: Vec<RepoTraffic> = [("a", 3), ("b", 9), ("c", 1), ("d", 9), ("e", 5), ("f", 4)]
            .iter()
            .map(|(name, uniques)| RepoTraffic {
                name: name.to_string(),
                uniques: *uniques,
                date_range: "N/A".to_string(),
            })
            .collect();
        let top = top_repos(repos, 5);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "e", "f", "a"]);
    }

    #[test]
    fn svg_lists_rows_in_order() {
        let repos = vec![
            RepoTraffic {
                name: "first<repo>".to_string(),
                uniques: 9,
                date_range: "22.01 - 29.01".to_string(),
            },
            RepoTraffic {
                name: "second".to_string(),
                uniques: 4,
                date_range: "23.01 - 28.01".to_string(),
            },
        ];
        let svg = render_svg(&repos);
        assert!(svg.contains("first&lt;repo&gt;"));
        assert!(svg.contains("animation-delay: 0.0s"));
        assert!(svg.contains("animation-delay: 0.2s"));
        let first = svg.find("first&lt;repo&gt;").unwrap();
        let second = svg.find("second").unwrap();
        assert!(first < second);
    }
}
