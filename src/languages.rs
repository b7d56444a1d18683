use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::github::{queries::LanguageEdge, GitHubClient};
use crate::model::{LanguageStat, LanguagesOutput, SCHEMA_VERSION};
use crate::svg::{escape, DARK_MODE_ID};
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::collections::HashMap;

/// A language at or above this share of all bytes is dropped from the card.
const EXCLUSION_THRESHOLD: f64 = 0.9;
const MAX_LANGUAGES: usize = 25;
const FALLBACK_COLOR: &str = "#cccccc";

const SVG_WIDTH: u32 = 360;
const SVG_HEIGHT: u32 = 210;

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::resolve(&common).context("Failed to resolve configuration")?;
    let client = GitHubClient::new(config).context("Failed to create GitHub client")?;

    let edges = client
        .language_edges()
        .context("Failed to fetch repository languages")?;
    let languages = aggregate_languages(edges);

    if json {
        output_json(client.username(), &languages)?;
    } else {
        let svg = render_svg(&languages);
        crate::svg::write_card(&common.out_dir, "language_stats.svg", &svg)?;
        output_summary(&languages);
    }

    Ok(())
}

/// Sum byte sizes per language across repositories, convert to percentages,
/// drop a dominant language past the exclusion threshold, cap the list.
pub fn aggregate_languages(edges: Vec<LanguageEdge>) -> Vec<LanguageStat> {
    let mut sizes: HashMap<String, (u64, String)> = HashMap::new();
    for LanguageEdge { name, color, size } in edges {
        let entry = sizes
            .entry(name)
            .or_insert_with(|| (0, color.unwrap_or_else(|| FALLBACK_COLOR.to_string())));
        entry.0 += size;
    }

    let total_bytes: u64 = sizes.values().map(|(size, _)| *size).sum();

    let mut stats: Vec<LanguageStat> = sizes
        .into_iter()
        .map(|(name, (size, color))| LanguageStat {
            name,
            color,
            size,
            percent: if total_bytes > 0 {
                size as f64 / total_bytes as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    stats.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));

    if stats
        .first()
        .map(|top| top.percent >= EXCLUSION_THRESHOLD * 100.0)
        .unwrap_or(false)
    {
        stats.remove(0);
    }

    stats.truncate(MAX_LANGUAGES);
    stats
}

fn output_json(username: &str, languages: &[LanguageStat]) -> Result<()> {
    let output = LanguagesOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        username: username.to_string(),
        languages: languages.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_summary(languages: &[LanguageStat]) {
    println!("{}", style("Languages by File Size").bold());
    println!("{}", "─".repeat(50));
    for lang in languages.iter().take(10) {
        println!("{:<20} {:>6.2}%", lang.name, lang.percent);
    }
    if languages.len() > 10 {
        println!("... and {} more", languages.len() - 10);
    }
}

const STYLE: &str = "
svg {
  font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, sans-serif, Apple Color Emoji, Segoe UI Emoji;
  font-size: 14px;
  line-height: 21px;
}
#background {
  width: calc(100% - 10px);
  height: calc(100% - 10px);
  fill: white;
  stroke: rgb(225, 228, 232);
  stroke-width: 1px;
  rx: 6px;
  ry: 6px;
}
#gh-dark-mode-only:target #background {
  fill: #0d1117;
  stroke-width: 0.5px;
}
foreignObject {
  width: calc(100% - 10px - 32px);
  height: calc(100% - 10px - 24px);
}
h2 {
  margin-top: 0;
  margin-bottom: 0.75em;
  line-height: 24px;
  font-size: 16px;
  font-weight: 600;
  color: rgb(36, 41, 46);
  fill: rgb(36, 41, 46);
}
#gh-dark-mode-only:target h2 {
  color: #c9d1d9;
  fill: #c9d1d9;
}
ul {
  list-style: none;
  padding-left: 0;
  margin-top: 0;
  margin-bottom: 0;
}
li {
  display: inline-flex;
  font-size: 12px;
  margin-right: 2ch;
  align-items: center;
  flex-wrap: nowrap;
  transform: translateX(-500%);
  animation: slideIn 2s ease-in-out forwards;
}
@keyframes slideIn {
  to {
    transform: translateX(0);
  }
}
div.ellipsis {
  height: 100%;
  overflow: hidden;
  text-overflow: ellipsis;
}
.octicon {
  fill: rgb(88, 96, 105);
  margin-right: 0.5ch;
  vertical-align: top;
}
#gh-dark-mode-only:target .octicon {
  color: #8b949e;
  fill: #8b949e;
}
.progress {
  display: flex;
  height: 8px;
  overflow: hidden;
  background-color: rgb(225, 228, 232);
  border-radius: 6px;
  outline: 1px solid transparent;
  margin-bottom: 1em;
}
#gh-dark-mode-only:target .progress {
  background-color: rgba(110, 118, 129, 0.4);
}
.progress-item {
  outline: 2px solid rgb(225, 228, 232);
  border-collapse: collapse;
}
#gh-dark-mode-only:target .progress-item {
  outline: 2px solid #393f47;
}
.lang {
  font-weight: 600;
  margin-right: 4px;
  color: rgb(36, 41, 46);
}
#gh-dark-mode-only:target .lang {
  color: #c9d1d9;
}
.percent {
  color: rgb(88, 96, 105)
}
#gh-dark-mode-only:target .percent {
  color: #8b949e;
}
";

fn render_svg(languages: &[LanguageStat]) -> String {
    let progress_bar: String = languages
        .iter()
        .map(|lang| {
            format!(
                r#"<span style="background-color: {};width: {:.3}%;" class="progress-item"></span>"#,
                lang.color, lang.percent
            )
        })
        .collect();

    let lang_list: String = languages
        .iter()
        .enumerate()
        .map(|(idx, lang)| {
            format!(
                r#"
<li style="animation-delay: {delay}ms;">
<svg xmlns="http://www.w3.org/2000/svg" class="octicon" style="fill:{color};"
viewBox="0 0 16 16" version="1.1" width="16" height="16"><path
fill-rule="evenodd" d="M8 4a4 4 0 100 8 4 4 0 000-8z"></path></svg>
<span class="lang">{name}</span>
<span class="percent">{percent:.2}%</span>
</li>
"#,
                delay = idx * 150,
                color = lang.color,
                name = escape(&lang.name),
                percent = lang.percent,
            )
        })
        .collect();

    format!(
        r#"<svg id="{id}" width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
<style>
{style}
</style>
<g>
<rect x="5" y="5" id="background" />
<g>
<foreignObject x="21" y="17" width="318" height="176">
<div xmlns="http://www.w3.org/1999/xhtml" class="ellipsis">

<h2>Languages Used (By File Size)</h2>

<div>
<span class="progress">
{progress_bar}
</span>
</div>

<ul>
{lang_list}
</ul>

</div>
</foreignObject>
</g>
</g>
</svg>"#,
        id = DARK_MODE_ID,
        width = SVG_WIDTH,
        height = SVG_HEIGHT,
        style = STYLE,
        progress_bar = progress_bar,
        lang_list = lang_list,
    )
}
