use crate::error::Result;
use crate::model::{StreakOutput, StreakStats, SCHEMA_VERSION};
use crate::svg::{format_date, DARK_MODE_ID};
use chrono::{DateTime, NaiveDate, Utc};
use console::style;

struct Palette {
    background: &'static str,
    stroke: &'static str,
    stat: &'static str,
    label: &'static str,
    date: &'static str,
    divider: &'static str,
    ring: &'static str,
    fire: &'static str,
    footer: &'static str,
}

const LIGHT: Palette = Palette {
    background: "none",
    stroke: "none",
    stat: "#000000",
    label: "#000000",
    date: "#006AFF",
    divider: "#006AFF",
    ring: "#006AFF",
    fire: "#006AFF",
    footer: "#000000",
};

const DARK: Palette = Palette {
    background: "none",
    stroke: "none",
    stat: "#c9d1d9",
    label: "#c9d1d9",
    date: "#006AFF",
    divider: "#006AFF",
    ring: "#006AFF",
    fire: "#006AFF",
    footer: "#c9d1d9",
};

pub fn output_json(
    username: &str,
    total_contributions: u64,
    account_created: NaiveDate,
    streaks: &StreakStats,
) -> Result<()> {
    let output = StreakOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        username: username.to_string(),
        total_contributions,
        account_created,
        streaks: *streaks,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_summary(total_contributions: u64, streaks: &StreakStats) {
    println!("{}", style("Streak Summary").bold());
    println!("{}", "─".repeat(50));
    println!(
        "Total contributions: {}",
        style(total_contributions).cyan()
    );
    match streaks.current_streak_start {
        Some(start) => println!(
            "Current streak: {} (since {})",
            style(streaks.current_streak).green(),
            format_date(start)
        ),
        None => println!("Current streak: {}", style(0).dim()),
    }
    match (streaks.longest_streak_start, streaks.longest_streak_end) {
        (Some(start), Some(end)) => println!(
            "Longest streak: {} ({} - {})",
            style(streaks.longest_streak).yellow(),
            format_date(start),
            format_date(end)
        ),
        _ => println!("Longest streak: {}", style(0).dim()),
    }
}

pub fn render_svg(
    total_contributions: u64,
    account_created: NaiveDate,
    today: NaiveDate,
    streaks: &StreakStats,
    generated_at: DateTime<Utc>,
) -> String {
    let commit_date_range = format!(
        "{} - {}",
        format_date(account_created),
        format_date(today)
    );

    let current_streak_dates = match streaks.current_streak_start {
        Some(start) if streaks.current_streak > 0 => {
            format!("{} - {}", format_date(start), format_date(today))
        }
        _ => "N/A".to_string(),
    };

    let longest_streak_dates = match (streaks.longest_streak_start, streaks.longest_streak_end) {
        (Some(start), Some(end)) if streaks.longest_streak > 0 => {
            format!("{} - {}", format_date(start), format_date(end))
        }
        _ => "N/A".to_string(),
    };

    let last_update = generated_at.format("%d %b %Y %H:%M UTC");

    format!(
        r##"<svg id="{id}" width="385" height="180" xmlns="http://www.w3.org/2000/svg">
<style>
svg {{
  font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, sans-serif, Apple Color Emoji, Segoe UI Emoji;
  font-size: 10px;
  line-height: 15px;
}}
@keyframes fadein {{
  0% {{ opacity: 0; }}
  100% {{ opacity: 1; }}
}}
@keyframes currstreak {{
  0% {{ font-size: 3px; opacity: 0.2; }}
  80% {{ font-size: 24px; opacity: 1; }}
  100% {{ font-size: 20px; opacity: 1; }}
}}
.stat {{
  font: bold 24px sans-serif;
  fill: {light_stat};
}}
#{id}:target .stat {{
  fill: {dark_stat};
}}
.label {{
  font: bold 12px sans-serif;
  fill: {light_label};
}}
#{id}:target .label {{
  fill: {dark_label};
}}
.date {{
  font: 9px sans-serif;
  font-weight: bold;
  fill: {light_date};
}}
#{id}:target .date {{
  fill: {dark_date};
}}
.divider {{
  stroke: {light_divider};
  stroke-width: 1;
}}
#{id}:target .divider {{
  stroke: {dark_divider};
}}
.footer {{
  font: 9px sans-serif;
  fill: {light_footer};
}}
#{id}:target .footer {{
  fill: {dark_footer};
}}
#background {{
  fill: {light_background};
  stroke: {light_stroke};
  stroke-width: 1px;
  rx: 6px;
  ry: 6px;
}}
#{id}:target #background {{
  fill: {dark_background};
}}
.ring {{
  stroke: {light_ring};
}}
#{id}:target .ring {{
  stroke: {dark_ring};
}}
.fire {{
  fill: {light_fire};
}}
#{id}:target .fire {{
  fill: {dark_fire};
}}
</style>

<rect width="100%" height="100%" id="background" rx="13" />

<!-- Divider Lines -->
<line x1="128" y1="25" x2="128" y2="155" class="divider" />
<line x1="256" y1="25" x2="256" y2="155" class="divider" />

<!-- Section 1: Total Contributions -->
<g transform="translate(64, 70)">
  <text class="stat" y="13" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 0.6s">
    {total_contributions}
  </text>
  <text class="label" y="45" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 0.8s">
    Total Contributions
  </text>
  <text class="date" y="70" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.0s">
    {commit_date_range}
  </text>
</g>

<!-- Section 2: Current Streak -->
<g style="isolation: isolate" transform="translate(192, 65)">
  <g mask="url(#ringMask)">
    <circle cx="0" cy="0" r="37" fill="none" class="ring" stroke-width="7.5"
           style="opacity: 0; animation: fadein 0.7s linear forwards 0.5s"/>
  </g>
  <defs>
    <mask id="ringMask">
      <rect x="-50" y="-50" width="100" height="100" fill="white" />
      <circle cx="0" cy="0" r="37" fill="black" />
      <ellipse cx="0" cy="-37" rx="15" ry="10" />
    </mask>
  </defs>

  <circle cx="0" cy="0" r="31" fill="none" class="ring" stroke-width="7"
         mask="url(#ringMask)"
         style="opacity: 0; animation: fadein 0.7s linear forwards 0.5s"/>

  <text class="stat" y="8" text-anchor="middle"
        style="opacity: 0; animation: currstreak 0.9s cubic-bezier(.33,1.53,.53,1.01) forwards 0.1s">
    {current_streak}
  </text>
  <text class="label" y="60" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.1s">
    Current Streak
  </text>
  <text class="date" y="85" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.2s">
    {current_streak_dates}
  </text>
  <!-- Fire icon -->
  <g transform="translate(0, -52)" stroke-opacity="0"
     style="opacity: 0; animation: fadein 0.7s linear forwards 0.8s">
    <path d="M -12 -0.5 L 15 -0.5 L 15 23.5 L -12 23.5 L -12 -0.5 Z" fill="none"/>
    <path class="fire" d="M 1.5 0.67 C 1.5 0.67 2.24 3.32 2.24 5.47 C 2.24 7.53 0.89 9.2 -1.17 9.2
      C -3.23 9.2 -4.79 7.53 -4.79 5.47 L -4.76 5.11
      C -6.78 7.51 -8 10.62 -8 13.99 C -8 18.41 -4.42 22 0 22
      C 4.42 22 8 18.41 8 13.99
      C 8 8.6 5.41 3.79 1.5 0.67 Z
      M -0.29 19 C -2.07 19 -3.51 17.6 -3.51 15.86
      C -3.51 14.24 -2.46 13.1 -0.7 12.74
      C 1.07 12.38 2.9 11.53 3.92 10.16
      C 4.31 11.45 4.51 12.81 4.51 14.2
      C 4.51 16.85 2.36 19 -0.29 19 Z"
      stroke-opacity="0"/>
  </g>
</g>

<!-- Section 3: Longest Streak -->
<g transform="translate(320, 70)">
  <text class="stat" y="13" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.2s">
    {longest_streak}
  </text>
  <text class="label" y="45" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.3s">
    Longest Streak
  </text>
  <text class="date" y="70" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.4s">
    {longest_streak_dates}
  </text>
</g>

<!-- Footer -->
<g transform="translate(192, 166)">
  <text class="footer" x="0" y="4" text-anchor="middle" style="opacity: 0; animation: fadein 0.7s linear forwards 1.6s">
    Updated last at: {last_update}
  </text>
</g>
</svg>
"##,
        id = DARK_MODE_ID,
        light_stat = LIGHT.stat,
        dark_stat = DARK.stat,
        light_label = LIGHT.label,
        dark_label = DARK.label,
        light_date = LIGHT.date,
        dark_date = DARK.date,
        light_divider = LIGHT.divider,
        dark_divider = DARK.divider,
        light_footer = LIGHT.footer,
        dark_footer = DARK.footer,
        light_background = LIGHT.background,
        dark_background = DARK.background,
        light_stroke = LIGHT.stroke,
        light_ring = LIGHT.ring,
        dark_ring = DARK.ring,
        light_fire = LIGHT.fire,
        dark_fire = DARK.fire,
        total_contributions = total_contributions,
        commit_date_range = commit_date_range,
        current_streak = streaks.current_streak,
        current_streak_dates = current_streak_dates,
        longest_streak = streaks.longest_streak,
        longest_streak_dates = longest_streak_dates,
        last_update = last_update,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn active_streak_renders_its_dates() {
        let streaks = StreakStats {
            current_streak: 2,
            current_streak_start: Some(d("2024-01-03")),
            longest_streak: 5,
            longest_streak_start: Some(d("2023-06-01")),
            longest_streak_end: Some(d("2023-06-05")),
        };
        let svg = render_svg(
            321,
            d("2020-05-20"),
            d("2024-01-04"),
            &streaks,
            "2024-01-04T12:00:00Z".parse().unwrap(),
        );
        assert!(svg.contains("321"));
        assert!(svg.contains("Jan 3, 2024 - Jan 4, 2024"));
        assert!(svg.contains("Jun 1, 2023 - Jun 5, 2023"));
        assert!(svg.contains("May 20, 2020 - Jan 4, 2024"));
        assert!(!svg.contains("N/A"));
    }

    #[test]
    fn broken_streak_renders_na() {
        let streaks = StreakStats {
            current_streak: 0,
            current_streak_start: None,
            longest_streak: 3,
            longest_streak_start: Some(d("2023-06-01")),
            longest_streak_end: Some(d("2023-06-03")),
        };
        let svg = render_svg(
            10,
            d("2020-05-20"),
            d("2024-01-04"),
            &streaks,
            "2024-01-04T12:00:00Z".parse().unwrap(),
        );
        assert!(svg.contains("N/A"));
        assert!(svg.contains("Jun 1, 2023 - Jun 3, 2023"));
    }

    #[test]
    fn empty_history_renders_na_everywhere() {
        let svg = render_svg(
            0,
            d("2024-01-01"),
            d("2024-01-04"),
            &StreakStats::default(),
            "2024-01-04T12:00:00Z".parse().unwrap(),
        );
        assert_eq!(svg.matches("N/A").count(), 2);
    }
}
