use crate::error::Result;
use chrono::NaiveDate;
use console::style;
use std::path::Path;

/// Fragment id that flips every card into its dark palette when the image
/// is embedded as `...svg#gh-dark-mode-only`.
pub const DARK_MODE_ID: &str = "gh-dark-mode-only";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// "Jan 3, 2024" -- the cards' long date format.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "03.01" -- the traffic card's compact day.month format.
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%d.%m").to_string()
}

pub fn write_card<P: AsRef<Path>>(out_dir: P, file_name: &str, content: &str) -> Result<()> {
    std::fs::create_dir_all(out_dir.as_ref())?;
    let path = out_dir.as_ref().join(file_name);
    std::fs::write(&path, content)?;
    println!("Wrote {}", style(path.display()).cyan());
    Ok(())
}
