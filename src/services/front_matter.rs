// src/services/front_matter.rs

//! Hugo front matter for generated articles.
//!
//! ```text
//! ---
//! title: "<title>"
//! date: <YYYY-MM-DD HH:MM:SS>+08:00
//! categories: ['tag', 'other']
//! ---
//!
//! <body>
//! ```
//!
//! Once an article exists its date is read back and reused, so editing a
//! published note never moves it in the timeline.

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::error::{AppError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header fields of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    /// `YYYY-MM-DD HH:MM:SS`, without the offset
    pub date: String,
    /// Offset suffix appended to the date, e.g. `+08:00`
    pub offset: String,
    pub categories: Vec<String>,
}

impl FrontMatter {
    /// Build the header for a (re)conversion.
    ///
    /// The date is taken from the article at `prior` when that file exists,
    /// otherwise from `now`.
    pub fn compose(
        title: &str,
        categories: Vec<String>,
        prior: &Path,
        now: DateTime<FixedOffset>,
    ) -> Result<Self> {
        let offset = format_offset(now.offset());

        let date = if prior.is_file() {
            let content = fs::read_to_string(prior)?;
            let date = extract_date(&content, &offset)
                .ok_or_else(|| AppError::front_matter(prior, "no `date:` line before `categories`"))?;
            log::debug!("Reusing date {date} from {}", prior.display());
            date
        } else {
            now.format(DATE_FORMAT).to_string()
        };

        Ok(Self {
            title: title.to_string(),
            date,
            offset,
            categories,
        })
    }

    /// Full article text: header, blank line, body.
    pub fn render(&self, body: &str) -> String {
        [
            "---".to_string(),
            format!("title: \"{}\"", self.title),
            format!("date: {}{}", self.date, self.offset),
            format!("categories: {}", list_literal(&self.categories)),
            "---".to_string(),
            String::new(),
            body.to_string(),
        ]
        .join("\n")
    }
}

/// Date previously written into an article, without its offset.
pub fn extract_date(content: &str, offset: &str) -> Option<String> {
    let pattern = format!(r"date: (.+?){}\ncategories", regex::escape(offset));
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `+HH:MM` form of an offset.
pub fn format_offset(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Render tags as a flow list, e.g. `['systems', 'design']`.
pub fn list_literal(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote(item: &str) -> String {
    let delimiter = if item.contains('\'') && !item.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(item.len() + 2);
    out.push(delimiter);
    for c in item.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
