//! Jekyll frontmatter generation and post rendering.

use crate::models::{scalar_to_string, Frontmatter};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use serde_yaml::Value;

/// `date` format Jekyll expects, e.g. `2024-03-01 09:30:00 -0400`
pub const JEKYLL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Frontmatter written to published posts; every other source key is dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JekyllFrontmatter {
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

impl JekyllFrontmatter {
    /// Build target frontmatter from a note's source frontmatter
    ///
    /// The date is, in order of preference: `explicit_date`, the note's
    /// `date created`, then `now`. A `date created` without an offset is
    /// read in `now`'s offset.
    pub fn from_source(
        source: &Frontmatter,
        title: &str,
        explicit_date: Option<DateTime<FixedOffset>>,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let date = explicit_date
            .or_else(|| {
                let raw = source.get("date created")?;
                let parsed = scalar_to_string(raw)
                    .and_then(|text| parse_post_date(&text, *now.offset()));
                if parsed.is_none() {
                    tracing::debug!("Unparsable 'date created' for '{}': {:?}", title, raw);
                }
                parsed
            })
            .unwrap_or(now);

        Self {
            title: title.to_string(),
            date: date.format(JEKYLL_DATE_FORMAT).to_string(),
            categories: source.get("categories").cloned(),
            tags: source.get("tags").cloned(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Full post text: delimited frontmatter, a blank line, then the body
    pub fn render_post(&self, body: &str) -> Result<String, serde_yaml::Error> {
        Ok(format!("---\n{}---\n\n{}", self.to_yaml()?, body))
    }
}

/// Parse a date or datetime written by a person
///
/// Accepts RFC 3339, the Jekyll format, naive datetimes (`T` or space
/// separated, seconds optional) and plain dates. Values without an offset
/// are placed in `offset`; plain dates get midnight.
pub fn parse_post_date(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(text, JEKYLL_DATE_FORMAT) {
        return Some(dt);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    offset.from_local_datetime(&naive).single()
}
