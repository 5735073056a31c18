//! TOML front matter parsing.
//!
//! Every content file opens with a TOML block fenced by `+++` lines:
//!
//! ```text
//! +++
//! title = "Hello"
//! description = "World"
//! published_at = 2024-01-15
//! +++
//!
//! Markdown body...
//! ```
//!
//! Dates may be written as bare TOML dates (`2024-01-15`), TOML datetimes
//! (`2024-01-15T09:30:00Z`), or quoted strings. A datetime that carries an
//! offset is converted to UTC before its date is taken, so
//! `2024-03-02T23:30:00-05:00` is March 3.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

const FENCE: &str = "+++";

/// Why a file's front matter could not be split from its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitError {
    /// The first non-blank line is not `+++`.
    Missing,
    /// The opening fence has no matching closing fence.
    Unterminated,
}

/// Split a content file into `(front_matter, body)`.
///
/// Leading blank lines before the opening fence are tolerated. The body is
/// returned with the blank lines that follow the closing fence removed.
pub fn split(content: &str) -> Result<(&str, &str), SplitError> {
    let rest = content.trim_start_matches(['\n', '\r', ' ', '\t']);
    let rest = rest.strip_prefix(FENCE).ok_or(SplitError::Missing)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .ok_or(SplitError::Missing)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let front = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((front, body));
        }
        offset += line.len();
    }
    Err(SplitError::Unterminated)
}

/// Front matter of a file in the `posts` collection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostFrontMatter {
    pub title: String,
    pub description: String,
    #[serde(alias = "publishedAt")]
    pub published_at: FrontMatterDate,
    pub slug: Option<String>,
}

/// Front matter of a file in the `tils` collection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TilFrontMatter {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(alias = "publishedAt")]
    pub published_at: FrontMatterDate,
    pub slug: Option<String>,
}

/// A calendar date read from front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterDate(pub NaiveDate);

impl<'de> Deserialize<'de> for FrontMatterDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let text = match toml::Value::deserialize(deserializer)? {
            toml::Value::Datetime(datetime) if datetime.date.is_none() => {
                return Err(D::Error::custom("a time without a date is not a date"));
            }
            toml::Value::Datetime(datetime) => datetime.to_string(),
            toml::Value::String(text) => text,
            other => {
                return Err(D::Error::custom(format!(
                    "expected a date, found {}",
                    other.type_str()
                )));
            }
        };
        parse_date(&text).map(Self).map_err(D::Error::custom)
    }
}

/// Parse an RFC 3339 timestamp as its UTC date, or a `YYYY-MM-DD` date.
///
/// A datetime without an offset has no instant to convert, so its leading
/// date is taken as written.
pub fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc).date_naive());
    }
    let date_part = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}
