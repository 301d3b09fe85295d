//! Pure mappings from ESPN wire fragments to canonical entities.
//!
//! Normalizers never touch the network or the store. Anything they cannot
//! make sense of comes back as a [`ShapeError`] so the calling operation can
//! log it and move on to the next element.

mod game;
mod odds;
mod roster;
mod stats;

pub use game::{competition_results, game_bundle, league_info, nfl_week, SeasonContext};
pub use odds::{odds_quote, OddsQuote};
pub use roster::{athlete, depth_chart};
pub use stats::{athlete_splits, boxscore, projections, team_record, BoxscoreRows};

use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use thiserror::Error;

use crate::espn::Score;

/// Display format shared by every page that shows a kickoff time.
pub const KICKOFF_FORMAT: &str = "%m/%d/%Y @ %I:%M %p";

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("unparseable timestamp {0:?}")]
    Timestamp(String),
}

/// A kickoff instant together with its Eastern display string.
#[derive(Debug, Clone, PartialEq)]
pub struct Kickoff {
    pub utc: DateTime<Utc>,
    pub display: String,
}

/// Parse an ESPN UTC timestamp (`2024-09-08T17:00Z` and friends).
pub fn kickoff(raw: &str) -> Result<Kickoff, ShapeError> {
    let raw = raw.trim();
    let normalized = raw.replace('Z', "+0000");

    let parsed = TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
        .ok_or_else(|| ShapeError::Timestamp(raw.to_string()))?;

    let utc = parsed.with_timezone(&Utc);
    Ok(Kickoff {
        utc,
        display: eastern_display(utc),
    })
}

pub fn eastern_display(utc: DateTime<Utc>) -> String {
    utc.with_timezone(&New_York).format(KICKOFF_FORMAT).to_string()
}

/// Path segment of a core API `$ref`, counted from the end (0 = last).
/// Query strings and fragments are ignored.
pub fn ref_segment(href: &str, from_end: usize) -> Option<String> {
    let path = href.split(|c| c == '?' || c == '#').next()?;
    path.trim_end_matches('/')
        .rsplit('/')
        .nth(from_end)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Trailing id of a core API `$ref`.
pub fn ref_id(href: &str) -> Option<String> {
    ref_segment(href, 0)
}

/// Value of a query parameter in an absolute URL.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let url = reqwest::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Score in points; anything missing or unreadable counts as zero.
pub fn score_value(score: Option<&Score>) -> i64 {
    let points = match score {
        Some(Score::Plain(flex)) => flex.as_f64(),
        Some(Score::Detailed { value }) => *value,
        None => None,
    };
    points.map(|p| p.round() as i64).unwrap_or(0)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
