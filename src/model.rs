//! Canonical store-level entities produced by the normalizers.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder stored when the feed has no down-and-distance text.
pub const NO_PLAY: &str = "No play";
/// Placeholder stored when the feed has no last-play description.
pub const NO_PLAY_DESCRIPTION: &str = "No play description available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub game_id: String,
    pub name: String,
    /// Eastern display string, `MM/DD/YYYY @ hh:mm AM/PM`
    pub date: String,
    pub kickoff_utc: DateTime<Utc>,
    pub week: Option<i32>,
    pub season: Option<i32>,
    pub season_type: Option<i32>,
    pub venue_id: Option<String>,
    pub status: String,
    pub clock: Option<String>,
    pub period: Option<i32>,
    pub down: String,
    pub detailed_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub venue_id: String,
    pub full_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub indoor: bool,
}

/// One team's participation in one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamInGame {
    pub team_id: String,
    pub game_id: String,
    pub team_name: Option<String>,
    pub score: i64,
    pub home_away: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
    pub record: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
    Pending,
}

impl GameOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::Win => "W",
            GameOutcome::Loss => "L",
            GameOutcome::Tie => "T",
            GameOutcome::Pending => "Pending",
        }
    }
}

/// A single game seen from one team's side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionResult {
    pub game_id: String,
    pub name: String,
    pub week: Option<i32>,
    pub competition_date: String,
    pub kickoff_utc: DateTime<Utc>,
    pub team_id: String,
    pub team_name: Option<String>,
    pub team_logo: Option<String>,
    pub opponent_id: String,
    pub opponent_name: Option<String>,
    pub opponent_logo: Option<String>,
    pub team_score: i64,
    pub opponent_score: i64,
    pub outcome: GameOutcome,
}

/// Cumulative season record for a team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team_id: String,
    pub record: Option<String>,
    pub win_percentage: Option<f64>,
    pub avg_points_for: Option<f64>,
    pub avg_points_against: Option<f64>,
    pub points_for: Option<f64>,
    pub points_against: Option<f64>,
    pub point_differential: Option<f64>,
    pub division_record: Option<String>,
    pub division_win_percentage: Option<f64>,
    pub games_played: Option<i64>,
    pub playoff_seed: Option<i64>,
    pub streak: Option<String>,
}

/// Lightweight player identity taken from box scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub player_id: String,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub jersey: Option<String>,
    pub position: Option<String>,
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStat {
    pub player_id: String,
    pub game_id: String,
    pub team_id: String,
    pub category: String,
    pub stat_key: String,
    pub stat_value: String,
    pub jersey: Option<String>,
}

/// Full athlete profile, addressable by slug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Athlete {
    pub athlete_id: String,
    pub slug: String,
    pub team_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub jersey: Option<String>,
    pub position: Option<String>,
    pub position_name: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<String>,
    pub experience: Option<i32>,
    pub active: bool,
    pub status: Option<String>,
    pub headshot: Option<String>,
    pub statistics_ref: Option<String>,
    pub projections_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DepthChartEntry {
    pub team_id: String,
    pub season: i32,
    pub position_group: String,
    pub position_abbreviation: String,
    pub position_name: Option<String>,
    pub slot: i32,
    pub rank: i32,
    pub athlete_id: Option<String>,
    pub athlete_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsProvider {
    pub provider_id: String,
    pub name: String,
    pub priority: i32,
}

/// Game-level quote from one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Odds {
    pub game_id: String,
    pub provider_id: String,
    pub details: String,
    pub over_under: Option<f64>,
    pub spread: Option<f64>,
    pub over_odds: Option<i64>,
    pub under_odds: Option<i64>,
    pub moneyline_winner: bool,
    pub spread_winner: bool,
}

/// Team-specific side of a quote. `abbreviation` only feeds team resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamOdds {
    pub game_id: String,
    pub provider_id: String,
    pub team_id: String,
    pub abbreviation: Option<String>,
    pub home_away: String,
    pub favorite: bool,
    pub underdog: bool,
    pub moneyline: Option<i64>,
    pub spread_odds: Option<i64>,
    pub point_spread: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueInfo {
    pub league_id: String,
    pub name: String,
    pub abbreviation: String,
    pub season_year: Option<i32>,
    pub season_type: Option<i32>,
    pub season_start: Option<String>,
    pub season_end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NflWeek {
    pub season: i32,
    pub season_type: i32,
    pub week: i32,
    pub display_week: Option<String>,
    pub season_start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Broadcast {
    pub game_id: String,
    pub market: String,
    pub channel: String,
}

/// Everything one scoreboard or schedule event turns into.
#[derive(Debug, Clone, PartialEq)]
pub struct GameBundle {
    pub game: Game,
    pub venue: Option<Venue>,
    pub teams: Vec<TeamInGame>,
    pub broadcasts: Vec<Broadcast>,
}

/// Split statistics for one athlete, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteSplits {
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub categories: Vec<SplitGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitGroup {
    pub category: String,
    pub display_name: Option<String>,
    pub rows: Vec<SplitRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRow {
    pub split: String,
    pub stats: Vec<(String, String)>,
}

/// Season projection for one athlete, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionGroup {
    pub category: String,
    pub display_name: Option<String>,
    pub stats: Vec<ProjectedStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedStat {
    pub name: String,
    pub label: String,
    pub value: f64,
    pub display_value: Option<String>,
    pub rank: String,
}
