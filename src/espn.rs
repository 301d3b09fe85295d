//! ESPN wire types.
//!
//! Serde shapes for the site, core, web and cdn APIs. Everything defaults so
//! that a partially filled payload still decodes; the normalizers decide
//! what a missing field means. Top-level collections are `Option` so that an
//! absent key can be told apart from an empty list.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A `{"$ref": "..."}` link to another core API resource.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Ref {
    #[serde(rename = "$ref")]
    pub href: String,
}

/// ESPN mixes numbers and numeric strings for the same field across feeds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Flex {
    Number(f64),
    Text(String),
}

impl Flex {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Flex::Number(n) => Some(*n),
            Flex::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Competitor score: a string on the scoreboard, an object on schedules.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Score {
    Plain(Flex),
    Detailed {
        #[serde(default)]
        value: Option<f64>,
    },
}

// ---------------------------------------------------------------------------
// Scoreboard and team schedule  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ScoreboardResponse {
    pub leagues: Vec<League>,
    pub season: Option<SeasonMarker>,
    pub week: Option<Week>,
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ScheduleResponse {
    pub season: Option<SeasonMarker>,
    #[serde(rename = "requestedSeason")]
    pub requested_season: Option<SeasonMarker>,
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub season: Option<LeagueSeason>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LeagueSeason {
    pub year: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub season_type: Option<SeasonType>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SeasonType {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<i32>,
    pub name: Option<String>,
}

impl SeasonType {
    pub fn number(&self) -> Option<i32> {
        self.kind
            .or_else(|| self.id.as_deref().and_then(|id| id.parse().ok()))
    }
}

/// `season` block: `{"year": 2024, "type": 2}` on the scoreboard,
/// `{"year": 2024, "displayName": "2024"}` on schedules.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SeasonMarker {
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub season_type: Option<i32>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Week {
    pub number: Option<i32>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub date: String,
    pub week: Option<Week>,
    pub season: Option<SeasonMarker>,
    pub season_type: Option<SeasonType>,
    pub status: Option<Status>,
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
    pub display_clock: Option<String>,
    pub period: Option<i32>,
    #[serde(rename = "type")]
    pub status_type: Option<StatusType>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusType {
    pub name: Option<String>,
    pub state: Option<String>,
    pub completed: Option<bool>,
    pub description: Option<String>,
    pub short_detail: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Competition {
    pub id: Option<String>,
    pub venue: Option<Venue>,
    pub competitors: Vec<Competitor>,
    pub situation: Option<Situation>,
    pub status: Option<Status>,
    pub broadcasts: Vec<Broadcast>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Venue {
    pub id: Option<String>,
    pub full_name: Option<String>,
    pub address: Option<Address>,
    pub indoor: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Address {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Situation {
    pub down_distance_text: Option<String>,
    pub last_play: Option<LastPlay>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LastPlay {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Competitor {
    pub id: Option<String>,
    pub home_away: Option<String>,
    pub team: Team,
    pub score: Option<Score>,
    pub records: Vec<CompetitorRecord>,
    /// Schedule feeds name the list `record` and fill `displayValue`.
    pub record: Vec<CompetitorRecord>,
    pub winner: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub display_name: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
    pub logos: Vec<Logo>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logo {
    pub href: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CompetitorRecord {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
}

impl CompetitorRecord {
    pub fn text(&self) -> Option<&str> {
        self.summary.as_deref().or(self.display_value.as_deref())
    }
}

/// Scoreboards send `{"market": "national", "names": [..]}`; schedules send
/// one object per channel with `market.type` and `media.shortName`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Broadcast {
    pub market: Option<Market>,
    pub names: Vec<String>,
    pub media: Option<Media>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Market {
    Name(String),
    Detail {
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Media {
    pub short_name: Option<String>,
}

impl Broadcast {
    pub fn market_name(&self) -> Option<&str> {
        match self.market.as_ref()? {
            Market::Name(name) => Some(name),
            Market::Detail { kind } => kind.as_deref(),
        }
    }

    /// Channel names from either shape.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .chain(self.media.as_ref().and_then(|m| m.short_name.as_deref()))
    }
}

// ---------------------------------------------------------------------------
// Team record  (core v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RecordResponse {
    pub items: Option<Vec<RecordItem>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RecordItem {
    #[serde(rename = "type")]
    pub record_type: String,
    pub summary: Option<String>,
    pub stats: Vec<RecordStat>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordStat {
    pub name: String,
    pub value: Option<f64>,
    pub display_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Box score  (cdn core API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BoxscoreResponse {
    #[serde(rename = "gamepackageJSON")]
    pub gamepackage: Option<GamePackage>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GamePackage {
    pub boxscore: Option<Boxscore>,
    pub game: Option<GameHeader>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GameHeader {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Boxscore {
    pub teams: Vec<BoxscoreTeam>,
    pub players: Vec<BoxscorePlayers>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BoxscoreTeam {
    pub team: Team,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BoxscorePlayers {
    pub team: Team,
    pub statistics: Vec<StatCategory>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StatCategory {
    pub name: String,
    pub labels: Vec<String>,
    pub keys: Vec<String>,
    pub athletes: Vec<AthleteStatLine>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AthleteStatLine {
    pub athlete: BoxscoreAthlete,
    pub stats: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxscoreAthlete {
    pub id: String,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub jersey: Option<String>,
    pub position: Option<Position>,
}

// ---------------------------------------------------------------------------
// Depth chart and athletes  (core v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DepthChartResponse {
    pub items: Option<Vec<DepthChartGroup>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DepthChartGroup {
    pub id: Option<String>,
    pub name: String,
    pub positions: BTreeMap<String, DepthChartPosition>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DepthChartPosition {
    pub position: Position,
    pub athletes: Vec<DepthChartSlot>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DepthChartSlot {
    pub slot: Option<i32>,
    pub rank: Option<i32>,
    pub athlete: Option<Ref>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Position {
    pub id: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AthleteProfile {
    pub id: String,
    pub slug: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub jersey: Option<String>,
    pub display_height: Option<String>,
    pub display_weight: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<String>,
    pub active: Option<bool>,
    pub position: Option<Position>,
    pub experience: Option<Experience>,
    pub status: Option<AthleteStatus>,
    pub headshot: Option<Headshot>,
    pub team: Option<Ref>,
    pub statistics: Option<Ref>,
    pub projections: Option<Ref>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Experience {
    pub years: Option<i32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AthleteStatus {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub status_type: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Headshot {
    pub href: Option<String>,
}

// ---------------------------------------------------------------------------
// Splits  (common v3 API) and projections  (core v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitsResponse {
    pub display_name: Option<String>,
    pub labels: Vec<String>,
    pub split_categories: Option<Vec<SplitCategory>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitCategory {
    pub name: String,
    pub display_name: Option<String>,
    pub splits: Vec<SplitLine>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitLine {
    pub display_name: String,
    pub stats: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProjectionsResponse {
    pub splits: Option<ProjectionSplits>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProjectionSplits {
    pub categories: Vec<ProjectionCategory>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionCategory {
    pub name: String,
    pub display_name: Option<String>,
    pub stats: Vec<ProjectionStat>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionStat {
    pub name: String,
    pub display_name: Option<String>,
    pub abbreviation: Option<String>,
    pub value: Option<f64>,
    pub display_value: Option<String>,
    pub rank_display_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Odds  (core v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OddsResponse {
    pub items: Option<Vec<OddsItem>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OddsItem {
    #[serde(rename = "$ref")]
    pub href: String,
    pub provider: OddsProvider,
    pub details: Option<String>,
    pub over_under: Option<f64>,
    pub spread: Option<f64>,
    pub over_odds: Option<f64>,
    pub under_odds: Option<f64>,
    pub moneyline_winner: Option<bool>,
    pub spread_winner: Option<bool>,
    pub home_team_odds: Option<TeamOdds>,
    pub away_team_odds: Option<TeamOdds>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OddsProvider {
    pub id: String,
    pub name: String,
    pub priority: Option<i32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamOdds {
    pub favorite: Option<bool>,
    pub underdog: Option<bool>,
    pub money_line: Option<f64>,
    pub spread_odds: Option<f64>,
    pub team: Option<OddsTeam>,
    pub current: Option<OddsCurrent>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OddsTeam {
    #[serde(rename = "$ref")]
    pub href: Option<String>,
    pub id: Option<String>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OddsCurrent {
    pub point_spread: Option<OddsLine>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OddsLine {
    pub alternate_display_value: Option<String>,
}
