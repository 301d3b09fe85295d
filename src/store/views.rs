//! Read views over the ingested tables.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::Store;
use crate::model::DepthChartEntry;

/// Every table the pipeline writes, in schema order.
pub const TABLES: [&str; 15] = [
    "leagueInfo",
    "nflWeek",
    "venues",
    "games",
    "teams",
    "broadcasts",
    "competition_results",
    "records",
    "players",
    "player_stats",
    "athletes",
    "depthChart",
    "odds_provider",
    "odds",
    "team_odds",
];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ScheduledGame {
    pub game_id: String,
    pub name: String,
    pub date: String,
    pub kickoff_utc: DateTime<Utc>,
    pub week: Option<i32>,
    pub status: String,
    pub clock: Option<String>,
    pub period: Option<i32>,
    pub down: String,
    pub detailed_text: String,
    pub home_team_id: String,
    pub home_team_name: Option<String>,
    pub home_abbreviation: Option<String>,
    pub home_logo: Option<String>,
    pub home_score: i64,
    pub away_team_id: String,
    pub away_team_name: Option<String>,
    pub away_abbreviation: Option<String>,
    pub away_logo: Option<String>,
    pub away_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct GameRow {
    pub game_id: String,
    pub name: String,
    pub date: String,
    pub kickoff_utc: DateTime<Utc>,
    pub week: Option<i32>,
    pub season: Option<i32>,
    pub season_type: Option<i32>,
    pub venue_id: Option<String>,
    pub venue_name: Option<String>,
    pub status: String,
    pub clock: Option<String>,
    pub period: Option<i32>,
    pub down: String,
    pub detailed_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TeamRow {
    pub team_id: String,
    pub game_id: String,
    pub team_name: Option<String>,
    pub score: i64,
    pub home_away: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
    pub record: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OddsRow {
    pub provider_id: String,
    pub provider_name: Option<String>,
    pub priority: Option<i32>,
    pub details: Option<String>,
    pub over_under: Option<f64>,
    pub spread: Option<f64>,
    pub over_odds: Option<i64>,
    pub under_odds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TeamOddsRow {
    pub provider_id: String,
    pub team_id: String,
    pub home_away: String,
    pub favorite: bool,
    pub underdog: bool,
    pub moneyline: Option<i64>,
    pub spread_odds: Option<i64>,
    pub point_spread: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDetail {
    pub game: GameRow,
    pub teams: Vec<TeamRow>,
    pub broadcasts: Vec<String>,
    pub odds: Vec<OddsRow>,
    pub team_odds: Vec<TeamOddsRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TeamSummary {
    pub team_id: String,
    pub team_name: Option<String>,
    pub abbreviation: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ScheduleRow {
    pub game_id: String,
    pub name: Option<String>,
    pub week: Option<i32>,
    pub competition_date: Option<String>,
    pub kickoff_utc: DateTime<Utc>,
    pub opponent_id: String,
    pub opponent_name: Option<String>,
    pub opponent_logo: Option<String>,
    pub team_score: i64,
    pub opponent_score: i64,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RecordRow {
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

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AthleteRow {
    pub athlete_id: String,
    pub slug: String,
    pub team_id: Option<String>,
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
}

impl Store {
    // ============================================
    // GAMES
    // ============================================

    /// Games with exactly two teams, in kickoff order. Partially ingested
    /// games are left out. The home side is the one labelled `home`, or the
    /// lower team id when the feed carries no labels.
    pub async fn schedule(&self) -> sqlx::Result<Vec<ScheduledGame>> {
        sqlx::query_as(
            r#"
            WITH sides AS (
                SELECT t.*,
                       ROW_NUMBER() OVER (PARTITION BY t.game_id ORDER BY t.home_away DESC, t.team_id) AS side,
                       COUNT(*) OVER (PARTITION BY t.game_id) AS participants
                FROM teams t
            )
            SELECT g.game_id, g.name, g.date, g.kickoff_utc, g.week, g.status,
                   g.clock, g.period, g.down, g.detailed_text,
                   h.team_id AS home_team_id, h.team_name AS home_team_name,
                   h.abbreviation AS home_abbreviation, h.logo AS home_logo, h.score AS home_score,
                   a.team_id AS away_team_id, a.team_name AS away_team_name,
                   a.abbreviation AS away_abbreviation, a.logo AS away_logo, a.score AS away_score
            FROM games g
            JOIN sides h ON h.game_id = g.game_id AND h.side = 1 AND h.participants = 2
            JOIN sides a ON a.game_id = g.game_id AND a.side = 2
            ORDER BY g.kickoff_utc, g.game_id
            "#,
        )
        .fetch_all(self.pool())
        .await
    }

    pub async fn game_detail(&self, game_id: &str) -> sqlx::Result<Option<GameDetail>> {
        let game: Option<GameRow> = sqlx::query_as(
            r#"
            SELECT g.game_id, g.name, g.date, g.kickoff_utc, g.week, g.season, g.season_type,
                   g.venue_id, v.full_name AS venue_name, g.status, g.clock, g.period,
                   g.down, g.detailed_text
            FROM games g
            LEFT JOIN venues v ON v.venue_id = g.venue_id
            WHERE g.game_id = ?
            "#,
        )
        .bind(game_id)
        .fetch_optional(self.pool())
        .await?;

        let Some(game) = game else {
            return Ok(None);
        };

        let teams: Vec<TeamRow> = sqlx::query_as(
            r#"
            SELECT team_id, game_id, team_name, score, home_away, abbreviation, logo, record
            FROM teams
            WHERE game_id = ?
            ORDER BY home_away DESC, team_id
            "#,
        )
        .bind(game_id)
        .fetch_all(self.pool())
        .await?;

        let broadcasts: Vec<(String,)> =
            sqlx::query_as("SELECT channel FROM broadcasts WHERE game_id = ? ORDER BY market, channel")
                .bind(game_id)
                .fetch_all(self.pool())
                .await?;

        let odds: Vec<OddsRow> = sqlx::query_as(
            r#"
            SELECT o.provider_id, p.name AS provider_name, p.priority, o.details,
                   o.over_under, o.spread, o.over_odds, o.under_odds
            FROM odds o
            LEFT JOIN odds_provider p ON p.provider_id = o.provider_id
            WHERE o.game_id = ?
            ORDER BY p.priority, o.provider_id
            "#,
        )
        .bind(game_id)
        .fetch_all(self.pool())
        .await?;

        let team_odds: Vec<TeamOddsRow> = sqlx::query_as(
            r#"
            SELECT provider_id, team_id, home_away, favorite, underdog,
                   moneyline, spread_odds, point_spread
            FROM team_odds
            WHERE game_id = ?
            ORDER BY provider_id, home_away DESC
            "#,
        )
        .bind(game_id)
        .fetch_all(self.pool())
        .await?;

        Ok(Some(GameDetail {
            game,
            teams,
            broadcasts: broadcasts.into_iter().map(|(channel,)| channel).collect(),
            odds,
            team_odds,
        }))
    }

    // ============================================
    // TEAMS
    // ============================================

    /// Team identity as of its most recent game.
    pub async fn team_summary(&self, team_id: &str) -> sqlx::Result<Option<TeamSummary>> {
        sqlx::query_as(
            r#"
            SELECT t.team_id, t.team_name, t.abbreviation, t.logo
            FROM teams t
            JOIN games g ON g.game_id = t.game_id
            WHERE t.team_id = ?
            ORDER BY g.kickoff_utc DESC
            LIMIT 1
            "#,
        )
        .bind(team_id)
        .fetch_optional(self.pool())
        .await
    }

    /// The team's results in chronological order.
    pub async fn team_schedule(&self, team_id: &str) -> sqlx::Result<Vec<ScheduleRow>> {
        sqlx::query_as(
            r#"
            SELECT game_id, name, week, competition_date, kickoff_utc,
                   opponent_id, opponent_name, opponent_logo,
                   team_score, opponent_score,
                   COALESCE(outcome, 'Unknown') AS outcome
            FROM competition_results
            WHERE team_id = ?
            ORDER BY kickoff_utc, game_id
            "#,
        )
        .bind(team_id)
        .fetch_all(self.pool())
        .await
    }

    pub async fn team_record(&self, team_id: &str) -> sqlx::Result<Option<RecordRow>> {
        sqlx::query_as(
            r#"
            SELECT team_id, record, win_percentage, avg_points_for, avg_points_against,
                   points_for, points_against, point_differential, division_record,
                   division_win_percentage, games_played, playoff_seed, streak
            FROM records
            WHERE team_id = ?
            "#,
        )
        .bind(team_id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn depth_chart(&self, team_id: &str) -> sqlx::Result<Vec<DepthChartEntry>> {
        sqlx::query_as(
            r#"
            SELECT team_id, season, position_group, position_abbreviation, position_name,
                   slot, rank, athlete_id, athlete_ref
            FROM depthChart
            WHERE team_id = ?
            ORDER BY position_group, position_abbreviation, slot, rank
            "#,
        )
        .bind(team_id)
        .fetch_all(self.pool())
        .await
    }

    // ============================================
    // ATHLETES
    // ============================================

    pub async fn athlete_by_slug(&self, slug: &str) -> sqlx::Result<Option<AthleteRow>> {
        sqlx::query_as(
            r#"
            SELECT athlete_id, slug, team_id, full_name, display_name, jersey, position,
                   position_name, height, weight, age, date_of_birth, experience, active,
                   status, headshot
            FROM athletes
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
    }

    // ============================================
    // BOOKKEEPING
    // ============================================

    /// Row count of every table, keyed by table name.
    pub async fn row_counts(&self) -> sqlx::Result<BTreeMap<&'static str, i64>> {
        let mut counts = BTreeMap::new();
        for table in TABLES {
            let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(self.pool())
                .await?;
            counts.insert(table, count);
        }
        Ok(counts)
    }
}
