//! Store gateway over SQLite.
//!
//! Writes go through the upsert functions below, always against a
//! connection borrowed from a transaction opened with [`Store::begin`].
//! Upserts overwrite every column of a row whose key already exists; the
//! depth chart and broadcasts are replaced as a whole per team or game.

mod schema;
pub mod views;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{info, warn};

use crate::model::{
    Athlete, Broadcast, CompetitionResult, DepthChartEntry, Game, LeagueInfo, NflWeek, Odds, OddsProvider,
    Player, PlayerStat, TeamInGame, TeamOdds, TeamRecord, Venue,
};

pub use schema::SCHEMA;

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connect with retry and exponential backoff.
    pub async fn connect(url: &str, max_retries: u32) -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut attempt = 0;
        loop {
            match SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(10))
                .connect_with(options.clone())
                .await
            {
                Ok(pool) => {
                    info!("Connected to {}", url);
                    return Ok(Self { pool });
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries {
                        return Err(e);
                    }
                    warn!("Database connection attempt {} failed: {}. Retrying...", attempt, e);
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                }
            }
        }
    }

    /// Private in-memory database with the schema applied. A single
    /// connection keeps every query on the same database.
    pub async fn in_memory() -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    pub async fn apply_schema(&self) -> sqlx::Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Open the transaction an operation writes through. Dropping it without
    /// `commit` rolls everything back.
    pub async fn begin(&self) -> sqlx::Result<Transaction<'static, Sqlite>> {
        self.pool.begin().await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

pub async fn upsert_venue(conn: &mut SqliteConnection, venue: &Venue) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO venues (venue_id, full_name, city, state, indoor)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (venue_id) DO UPDATE SET
            full_name = excluded.full_name,
            city = excluded.city,
            state = excluded.state,
            indoor = excluded.indoor
        "#,
    )
    .bind(&venue.venue_id)
    .bind(&venue.full_name)
    .bind(&venue.city)
    .bind(&venue.state)
    .bind(venue.indoor)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_game(conn: &mut SqliteConnection, game: &Game) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO games (
            game_id, name, date, kickoff_utc, week, season, season_type,
            venue_id, status, clock, period, down, detailed_text
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (game_id) DO UPDATE SET
            name = excluded.name,
            date = excluded.date,
            kickoff_utc = excluded.kickoff_utc,
            week = excluded.week,
            season = excluded.season,
            season_type = excluded.season_type,
            venue_id = excluded.venue_id,
            status = excluded.status,
            clock = excluded.clock,
            period = excluded.period,
            down = excluded.down,
            detailed_text = excluded.detailed_text
        "#,
    )
    .bind(&game.game_id)
    .bind(&game.name)
    .bind(&game.date)
    .bind(game.kickoff_utc)
    .bind(game.week)
    .bind(game.season)
    .bind(game.season_type)
    .bind(&game.venue_id)
    .bind(&game.status)
    .bind(&game.clock)
    .bind(game.period)
    .bind(&game.down)
    .bind(&game.detailed_text)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_team_in_game(conn: &mut SqliteConnection, team: &TeamInGame) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO teams (team_id, game_id, team_name, score, home_away, abbreviation, logo, record)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (team_id, game_id) DO UPDATE SET
            team_name = excluded.team_name,
            score = excluded.score,
            home_away = excluded.home_away,
            abbreviation = excluded.abbreviation,
            logo = excluded.logo,
            record = excluded.record
        "#,
    )
    .bind(&team.team_id)
    .bind(&team.game_id)
    .bind(&team.team_name)
    .bind(team.score)
    .bind(&team.home_away)
    .bind(&team.abbreviation)
    .bind(&team.logo)
    .bind(&team.record)
    .execute(conn)
    .await?;
    Ok(())
}

/// Swap a game's participants for `teams`, so a team dropped from the feed
/// (a placeholder replaced by the real opponent) leaves no row behind.
pub async fn replace_teams_in_game(
    conn: &mut SqliteConnection,
    game_id: &str,
    teams: &[TeamInGame],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM teams WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    for team in teams {
        upsert_team_in_game(&mut *conn, team).await?;
    }
    Ok(())
}

pub async fn replace_broadcasts(
    conn: &mut SqliteConnection,
    game_id: &str,
    broadcasts: &[Broadcast],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM broadcasts WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    for broadcast in broadcasts {
        sqlx::query("INSERT OR IGNORE INTO broadcasts (game_id, market, channel) VALUES (?, ?, ?)")
            .bind(&broadcast.game_id)
            .bind(&broadcast.market)
            .bind(&broadcast.channel)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Replace both perspectives of a game. An empty slice clears the game's
/// results.
pub async fn replace_competition_results(
    conn: &mut SqliteConnection,
    game_id: &str,
    results: &[CompetitionResult],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM competition_results WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    for result in results {
        upsert_competition_result(&mut *conn, result).await?;
    }
    Ok(())
}

pub async fn upsert_competition_result(
    conn: &mut SqliteConnection,
    result: &CompetitionResult,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO competition_results (
            game_id, team_id, name, week, competition_date, kickoff_utc,
            team_name, team_logo, opponent_id, opponent_name, opponent_logo,
            team_score, opponent_score, outcome
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (game_id, team_id) DO UPDATE SET
            name = excluded.name,
            week = excluded.week,
            competition_date = excluded.competition_date,
            kickoff_utc = excluded.kickoff_utc,
            team_name = excluded.team_name,
            team_logo = excluded.team_logo,
            opponent_id = excluded.opponent_id,
            opponent_name = excluded.opponent_name,
            opponent_logo = excluded.opponent_logo,
            team_score = excluded.team_score,
            opponent_score = excluded.opponent_score,
            outcome = excluded.outcome
        "#,
    )
    .bind(&result.game_id)
    .bind(&result.team_id)
    .bind(&result.name)
    .bind(result.week)
    .bind(&result.competition_date)
    .bind(result.kickoff_utc)
    .bind(&result.team_name)
    .bind(&result.team_logo)
    .bind(&result.opponent_id)
    .bind(&result.opponent_name)
    .bind(&result.opponent_logo)
    .bind(result.team_score)
    .bind(result.opponent_score)
    .bind(result.outcome.as_str())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_record(conn: &mut SqliteConnection, record: &TeamRecord) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO records (
            team_id, record, win_percentage, avg_points_for, avg_points_against,
            points_for, points_against, point_differential, division_record,
            division_win_percentage, games_played, playoff_seed, streak
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (team_id) DO UPDATE SET
            record = excluded.record,
            win_percentage = excluded.win_percentage,
            avg_points_for = excluded.avg_points_for,
            avg_points_against = excluded.avg_points_against,
            points_for = excluded.points_for,
            points_against = excluded.points_against,
            point_differential = excluded.point_differential,
            division_record = excluded.division_record,
            division_win_percentage = excluded.division_win_percentage,
            games_played = excluded.games_played,
            playoff_seed = excluded.playoff_seed,
            streak = excluded.streak
        "#,
    )
    .bind(&record.team_id)
    .bind(&record.record)
    .bind(record.win_percentage)
    .bind(record.avg_points_for)
    .bind(record.avg_points_against)
    .bind(record.points_for)
    .bind(record.points_against)
    .bind(record.point_differential)
    .bind(&record.division_record)
    .bind(record.division_win_percentage)
    .bind(record.games_played)
    .bind(record.playoff_seed)
    .bind(&record.streak)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_player(conn: &mut SqliteConnection, player: &Player) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO players (player_id, full_name, first_name, last_name, jersey, position, team_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (player_id) DO UPDATE SET
            full_name = excluded.full_name,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            jersey = excluded.jersey,
            position = excluded.position,
            team_id = excluded.team_id
        "#,
    )
    .bind(&player.player_id)
    .bind(&player.full_name)
    .bind(&player.first_name)
    .bind(&player.last_name)
    .bind(&player.jersey)
    .bind(&player.position)
    .bind(&player.team_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_player_stat(conn: &mut SqliteConnection, stat: &PlayerStat) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO player_stats (player_id, game_id, team_id, category, stat_key, stat_value, jersey)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (player_id, game_id, category, stat_key) DO UPDATE SET
            team_id = excluded.team_id,
            stat_value = excluded.stat_value,
            jersey = excluded.jersey
        "#,
    )
    .bind(&stat.player_id)
    .bind(&stat.game_id)
    .bind(&stat.team_id)
    .bind(&stat.category)
    .bind(&stat.stat_key)
    .bind(&stat.stat_value)
    .bind(&stat.jersey)
    .execute(conn)
    .await?;
    Ok(())
}

/// Athletes are unique on both id and slug; `OR REPLACE` drops whichever
/// existing row conflicts on either before inserting.
pub async fn upsert_athlete(conn: &mut SqliteConnection, athlete: &Athlete) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO athletes (
            athlete_id, slug, team_id, first_name, last_name, full_name, display_name,
            jersey, position, position_name, height, weight, age, date_of_birth,
            experience, active, status, headshot, statistics_ref, projections_ref
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&athlete.athlete_id)
    .bind(&athlete.slug)
    .bind(&athlete.team_id)
    .bind(&athlete.first_name)
    .bind(&athlete.last_name)
    .bind(&athlete.full_name)
    .bind(&athlete.display_name)
    .bind(&athlete.jersey)
    .bind(&athlete.position)
    .bind(&athlete.position_name)
    .bind(&athlete.height)
    .bind(&athlete.weight)
    .bind(athlete.age)
    .bind(&athlete.date_of_birth)
    .bind(athlete.experience)
    .bind(athlete.active)
    .bind(&athlete.status)
    .bind(&athlete.headshot)
    .bind(&athlete.statistics_ref)
    .bind(&athlete.projections_ref)
    .execute(conn)
    .await?;
    Ok(())
}

/// Wipe the team's depth chart and insert the new snapshot.
pub async fn replace_depth_chart(
    conn: &mut SqliteConnection,
    team_id: &str,
    entries: &[DepthChartEntry],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM depthChart WHERE team_id = ?")
        .bind(team_id)
        .execute(&mut *conn)
        .await?;

    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO depthChart (
                team_id, season, position_group, position_abbreviation, position_name,
                slot, rank, athlete_id, athlete_ref
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.team_id)
        .bind(entry.season)
        .bind(&entry.position_group)
        .bind(&entry.position_abbreviation)
        .bind(&entry.position_name)
        .bind(entry.slot)
        .bind(entry.rank)
        .bind(&entry.athlete_id)
        .bind(&entry.athlete_ref)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn upsert_odds_provider(conn: &mut SqliteConnection, provider: &OddsProvider) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO odds_provider (provider_id, name, priority)
        VALUES (?, ?, ?)
        ON CONFLICT (provider_id) DO UPDATE SET
            name = excluded.name,
            priority = excluded.priority
        "#,
    )
    .bind(&provider.provider_id)
    .bind(&provider.name)
    .bind(provider.priority)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_odds(conn: &mut SqliteConnection, odds: &Odds) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO odds (
            game_id, provider_id, details, over_under, spread, over_odds,
            under_odds, moneyline_winner, spread_winner
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (game_id, provider_id) DO UPDATE SET
            details = excluded.details,
            over_under = excluded.over_under,
            spread = excluded.spread,
            over_odds = excluded.over_odds,
            under_odds = excluded.under_odds,
            moneyline_winner = excluded.moneyline_winner,
            spread_winner = excluded.spread_winner
        "#,
    )
    .bind(&odds.game_id)
    .bind(&odds.provider_id)
    .bind(&odds.details)
    .bind(odds.over_under)
    .bind(odds.spread)
    .bind(odds.over_odds)
    .bind(odds.under_odds)
    .bind(odds.moneyline_winner)
    .bind(odds.spread_winner)
    .execute(conn)
    .await?;
    Ok(())
}

/// `side.team_id` must already be resolved against `teams`.
pub async fn upsert_team_odds(conn: &mut SqliteConnection, side: &TeamOdds) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO team_odds (
            game_id, provider_id, team_id, home_away, favorite, underdog,
            moneyline, spread_odds, point_spread
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (game_id, provider_id, team_id) DO UPDATE SET
            home_away = excluded.home_away,
            favorite = excluded.favorite,
            underdog = excluded.underdog,
            moneyline = excluded.moneyline,
            spread_odds = excluded.spread_odds,
            point_spread = excluded.point_spread
        "#,
    )
    .bind(&side.game_id)
    .bind(&side.provider_id)
    .bind(&side.team_id)
    .bind(&side.home_away)
    .bind(side.favorite)
    .bind(side.underdog)
    .bind(side.moneyline)
    .bind(side.spread_odds)
    .bind(&side.point_spread)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_league(conn: &mut SqliteConnection, league: &LeagueInfo) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO leagueInfo (
            league_id, name, abbreviation, season_year, season_type, season_start, season_end
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (league_id) DO UPDATE SET
            name = excluded.name,
            abbreviation = excluded.abbreviation,
            season_year = excluded.season_year,
            season_type = excluded.season_type,
            season_start = excluded.season_start,
            season_end = excluded.season_end
        "#,
    )
    .bind(&league.league_id)
    .bind(&league.name)
    .bind(&league.abbreviation)
    .bind(league.season_year)
    .bind(league.season_type)
    .bind(&league.season_start)
    .bind(&league.season_end)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_week(conn: &mut SqliteConnection, week: &NflWeek) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO nflWeek (season, season_type, week, display_week, season_start_date)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (season, season_type, week) DO UPDATE SET
            display_week = excluded.display_week,
            season_start_date = excluded.season_start_date
        "#,
    )
    .bind(week.season)
    .bind(week.season_type)
    .bind(week.week)
    .bind(&week.display_week)
    .bind(&week.season_start_date)
    .execute(conn)
    .await?;
    Ok(())
}
