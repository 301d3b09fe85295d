//! SQLite schema the pipeline writes into.
//!
//! Every statement is `IF NOT EXISTS`, so applying it to a database that
//! already has the tables is a no-op.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS leagueInfo (
    league_id TEXT PRIMARY KEY,
    name TEXT,
    abbreviation TEXT,
    season_year INTEGER,
    season_type INTEGER,
    season_start TEXT,
    season_end TEXT
);

CREATE TABLE IF NOT EXISTS nflWeek (
    season INTEGER NOT NULL,
    season_type INTEGER NOT NULL,
    week INTEGER NOT NULL,
    display_week TEXT,
    season_start_date TEXT,
    PRIMARY KEY (season, season_type, week)
);

CREATE TABLE IF NOT EXISTS venues (
    venue_id TEXT PRIMARY KEY,
    full_name TEXT,
    city TEXT,
    state TEXT,
    indoor BOOLEAN NOT NULL DEFAULT FALSE
);

-- `date` is the Eastern display string; order by `kickoff_utc`.
CREATE TABLE IF NOT EXISTS games (
    game_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    kickoff_utc TEXT NOT NULL,
    week INTEGER,
    season INTEGER,
    season_type INTEGER,
    venue_id TEXT,
    status TEXT NOT NULL,
    clock TEXT,
    period INTEGER,
    down TEXT NOT NULL,
    detailed_text TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS games_kickoff ON games (kickoff_utc);

-- One row per team per game, not a global team table.
CREATE TABLE IF NOT EXISTS teams (
    team_id TEXT NOT NULL,
    game_id TEXT NOT NULL,
    team_name TEXT,
    score INTEGER NOT NULL DEFAULT 0,
    home_away TEXT,
    abbreviation TEXT,
    logo TEXT,
    record TEXT,
    PRIMARY KEY (team_id, game_id),
    FOREIGN KEY (game_id) REFERENCES games (game_id)
);

CREATE INDEX IF NOT EXISTS teams_game ON teams (game_id);
CREATE INDEX IF NOT EXISTS teams_abbreviation ON teams (abbreviation);

CREATE TABLE IF NOT EXISTS broadcasts (
    game_id TEXT NOT NULL,
    market TEXT NOT NULL,
    channel TEXT NOT NULL,
    PRIMARY KEY (game_id, market, channel),
    FOREIGN KEY (game_id) REFERENCES games (game_id)
);

CREATE TABLE IF NOT EXISTS competition_results (
    game_id TEXT NOT NULL,
    team_id TEXT NOT NULL,
    name TEXT,
    week INTEGER,
    competition_date TEXT,
    kickoff_utc TEXT NOT NULL,
    team_name TEXT,
    team_logo TEXT,
    opponent_id TEXT NOT NULL,
    opponent_name TEXT,
    opponent_logo TEXT,
    team_score INTEGER NOT NULL,
    opponent_score INTEGER NOT NULL,
    outcome TEXT NOT NULL,
    PRIMARY KEY (game_id, team_id),
    FOREIGN KEY (game_id) REFERENCES games (game_id)
);

CREATE TABLE IF NOT EXISTS records (
    team_id TEXT PRIMARY KEY,
    record TEXT,
    win_percentage REAL,
    avg_points_for REAL,
    avg_points_against REAL,
    points_for REAL,
    points_against REAL,
    point_differential REAL,
    division_record TEXT,
    division_win_percentage REAL,
    games_played INTEGER,
    playoff_seed INTEGER,
    streak TEXT
);

CREATE TABLE IF NOT EXISTS players (
    player_id TEXT PRIMARY KEY,
    full_name TEXT,
    first_name TEXT,
    last_name TEXT,
    jersey TEXT,
    position TEXT,
    team_id TEXT NOT NULL
);

-- Stat keys are whatever labels the feed sends, hence key/value rows.
CREATE TABLE IF NOT EXISTS player_stats (
    player_id TEXT NOT NULL,
    game_id TEXT NOT NULL,
    team_id TEXT NOT NULL,
    category TEXT NOT NULL,
    stat_key TEXT NOT NULL,
    stat_value TEXT,
    jersey TEXT,
    PRIMARY KEY (player_id, game_id, category, stat_key)
);

CREATE TABLE IF NOT EXISTS athletes (
    athlete_id TEXT PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    team_id TEXT,
    first_name TEXT,
    last_name TEXT,
    full_name TEXT,
    display_name TEXT,
    jersey TEXT,
    position TEXT,
    position_name TEXT,
    height TEXT,
    weight TEXT,
    age INTEGER,
    date_of_birth TEXT,
    experience INTEGER,
    active BOOLEAN NOT NULL DEFAULT FALSE,
    status TEXT,
    headshot TEXT,
    statistics_ref TEXT,
    projections_ref TEXT
);

-- Replaced per team on every refresh.
CREATE TABLE IF NOT EXISTS depthChart (
    team_id TEXT NOT NULL,
    season INTEGER NOT NULL,
    position_group TEXT NOT NULL,
    position_abbreviation TEXT NOT NULL,
    position_name TEXT,
    slot INTEGER NOT NULL,
    rank INTEGER NOT NULL,
    athlete_id TEXT,
    athlete_ref TEXT,
    PRIMARY KEY (team_id, position_group, position_abbreviation, slot, rank)
);

CREATE TABLE IF NOT EXISTS odds_provider (
    provider_id TEXT PRIMARY KEY,
    name TEXT,
    priority INTEGER
);

CREATE TABLE IF NOT EXISTS odds (
    game_id TEXT NOT NULL,
    provider_id TEXT NOT NULL,
    details TEXT,
    over_under REAL,
    spread REAL,
    over_odds INTEGER,
    under_odds INTEGER,
    moneyline_winner BOOLEAN NOT NULL DEFAULT FALSE,
    spread_winner BOOLEAN NOT NULL DEFAULT FALSE,
    PRIMARY KEY (game_id, provider_id),
    FOREIGN KEY (provider_id) REFERENCES odds_provider (provider_id)
);

CREATE TABLE IF NOT EXISTS team_odds (
    game_id TEXT NOT NULL,
    provider_id TEXT NOT NULL,
    team_id TEXT NOT NULL,
    home_away TEXT NOT NULL,
    favorite BOOLEAN NOT NULL DEFAULT FALSE,
    underdog BOOLEAN NOT NULL DEFAULT FALSE,
    moneyline INTEGER,
    spread_odds INTEGER,
    point_spread TEXT,
    PRIMARY KEY (game_id, provider_id, team_id),
    FOREIGN KEY (game_id, provider_id) REFERENCES odds (game_id, provider_id)
);
"#;
