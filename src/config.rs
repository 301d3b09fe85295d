use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_SITE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl";
pub const DEFAULT_CORE_URL: &str = "https://sports.core.api.espn.com/v2/sports/football/leagues/nfl";
pub const DEFAULT_WEB_URL: &str = "https://site.web.api.espn.com/apis/common/v3/sports/football/nfl";
pub const DEFAULT_CDN_URL: &str = "https://cdn.espn.com/core/nfl";

/// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Season year used for record, depth chart and projection URLs
    pub season: i32,
    /// ESPN season type: 1 preseason, 2 regular season, 3 postseason
    pub season_type: i32,
    pub site_url: String,
    pub core_url: String,
    pub web_url: String,
    pub cdn_url: String,
    /// Upper bound on in-flight requests during batch athlete fetches
    pub fetch_concurrency: usize,
    pub requests_per_minute: u32,
    pub http_timeout_seconds: u64,
    pub http_port: u16,
    pub apply_schema: bool,
    /// If true, refresh the scoreboard once and exit (no HTTP server)
    pub run_once: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data/nfl.db".to_string(),
            season: 2024,
            season_type: 2,
            site_url: DEFAULT_SITE_URL.to_string(),
            core_url: DEFAULT_CORE_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            fetch_concurrency: 8,
            requests_per_minute: 120,
            http_timeout_seconds: 15,
            http_port: 60000,
            apply_schema: true,
            run_once: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            database_url: string_var("DATABASE_URL", defaults.database_url)?,
            season: parsed_var("NFL_SEASON", defaults.season)?,
            season_type: parsed_var("NFL_SEASON_TYPE", defaults.season_type)?,
            site_url: string_var("ESPN_SITE_URL", defaults.site_url)?,
            core_url: string_var("ESPN_CORE_URL", defaults.core_url)?,
            web_url: string_var("ESPN_WEB_URL", defaults.web_url)?,
            cdn_url: string_var("ESPN_CDN_URL", defaults.cdn_url)?,
            fetch_concurrency: parsed_var("FETCH_CONCURRENCY", defaults.fetch_concurrency)?,
            requests_per_minute: parsed_var("REQUESTS_PER_MINUTE", defaults.requests_per_minute)?,
            http_timeout_seconds: parsed_var("HTTP_TIMEOUT_SECONDS", defaults.http_timeout_seconds)?,
            http_port: parsed_var("HTTP_PORT", defaults.http_port)?,
            apply_schema: bool_var("APPLY_SCHEMA", defaults.apply_schema)?,
            run_once: bool_var("RUN_ONCE", defaults.run_once)?,
        };

        if config.fetch_concurrency == 0 {
            return Err(anyhow!("FETCH_CONCURRENCY must be at least 1"));
        }
        if config.requests_per_minute == 0 {
            return Err(anyhow!("REQUESTS_PER_MINUTE must be at least 1"));
        }

        Ok(config)
    }

    /// Point every ESPN base URL at one host. Used to run against a mock server.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.site_url = format!("{base}/site");
        self.core_url = format!("{base}/core");
        self.web_url = format!("{base}/web");
        self.cdn_url = format!("{base}/cdn");
        self
    }

    pub fn scoreboard_url(&self) -> String {
        format!("{}/scoreboard", self.site_url)
    }

    pub fn team_schedule_url(&self, team_id: &str) -> String {
        format!("{}/teams/{}/schedule", self.site_url, team_id)
    }

    pub fn team_record_url(&self, team_id: &str) -> String {
        format!(
            "{}/seasons/{}/types/{}/teams/{}/record",
            self.core_url, self.season, self.season_type, team_id
        )
    }

    pub fn boxscore_url(&self, game_id: &str) -> String {
        format!("{}/boxscore?xhr=1&gameId={}", self.cdn_url, game_id)
    }

    pub fn depth_chart_url(&self, team_id: &str) -> String {
        format!("{}/seasons/{}/teams/{}/depthcharts", self.core_url, self.season, team_id)
    }

    pub fn athlete_url(&self, athlete_id: &str) -> String {
        format!("{}/seasons/{}/athletes/{}", self.core_url, self.season, athlete_id)
    }

    pub fn athlete_splits_url(&self, athlete_id: &str) -> String {
        format!("{}/athletes/{}/splits", self.web_url, athlete_id)
    }

    pub fn athlete_projections_url(&self, athlete_id: &str) -> String {
        format!(
            "{}/seasons/{}/types/{}/athletes/{}/projections",
            self.core_url, self.season, self.season_type, athlete_id
        )
    }

    pub fn odds_url(&self, game_id: &str) -> String {
        format!("{}/events/{}/competitions/{}/odds", self.core_url, game_id, game_id)
    }
}

fn string_var(name: &str, default: String) -> Result<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Ok(_) => Err(anyhow!("{} is set but empty", name)),
        Err(_) => Ok(default),
    }
}

fn parsed_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, v)),
        Err(_) => Ok(default),
    }
}

fn bool_var(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(v) => match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(anyhow!("{} must be true or false, got {:?}", name, other)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_season_settings() {
        let config = Config {
            season: 2023,
            season_type: 3,
            ..Config::default()
        };
        assert_eq!(
            config.team_record_url("12"),
            format!("{DEFAULT_CORE_URL}/seasons/2023/types/3/teams/12/record")
        );
        assert_eq!(
            config.depth_chart_url("12"),
            format!("{DEFAULT_CORE_URL}/seasons/2023/teams/12/depthcharts")
        );
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let config = Config::default().with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.scoreboard_url(), "http://127.0.0.1:1234/site/scoreboard");
        assert_eq!(
            config.boxscore_url("401"),
            "http://127.0.0.1:1234/cdn/boxscore?xhr=1&gameId=401"
        );
    }
}
