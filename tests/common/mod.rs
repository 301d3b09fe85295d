#![allow(dead_code)]

use mockito::{Mock, ServerGuard};
use nfl_ingestion::{Config, Ingestor, Store};

pub const SCOREBOARD: &str = include_str!("../fixtures/scoreboard.json");
pub const TEAM_SCHEDULE: &str = include_str!("../fixtures/team_schedule.json");
pub const RECORD: &str = include_str!("../fixtures/record.json");
pub const BOXSCORE: &str = include_str!("../fixtures/boxscore.json");
pub const DEPTH_CHART: &str = include_str!("../fixtures/depth_chart.json");
pub const DEPTH_CHART_SMALLER: &str = include_str!("../fixtures/depth_chart_smaller.json");
pub const ODDS: &str = include_str!("../fixtures/odds.json");
pub const SPLITS: &str = include_str!("../fixtures/splits.json");
pub const PROJECTIONS: &str = include_str!("../fixtures/projections.json");

/// Ingestor over a fresh in-memory store, with every ESPN base URL pointed
/// at the mock server.
pub async fn ingestor(server: &ServerGuard) -> Ingestor {
    let config = Config {
        fetch_concurrency: 3,
        requests_per_minute: 60_000,
        http_timeout_seconds: 5,
        ..Config::default()
    }
    .with_base_url(&server.url());
    let store = Store::in_memory().await.unwrap();
    Ingestor::new(config, store).unwrap()
}

pub async fn serve_json(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub async fn serve_status(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("upstream unavailable")
        .create_async()
        .await
}

pub fn athlete_profile(id: &str, slug: &str, name: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "uid": "s:20~l:28~a:{id}",
            "slug": "{slug}",
            "firstName": "{first}",
            "lastName": "{last}",
            "fullName": "{name}",
            "displayName": "{name}",
            "jersey": "15",
            "displayHeight": "6' 2\"",
            "displayWeight": "225 lbs",
            "age": 29,
            "active": true,
            "position": {{"id": "8", "name": "Quarterback", "displayName": "Quarterback", "abbreviation": "QB"}},
            "experience": {{"years": 8}},
            "status": {{"id": "1", "name": "Active", "type": "active"}},
            "headshot": {{"href": "https://a.espncdn.com/i/headshots/nfl/players/full/{id}.png"}},
            "team": {{"$ref": "http://sports.core.api.espn.com/v2/sports/football/leagues/nfl/seasons/2024/teams/12?lang=en&region=us"}}
        }}"#,
        first = name.split(' ').next().unwrap_or(name),
        last = name.split(' ').last().unwrap_or(name),
    )
}
