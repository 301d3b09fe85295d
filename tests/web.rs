mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::*;
use nfl_ingestion::web::{self, AppState, HealthState};
use nfl_ingestion::Ingestor;
use serde_json::Value;

async fn spawn(ingestor: Ingestor) -> SocketAddr {
    let app = web::router(AppState {
        ingestor: Arc::new(ingestor),
        health: HealthState::new(),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn games_endpoint_flags_stale_data_but_still_serves_it() {
    let mut server = mockito::Server::new_async().await;
    let ok = serve_json(&mut server, "/site/scoreboard", SCOREBOARD).await;
    let addr = spawn(ingestor(&server).await).await;

    let (status, body) = get(addr, "/games").await;
    assert_eq!(status, 200);
    assert_eq!(body["stale"], false);
    assert_eq!(body["refresh"]["outcome"], "fresh");
    assert_eq!(body["games"].as_array().unwrap().len(), 2);
    assert_eq!(body["games"][0]["game_id"], "401671800");

    ok.remove_async().await;
    serve_status(&mut server, "/site/scoreboard", 503).await;

    let (status, body) = get(addr, "/games").await;
    assert_eq!(status, 200);
    assert_eq!(body["stale"], true);
    assert_eq!(body["refresh"]["outcome"], "transient_failure");
    assert_eq!(body["games"].as_array().unwrap().len(), 2);

    let (status, health) = get(addr, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["last_outcome"], "transient_failure");
    assert_eq!(health["consecutive_failures"], 1);
}

#[tokio::test]
async fn game_detail_includes_teams_and_odds() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/site/scoreboard", SCOREBOARD).await;
    serve_json(
        &mut server,
        "/core/events/401671789/competitions/401671789/odds",
        ODDS,
    )
    .await;
    serve_status(&mut server, "/core/events/1/competitions/1/odds", 404).await;
    let addr = spawn(ingestor(&server).await).await;

    let (status, body) = get(addr, "/games/401671789").await;
    assert_eq!(status, 200);
    assert_eq!(body["stale"], false);
    assert_eq!(body["game"]["game"]["venue_name"], "Mercedes-Benz Stadium");
    assert_eq!(body["game"]["teams"].as_array().unwrap().len(), 2);
    assert_eq!(body["game"]["broadcasts"][0], "FOX");
    assert_eq!(body["game"]["odds"].as_array().unwrap().len(), 2);

    let (status, _) = get(addr, "/games/1").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn depth_chart_endpoint_groups_entries() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/core/seasons/2024/teams/12/depthcharts", DEPTH_CHART).await;
    let addr = spawn(ingestor(&server).await).await;

    let (status, body) = get(addr, "/teams/12/depth-chart").await;
    assert_eq!(status, 200);
    assert_eq!(body["groups"]["3WR 1TE"].as_array().unwrap().len(), 4);
    assert_eq!(body["positions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_athlete_is_not_found() {
    let server = mockito::Server::new_async().await;
    let addr = spawn(ingestor(&server).await).await;

    let (status, body) = get(addr, "/athletes/nobody").await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}
