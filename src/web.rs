//! Read surface: refresh from ESPN, then answer from the store.
//!
//! A failed refresh never fails the request. The response says `stale: true`
//! and carries the refresh outcome, and the body holds whatever the store
//! already had.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::error;

use crate::error::{IngestError, Refresh};
use crate::ingest::Ingestor;
use crate::reconcile::{dedupe_depth_chart, group_depth_chart};

#[derive(Clone)]
pub struct HealthState {
    pub last_refresh_time: Arc<RwLock<Option<DateTime<Utc>>>>,
    pub last_outcome: Arc<RwLock<Option<&'static str>>>,
    pub consecutive_failures: Arc<RwLock<usize>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            last_refresh_time: Arc::new(RwLock::new(None)),
            last_outcome: Arc::new(RwLock::new(None)),
            consecutive_failures: Arc::new(RwLock::new(0)),
        }
    }

    pub async fn record<T>(&self, refresh: &Refresh<T>) {
        *self.last_refresh_time.write().await = Some(Utc::now());
        *self.last_outcome.write().await = Some(refresh.label());
        if refresh.is_fresh() {
            *self.consecutive_failures.write().await = 0;
        } else {
            *self.consecutive_failures.write().await += 1;
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
    pub health: HealthState,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/games", get(games_handler))
        .route("/games/:game_id", get(game_handler))
        .route("/teams/:team_id", get(team_handler))
        .route("/teams/:team_id/depth-chart", get(depth_chart_handler))
        .route("/athletes/:slug", get(athlete_handler))
        .with_state(state)
}

/// Store failures surface as 500s; everything upstream was already folded
/// into a stale refresh.
pub struct ApiError(IngestError);

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        ApiError(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError(IngestError::Store(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), ApiError>;

fn outcome<T>(refresh: &Refresh<T>) -> Value {
    json!({
        "outcome": refresh.label(),
        "reason": refresh.reason(),
    })
}

fn not_found(what: &str, id: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} {} not found", what, id) })),
    )
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let health = &state.health;
    let last_refresh = health.last_refresh_time.read().await;
    let last_outcome = health.last_outcome.read().await;
    let failures = health.consecutive_failures.read().await;

    let status = if *failures > 5 { "degraded" } else { "ok" };

    (
        StatusCode::OK,
        Json(json!({
            "service": "nfl-ingestion",
            "version": env!("CARGO_PKG_VERSION"),
            "status": status,
            "last_refresh": last_refresh.map(|t| t.to_rfc3339()),
            "last_outcome": *last_outcome,
            "consecutive_failures": *failures
        })),
    )
}

async fn games_handler(State(state): State<AppState>) -> Reply {
    let refresh = state.ingestor.refresh_scoreboard().await?;
    state.health.record(&refresh).await;

    let games = state.ingestor.store().schedule().await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "stale": refresh.is_stale(),
            "refresh": outcome(&refresh),
            "games": games,
        })),
    ))
}

async fn game_handler(State(state): State<AppState>, Path(game_id): Path<String>) -> Reply {
    let scoreboard = state.ingestor.refresh_scoreboard().await?;
    state.health.record(&scoreboard).await;
    let odds = state.ingestor.refresh_odds(&game_id).await?;

    let Some(detail) = state.ingestor.store().game_detail(&game_id).await? else {
        return Ok(not_found("game", &game_id));
    };

    Ok((
        StatusCode::OK,
        Json(json!({
            "stale": scoreboard.is_stale() || odds.is_stale(),
            "refresh": { "scoreboard": outcome(&scoreboard), "odds": outcome(&odds) },
            "game": detail,
        })),
    ))
}

async fn team_handler(State(state): State<AppState>, Path(team_id): Path<String>) -> Reply {
    let schedule = state.ingestor.refresh_team_schedule(&team_id).await?;
    state.health.record(&schedule).await;
    let record = state.ingestor.refresh_team_record(&team_id).await?;

    let store = state.ingestor.store();
    let Some(team) = store.team_summary(&team_id).await? else {
        return Ok(not_found("team", &team_id));
    };
    let season_record = store.team_record(&team_id).await?;
    let games = store.team_schedule(&team_id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "stale": schedule.is_stale() || record.is_stale(),
            "refresh": { "schedule": outcome(&schedule), "record": outcome(&record) },
            "team": team,
            "record": season_record,
            "schedule": games,
        })),
    ))
}

async fn depth_chart_handler(State(state): State<AppState>, Path(team_id): Path<String>) -> Reply {
    let refresh = state.ingestor.refresh_depth_chart(&team_id).await?;
    state.health.record(&refresh).await;

    let entries = state.ingestor.store().depth_chart(&team_id).await?;
    if entries.is_empty() {
        return Ok(not_found("depth chart for team", &team_id));
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "stale": refresh.is_stale(),
            "refresh": outcome(&refresh),
            "groups": group_depth_chart(&entries),
            "positions": dedupe_depth_chart(&entries),
        })),
    ))
}

async fn athlete_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Reply {
    let Some(athlete) = state.ingestor.store().athlete_by_slug(&slug).await? else {
        return Ok(not_found("athlete", &slug));
    };

    let splits = state.ingestor.fetch_athlete_splits(&athlete.athlete_id).await?;
    let projections = state.ingestor.fetch_athlete_projections(&athlete.athlete_id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "stale": splits.is_stale() || projections.is_stale(),
            "refresh": { "splits": outcome(&splits), "projections": outcome(&projections) },
            "athlete": athlete,
            "splits": splits.as_fresh(),
            "projections": projections.as_fresh(),
        })),
    ))
}
