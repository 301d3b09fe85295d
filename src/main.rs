//! NFL Ingestion Service
//!
//! Refreshes ESPN scoreboard, schedule, roster and odds data into SQLite and
//! serves the stored views over HTTP.

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use nfl_ingestion::web::{self, AppState, HealthState};
use nfl_ingestion::{Config, Ingestor, Refresh, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nfl_ingestion=info".parse().context("Invalid log directive")?),
        )
        .init();

    info!("NFL Ingestion Service v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let http_port = config.http_port;
    let run_once = config.run_once;

    if let Some(dir) = sqlite_parent_dir(&config.database_url) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir))?;
    }

    let store = Store::connect(&config.database_url, 5)
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;
    if config.apply_schema {
        store.apply_schema().await.context("Failed to apply schema")?;
        info!("Schema applied");
    }

    let ingestor = Arc::new(Ingestor::new(config, store)?);

    // Check if running in one-shot mode
    if run_once {
        info!("Running in one-shot mode (RUN_ONCE=true)");
        return match ingestor.refresh_scoreboard().await {
            Ok(Refresh::Fresh(count)) => {
                info!("One-shot refresh completed: {} games stored", count);
                Ok(())
            }
            Ok(stale) => {
                error!("One-shot refresh was stale: {}", stale.reason().unwrap_or("unknown"));
                Err(anyhow::anyhow!("scoreboard refresh failed: {}", stale.label()))
            }
            Err(e) => {
                error!("One-shot refresh failed: {:?}", e);
                Err(e.into())
            }
        };
    }

    let app = web::router(AppState {
        ingestor,
        health: HealthState::new(),
    });

    let addr = format!("0.0.0.0:{}", http_port);
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Handle shutdown gracefully
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!("Server error: {:?}", e);
            }
        }
        _ = ctrl_c => {
            info!("Shutting down...");
        }
    }

    Ok(())
}

/// Directory part of a file-backed `sqlite://` URL, if it has one.
fn sqlite_parent_dir(url: &str) -> Option<&str> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    path.rsplit_once('/').map(|(dir, _)| dir).filter(|dir| !dir.is_empty())
}
