//! Fetch-and-persist operations.
//!
//! Every operation issues its GET, normalizes what came back and writes it
//! through a single transaction. Upstream failures come back as a stale
//! [`Refresh`](crate::error::Refresh) with nothing written; elements that
//! don't normalize are logged and skipped.

mod athletes;
mod boxscore;
mod depth_chart;
mod odds;
mod record;
mod schedule;
mod scoreboard;

pub use athletes::BatchReport;

use sqlx::SqliteConnection;

use crate::client::EspnClient;
use crate::config::Config;
use crate::error::IngestError;
use crate::model::GameBundle;
use crate::store::{self, Store};

pub struct Ingestor {
    client: EspnClient,
    store: Store,
    config: Config,
}

impl Ingestor {
    pub fn new(config: Config, store: Store) -> anyhow::Result<Self> {
        let client = EspnClient::new(&config)?;
        Ok(Self {
            client,
            store,
            config,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn missing(url: &str, key: &'static str) -> IngestError {
    IngestError::MissingKey {
        url: url.to_string(),
        key,
    }
}

/// Venue first, then the game, then everything hanging off it.
async fn write_bundle(conn: &mut SqliteConnection, bundle: &GameBundle) -> sqlx::Result<()> {
    if let Some(venue) = &bundle.venue {
        store::upsert_venue(&mut *conn, venue).await?;
    }
    store::upsert_game(&mut *conn, &bundle.game).await?;
    store::replace_teams_in_game(&mut *conn, &bundle.game.game_id, &bundle.teams).await?;
    store::replace_broadcasts(&mut *conn, &bundle.game.game_id, &bundle.broadcasts).await?;
    Ok(())
}
