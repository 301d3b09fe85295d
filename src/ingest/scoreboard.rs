use tracing::{info, warn};

use super::{missing, write_bundle, Ingestor};
use crate::error::{Refresh, Result};
use crate::espn::ScoreboardResponse;
use crate::normalize::{game_bundle, league_info, nfl_week, SeasonContext};
use crate::store;

impl Ingestor {
    /// Refresh today's scoreboard: games, venues, teams, broadcasts and the
    /// league/week markers. Returns the number of games stored.
    pub async fn refresh_scoreboard(&self) -> Result<Refresh<usize>> {
        let url = self.config.scoreboard_url();
        Refresh::settle("scoreboard refresh", self.store_scoreboard(&url).await)
    }

    async fn store_scoreboard(&self, url: &str) -> Result<usize> {
        let scoreboard: ScoreboardResponse = self.client.get_json(url).await?;
        let events = scoreboard.events.as_ref().ok_or_else(|| missing(url, "events"))?;
        let ctx = SeasonContext::from_marker(scoreboard.season.as_ref());

        let mut tx = self.store.begin().await?;

        if let Some(league) = scoreboard.leagues.first().and_then(league_info) {
            store::upsert_league(&mut *tx, &league).await?;
        }
        if let Some(week) = nfl_week(&scoreboard) {
            store::upsert_week(&mut *tx, &week).await?;
        }

        let mut stored = 0;
        for event in events {
            let bundle = match game_bundle(event, ctx) {
                Ok(bundle) => bundle,
                Err(e) => {
                    warn!("Skipping scoreboard event {:?}: {}", event.id, e);
                    continue;
                }
            };
            write_bundle(&mut *tx, &bundle).await?;
            stored += 1;
        }

        tx.commit().await?;
        info!("Scoreboard refresh stored {} of {} games", stored, events.len());
        Ok(stored)
    }
}
