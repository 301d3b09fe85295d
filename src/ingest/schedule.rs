use tracing::{info, warn};

use super::{missing, write_bundle, Ingestor};
use crate::error::{Refresh, Result};
use crate::espn::ScheduleResponse;
use crate::normalize::{competition_results, game_bundle, SeasonContext};
use crate::store;

impl Ingestor {
    pub async fn refresh_team_schedule(&self, team_id: &str) -> Result<Refresh<usize>> {
        self.refresh_schedule(&self.config.team_schedule_url(team_id)).await
    }

    /// Refresh a schedule feed. Games are stored as on the scoreboard; each
    /// game with exactly two teams also gets a competition result per side.
    /// Returns the number of games stored.
    pub async fn refresh_schedule(&self, url: &str) -> Result<Refresh<usize>> {
        Refresh::settle("schedule refresh", self.store_schedule(url).await)
    }

    async fn store_schedule(&self, url: &str) -> Result<usize> {
        let schedule: ScheduleResponse = self.client.get_json(url).await?;
        let events = schedule.events.as_ref().ok_or_else(|| missing(url, "events"))?;
        let marker = schedule.requested_season.as_ref().or(schedule.season.as_ref());
        let ctx = SeasonContext::from_marker(marker);

        let mut tx = self.store.begin().await?;
        let mut stored = 0;
        let mut results = 0;

        for event in events {
            let bundle = match game_bundle(event, ctx) {
                Ok(bundle) => bundle,
                Err(e) => {
                    warn!("Skipping schedule event {:?}: {}", event.id, e);
                    continue;
                }
            };
            write_bundle(&mut *tx, &bundle).await?;
            stored += 1;

            let sides = competition_results(&bundle);
            if sides.is_none() {
                warn!(
                    "Game {} has {} teams; no competition result stored",
                    bundle.game.game_id,
                    bundle.teams.len()
                );
            }
            let sides = sides.as_ref().map(|s| s.as_slice()).unwrap_or_default();
            store::replace_competition_results(&mut *tx, &bundle.game.game_id, sides).await?;
            if !sides.is_empty() {
                results += 1;
            }
        }

        tx.commit().await?;
        info!(
            "Schedule refresh stored {} games ({} with results) from {}",
            stored, results, url
        );
        Ok(stored)
    }
}
