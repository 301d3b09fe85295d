use tracing::info;

use super::{missing, Ingestor};
use crate::error::{Refresh, Result};
use crate::espn::BoxscoreResponse;
use crate::normalize::{boxscore, query_param};
use crate::store;

impl Ingestor {
    pub async fn refresh_game_boxscore(&self, game_id: &str) -> Result<Refresh<usize>> {
        self.refresh_boxscore(&self.config.boxscore_url(game_id)).await
    }

    /// Refresh player stats from a box score URL. The game id comes from the
    /// payload, or from the URL's `gameId` parameter when the payload omits
    /// it. Returns the number of stat rows written.
    pub async fn refresh_boxscore(&self, url: &str) -> Result<Refresh<usize>> {
        Refresh::settle("box score refresh", self.store_boxscore(url).await)
    }

    async fn store_boxscore(&self, url: &str) -> Result<usize> {
        let response: BoxscoreResponse = self.client.get_json(url).await?;
        let package = response
            .gamepackage
            .as_ref()
            .ok_or_else(|| missing(url, "gamepackageJSON"))?;
        let box_score = package.boxscore.as_ref().ok_or_else(|| missing(url, "boxscore"))?;

        let game_id = package
            .game
            .as_ref()
            .and_then(|g| g.id.clone())
            .filter(|id| !id.trim().is_empty())
            .or_else(|| query_param(url, "gameId"))
            .ok_or_else(|| missing(url, "gameId"))?;

        let rows = boxscore(&game_id, box_score);

        let mut tx = self.store.begin().await?;
        for player in &rows.players {
            store::upsert_player(&mut *tx, player).await?;
        }
        for stat in &rows.stats {
            store::upsert_player_stat(&mut *tx, stat).await?;
        }
        tx.commit().await?;

        info!(
            "Box score for game {}: {} players, {} stat rows",
            game_id,
            rows.players.len(),
            rows.stats.len()
        );
        Ok(rows.stats.len())
    }
}
