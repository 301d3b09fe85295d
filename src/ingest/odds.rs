use tracing::{info, warn};

use super::{missing, Ingestor};
use crate::error::{Refresh, Result};
use crate::espn::OddsResponse;
use crate::normalize::odds_quote;
use crate::reconcile::resolve_team_id;
use crate::store;

impl Ingestor {
    pub async fn refresh_odds(&self, game_id: &str) -> Result<Refresh<usize>> {
        self.refresh_odds_url(&self.config.odds_url(game_id)).await
    }

    /// Refresh every provider's quote for a game. Team sides whose team
    /// can't be matched to a stored team are skipped; the game-level quote
    /// is kept. Returns the number of quotes stored.
    pub async fn refresh_odds_url(&self, url: &str) -> Result<Refresh<usize>> {
        Refresh::settle("odds refresh", self.store_odds(url).await)
    }

    async fn store_odds(&self, url: &str) -> Result<usize> {
        let response: OddsResponse = self.client.get_json(url).await?;
        let items = response.items.as_ref().ok_or_else(|| missing(url, "items"))?;

        let mut tx = self.store.begin().await?;
        let mut stored = 0;

        for item in items {
            let quote = match odds_quote(item) {
                Ok(quote) => quote,
                Err(e) => {
                    warn!("Skipping odds item {:?}: {}", item.href, e);
                    continue;
                }
            };

            store::upsert_odds_provider(&mut *tx, &quote.provider).await?;
            store::upsert_odds(&mut *tx, &quote.odds).await?;

            for side in &quote.sides {
                let resolved = resolve_team_id(&mut *tx, &side.team_id, side.abbreviation.as_deref()).await?;
                let Some(team_id) = resolved else {
                    warn!(
                        "No stored team matches {} ({:?}) for game {}; skipping {} odds",
                        side.team_id, side.abbreviation, side.game_id, side.home_away
                    );
                    continue;
                };

                let mut side = side.clone();
                side.team_id = team_id;
                store::upsert_team_odds(&mut *tx, &side).await?;
            }
            stored += 1;
        }

        tx.commit().await?;
        info!("Stored {} odds quotes from {}", stored, url);
        Ok(stored)
    }
}
