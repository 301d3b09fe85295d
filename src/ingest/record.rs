use tracing::info;

use super::{missing, Ingestor};
use crate::error::{Refresh, Result};
use crate::espn::RecordResponse;
use crate::normalize::team_record;
use crate::store;

impl Ingestor {
    /// Refresh a team's season record. `Fresh(false)` means the feed had no
    /// `total` record and nothing was written.
    pub async fn refresh_team_record(&self, team_id: &str) -> Result<Refresh<bool>> {
        let url = self.config.team_record_url(team_id);
        Refresh::settle("record refresh", self.store_record(team_id, &url).await)
    }

    async fn store_record(&self, team_id: &str, url: &str) -> Result<bool> {
        let response: RecordResponse = self.client.get_json(url).await?;
        let items = response.items.as_ref().ok_or_else(|| missing(url, "items"))?;

        let Some(record) = team_record(team_id, items) else {
            info!("No total record for team {}", team_id);
            return Ok(false);
        };

        let mut tx = self.store.begin().await?;
        store::upsert_record(&mut *tx, &record).await?;
        tx.commit().await?;

        info!("Stored record {:?} for team {}", record.record, team_id);
        Ok(true)
    }
}
