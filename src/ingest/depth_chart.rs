use tracing::info;

use super::{missing, Ingestor};
use crate::error::{Refresh, Result};
use crate::espn::DepthChartResponse;
use crate::normalize::depth_chart;
use crate::store;

impl Ingestor {
    /// Replace a team's depth chart with the current snapshot. Slots absent
    /// from the new snapshot are gone afterwards. Returns the entry count.
    pub async fn refresh_depth_chart(&self, team_id: &str) -> Result<Refresh<usize>> {
        let url = self.config.depth_chart_url(team_id);
        Refresh::settle("depth chart refresh", self.store_depth_chart(team_id, &url).await)
    }

    async fn store_depth_chart(&self, team_id: &str, url: &str) -> Result<usize> {
        let response: DepthChartResponse = self.client.get_json(url).await?;
        let groups = response.items.as_ref().ok_or_else(|| missing(url, "items"))?;
        let entries = depth_chart(team_id, self.config.season, groups);

        let mut tx = self.store.begin().await?;
        store::replace_depth_chart(&mut *tx, team_id, &entries).await?;
        tx.commit().await?;

        info!("Depth chart for team {}: {} entries", team_id, entries.len());
        Ok(entries.len())
    }
}
