use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use super::{missing, Ingestor};
use crate::error::{IngestError, Refresh, Result};
use crate::espn::{AthleteProfile, ProjectionsResponse, SplitsResponse};
use crate::model::{Athlete, AthleteSplits, ProjectionGroup};
use crate::normalize::{self, ShapeError};
use crate::reconcile::athlete_refs;
use crate::store;

/// Outcome of a batch athlete refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub requested: usize,
    pub stored: usize,
    /// URLs that failed to fetch, decode or normalize.
    pub failed: Vec<String>,
}

fn shape(url: &str, err: ShapeError) -> IngestError {
    match err {
        ShapeError::Missing(key) => missing(url, key),
        ShapeError::Timestamp(_) => missing(url, "timestamp"),
    }
}

impl Ingestor {
    /// Refresh one athlete profile from its core API URL. Returns the slug.
    pub async fn refresh_athlete(&self, url: &str) -> Result<Refresh<String>> {
        Refresh::settle("athlete refresh", self.store_athlete(url).await)
    }

    async fn store_athlete(&self, url: &str) -> Result<String> {
        let athlete = self.fetch_athlete(url).await?;

        let mut tx = self.store.begin().await?;
        store::upsert_athlete(&mut *tx, &athlete).await?;
        tx.commit().await?;

        info!("Stored athlete {} ({})", athlete.slug, athlete.athlete_id);
        Ok(athlete.slug)
    }

    async fn fetch_athlete(&self, url: &str) -> Result<Athlete> {
        let profile: AthleteProfile = self.client.get_json(url).await?;
        normalize::athlete(&profile).map_err(|e| shape(url, e))
    }

    /// Fetch many athlete profiles with at most `fetch_concurrency` requests
    /// in flight, then store every one that came back usable in a single
    /// transaction. A failed URL is reported, never fatal.
    pub async fn refresh_athletes(&self, urls: &[String]) -> Result<BatchReport> {
        let fetched: Vec<(String, Result<Athlete>)> = stream::iter(urls.iter().cloned())
            .map(|url| async move {
                let result = self.fetch_athlete(&url).await;
                (url, result)
            })
            .buffer_unordered(self.config.fetch_concurrency)
            .collect()
            .await;

        let mut report = BatchReport {
            requested: urls.len(),
            ..BatchReport::default()
        };
        let mut athletes = Vec::with_capacity(fetched.len());
        for (url, result) in fetched {
            match result {
                Ok(athlete) => athletes.push(athlete),
                Err(e) => {
                    warn!("Athlete fetch failed for {}: {}", url, e);
                    report.failed.push(url);
                }
            }
        }

        let mut tx = self.store.begin().await?;
        for athlete in &athletes {
            store::upsert_athlete(&mut *tx, athlete).await?;
        }
        tx.commit().await?;

        report.stored = athletes.len();
        info!(
            "Athlete batch: {} requested, {} stored, {} failed",
            report.requested,
            report.stored,
            report.failed.len()
        );
        Ok(report)
    }

    /// Refresh every athlete listed in the team's stored depth chart.
    pub async fn refresh_team_athletes(&self, team_id: &str) -> Result<BatchReport> {
        let entries = self.store.depth_chart(team_id).await?;
        let urls = athlete_refs(&entries);
        if urls.is_empty() {
            info!("No depth chart athletes stored for team {}", team_id);
        }
        self.refresh_athletes(&urls).await
    }

    /// Career splits, computed from the feed and not stored.
    pub async fn fetch_athlete_splits(&self, athlete_id: &str) -> Result<Refresh<AthleteSplits>> {
        let url = self.config.athlete_splits_url(athlete_id);
        Refresh::settle("splits fetch", self.splits(&url).await)
    }

    async fn splits(&self, url: &str) -> Result<AthleteSplits> {
        let response: SplitsResponse = self.client.get_json(url).await?;
        normalize::athlete_splits(&response).map_err(|e| shape(url, e))
    }

    /// Season projections, computed from the feed and not stored.
    pub async fn fetch_athlete_projections(&self, athlete_id: &str) -> Result<Refresh<Vec<ProjectionGroup>>> {
        let url = self.config.athlete_projections_url(athlete_id);
        Refresh::settle("projections fetch", self.projections(&url).await)
    }

    async fn projections(&self, url: &str) -> Result<Vec<ProjectionGroup>> {
        let response: ProjectionsResponse = self.client.get_json(url).await?;
        normalize::projections(&response).map_err(|e| shape(url, e))
    }
}
