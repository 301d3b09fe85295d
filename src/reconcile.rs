//! Reconciliation helpers: outcome inference, team id fallback, label and
//! depth chart de-duplication.

use std::collections::{BTreeMap, HashMap, HashSet};

use sqlx::SqliteConnection;

use crate::model::{DepthChartEntry, GameOutcome};

/// Outcome for each side of a score pair.
///
/// 0–0 is `Pending`. Equal non-zero scores are a tie for both sides.
pub fn infer_outcomes(first: i64, second: i64) -> (GameOutcome, GameOutcome) {
    use std::cmp::Ordering;

    if first == 0 && second == 0 {
        return (GameOutcome::Pending, GameOutcome::Pending);
    }
    match first.cmp(&second) {
        Ordering::Greater => (GameOutcome::Win, GameOutcome::Loss),
        Ordering::Less => (GameOutcome::Loss, GameOutcome::Win),
        Ordering::Equal => (GameOutcome::Tie, GameOutcome::Tie),
    }
}

/// Resolve the store's id for a team referenced by an external payload.
///
/// The literal id wins when `teams` knows it; otherwise the abbreviation is
/// tried. `None` means neither matched.
pub async fn resolve_team_id(
    conn: &mut SqliteConnection,
    team_id: &str,
    abbreviation: Option<&str>,
) -> sqlx::Result<Option<String>> {
    let by_id: Option<(String,)> = sqlx::query_as("SELECT team_id FROM teams WHERE team_id = ? LIMIT 1")
        .bind(team_id)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some((id,)) = by_id {
        return Ok(Some(id));
    }

    let Some(abbreviation) = abbreviation.filter(|a| !a.trim().is_empty()) else {
        return Ok(None);
    };
    let by_abbreviation: Option<(String,)> =
        sqlx::query_as("SELECT team_id FROM teams WHERE abbreviation = ? LIMIT 1")
            .bind(abbreviation)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(by_abbreviation.map(|(id,)| id))
}

/// Prefix given to repeated split labels, chosen from the layout's first
/// label: rushing-first layouts repeat receiving columns, everything else
/// repeats rushing columns.
fn repeat_prefix(labels: &[String]) -> &'static str {
    match labels.first() {
        Some(first) if first.to_uppercase().starts_with("CAR") => "REC",
        _ => "RUSH",
    }
}

/// First occurrence of a label stays bare; later ones get `PREFIX_label`.
pub fn dedupe_split_labels(labels: &[String]) -> Vec<String> {
    let prefix = repeat_prefix(labels);
    let mut seen = HashSet::new();

    labels
        .iter()
        .map(|label| {
            if seen.insert(label.as_str()) {
                label.clone()
            } else {
                format!("{prefix}_{label}")
            }
        })
        .collect()
}

/// One entry per (position abbreviation, rank); the first one seen wins.
pub fn dedupe_depth_chart(entries: &[DepthChartEntry]) -> Vec<DepthChartEntry> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| seen.insert((e.position_abbreviation.as_str(), e.rank)))
        .cloned()
        .collect()
}

/// Every entry grouped under its position group, in input order.
pub fn group_depth_chart(entries: &[DepthChartEntry]) -> BTreeMap<String, Vec<DepthChartEntry>> {
    let mut groups: BTreeMap<String, Vec<DepthChartEntry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(entry.position_group.clone())
            .or_default()
            .push(entry.clone());
    }
    groups
}

/// Athlete refs in a depth chart, one per athlete.
pub fn athlete_refs(entries: &[DepthChartEntry]) -> Vec<String> {
    let mut by_id: HashMap<&str, &str> = HashMap::new();
    let mut refs = Vec::new();
    for entry in entries {
        let (Some(id), Some(href)) = (entry.athlete_id.as_deref(), entry.athlete_ref.as_deref()) else {
            continue;
        };
        if by_id.insert(id, href).is_none() {
            refs.push(href.to_string());
        }
    }
    refs
}
