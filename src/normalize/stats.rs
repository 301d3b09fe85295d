use std::collections::{HashMap, HashSet};

use super::{non_empty, ShapeError};
use crate::espn::{Boxscore, ProjectionsResponse, RecordItem, RecordStat, SplitsResponse};
use crate::model::{
    AthleteSplits, Player, PlayerStat, ProjectedStat, ProjectionGroup, SplitGroup, SplitRow, TeamRecord,
};
use crate::reconcile::dedupe_split_labels;

/// Season record from the `total` item of a team record feed.
pub fn team_record(team_id: &str, items: &[RecordItem]) -> Option<TeamRecord> {
    let total = items.iter().find(|item| item.record_type == "total")?;
    let stats: HashMap<&str, &RecordStat> = total.stats.iter().map(|s| (s.name.as_str(), s)).collect();

    let number = |name: &str| stats.get(name).and_then(|s| s.value);
    let text = |name: &str| {
        stats.get(name).and_then(|s| {
            non_empty(s.display_value.as_deref()).or_else(|| s.value.map(|v| v.to_string()))
        })
    };

    Some(TeamRecord {
        team_id: team_id.to_string(),
        record: total.summary.clone(),
        win_percentage: number("winPercent"),
        avg_points_for: number("avgPointsFor"),
        avg_points_against: number("avgPointsAgainst"),
        points_for: number("pointsFor"),
        points_against: number("pointsAgainst"),
        point_differential: number("pointDifferential"),
        division_record: text("divisionRecord"),
        division_win_percentage: number("divisionWinPercent"),
        games_played: number("gamesPlayed").map(|v| v as i64),
        playoff_seed: number("playoffSeed").map(|v| v as i64),
        streak: text("streak"),
    })
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BoxscoreRows {
    pub players: Vec<Player>,
    pub stats: Vec<PlayerStat>,
}

/// Flatten a box score into players and (category, label) → value rows.
///
/// Only player groups for teams listed in the box score are taken. Labels
/// are zipped against each athlete's stat line; categories without labels
/// fall back to their keys.
pub fn boxscore(game_id: &str, boxscore: &Boxscore) -> BoxscoreRows {
    let teams: HashSet<&str> = boxscore.teams.iter().map(|t| t.team.id.as_str()).collect();
    let mut rows = BoxscoreRows::default();
    let mut seen_players = HashSet::new();

    for group in &boxscore.players {
        let team_id = group.team.id.as_str();
        if team_id.is_empty() || !teams.contains(team_id) {
            continue;
        }

        for category in &group.statistics {
            let keys = if category.labels.is_empty() {
                &category.keys
            } else {
                &category.labels
            };

            for line in &category.athletes {
                let athlete = &line.athlete;
                if athlete.id.is_empty() {
                    continue;
                }

                if seen_players.insert(athlete.id.clone()) {
                    rows.players.push(Player {
                        player_id: athlete.id.clone(),
                        full_name: athlete.display_name.clone(),
                        first_name: athlete.first_name.clone(),
                        last_name: athlete.last_name.clone(),
                        jersey: athlete.jersey.clone(),
                        position: athlete.position.as_ref().and_then(|p| p.abbreviation.clone()),
                        team_id: team_id.to_string(),
                    });
                }

                for (key, value) in keys.iter().zip(&line.stats) {
                    rows.stats.push(PlayerStat {
                        player_id: athlete.id.clone(),
                        game_id: game_id.to_string(),
                        team_id: team_id.to_string(),
                        category: category.name.clone(),
                        stat_key: key.clone(),
                        stat_value: value.clone(),
                        jersey: athlete.jersey.clone(),
                    });
                }
            }
        }
    }

    rows
}

/// Career splits with repeated labels disambiguated.
pub fn athlete_splits(splits: &SplitsResponse) -> Result<AthleteSplits, ShapeError> {
    let categories = splits
        .split_categories
        .as_ref()
        .ok_or(ShapeError::Missing("splitCategories"))?;
    let labels = dedupe_split_labels(&splits.labels);

    let categories = categories
        .iter()
        .map(|category| SplitGroup {
            category: category.name.clone(),
            display_name: category.display_name.clone(),
            rows: category
                .splits
                .iter()
                .map(|line| SplitRow {
                    split: line.display_name.clone(),
                    stats: labels.iter().cloned().zip(line.stats.iter().cloned()).collect(),
                })
                .collect(),
        })
        .collect();

    Ok(AthleteSplits {
        title: splits.display_name.clone(),
        labels,
        categories,
    })
}

/// Season projections, keeping only stats that already carry a rank and a
/// non-zero value.
pub fn projections(response: &ProjectionsResponse) -> Result<Vec<ProjectionGroup>, ShapeError> {
    let splits = response.splits.as_ref().ok_or(ShapeError::Missing("splits"))?;

    Ok(splits
        .categories
        .iter()
        .filter_map(|category| {
            let stats: Vec<ProjectedStat> = category
                .stats
                .iter()
                .filter_map(|stat| {
                    let rank = non_empty(stat.rank_display_value.as_deref())?;
                    let value = stat.value.filter(|v| *v != 0.0)?;
                    Some(ProjectedStat {
                        name: stat.name.clone(),
                        label: stat
                            .display_name
                            .clone()
                            .or_else(|| stat.abbreviation.clone())
                            .unwrap_or_else(|| stat.name.clone()),
                        value,
                        display_value: stat.display_value.clone(),
                        rank,
                    })
                })
                .collect();

            (!stats.is_empty()).then(|| ProjectionGroup {
                category: category.name.clone(),
                display_name: category.display_name.clone(),
                stats,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_total_item_only() {
        let items: Vec<RecordItem> = serde_json::from_str(
            r#"[
                {"type": "home", "summary": "5-3", "stats": []},
                {"type": "total", "summary": "10-7",
                 "stats": [
                    {"name": "winPercent", "value": 0.588},
                    {"name": "pointsFor", "value": 380.0},
                    {"name": "gamesPlayed", "value": 17.0},
                    {"name": "divisionRecord", "value": 3.0, "displayValue": "3-3"},
                    {"name": "streak", "value": 2.0, "displayValue": "W2"}
                 ]}
            ]"#,
        )
        .unwrap();

        let record = team_record("25", &items).unwrap();
        assert_eq!(record.record.as_deref(), Some("10-7"));
        assert_eq!(record.win_percentage, Some(0.588));
        assert_eq!(record.games_played, Some(17));
        assert_eq!(record.division_record.as_deref(), Some("3-3"));
        assert_eq!(record.streak.as_deref(), Some("W2"));
        assert_eq!(record.playoff_seed, None);

        assert!(team_record("25", &items[..1]).is_none());
    }

    #[test]
    fn boxscore_zips_labels_with_stats() {
        let payload: Boxscore = serde_json::from_str(
            r#"{
                "teams": [{"team": {"id": "1"}}],
                "players": [
                  {"team": {"id": "1"}, "statistics": [
                    {"name": "passing", "labels": ["C/ATT", "YDS", "TD"],
                     "athletes": [{"athlete": {"id": "11", "displayName": "Kirk Cousins",
                                               "firstName": "Kirk", "lastName": "Cousins", "jersey": "18"},
                                   "stats": ["16/26", "155", "1"]}]},
                    {"name": "rushing", "keys": ["rushingAttempts", "rushingYards"],
                     "athletes": [{"athlete": {"id": "11"}, "stats": ["2", "5"]}]}
                  ]},
                  {"team": {"id": "99"}, "statistics": [
                    {"name": "passing", "labels": ["C/ATT"],
                     "athletes": [{"athlete": {"id": "77"}, "stats": ["1/1"]}]}
                  ]}
                ]
            }"#,
        )
        .unwrap();

        let rows = boxscore("401", &payload);
        assert_eq!(rows.players.len(), 1);
        assert_eq!(rows.players[0].jersey.as_deref(), Some("18"));
        assert_eq!(rows.stats.len(), 5);
        assert_eq!(rows.stats[1].stat_key, "YDS");
        assert_eq!(rows.stats[1].stat_value, "155");
        assert_eq!(rows.stats[4].stat_key, "rushingYards");
        assert!(rows.stats.iter().all(|s| s.game_id == "401" && s.team_id == "1"));
    }

    #[test]
    fn splits_prefix_repeated_labels() {
        let splits: SplitsResponse = serde_json::from_str(
            r#"{
                "displayName": "2024 Regular Season Splits",
                "labels": ["REC", "YDS", "TD", "CAR", "YDS", "TD"],
                "splitCategories": [{"name": "split", "displayName": "Overall",
                    "splits": [{"displayName": "All Splits", "stats": ["100", "1200", "8", "5", "30", "0"]}]}]
            }"#,
        )
        .unwrap();

        let computed = athlete_splits(&splits).unwrap();
        assert_eq!(computed.labels, ["REC", "YDS", "TD", "CAR", "RUSH_YDS", "RUSH_TD"]);
        let row = &computed.categories[0].rows[0];
        assert_eq!(row.stats[4], ("RUSH_YDS".to_string(), "30".to_string()));
    }

    #[test]
    fn projections_drop_unranked_and_zero_values() {
        let response: ProjectionsResponse = serde_json::from_str(
            r#"{"splits": {"categories": [
                {"name": "passing", "stats": [
                    {"name": "passingYards", "displayName": "Passing Yards", "value": 4100.0, "rankDisplayValue": "3rd"},
                    {"name": "interceptions", "value": 0.0, "rankDisplayValue": "1st"},
                    {"name": "sacks", "value": 30.0, "rankDisplayValue": ""},
                    {"name": "fumbles", "rankDisplayValue": "9th"}
                ]},
                {"name": "kicking", "stats": [{"name": "fieldGoals", "value": 0.0}]}
            ]}}"#,
        )
        .unwrap();

        let groups = projections(&response).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].stats.len(), 1);
        assert_eq!(groups[0].stats[0].label, "Passing Yards");
        assert_eq!(groups[0].stats[0].rank, "3rd");

        let empty: ProjectionsResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(projections(&empty), Err(ShapeError::Missing("splits")));
    }
}
