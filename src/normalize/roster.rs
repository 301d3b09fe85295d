use std::collections::HashSet;

use super::{non_empty, ref_id, ShapeError};
use crate::espn::{AthleteProfile, DepthChartGroup};
use crate::model::{Athlete, DepthChartEntry};

/// Flatten a depth chart snapshot into one row per occupied slot.
///
/// Missing slot or rank numbers fall back to the athlete's position in the
/// list. Rows that would collide on the table key keep the first occurrence.
pub fn depth_chart(team_id: &str, season: i32, groups: &[DepthChartGroup]) -> Vec<DepthChartEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for group in groups {
        let position_group = non_empty(Some(group.name.as_str()))
            .or_else(|| non_empty(group.id.as_deref()))
            .unwrap_or_else(|| "depth".to_string());

        for (key, position) in &group.positions {
            let abbreviation = non_empty(position.position.abbreviation.as_deref())
                .unwrap_or_else(|| key.to_uppercase());
            let position_name = position
                .position
                .display_name
                .clone()
                .or_else(|| position.position.name.clone());

            for (index, slot) in position.athletes.iter().enumerate() {
                let fallback = index as i32 + 1;
                let slot_number = slot.slot.unwrap_or(fallback);
                let rank = slot.rank.unwrap_or(fallback);

                if !seen.insert((position_group.clone(), abbreviation.clone(), slot_number, rank)) {
                    continue;
                }

                let athlete_ref = slot.athlete.as_ref().and_then(|r| non_empty(Some(r.href.as_str())));
                entries.push(DepthChartEntry {
                    team_id: team_id.to_string(),
                    season,
                    position_group: position_group.clone(),
                    position_abbreviation: abbreviation.clone(),
                    position_name: position_name.clone(),
                    slot: slot_number,
                    rank,
                    athlete_id: athlete_ref.as_deref().and_then(ref_id),
                    athlete_ref,
                });
            }
        }
    }

    entries
}

pub fn athlete(profile: &AthleteProfile) -> Result<Athlete, ShapeError> {
    let athlete_id = non_empty(Some(profile.id.as_str())).ok_or(ShapeError::Missing("athlete id"))?;
    let slug = non_empty(Some(profile.slug.as_str())).ok_or(ShapeError::Missing("athlete slug"))?;
    let position = profile.position.as_ref();

    Ok(Athlete {
        athlete_id,
        slug,
        team_id: profile.team.as_ref().and_then(|t| ref_id(&t.href)),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        full_name: profile.full_name.clone(),
        display_name: profile.display_name.clone(),
        jersey: profile.jersey.clone(),
        position: position.and_then(|p| p.abbreviation.clone()),
        position_name: position.and_then(|p| p.display_name.clone().or_else(|| p.name.clone())),
        height: profile.display_height.clone(),
        weight: profile.display_weight.clone(),
        age: profile.age,
        date_of_birth: profile.date_of_birth.clone(),
        experience: profile.experience.as_ref().and_then(|e| e.years),
        active: profile.active.unwrap_or(false),
        status: profile.status.as_ref().and_then(|s| s.name.clone()),
        headshot: profile.headshot.as_ref().and_then(|h| h.href.clone()),
        statistics_ref: profile.statistics.as_ref().map(|r| r.href.clone()),
        projections_ref: profile.projections.as_ref().map(|r| r.href.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_chart_flattens_positions() {
        let groups: Vec<DepthChartGroup> = serde_json::from_str(
            r#"[{"id": "1", "name": "3WR 1TE", "positions": {
                "qb": {"position": {"abbreviation": "QB", "displayName": "Quarterback"},
                       "athletes": [
                         {"slot": 1, "rank": 1, "athlete": {"$ref": "http://x/athletes/3139477?lang=en"}},
                         {"slot": 1, "rank": 2, "athlete": {"$ref": "http://x/athletes/4241479?lang=en"}}]},
                "wr": {"position": {},
                       "athletes": [{"athlete": {"$ref": "http://x/athletes/15?lang=en"}},
                                    {"athlete": {"$ref": "http://x/athletes/16?lang=en"}}]}
            }}]"#,
        )
        .unwrap();

        let rows = depth_chart("12", 2024, &groups);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].position_abbreviation, "QB");
        assert_eq!(rows[1].athlete_id.as_deref(), Some("4241479"));
        assert_eq!(rows[2].position_abbreviation, "WR");
        assert_eq!((rows[3].slot, rows[3].rank), (2, 2));
        assert!(rows.iter().all(|r| r.position_group == "3WR 1TE"));
    }

    #[test]
    fn athlete_requires_id_and_slug() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"id": "3139477", "slug": "patrick-mahomes", "displayName": "Patrick Mahomes",
                "displayHeight": "6' 2\"", "displayWeight": "225 lbs", "age": 29, "active": true,
                "position": {"abbreviation": "QB", "displayName": "Quarterback"},
                "experience": {"years": 8}, "status": {"name": "Active"},
                "team": {"$ref": "http://x/teams/12?lang=en"}}"#,
        )
        .unwrap();
        let athlete = athlete(&profile).unwrap();
        assert_eq!(athlete.team_id.as_deref(), Some("12"));
        assert_eq!(athlete.position.as_deref(), Some("QB"));
        assert_eq!(athlete.experience, Some(8));

        let nameless: AthleteProfile = serde_json::from_str(r#"{"id": "1"}"#).unwrap();
        assert_eq!(super::athlete(&nameless), Err(ShapeError::Missing("athlete slug")));
    }
}
