use super::{kickoff, non_empty, score_value, ShapeError};
use crate::espn::{Competitor, Event, League, ScoreboardResponse, SeasonMarker};
use crate::model::{
    Broadcast, CompetitionResult, Game, GameBundle, LeagueInfo, NflWeek, TeamInGame, Venue, NO_PLAY,
    NO_PLAY_DESCRIPTION,
};
use crate::reconcile::infer_outcomes;

/// Season facts the request knew about even when individual events omit them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeasonContext {
    pub season: Option<i32>,
    pub season_type: Option<i32>,
}

impl SeasonContext {
    pub fn from_marker(marker: Option<&SeasonMarker>) -> Self {
        Self {
            season: marker.and_then(|m| m.year),
            season_type: marker.and_then(|m| m.season_type),
        }
    }
}

/// Map one scoreboard or schedule event to a game, its venue, its teams and
/// its broadcasts. Both feeds go through here; the differences between them
/// (where status lives, how logos and scores are shaped) are absorbed below.
pub fn game_bundle(event: &Event, ctx: SeasonContext) -> Result<GameBundle, ShapeError> {
    if event.id.trim().is_empty() {
        return Err(ShapeError::Missing("event id"));
    }
    let competition = event
        .competitions
        .first()
        .ok_or(ShapeError::Missing("competitions"))?;
    let kickoff = kickoff(&event.date)?;

    let status = event.status.as_ref().or(competition.status.as_ref());
    let status_type = status.and_then(|s| s.status_type.as_ref());
    let situation = competition.situation.as_ref();

    let venue = competition.venue.as_ref().and_then(|v| {
        let venue_id = non_empty(v.id.as_deref())?;
        Some(Venue {
            venue_id,
            full_name: v.full_name.clone(),
            city: v.address.as_ref().and_then(|a| a.city.clone()),
            state: v.address.as_ref().and_then(|a| a.state.clone()),
            indoor: v.indoor.unwrap_or(false),
        })
    });

    let game = Game {
        game_id: event.id.clone(),
        name: event.name.clone(),
        date: kickoff.display,
        kickoff_utc: kickoff.utc,
        week: event.week.as_ref().and_then(|w| w.number),
        season: event.season.as_ref().and_then(|s| s.year).or(ctx.season),
        season_type: event
            .season
            .as_ref()
            .and_then(|s| s.season_type)
            .or_else(|| event.season_type.as_ref().and_then(|t| t.number()))
            .or(ctx.season_type),
        venue_id: venue.as_ref().map(|v| v.venue_id.clone()),
        status: status_type
            .and_then(|t| non_empty(t.description.as_deref()))
            .unwrap_or_else(|| "Scheduled".to_string()),
        clock: status.and_then(|s| s.display_clock.clone()),
        period: status.and_then(|s| s.period),
        down: situation
            .and_then(|s| non_empty(s.down_distance_text.as_deref()))
            .unwrap_or_else(|| NO_PLAY.to_string()),
        detailed_text: situation
            .and_then(|s| s.last_play.as_ref())
            .and_then(|p| non_empty(p.text.as_deref()))
            .unwrap_or_else(|| NO_PLAY_DESCRIPTION.to_string()),
    };

    let teams = event
        .competitions
        .iter()
        .flat_map(|c| c.competitors.iter())
        .filter_map(|c| team_in_game(&event.id, c))
        .collect();

    let broadcasts = competition
        .broadcasts
        .iter()
        .flat_map(|b| {
            let market = non_empty(b.market_name())
                .map(|m| m.to_lowercase())
                .unwrap_or_else(|| "national".to_string());
            b.channels().filter_map(move |name| {
                non_empty(Some(name)).map(|channel| Broadcast {
                    game_id: event.id.clone(),
                    market: market.clone(),
                    channel,
                })
            })
        })
        .collect();

    Ok(GameBundle {
        game,
        venue,
        teams,
        broadcasts,
    })
}

fn team_in_game(game_id: &str, competitor: &Competitor) -> Option<TeamInGame> {
    let team = &competitor.team;
    let team_id = non_empty(Some(team.id.as_str())).or_else(|| non_empty(competitor.id.as_deref()))?;

    let logo = non_empty(team.logo.as_deref())
        .or_else(|| team.logos.first().and_then(|l| non_empty(Some(l.href.as_str()))));

    let records = if competitor.records.is_empty() {
        &competitor.record
    } else {
        &competitor.records
    };
    let record = records
        .iter()
        .find(|r| r.record_type.as_deref() == Some("total"))
        .or_else(|| records.first())
        .and_then(|r| non_empty(r.text()));

    Some(TeamInGame {
        team_id,
        game_id: game_id.to_string(),
        team_name: team.display_name.clone(),
        score: score_value(competitor.score.as_ref()),
        home_away: competitor.home_away.clone(),
        abbreviation: team.abbreviation.clone(),
        logo,
        record,
    })
}

/// Both perspectives of a finished or pending game. `None` until the game
/// has exactly two known participants.
pub fn competition_results(bundle: &GameBundle) -> Option<[CompetitionResult; 2]> {
    let [first, second] = bundle.teams.as_slice() else {
        return None;
    };
    let (first_outcome, second_outcome) = infer_outcomes(first.score, second.score);

    let perspective = |team: &TeamInGame, opponent: &TeamInGame, outcome| CompetitionResult {
        game_id: bundle.game.game_id.clone(),
        name: bundle.game.name.clone(),
        week: bundle.game.week,
        competition_date: bundle.game.date.clone(),
        kickoff_utc: bundle.game.kickoff_utc,
        team_id: team.team_id.clone(),
        team_name: team.team_name.clone(),
        team_logo: team.logo.clone(),
        opponent_id: opponent.team_id.clone(),
        opponent_name: opponent.team_name.clone(),
        opponent_logo: opponent.logo.clone(),
        team_score: team.score,
        opponent_score: opponent.score,
        outcome,
    };

    Some([
        perspective(first, second, first_outcome),
        perspective(second, first, second_outcome),
    ])
}

pub fn league_info(league: &League) -> Option<LeagueInfo> {
    let league_id = non_empty(Some(league.id.as_str()))?;
    let season = league.season.as_ref();
    Some(LeagueInfo {
        league_id,
        name: league.name.clone(),
        abbreviation: league.abbreviation.clone(),
        season_year: season.and_then(|s| s.year),
        season_type: season
            .and_then(|s| s.season_type.as_ref())
            .and_then(|t| t.number()),
        season_start: season.and_then(|s| s.start_date.clone()),
        season_end: season.and_then(|s| s.end_date.clone()),
    })
}

/// Current week marker from the scoreboard's top-level `season` and `week`.
pub fn nfl_week(scoreboard: &ScoreboardResponse) -> Option<NflWeek> {
    let season = scoreboard.season.as_ref()?;
    let week = scoreboard.week.as_ref()?;
    let number = week.number?;
    Some(NflWeek {
        season: season.year?,
        season_type: season.season_type?,
        week: number,
        display_week: non_empty(week.text.as_deref()).or_else(|| Some(format!("Week {number}"))),
        season_start_date: scoreboard
            .leagues
            .first()
            .and_then(|l| l.season.as_ref())
            .and_then(|s| s.start_date.clone()),
    })
}
