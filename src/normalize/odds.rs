use super::{non_empty, ref_id, ref_segment, ShapeError};
use crate::espn::{OddsItem, TeamOdds as WireTeamOdds};
use crate::model::{Odds, OddsProvider, TeamOdds};

/// One provider's quote split into its game-level and team-level rows.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsQuote {
    pub provider: OddsProvider,
    pub odds: Odds,
    pub sides: Vec<TeamOdds>,
}

/// The game id is read from the quote's own `$ref`
/// (`.../events/{id}/competitions/{id}/odds/{provider}`).
pub fn odds_quote(item: &OddsItem) -> Result<OddsQuote, ShapeError> {
    let game_id = ref_segment(&item.href, 2).ok_or(ShapeError::Missing("odds $ref"))?;
    let provider_id =
        non_empty(Some(item.provider.id.as_str())).ok_or(ShapeError::Missing("odds provider id"))?;

    let provider = OddsProvider {
        provider_id: provider_id.clone(),
        name: item.provider.name.clone(),
        priority: item.provider.priority.unwrap_or(1),
    };

    let odds = Odds {
        game_id: game_id.clone(),
        provider_id: provider_id.clone(),
        details: non_empty(item.details.as_deref()).unwrap_or_else(|| "N/A".to_string()),
        over_under: item.over_under,
        spread: item.spread,
        over_odds: item.over_odds.map(american),
        under_odds: item.under_odds.map(american),
        moneyline_winner: item.moneyline_winner.unwrap_or(false),
        spread_winner: item.spread_winner.unwrap_or(false),
    };

    let sides = [("home", &item.home_team_odds), ("away", &item.away_team_odds)]
        .into_iter()
        .filter_map(|(home_away, side)| team_side(&game_id, &provider_id, home_away, side.as_ref()?))
        .collect();

    Ok(OddsQuote {
        provider,
        odds,
        sides,
    })
}

fn team_side(game_id: &str, provider_id: &str, home_away: &str, side: &WireTeamOdds) -> Option<TeamOdds> {
    let team = side.team.as_ref()?;
    let team_id = non_empty(team.id.as_deref()).or_else(|| team.href.as_deref().and_then(ref_id))?;

    Some(TeamOdds {
        game_id: game_id.to_string(),
        provider_id: provider_id.to_string(),
        team_id,
        abbreviation: non_empty(team.abbreviation.as_deref()),
        home_away: home_away.to_string(),
        favorite: side.favorite.unwrap_or(false),
        underdog: side.underdog.unwrap_or(false),
        moneyline: side.money_line.map(american),
        spread_odds: side.spread_odds.map(american),
        point_spread: side
            .current
            .as_ref()
            .and_then(|c| c.point_spread.as_ref())
            .and_then(|p| non_empty(p.alternate_display_value.as_deref())),
    })
}

/// American odds arrive as floats (`-110.0`); stored as whole numbers.
fn american(price: f64) -> i64 {
    price.round() as i64
}
