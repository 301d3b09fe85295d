mod common;

use common::*;
use mockito::Matcher;
use nfl_ingestion::{IngestError, Refresh};
use tokio_test::assert_ok;

#[tokio::test]
async fn scoreboard_refresh_is_idempotent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/site/scoreboard")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SCOREBOARD)
        .expect(2)
        .create_async()
        .await;
    let ingestor = ingestor(&server).await;

    let first = assert_ok!(ingestor.refresh_scoreboard().await);
    // The event with an unparseable date is skipped.
    assert_eq!(first, Refresh::Fresh(3));
    let after_first = ingestor.store().row_counts().await.unwrap();

    let second = assert_ok!(ingestor.refresh_scoreboard().await);
    assert_eq!(second, Refresh::Fresh(3));
    let after_second = ingestor.store().row_counts().await.unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second["games"], 3);
    assert_eq!(after_second["teams"], 5);
    assert_eq!(after_second["venues"], 2);
    assert_eq!(after_second["broadcasts"], 3);
    assert_eq!(after_second["leagueInfo"], 1);
    assert_eq!(after_second["nflWeek"], 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn combined_schedule_only_shows_complete_games_in_kickoff_order() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/site/scoreboard", SCOREBOARD).await;
    let ingestor = ingestor(&server).await;

    assert_ok!(ingestor.refresh_scoreboard().await);
    let games = ingestor.store().schedule().await.unwrap();

    let ids: Vec<_> = games.iter().map(|g| g.game_id.as_str()).collect();
    assert_eq!(ids, ["401671800", "401671789"]);

    let live = &games[1];
    assert_eq!(live.date, "09/08/2024 @ 01:00 PM");
    assert_eq!(live.home_abbreviation.as_deref(), Some("ATL"));
    assert_eq!((live.home_score, live.away_score), (10, 15));
    assert_eq!(live.down, "2nd & 7 at PIT 41");

    let thursday = &games[0];
    assert_eq!(thursday.date, "09/05/2024 @ 08:20 PM");
    assert_eq!(thursday.status, "Final");
}

#[tokio::test]
async fn upstream_failures_leave_the_store_untouched() {
    let mut server = mockito::Server::new_async().await;
    let ok = serve_json(&mut server, "/site/scoreboard", SCOREBOARD).await;
    let ingestor = ingestor(&server).await;

    assert_ok!(ingestor.refresh_scoreboard().await);
    let before = ingestor.store().row_counts().await.unwrap();
    ok.remove_async().await;

    let unavailable = serve_status(&mut server, "/site/scoreboard", 503).await;
    let refresh = assert_ok!(ingestor.refresh_scoreboard().await);
    assert!(matches!(refresh, Refresh::Transient(_)));
    assert_eq!(refresh.label(), "transient_failure");
    unavailable.remove_async().await;

    let not_found = serve_status(&mut server, "/site/scoreboard", 404).await;
    let refresh = assert_ok!(ingestor.refresh_scoreboard().await);
    assert!(matches!(refresh, Refresh::Permanent(_)));
    not_found.remove_async().await;

    let garbage = serve_json(&mut server, "/site/scoreboard", "<html>maintenance</html>").await;
    let refresh = assert_ok!(ingestor.refresh_scoreboard().await);
    assert!(matches!(refresh, Refresh::Permanent(_)));
    garbage.remove_async().await;

    serve_json(&mut server, "/site/scoreboard", r#"{"leagues": []}"#).await;
    let refresh = assert_ok!(ingestor.refresh_scoreboard().await);
    assert!(refresh.reason().unwrap().contains("events"));

    assert_eq!(ingestor.store().row_counts().await.unwrap(), before);
}

/// A feed holding a single playoff game between `competitors`.
fn single_game(competitors: &str) -> String {
    format!(
        r#"{{"events": [{{"id": "500", "name": "Wild Card", "date": "2025-01-11T21:30Z",
            "competitions": [{{"competitors": [{competitors}]}}]}}]}}"#
    )
}

const TBD_VS_BUF: &str = r#"{"homeAway": "home", "team": {"id": "-1", "displayName": "TBD"}},
    {"homeAway": "away", "team": {"id": "2", "abbreviation": "BUF"}, "score": "0"}"#;
const KC_VS_BUF: &str = r#"{"homeAway": "home", "team": {"id": "12", "abbreviation": "KC"}, "score": "27"},
    {"homeAway": "away", "team": {"id": "2", "abbreviation": "BUF"}, "score": "24"}"#;

#[tokio::test]
async fn replaced_participant_leaves_no_stale_team_row() {
    let mut server = mockito::Server::new_async().await;
    let placeholder = serve_json(&mut server, "/site/scoreboard", &single_game(TBD_VS_BUF)).await;
    let placeholder_schedule = serve_json(&mut server, "/site/teams/2/schedule", &single_game(TBD_VS_BUF)).await;
    let ingestor = ingestor(&server).await;

    assert_ok!(ingestor.refresh_scoreboard().await);
    assert_ok!(ingestor.refresh_team_schedule("2").await);
    placeholder.remove_async().await;
    placeholder_schedule.remove_async().await;

    serve_json(&mut server, "/site/scoreboard", &single_game(KC_VS_BUF)).await;
    serve_json(&mut server, "/site/teams/2/schedule", &single_game(KC_VS_BUF)).await;
    assert_ok!(ingestor.refresh_scoreboard().await);
    assert_ok!(ingestor.refresh_team_schedule("2").await);

    let counts = ingestor.store().row_counts().await.unwrap();
    assert_eq!(counts["teams"], 2);
    assert_eq!(counts["competition_results"], 2);

    let games = ingestor.store().schedule().await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].home_team_id, "12");
    assert_eq!(games[0].away_team_id, "2");
    assert!(ingestor.store().team_schedule("-1").await.unwrap().is_empty());
    let buffalo = ingestor.store().team_schedule("2").await.unwrap();
    assert_eq!(buffalo[0].opponent_id, "12");
    assert_eq!(buffalo[0].outcome, "L");
}

#[tokio::test]
async fn combined_schedule_keeps_games_without_home_away_labels() {
    let mut server = mockito::Server::new_async().await;
    let unlabelled = single_game(
        r#"{"team": {"id": "7", "abbreviation": "DEN"}, "score": "14"},
           {"team": {"id": "3", "abbreviation": "CHI"}, "score": "17"}"#,
    );
    serve_json(&mut server, "/site/scoreboard", &unlabelled).await;
    let ingestor = ingestor(&server).await;

    assert_ok!(ingestor.refresh_scoreboard().await);
    assert_eq!(ingestor.store().row_counts().await.unwrap()["teams"], 2);

    let games = ingestor.store().schedule().await.unwrap();
    assert_eq!(games.len(), 1);
    // Without labels the lower team id takes the first slot.
    assert_eq!(games[0].home_team_id, "3");
    assert_eq!((games[0].home_score, games[0].away_score), (17, 14));
}

#[tokio::test]
async fn store_failure_rolls_back_the_whole_refresh() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/site/scoreboard", SCOREBOARD).await;
    let ingestor = ingestor(&server).await;

    sqlx::query("DROP TABLE broadcasts")
        .execute(ingestor.store().pool())
        .await
        .unwrap();

    let err = ingestor.refresh_scoreboard().await.unwrap_err();
    assert!(matches!(err, IngestError::Store(_)));

    // League, week, venue and game were written before broadcasts failed.
    for table in ["leagueInfo", "nflWeek", "venues", "games", "teams"] {
        let (rows,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(ingestor.store().pool())
            .await
            .unwrap();
        assert_eq!(rows, 0, "{table} kept rows from a failed refresh");
    }
}

#[tokio::test]
async fn team_schedule_refresh_is_idempotent() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/site/teams/12/schedule", TEAM_SCHEDULE).await;
    let ingestor = ingestor(&server).await;

    assert_ok!(ingestor.refresh_team_schedule("12").await);
    let first = ingestor.store().row_counts().await.unwrap();
    let first_schedule = ingestor.store().team_schedule("12").await.unwrap();

    assert_ok!(ingestor.refresh_team_schedule("12").await);
    assert_eq!(ingestor.store().row_counts().await.unwrap(), first);
    assert_eq!(ingestor.store().team_schedule("12").await.unwrap(), first_schedule);
    assert_eq!(first["competition_results"], 8);
}

#[tokio::test]
async fn team_schedule_stores_symmetric_results_in_chronological_order() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/site/teams/12/schedule", TEAM_SCHEDULE).await;
    let ingestor = ingestor(&server).await;

    let refresh = assert_ok!(ingestor.refresh_team_schedule("12").await);
    assert_eq!(refresh, Refresh::Fresh(4));

    let schedule = ingestor.store().team_schedule("12").await.unwrap();
    let weeks: Vec<_> = schedule.iter().map(|r| r.week).collect();
    // January comes last even though its display date sorts first.
    assert_eq!(weeks, [Some(1), Some(2), Some(17), Some(18)]);

    let outcomes: Vec<_> = schedule.iter().map(|r| r.outcome.as_str()).collect();
    assert_eq!(outcomes, ["W", "W", "W", "Pending"]);
    assert_eq!(schedule[3].competition_date.as_deref(), Some("01/05/2025 @ 04:25 PM"));

    for row in &schedule {
        let other_side = ingestor.store().team_schedule(&row.opponent_id).await.unwrap();
        assert_eq!(other_side.len(), 1);
        let mirror = &other_side[0];
        assert_eq!(mirror.game_id, row.game_id);
        assert_eq!(mirror.opponent_id, "12");
        assert_eq!((mirror.team_score, mirror.opponent_score), (row.opponent_score, row.team_score));
        let expected = match row.outcome.as_str() {
            "W" => "L",
            "L" => "W",
            other => other,
        };
        assert_eq!(mirror.outcome, expected);
    }

    let counts = ingestor.store().row_counts().await.unwrap();
    assert_eq!(counts["competition_results"], 8);
    // Denver's venue has no id and is not stored.
    assert_eq!(counts["venues"], 2);
    assert_eq!(counts["broadcasts"], 1);
}

#[tokio::test]
async fn team_record_uses_the_total_item() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/core/seasons/2024/types/2/teams/12/record", RECORD).await;
    let ingestor = ingestor(&server).await;

    let refresh = assert_ok!(ingestor.refresh_team_record("12").await);
    assert_eq!(refresh, Refresh::Fresh(true));

    let record = ingestor.store().team_record("12").await.unwrap().unwrap();
    assert_eq!(record.record.as_deref(), Some("15-2"));
    assert_eq!(record.division_record.as_deref(), Some("5-1"));
    assert_eq!(record.streak.as_deref(), Some("L1"));
    assert_eq!(record.playoff_seed, Some(1));
    assert_eq!(record.points_for, Some(384.0));

    let before = ingestor.store().row_counts().await.unwrap();
    assert_ok!(ingestor.refresh_team_record("12").await);
    assert_eq!(ingestor.store().row_counts().await.unwrap(), before);
    assert_eq!(ingestor.store().team_record("12").await.unwrap(), Some(record));
}

#[tokio::test]
async fn boxscore_falls_back_to_the_requested_game_id() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/cdn/boxscore")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("xhr".into(), "1".into()),
            Matcher::UrlEncoded("gameId".into(), "401671789".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BOXSCORE)
        .create_async()
        .await;
    let ingestor = ingestor(&server).await;

    let refresh = assert_ok!(ingestor.refresh_game_boxscore("401671789").await);
    assert_eq!(refresh, Refresh::Fresh(10));

    let (players,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players")
        .fetch_one(ingestor.store().pool())
        .await
        .unwrap();
    assert_eq!(players, 3);

    let (yards,): (String,) = sqlx::query_as(
        "SELECT stat_value FROM player_stats
         WHERE player_id = '4361050' AND game_id = '401671789' AND category = 'rushing' AND stat_key = 'YDS'",
    )
    .fetch_one(ingestor.store().pool())
    .await
    .unwrap();
    assert_eq!(yards, "57");

    let (key,): (String,) =
        sqlx::query_as("SELECT stat_key FROM player_stats WHERE player_id = '14880' ORDER BY stat_key LIMIT 1")
            .fetch_one(ingestor.store().pool())
            .await
            .unwrap();
    assert_eq!(key, "completions/passingAttempts");

    assert_ok!(ingestor.refresh_game_boxscore("401671789").await);
    assert_eq!(ingestor.store().row_counts().await.unwrap()["player_stats"], 10);
}

#[tokio::test]
async fn depth_chart_refresh_replaces_the_previous_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let full = serve_json(&mut server, "/core/seasons/2024/teams/12/depthcharts", DEPTH_CHART).await;
    let ingestor = ingestor(&server).await;

    let refresh = assert_ok!(ingestor.refresh_depth_chart("12").await);
    assert_eq!(refresh, Refresh::Fresh(4));
    let snapshot = ingestor.store().depth_chart("12").await.unwrap();
    let counts = ingestor.store().row_counts().await.unwrap();

    assert_ok!(ingestor.refresh_depth_chart("12").await);
    assert_eq!(ingestor.store().depth_chart("12").await.unwrap(), snapshot);
    assert_eq!(ingestor.store().row_counts().await.unwrap(), counts);
    full.remove_async().await;

    serve_json(&mut server, "/core/seasons/2024/teams/12/depthcharts", DEPTH_CHART_SMALLER).await;
    let refresh = assert_ok!(ingestor.refresh_depth_chart("12").await);
    assert_eq!(refresh, Refresh::Fresh(2));

    let entries = ingestor.store().depth_chart("12").await.unwrap();
    assert_eq!(entries.len(), 2);
    let athletes: Vec<_> = entries.iter().filter_map(|e| e.athlete_id.as_deref()).collect();
    assert_eq!(athletes, ["3139477", "15847"]);
    assert!(entries.iter().all(|e| e.rank == 1 && e.season == 2024));
}

#[tokio::test]
async fn odds_fall_back_to_abbreviation_and_skip_unknown_teams() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/site/scoreboard", SCOREBOARD).await;
    serve_json(
        &mut server,
        "/core/events/401671789/competitions/401671789/odds",
        ODDS,
    )
    .await;
    let ingestor = ingestor(&server).await;

    assert_ok!(ingestor.refresh_scoreboard().await);
    let refresh = assert_ok!(ingestor.refresh_odds("401671789").await);
    // The item without a $ref is skipped.
    assert_eq!(refresh, Refresh::Fresh(2));

    let detail = ingestor.store().game_detail("401671789").await.unwrap().unwrap();
    assert_eq!(detail.odds.len(), 2);
    assert_eq!(detail.odds[0].provider_name.as_deref(), Some("ESPN Bet - Live Odds"));

    let mut sides: Vec<_> = detail
        .team_odds
        .iter()
        .map(|s| (s.provider_id.as_str(), s.team_id.as_str(), s.home_away.as_str()))
        .collect();
    sides.sort();
    assert_eq!(
        sides,
        [("1002", "1", "home"), ("1002", "23", "away"), ("58", "1", "home")]
    );

    let pit = detail
        .team_odds
        .iter()
        .find(|s| s.provider_id == "1002" && s.team_id == "23")
        .unwrap();
    assert_eq!(pit.moneyline, Some(-175));
    assert_eq!(pit.point_spread.as_deref(), Some("-3.5"));

    let before = ingestor.store().row_counts().await.unwrap();
    assert_ok!(ingestor.refresh_odds("401671789").await);
    assert_eq!(ingestor.store().row_counts().await.unwrap(), before);
}

#[tokio::test]
async fn splits_and_projections_are_computed_not_stored() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/web/athletes/3116385/splits", SPLITS).await;
    serve_json(
        &mut server,
        "/core/seasons/2024/types/2/athletes/3116385/projections",
        PROJECTIONS,
    )
    .await;
    let ingestor = ingestor(&server).await;
    let before = ingestor.store().row_counts().await.unwrap();

    let splits = assert_ok!(ingestor.fetch_athlete_splits("3116385").await).fresh().unwrap();
    assert_eq!(
        splits.labels,
        ["CAR", "YDS", "AVG", "TD", "REC", "REC_YDS", "REC_AVG", "REC_TD"]
    );
    assert_eq!(splits.categories.len(), 2);
    assert_eq!(splits.categories[1].rows[0].split, "Home");
    assert_eq!(
        splits.categories[1].rows[0].stats[5],
        ("REC_YDS".to_string(), "80".to_string())
    );

    let projections = assert_ok!(ingestor.fetch_athlete_projections("3116385").await)
        .fresh()
        .unwrap();
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].category, "passing");
    assert_eq!(projections[0].stats.len(), 1);
    assert_eq!(projections[0].stats[0].rank, "5th");

    assert_eq!(ingestor.store().row_counts().await.unwrap(), before);
}

#[tokio::test]
async fn missing_splits_are_a_permanent_failure() {
    let mut server = mockito::Server::new_async().await;
    serve_json(&mut server, "/web/athletes/1/splits", r#"{"labels": []}"#).await;
    let ingestor = ingestor(&server).await;

    let refresh = assert_ok!(ingestor.fetch_athlete_splits("1").await);
    assert_eq!(refresh.label(), "permanent_failure");
    assert!(refresh.reason().unwrap().contains("splitCategories"));
}
