use skate_league_ranking::config::AppConfig;
use skate_league_ranking::database::{self, DbPool};
use skate_league_ranking::domain::{ColumnMapping, FieldTag, MappedColumn};
use skate_league_ranking::errors::EngineError;
use skate_league_ranking::services::locks::LeagueLocks;
use skate_league_ranking::services::upload::CommitSummary;
use skate_league_ranking::standings;
use skate_league_ranking::wizard::{StartRequest, UploadWizard, WizardStep};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    pool: DbPool,
    config: AppConfig,
    locks: LeagueLocks,
    league_id: i64,
    event_a: i64,
    event_b: i64,
}

/// Fresh database with one league and two linked events: event A counts
/// single (multiplier 1.0), event B counts double (multiplier 2.0).
fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("test.db");
    let pool = database::create_pool(db_path.to_str().expect("utf-8 path")).expect("pool");

    let conn = database::get_connection(&pool).expect("conn");
    database::setup::reset_database(&conn).expect("schema");

    let league = database::leagues::create_league(
        &conn,
        "Winter Series",
        Some("2026"),
        None,
        None,
        None,
    )
    .expect("league");
    let event_a = database::leagues::create_event(&conn, "Mountain Jam").expect("event a");
    let event_b = database::leagues::create_event(&conn, "Harbour Sprint").expect("event b");
    database::leagues::link_event(&conn, league.id, event_a.id, 1.0, 100).expect("link a");
    database::leagues::link_event(&conn, league.id, event_b.id, 2.0, 100).expect("link b");

    Fixture {
        _dir: dir,
        pool,
        config: AppConfig::new(),
        locks: LeagueLocks::new(),
        league_id: league.id,
        event_a: event_a.id,
        event_b: event_b.id,
    }
}

fn start_request(fixture: &Fixture, event_id: i64, content: &str) -> StartRequest {
    StartRequest {
        league_id: fixture.league_id,
        event_id,
        result_type: "BRACKET".to_string(),
        is_final: true,
        uploaded_by: Some("organizer".to_string()),
        file_name: "results.csv".to_string(),
        content: content.to_string(),
    }
}

/// Drive the whole wizard with the proposed mapping accepted as-is.
fn run_upload(fixture: &Fixture, event_id: i64, content: &str) -> CommitSummary {
    let wizard = UploadWizard::new(&fixture.pool, &fixture.config, &fixture.locks);
    let started = wizard
        .start(start_request(fixture, event_id, content))
        .expect("wizard start");
    wizard
        .submit_mapping(&started.token, started.state.proposed_mapping.clone())
        .expect("wizard mapping");
    wizard.confirm(&started.token).expect("wizard confirm")
}

/// Standing rows stripped of their row ids, for comparisons across rebuilds.
fn snapshot(fixture: &Fixture) -> Vec<(String, String, i64, i64, Option<i64>, f64, String)> {
    let conn = database::get_connection(&fixture.pool).expect("conn");
    database::standings::list_for_league(&conn, fixture.league_id)
        .expect("standings")
        .into_iter()
        .map(|row| {
            (
                row.discipline,
                row.competitor_name,
                row.points,
                row.events_competed,
                row.position,
                row.average_rank,
                row.event_results_json,
            )
        })
        .collect()
}

#[test]
fn end_to_end_upload_produces_standings() {
    let fixture = fixture();
    let summary = run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n3,Cara,800\n",
    );
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.disciplines, 1);
    assert_eq!(summary.skipped_rows, 0);

    let conn = database::get_connection(&fixture.pool).expect("conn");
    let rows = standings::get_standings(&conn, fixture.league_id, "Open").expect("standings");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].competitor_name, "Alice");
    assert_eq!(rows[0].points, 1000);
    assert_eq!(rows[0].position, Some(1));
    assert_eq!(rows[0].events_competed, 1);
    assert_eq!(rows[0].average_rank, 1.0);
    assert_eq!(rows[2].competitor_name, "Cara");
    assert_eq!(rows[2].position, Some(3));
}

#[test]
fn multipliers_scale_and_accumulate_across_events() {
    let fixture = fixture();
    run_upload(&fixture, fixture.event_a, "Pos,Rider,Pts\n1,Alice,900\n");
    run_upload(&fixture, fixture.event_b, "Pos,Rider,Pts\n1,Alice,900\n");

    let conn = database::get_connection(&fixture.pool).expect("conn");
    let rows = standings::get_standings(&conn, fixture.league_id, "Open").expect("standings");
    assert_eq!(rows.len(), 1);
    // 900 * 1.0 from event A plus 900 * 2.0 from event B.
    assert_eq!(rows[0].points, 2700);
    assert_eq!(rows[0].events_competed, 2);
}

#[test]
fn reupload_replaces_the_same_events_contribution() {
    let fixture = fixture();
    run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n",
    );
    // Corrected export: Bob actually won.
    run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Bob,1000\n2,Alice,900\n",
    );

    let conn = database::get_connection(&fixture.pool).expect("conn");
    let rows = standings::get_standings(&conn, fixture.league_id, "Open").expect("standings");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].competitor_name, "Bob");
    assert_eq!(rows[0].points, 1000);
    assert_eq!(rows[0].events_competed, 1);
    assert_eq!(rows[1].competitor_name, "Alice");
    assert_eq!(rows[1].points, 900);

    // Only the newer upload keeps the final flag.
    let finals = database::results::list_final_for_event(&conn, fixture.event_a).expect("finals");
    assert_eq!(finals.len(), 1);
}

#[test]
fn rebuild_matches_incremental_state_and_is_idempotent() {
    let fixture = fixture();
    run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n3,Cara,800\n",
    );
    run_upload(
        &fixture,
        fixture.event_b,
        "Pos,Rider,Pts\n1,Bob,1000\n2,Alice,900\n",
    );

    let incremental = snapshot(&fixture);

    standings::rebuild(&fixture.pool, &fixture.locks, &fixture.config, fixture.league_id)
        .expect("first rebuild");
    let first = snapshot(&fixture);

    standings::rebuild(&fixture.pool, &fixture.locks, &fixture.config, fixture.league_id)
        .expect("second rebuild");
    let second = snapshot(&fixture);

    assert_eq!(incremental, first);
    assert_eq!(first, second);
}

#[test]
fn wide_files_feed_every_discipline() {
    let fixture = fixture();
    let summary = run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Open,Masters\n1,Alice,1,\n2,Bob,2,1\n3,Cara,,2\n",
    );
    assert_eq!(summary.disciplines, 2);

    let conn = database::get_connection(&fixture.pool).expect("conn");
    let open = standings::get_standings(&conn, fixture.league_id, "Open").expect("open");
    assert_eq!(open.len(), 2);
    assert_eq!(open[0].competitor_name, "Alice");

    let masters = standings::get_standings(&conn, fixture.league_id, "Masters").expect("masters");
    assert_eq!(masters.len(), 2);
    assert_eq!(masters[0].competitor_name, "Bob");
    assert_eq!(masters[0].points, 1000);

    let disciplines =
        database::leagues::list_disciplines(&conn, fixture.league_id).expect("disciplines");
    let names: Vec<String> = disciplines.into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Open", "Masters"]);
}

#[test]
fn point_ties_are_broken_by_average_rank() {
    let fixture = fixture();
    run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,500\n2,Bob,500\n3,Cara,400\n",
    );

    let conn = database::get_connection(&fixture.pool).expect("conn");
    let rows = standings::get_standings(&conn, fixture.league_id, "Open").expect("standings");
    let positions: Vec<Option<i64>> = rows.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(rows[0].competitor_name, "Alice");
    assert_eq!(rows[1].competitor_name, "Bob");
}

#[test]
fn missing_rank_column_never_reaches_confirmation() {
    let fixture = fixture();
    let wizard = UploadWizard::new(&fixture.pool, &fixture.config, &fixture.locks);
    let started = wizard
        .start(start_request(&fixture, fixture.event_a, "Rider\nAlice\nBob\n"))
        .expect("wizard start");

    let err = wizard
        .submit_mapping(&started.token, started.state.proposed_mapping.clone())
        .expect_err("mapping should be rejected");
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::MappingIncomplete { missing }) => {
            assert_eq!(missing, &vec![FieldTag::Rank]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The session did not advance, so confirming is a step violation.
    let err = wizard.confirm(&started.token).expect_err("confirm should fail");
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::WrongWizardStep { .. })
    ));
}

#[test]
fn expired_sessions_require_a_restart() {
    let mut fixture = fixture();
    fixture.config.wizard.session_ttl_minutes = -1;

    let wizard = UploadWizard::new(&fixture.pool, &fixture.config, &fixture.locks);
    let started = wizard
        .start(start_request(&fixture, fixture.event_a, "Pos,Rider\n1,Alice\n"))
        .expect("wizard start");

    let err = wizard
        .submit_mapping(&started.token, started.state.proposed_mapping.clone())
        .expect_err("session should be expired");
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::WizardStateExpired)
    ));
}

#[test]
fn go_back_preserves_entered_data() {
    let fixture = fixture();
    let wizard = UploadWizard::new(&fixture.pool, &fixture.config, &fixture.locks);
    let started = wizard
        .start(start_request(
            &fixture,
            fixture.event_a,
            "Pos,Rider,Pts\n1,Alice,1000\n",
        ))
        .expect("wizard start");
    wizard
        .submit_mapping(&started.token, started.state.proposed_mapping.clone())
        .expect("wizard mapping");

    let state = wizard.go_back(&started.token).expect("go back");
    assert_eq!(state.step, WizardStep::AwaitingMapping);
    // The previously confirmed mapping survives as the step's defaults.
    assert_eq!(
        state.confirmed_mapping,
        Some(started.state.proposed_mapping.clone())
    );

    // The mapping step is the floor; backing out of it means cancel, not a
    // step the session could never leave.
    let err = wizard
        .go_back(&started.token)
        .expect_err("no step before mapping");
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::WrongWizardStep { .. })
    ));

    // The step accepts a fresh submission and the flow completes.
    wizard
        .submit_mapping(&started.token, started.state.proposed_mapping.clone())
        .expect("resubmitted mapping");
    wizard.confirm(&started.token).expect("confirm");
}

#[test]
fn confirmed_mappings_prefill_the_next_upload() {
    let fixture = fixture();
    let wizard = UploadWizard::new(&fixture.pool, &fixture.config, &fixture.locks);
    let started = wizard
        .start(start_request(
            &fixture,
            fixture.event_a,
            "Pos,Rider,Bonus\n1,Alice,250\n",
        ))
        .expect("wizard start");
    assert_eq!(started.state.proposed_mapping.columns[2].tag, FieldTag::Ignore);

    // The uploader re-tags the unrecognized column as points.
    let edited = ColumnMapping {
        columns: vec![
            MappedColumn {
                header: "Pos".to_string(),
                tag: FieldTag::Rank,
            },
            MappedColumn {
                header: "Rider".to_string(),
                tag: FieldTag::Name,
            },
            MappedColumn {
                header: "Bonus".to_string(),
                tag: FieldTag::Points,
            },
        ],
    };
    wizard
        .submit_mapping(&started.token, edited)
        .expect("wizard mapping");
    wizard.confirm(&started.token).expect("confirm");

    // Next upload for the same league proposes the saved rule.
    let next = wizard
        .start(start_request(
            &fixture,
            fixture.event_b,
            "Pos,Rider,Bonus\n1,Alice,300\n",
        ))
        .expect("second start");
    assert_eq!(next.state.proposed_mapping.columns[2].tag, FieldTag::Points);
}

#[test]
fn uploads_to_unlinked_events_are_rejected() {
    let fixture = fixture();
    let conn = database::get_connection(&fixture.pool).expect("conn");
    let orphan = database::leagues::create_event(&conn, "Unsanctioned Hill").expect("event");
    drop(conn);

    let wizard = UploadWizard::new(&fixture.pool, &fixture.config, &fixture.locks);
    let err = wizard
        .start(start_request(&fixture, orphan.id, "Pos,Rider\n1,Alice\n"))
        .expect_err("start should fail");
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::EventNotInLeague { .. })
    ));
}

#[test]
fn registered_profiles_enrich_entries_and_standings() {
    let fixture = fixture();
    let alice = {
        let conn = database::get_connection(&fixture.pool).expect("conn");
        // Registered under a different case; matching is case-insensitive.
        database::profiles::create_profile(&conn, "alice").expect("profile")
    };

    let summary = run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n",
    );

    let conn = database::get_connection(&fixture.pool).expect("conn");
    let entries = database::results::list_entries(&conn, summary.result_id).expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].competitor_name, "Alice");
    assert_eq!(entries[0].profile_id, Some(alice.id));
    assert_eq!(entries[1].profile_id, None);

    let rows = standings::get_standings(&conn, fixture.league_id, "Open").expect("standings");
    assert_eq!(rows[0].competitor_name, "Alice");
    assert_eq!(rows[0].profile_id, Some(alice.id));
    assert_eq!(rows[1].profile_id, None);
}

#[test]
fn deleting_a_league_cascades_to_its_derived_rows() {
    let fixture = fixture();
    run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,1000\n2,Bob,900\n",
    );

    let conn = database::get_connection(&fixture.pool).expect("conn");
    assert!(!database::standings::list_for_league(&conn, fixture.league_id)
        .expect("standings")
        .is_empty());

    database::leagues::delete_league(&conn, fixture.league_id).expect("delete");

    assert!(database::leagues::find_by_slug(&conn, "winter-series")
        .expect("lookup")
        .is_none());
    assert!(database::standings::list_for_league(&conn, fixture.league_id)
        .expect("standings")
        .is_empty());
    assert!(database::leagues::list_disciplines(&conn, fixture.league_id)
        .expect("disciplines")
        .is_empty());
    assert!(database::mappings::rules_for_league(&conn, fixture.league_id)
        .expect("rules")
        .is_empty());
}

#[test]
fn skipped_rows_are_counted_in_the_commit_summary() {
    let fixture = fixture();
    let summary = run_upload(
        &fixture,
        fixture.event_a,
        "Pos,Rider,Pts\n1,Alice,1000\nDNF,Bob,900\n3,Cara,800\n",
    );
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.skipped_rows, 1);
}
