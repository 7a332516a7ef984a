use chrono::{DateTime, FixedOffset};
use judge_rating::{
    database::DbClient,
    error::ProcessorError,
    model::{rating_tracker::TrackerError, RatingConfig},
    processor::{rate_contest, rollback_contest, RateOptions}
};
use serial_test::serial;

use super::test_helpers::{TestDatabase, EMPTY_CONTEST, ENDED_CONTEST, UPCOMING_CONTEST};
use crate::common::init_test_env;

fn now() -> DateTime<FixedOffset> {
    "2025-06-01T00:00:00+00:00".parse().unwrap()
}

fn options(contest_id: i32, commit: bool, force: bool) -> RateOptions {
    RateOptions {
        contest_id,
        commit,
        force,
        config: RatingConfig::default()
    }
}

async fn setup() -> (TestDatabase, DbClient) {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    (test_db, db_client)
}

#[tokio::test]
#[serial]
async fn test_dry_run_does_not_write() {
    let (_test_db, mut db) = setup().await;

    let report = rate_contest(&mut db, &options(ENDED_CONTEST, false, false), now())
        .await
        .unwrap();

    assert_eq!(report.saved, 0);
    let users = report.results.iter().map(|r| r.rating.user_id.as_str()).collect::<Vec<_>>();
    assert_eq!(users, vec!["alice", "bob", "carol", "dave"]);
    assert_eq!(report.results.iter().map(|r| r.rating.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(report.results.iter().all(|r| !r.rating.provisional));

    // Missing and unrated users start from the default rating
    assert_eq!(report.results[0].rating.old_raw_elo, 1500.0);
    assert_eq!(report.results[2].rating.old_raw_elo, 1500.0);
    assert_eq!(report.results[1].rating.old_raw_elo, 1700.0);
    assert!(report.results[0].rating.new_raw_elo > 1500.0);
    assert!(report.results[3].rating.new_raw_elo < 1500.0);

    assert_eq!(db.get_leaderboard().await.unwrap().len(), 2);
}

#[tokio::test]
#[serial]
async fn test_report_carries_problem_cells() {
    let (_test_db, mut db) = setup().await;

    let report = rate_contest(&mut db, &options(ENDED_CONTEST, false, false), now())
        .await
        .unwrap();

    let alice = &report.results[0];
    assert_eq!(alice.problems.len(), 3);
    assert_eq!(alice.problems["A"].summary, "");
    assert_eq!(alice.problems["C"].summary, "100");

    let carol = &report.results[2];
    assert_eq!(carol.problems["A"].solve_time.as_deref(), Some("00:05:00"));
    assert_eq!(carol.problems["B"].summary, "+1");
    assert_eq!(carol.problems["C"].summary, "-1");
    assert_eq!(carol.problems["C"].solve_time, None);

    // Unreadable problem data leaves the row without cells
    assert!(report.results[1].problems.is_empty());

    for row in &report.results {
        assert!(!row.tier.is_empty());
        assert!(!row.title.is_empty());
    }
}

#[tokio::test]
#[serial]
async fn test_commit_writes_history() {
    let (_test_db, mut db) = setup().await;

    let report = rate_contest(&mut db, &options(ENDED_CONTEST, true, false), now())
        .await
        .unwrap();
    assert_eq!(report.saved, 4);

    let records = db.get_leaderboard().await.unwrap();
    assert_eq!(records.len(), 4);

    for r in report.results.iter().map(|row| &row.rating) {
        let record = records.iter().find(|rec| rec.username == r.user_id).unwrap();
        assert_eq!(record.elo, r.new_raw_elo);

        let entry = record.history.last().unwrap();
        assert_eq!(entry.contest_id, ENDED_CONTEST);
        assert_eq!(entry.name, "Weekly Round 1");
        assert_eq!(entry.rank, r.rank);
        assert_eq!(entry.date.to_string(), "2025-01-04");
    }

    let bob = records.iter().find(|rec| rec.username == "bob").unwrap();
    assert_eq!(bob.history.len(), 2);
    assert_eq!(bob.history[0].contest_id, 0);
}

#[tokio::test]
#[serial]
async fn test_commit_twice_is_rejected() {
    let (_test_db, mut db) = setup().await;

    rate_contest(&mut db, &options(ENDED_CONTEST, true, false), now())
        .await
        .unwrap();
    let before = db.get_leaderboard().await.unwrap();

    let result = rate_contest(&mut db, &options(ENDED_CONTEST, true, false), now()).await;
    assert!(matches!(
        result,
        Err(ProcessorError::Tracker(TrackerError::AlreadyRated { contest_id: ENDED_CONTEST, .. }))
    ));

    assert_eq!(db.get_leaderboard().await.unwrap(), before);
}

#[tokio::test]
#[serial]
async fn test_unfinished_contest() {
    let (_test_db, mut db) = setup().await;

    let dry = rate_contest(&mut db, &options(UPCOMING_CONTEST, false, false), now())
        .await
        .unwrap();
    assert!(dry.results.iter().all(|r| r.rating.provisional));

    let result = rate_contest(&mut db, &options(UPCOMING_CONTEST, true, false), now()).await;
    assert!(matches!(result, Err(ProcessorError::ContestNotFinished(UPCOMING_CONTEST))));
    assert_eq!(db.get_leaderboard().await.unwrap().len(), 2);

    let forced = rate_contest(&mut db, &options(UPCOMING_CONTEST, true, true), now())
        .await
        .unwrap();
    assert_eq!(forced.saved, 1);
    assert!(forced.results.iter().all(|r| !r.rating.provisional));
}

#[tokio::test]
#[serial]
async fn test_empty_contest() {
    let (_test_db, mut db) = setup().await;

    let report = rate_contest(&mut db, &options(EMPTY_CONTEST, true, false), now())
        .await
        .unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.saved, 0);
}

#[tokio::test]
#[serial]
async fn test_rollback_restores_leaderboard() {
    let (_test_db, mut db) = setup().await;
    let before = db.get_leaderboard().await.unwrap();

    rate_contest(&mut db, &options(ENDED_CONTEST, true, false), now())
        .await
        .unwrap();

    let touched = rollback_contest(&mut db, ENDED_CONTEST).await.unwrap();
    assert_eq!(touched, 4);

    let after = db.get_leaderboard().await.unwrap();
    assert_eq!(after.len(), 4);
    for record in &before {
        assert!(after.contains(record));
    }

    let alice = after.iter().find(|r| r.username == "alice").unwrap();
    assert_eq!(alice.elo, 0.0);
    assert!(alice.history.is_empty());

    assert_eq!(rollback_contest(&mut db, ENDED_CONTEST).await.unwrap(), 0);
}
