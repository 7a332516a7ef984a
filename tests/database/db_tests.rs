use chrono::NaiveDate;
use judge_rating::{
    database::{DbClient, StoreError},
    model::structures::{
        leaderboard_record::{ContestHistoryEntry, LeaderboardRecord},
        verdict::Verdict
    }
};
use serial_test::serial;

use super::test_helpers::{TestDatabase, ENDED_CONTEST, UPCOMING_CONTEST};
use crate::common::init_test_env;

#[tokio::test]
#[serial]
async fn test_get_contest() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let contest = db_client.get_contest(ENDED_CONTEST).await.unwrap();
    assert_eq!(contest.id, ENDED_CONTEST);
    assert_eq!(contest.name, "Weekly Round 1");
    assert_eq!(contest.history_date(), NaiveDate::from_ymd_opt(2025, 1, 4));

    let upcoming = db_client.get_contest(UPCOMING_CONTEST).await.unwrap();
    assert!(upcoming.time_start.unwrap() > contest.time_end.unwrap());
}

#[tokio::test]
#[serial]
async fn test_get_contest_missing() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let result = db_client.get_contest(99).await;
    assert!(matches!(result, Err(StoreError::ContestNotFound(99))));
}

#[tokio::test]
#[serial]
async fn test_get_standing_rows() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let rows = db_client.get_standing_rows(ENDED_CONTEST).await.unwrap();

    // Storage order, not standing order
    let users = rows.iter().map(|r| r.user_id.as_str()).collect::<Vec<_>>();
    assert_eq!(users, vec!["dave", "carol", "alice", "bob"]);

    let alice = &rows[2];
    assert_eq!(alice.score, 300.0);
    assert_eq!(alice.penalty, 1200.0);
    assert_eq!(alice.problems.len(), 3);
    assert_eq!(alice.problems["C"].score, Some(100.0));
    assert_eq!(alice.problems["C"].verdict, Some(Verdict::WrongAnswer));

    let carol = &rows[1];
    assert_eq!(carol.problems["B"].tries, 2);
    assert!(carol.problems["B"].is_accepted());
    assert!(carol.problems["B"].time.is_some());
    assert_eq!(carol.problems.len(), 3);
    assert_eq!(carol.problems["C"].verdict, Some(Verdict::Pending));

    // Unreadable problem data is dropped, the row is kept
    let bob = &rows[3];
    assert_eq!(bob.score, 200.0);
    assert!(bob.problems.is_empty());

    // NULL problems
    assert!(rows[0].problems.is_empty());
}

#[tokio::test]
#[serial]
async fn test_get_leaderboard() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let records = db_client.get_leaderboard().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].username, "bob");
    assert_eq!(records[0].elo, 1700.0);
    assert_eq!(records[0].history.len(), 1);
    assert_eq!(records[0].history[0].name, "Warmup");
    assert_eq!(records[1].username, "carol");
    assert_eq!(records[1].snapshot().raw_elo, None);
}

#[tokio::test]
#[serial]
async fn test_save_records_upserts() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.seed_test_data().await.expect("Failed to seed test data");

    let mut db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let mut bob = db_client.get_leaderboard().await.unwrap().remove(0);
    bob.elo = 1650.0;
    bob.history.push(ContestHistoryEntry {
        contest_id: 1,
        name: "Weekly Round 1".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
        rank: 2,
        elo: 1650.0
    });

    let mut alice = LeaderboardRecord::new("alice");
    alice.elo = 1617.0;

    db_client.save_records(&[bob.clone(), alice.clone()]).await.unwrap();

    let records = db_client.get_leaderboard().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], alice);
    assert_eq!(records[1], bob);
    assert_eq!(records[2].username, "carol");
}

#[tokio::test]
#[serial]
async fn test_save_no_records() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");

    let mut db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    assert!(db_client.save_records(&[]).await.is_ok());
    assert!(db_client.get_leaderboard().await.unwrap().is_empty());
}
