use crate::model::structures::{
    contest::Contest,
    leaderboard_record::{ContestHistoryEntry, LeaderboardRecord},
    participant::{ContestStanding, Participant, RatingSnapshot},
    result_row::ResultRow
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};

pub fn generate_row(user_id: &str, score: f64, penalty: f64) -> ResultRow {
    ResultRow {
        user_id: user_id.to_string(),
        score,
        penalty,
        problems: BTreeMap::new()
    }
}

/// Entries are `(user_id, raw_elo, contest_count)`
pub fn generate_lookup(entries: &[(&str, Option<f64>, u32)]) -> HashMap<String, RatingSnapshot> {
    entries
        .iter()
        .map(|(user_id, raw_elo, contest_count)| {
            (
                user_id.to_string(),
                RatingSnapshot {
                    raw_elo: *raw_elo,
                    contest_count: *contest_count
                }
            )
        })
        .collect()
}

/// Reproducible standing rows with plenty of score ties.
pub fn generate_random_rows(seed: u64, n: usize) -> Vec<ResultRow> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..n)
        .map(|i| {
            let score = rng.random_range(0..=10) as f64 * 100.0;
            let penalty = rng.random_range(0..20_000) as f64;
            generate_row(&format!("user{}", i), score, penalty)
        })
        .collect()
}

/// Ratings for roughly 80% of `rows`; the rest are left out of the lookup.
pub fn generate_random_lookup(seed: u64, rows: &[ResultRow]) -> HashMap<String, RatingSnapshot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut lookup = HashMap::new();

    for row in rows {
        if rng.random_bool(0.8) {
            lookup.insert(
                row.user_id.clone(),
                RatingSnapshot {
                    raw_elo: Some(rng.random_range(0.0..=4000.0_f64).round()),
                    contest_count: rng.random_range(0..12)
                }
            );
        }
    }

    lookup
}

pub fn generate_participant(user_id: &str, current_raw_elo: f64, rank: u32, contest_count: u32) -> Participant {
    Participant {
        user_id: user_id.to_string(),
        current_raw_elo,
        score: 0.0,
        penalty: 0.0,
        rank,
        contest_count
    }
}

pub fn generate_standing(participants: &[Participant]) -> ContestStanding {
    ContestStanding {
        participants: participants.to_vec()
    }
}

pub fn generate_contest(id: i32, time_start: DateTime<FixedOffset>, time_end: DateTime<FixedOffset>) -> Contest {
    Contest {
        id,
        name: format!("Test Contest {}", id),
        time_start: Some(time_start),
        time_end: Some(time_end)
    }
}

/// Contest `n` is dated 2025-01-01 plus `n - 1` days
pub fn generate_history_entry(contest_id: i32, rank: u32, elo: f64) -> ContestHistoryEntry {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    ContestHistoryEntry {
        contest_id,
        name: format!("Test Contest {}", contest_id),
        date: base + Duration::days(contest_id as i64 - 1),
        rank,
        elo
    }
}

pub fn generate_record(username: &str, elo: f64, history: Vec<ContestHistoryEntry>) -> LeaderboardRecord {
    LeaderboardRecord {
        username: username.to_string(),
        elo,
        history
    }
}
