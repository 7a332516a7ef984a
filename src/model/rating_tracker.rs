use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::structures::{
    contest::Contest,
    leaderboard_record::{ContestHistoryEntry, LeaderboardRecord},
    participant::RatingSnapshot,
    rating_update_result::RatingUpdateResult
};

#[derive(Debug, Error, PartialEq)]
pub enum TrackerError {
    #[error("Contest {contest_id} is already in the history of {username}")]
    AlreadyRated { contest_id: i32, username: String },

    #[error("Refusing to record provisional results for contest {0}")]
    Provisional(i32),

    #[error("Contest {0} has no start or end time to date its history entries")]
    Undated(i32)
}

/// In-memory view of the rating store.
///
/// Records are kept sorted as the global leaderboard: raw rating descending,
/// ties by username. Ranks are 1-based positions and are refreshed after every
/// update. Records touched since construction are tracked so only those are
/// written back.
pub struct RatingTracker {
    leaderboard: IndexMap<String, LeaderboardRecord>,
    ranks: HashMap<String, u32>,
    changed: HashSet<String>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            leaderboard: IndexMap::new(),
            ranks: HashMap::new(),
            changed: HashSet::new()
        }
    }

    /// Loads records as they exist in the store. Loaded records are not marked as changed.
    pub fn from_records(records: Vec<LeaderboardRecord>) -> RatingTracker {
        let mut tracker = RatingTracker::new();
        for mut record in records {
            record.history.sort_by_key(|h| h.contest_id);
            tracker.leaderboard.insert(record.username.clone(), record);
        }

        tracker.sort();
        tracker
    }

    /// Rating lookup consumed by [`crate::model::compute_standings`].
    pub fn lookup(&self) -> HashMap<String, RatingSnapshot> {
        self.leaderboard
            .iter()
            .map(|(username, record)| (username.clone(), record.snapshot()))
            .collect()
    }

    /// Records final results of `contest`: each participant's raw rating
    /// becomes their new rating and a history entry is appended. Users without
    /// a record get one.
    ///
    /// Nothing is modified when any participant already has this contest in
    /// their history.
    pub fn apply_contest(&mut self, contest: &Contest, results: &[RatingUpdateResult]) -> Result<(), TrackerError> {
        if results.iter().any(|r| r.provisional) {
            return Err(TrackerError::Provisional(contest.id));
        }

        let date = contest.history_date().ok_or(TrackerError::Undated(contest.id))?;

        for r in results {
            if let Some(record) = self.leaderboard.get(&r.user_id) {
                if record.has_contest(contest.id) {
                    return Err(TrackerError::AlreadyRated {
                        contest_id: contest.id,
                        username: r.user_id.clone()
                    });
                }
            }
        }

        for r in results {
            let record = self
                .leaderboard
                .entry(r.user_id.clone())
                .or_insert_with(|| LeaderboardRecord::new(&r.user_id));

            record.elo = r.new_raw_elo;
            record.history.push(ContestHistoryEntry {
                contest_id: contest.id,
                name: contest.name.clone(),
                date,
                rank: r.rank,
                elo: r.new_raw_elo
            });
            record.history.sort_by_key(|h| h.contest_id);

            debug!("{} now at {} after contest {}", r.user_id, r.new_raw_elo, contest.id);
            self.changed.insert(r.user_id.clone());
        }

        self.sort();
        info!("Applied contest {} to {} records", contest.id, results.len());

        Ok(())
    }

    /// Removes `contest_id` from every history and resets each affected rating
    /// to the last remaining entry (0 when none remain). Only an exact inverse
    /// of [`Self::apply_contest`] for a user's most recent contest.
    ///
    /// Returns the number of records touched.
    pub fn rollback_contest(&mut self, contest_id: i32) -> usize {
        let mut touched = 0;

        for record in self.leaderboard.values_mut() {
            if !record.has_contest(contest_id) {
                continue;
            }

            record.history.retain(|h| h.contest_id != contest_id);
            record.elo = record.history.last().map_or(0.0, |h| h.elo);
            self.changed.insert(record.username.clone());
            touched += 1;
        }

        self.sort();
        info!("Rolled back contest {} for {} records", contest_id, touched);

        touched
    }

    pub fn get_record(&self, username: &str) -> Option<&LeaderboardRecord> {
        self.leaderboard.get(username)
    }

    /// Global leaderboard rank
    pub fn get_rank(&self, username: &str) -> Option<u32> {
        self.ranks.get(username).copied()
    }

    /// Records in leaderboard order
    pub fn leaderboard(&self) -> impl Iterator<Item = &LeaderboardRecord> {
        self.leaderboard.values()
    }

    /// Records modified since loading, in leaderboard order
    pub fn get_changed(&self) -> Vec<LeaderboardRecord> {
        self.leaderboard
            .values()
            .filter(|r| self.changed.contains(&r.username))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.leaderboard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaderboard.is_empty()
    }

    fn sort(&mut self) {
        self.leaderboard.sort_by(|k1, v1, k2, v2| {
            v2.elo.total_cmp(&v1.elo).then_with(|| k1.cmp(k2))
        });

        self.ranks = self
            .leaderboard
            .keys()
            .enumerate()
            .map(|(i, username)| (username.clone(), i as u32 + 1))
            .collect();
    }
}
