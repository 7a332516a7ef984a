use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::structures::participant::RatingSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestHistoryEntry {
    pub contest_id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub rank: u32,
    /// Raw rating after this contest
    pub elo: f64
}

/// Persisted per-user rating record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub username: String,
    /// Raw rating; 0 means not rated yet
    pub elo: f64,
    pub history: Vec<ContestHistoryEntry>
}

impl LeaderboardRecord {
    pub fn new(username: &str) -> LeaderboardRecord {
        LeaderboardRecord {
            username: username.to_string(),
            elo: 0.0,
            history: Vec::new()
        }
    }

    pub fn contest_count(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn has_contest(&self, contest_id: i32) -> bool {
        self.history.iter().any(|h| h.contest_id == contest_id)
    }

    /// The lookup value fed to the standings aggregator.
    pub fn snapshot(&self) -> RatingSnapshot {
        RatingSnapshot {
            raw_elo: (self.elo != 0.0).then_some(self.elo),
            contest_count: self.contest_count()
        }
    }

    /// Rating change of every history entry against the previous one.
    /// The first entry is measured against 0.
    pub fn rating_changes(&self) -> Vec<(i32, f64)> {
        let mut previous = 0.0;
        self.history
            .iter()
            .map(|h| {
                let change = h.elo - previous;
                previous = h.elo;
                (h.contest_id, change)
            })
            .collect()
    }
}
