use serde::{Deserialize, Serialize};

/// Rating Store view of one user before a contest
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    /// `None` when the user has never been rated
    pub raw_elo: Option<f64>,
    pub contest_count: u32
}

/// One user's result in one contest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub user_id: String,
    pub current_raw_elo: f64,
    pub score: f64,
    pub penalty: f64,
    /// 1-based position in the standing
    pub rank: u32,
    pub contest_count: u32
}

/// Participants sorted by score descending, then penalty ascending.
/// Ranks are list positions; exact ties still receive distinct ranks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContestStanding {
    pub participants: Vec<Participant>
}

impl ContestStanding {
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }
}
