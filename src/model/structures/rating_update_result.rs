use serde::Serialize;

/// Rating outcome of one participant for one contest
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdateResult {
    pub user_id: String,
    pub rank: u32,
    pub score: f64,
    pub penalty: f64,
    pub old_raw_elo: f64,
    /// Π, within [0, 4000]
    pub performance_rating: f64,
    /// Rounded, within [0, 4000]
    pub new_raw_elo: f64,
    pub contest_count: u32,
    pub old_displayed_elo: i64,
    pub new_displayed_elo: i64,
    /// Displayed-rating difference, the number users see
    pub delta: i64,
    /// Computed before the contest ended
    pub provisional: bool
}
