use crate::model::constants::{MAX_RATING, PROVISIONAL_CONTESTS, PROVISIONAL_SPAN, PROVISIONAL_STEP};

/// # Displayed rating
///
/// Maps a raw rating to the number shown to users. Everyone enters around the
/// same raw baseline, so the first [`PROVISIONAL_CONTESTS`] contests add a
/// growing boost on top of `raw_elo - center`:
///
/// `boost(x) = x * (11 - x) * 100 / 2` with `x = min(contest_count, 6)`
///
/// The boost reaches 1500 at six contests and stays there. The result is
/// rounded and never negative.
pub fn displayed_elo(raw_elo: f64, contest_count: u32, center: f64) -> f64 {
    let x = contest_count.min(PROVISIONAL_CONTESTS) as f64;
    let norm = raw_elo - center;
    let boost = x * (PROVISIONAL_SPAN as f64 - x) * PROVISIONAL_STEP / 2.0;

    (norm + boost).round().max(0.0)
}

/// `HH:MM:SS`; non-positive values render as `00:00:00`.
pub fn format_penalty(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Π rounds to an integer; values that saturate the rating ceiling read as `∞`.
pub fn format_performance(performance_rating: f64) -> String {
    let rounded = performance_rating.round();
    if rounded >= MAX_RATING {
        return "∞".to_string();
    }

    format!("{}", rounded as i64)
}

pub fn format_delta(delta: i64) -> String {
    if delta >= 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}
