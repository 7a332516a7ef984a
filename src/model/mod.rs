use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::info;

use crate::model::{
    constants::{DEFAULT_RAW_ELO, DISPLAY_CENTER},
    display::displayed_elo,
    error::{ensure_finite, RatingError},
    structures::{
        contest::{Contest, ContestPhase},
        participant::RatingSnapshot,
        rating_update_result::RatingUpdateResult,
        result_row::ResultRow
    }
};

// The flow of the rating pipeline:
// standings -> rating engine -> displayed-rating transform
pub mod constants;
pub mod display;
pub mod error;
pub mod rating_engine;
pub mod rating_tracker;
pub mod standings;
pub mod structures;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingConfig {
    /// Raw rating assumed for participants without one
    pub default_raw_elo: f64,
    /// Raw rating that displays as 0 before any provisional boost
    pub display_center: f64
}

impl Default for RatingConfig {
    fn default() -> Self {
        RatingConfig {
            default_raw_elo: DEFAULT_RAW_ELO,
            display_center: DISPLAY_CENTER
        }
    }
}

/// Computes rating results for a contest's final standing rows.
///
/// Pure: callers own fetching `rows` and `lookup` and persisting the output.
/// Results come back in standing order.
pub fn compute_standings(
    rows: &[ResultRow],
    lookup: &HashMap<String, RatingSnapshot>,
    config: &RatingConfig
) -> Result<Vec<RatingUpdateResult>, RatingError> {
    let standing = standings::aggregate(rows, lookup, config)?;
    let changes = rating_engine::rate(&standing)?;

    standing
        .participants
        .iter()
        .zip(changes)
        .map(|(p, change)| {
            let old_displayed = ensure_finite(
                &p.user_id,
                "displayed rating",
                displayed_elo(p.current_raw_elo, p.contest_count, config.display_center)
            )? as i64;
            let new_displayed = ensure_finite(
                &p.user_id,
                "displayed rating",
                displayed_elo(change.new_raw_elo, p.contest_count + 1, config.display_center)
            )? as i64;

            Ok(RatingUpdateResult {
                user_id: p.user_id.clone(),
                rank: p.rank,
                score: p.score,
                penalty: p.penalty,
                old_raw_elo: p.current_raw_elo,
                performance_rating: change.performance_rating,
                new_raw_elo: change.new_raw_elo,
                contest_count: p.contest_count,
                old_displayed_elo: old_displayed,
                new_displayed_elo: new_displayed,
                delta: new_displayed - old_displayed,
                provisional: false
            })
        })
        .collect()
}

/// [`compute_standings`] for a specific contest at instant `now`.
/// Results computed before the contest ended are marked provisional.
pub fn compute_contest_standings(
    contest: &Contest,
    rows: &[ResultRow],
    lookup: &HashMap<String, RatingSnapshot>,
    config: &RatingConfig,
    now: DateTime<FixedOffset>
) -> Result<Vec<RatingUpdateResult>, RatingError> {
    let phase = contest.phase(now);
    let provisional = phase != ContestPhase::Ended;

    info!(
        "Rating contest {} ({:?}) with {} participants{}",
        contest.id,
        phase,
        rows.len(),
        if provisional { ", provisional" } else { "" }
    );

    let mut results = compute_standings(rows, lookup, config)?;
    for r in results.iter_mut() {
        r.provisional = provisional;
    }

    Ok(results)
}
