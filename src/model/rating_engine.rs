use rayon::prelude::*;
use tracing::debug;

use crate::model::{
    constants::{DAMPING_A, DAMPING_B, DAMPING_C, ELO_SCALE, MAX_RATING, MIN_RATING, SEARCH_ITERATIONS},
    error::{ensure_finite, RatingError},
    structures::participant::ContestStanding
};

/// Raw-rating outcome of one participant, aligned with the standing order
#[derive(Debug, Clone, PartialEq)]
pub struct RawRatingChange {
    pub user_id: String,
    pub performance_rating: f64,
    pub new_raw_elo: f64
}

/// Probability that a player rated `a` places above a player rated `b`.
pub fn expected_probability(a: f64, b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((b - a) / ELO_SCALE))
}

/// `1 + Σ E(rating, other)` over every participant except `exclude`.
///
/// This counts the opponents a player rated `rating` is expected to place
/// above, so it grows with `rating`. A standing of size `n` maps to it
/// through `seed = n + 1 - rank`.
pub fn seed(rating: f64, ratings: &[f64], exclude: usize) -> f64 {
    1.0 + ratings
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != exclude)
        .map(|(_, other)| expected_probability(rating, *other))
        .sum::<f64>()
}

/// Expected 1-based rank of participant `exclude` if they were rated `rating`.
pub fn expected_rank(rating: f64, ratings: &[f64], exclude: usize) -> f64 {
    ratings.len() as f64 + 1.0 - seed(rating, ratings, exclude)
}

/// # Performance rating (Π)
///
/// The rating at which participant `index` would be expected to finish at
/// `rank`. Bisects [0, 4000] for a fixed number of iterations, so it always
/// terminates; targets outside the seed range reachable inside the bounds
/// saturate to the nearest bound.
///
/// A lone participant has a constant seed of 1 and saturates to 4000.
pub fn performance_rating(rank: u32, ratings: &[f64], index: usize) -> f64 {
    let target = ratings.len() as f64 + 1.0 - rank as f64;

    let mut lo = MIN_RATING;
    let mut hi = MAX_RATING;

    if target >= seed(hi, ratings, index) {
        return hi;
    }
    if target <= seed(lo, ratings, index) {
        return lo;
    }

    for _ in 0..SEARCH_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if seed(mid, ratings, index) > target {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    (lo + hi) / 2.0
}

/// Share of the gap between Π and the current rating applied in one contest.
/// Quadratic in the current rating, scaled by `log10(sqrt(n))` for contests
/// with more than one participant.
pub fn damping_factor(elo: f64, participant_count: usize) -> f64 {
    let f = DAMPING_A + DAMPING_B * elo + DAMPING_C * elo * elo;

    if participant_count > 1 {
        f * (participant_count as f64).sqrt().log10()
    } else {
        f
    }
}

/// New raw rating, clamped to [0, 4000] and rounded.
pub fn updated_raw_elo(elo: f64, performance_rating: f64, participant_count: usize) -> f64 {
    let f = damping_factor(elo, participant_count);
    let new_elo = elo + (performance_rating - elo) * f;

    new_elo.clamp(MIN_RATING, MAX_RATING).round()
}

/// Rates every participant of a finished standing.
///
/// Each participant's search is independent of the others, so they run in
/// parallel; the output keeps the standing order.
pub fn rate(standing: &ContestStanding) -> Result<Vec<RawRatingChange>, RatingError> {
    let n = standing.len();
    let ratings: Vec<f64> = standing.participants.iter().map(|p| p.current_raw_elo).collect();

    for p in &standing.participants {
        ensure_finite(&p.user_id, "current rating", p.current_raw_elo)?;
    }

    standing
        .participants
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            let performance = ensure_finite(
                &p.user_id,
                "performance rating",
                performance_rating(p.rank, &ratings, i)
            )?;
            ensure_finite(&p.user_id, "damping factor", damping_factor(p.current_raw_elo, n))?;
            let new_raw_elo = ensure_finite(
                &p.user_id,
                "raw rating",
                updated_raw_elo(p.current_raw_elo, performance, n)
            )?;

            debug!(
                "{} rank {} elo {} -> {} (Π {:.1})",
                p.user_id, p.rank, p.current_raw_elo, new_raw_elo, performance
            );

            Ok(RawRatingChange {
                user_id: p.user_id.clone(),
                performance_rating: performance,
                new_raw_elo
            })
        })
        .collect()
}
