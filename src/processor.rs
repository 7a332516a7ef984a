use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt::{self, Write}
};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    database::DbClient,
    error::ProcessorError,
    messaging::{ContestRatedMessage, RabbitMqConfig, RabbitMqPublisher},
    model::{
        compute_contest_standings,
        display::{format_delta, format_penalty, format_performance},
        rating_tracker::RatingTracker,
        structures::{
            contest::{Contest, ContestPhase},
            rating_tier::{tier_for, title_for},
            rating_update_result::RatingUpdateResult,
            result_row::ResultRow
        },
        RatingConfig
    }
};

#[derive(Debug, Clone)]
pub struct RateOptions {
    pub contest_id: i32,
    pub commit: bool,
    pub force: bool,
    pub config: RatingConfig
}

/// One standings cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemCell {
    pub summary: String,
    pub solve_time: Option<String>
}

impl fmt::Display for ProblemCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.solve_time {
            Some(time) => write!(f, "{} {}", self.summary, time),
            None => write!(f, "{}", self.summary)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(flatten)]
    pub rating: RatingUpdateResult,
    /// CSS class of the new displayed rating's tier
    pub tier: &'static str,
    pub title: &'static str,
    /// Keyed by problem id
    pub problems: BTreeMap<String, ProblemCell>
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestReport {
    pub contest: Contest,
    pub results: Vec<ReportRow>,
    /// Leaderboard records written; 0 for a dry run
    pub saved: usize
}

/// Joins rating results with the standings cells of their rows.
pub fn build_report(contest: Contest, rows: &[ResultRow], results: Vec<RatingUpdateResult>, saved: usize) -> ContestReport {
    let by_user = rows.iter().map(|r| (r.user_id.as_str(), r)).collect::<HashMap<_, _>>();

    let results = results
        .into_iter()
        .map(|rating| {
            let problems = by_user
                .get(rating.user_id.as_str())
                .map(|row| {
                    row.problems
                        .iter()
                        .map(|(id, p)| {
                            let cell = ProblemCell {
                                summary: p.summary(),
                                solve_time: contest.time_start.and_then(|start| p.solve_time(start))
                            };
                            (id.clone(), cell)
                        })
                        .collect()
                })
                .unwrap_or_default();

            let displayed = rating.new_displayed_elo as f64;
            ReportRow {
                tier: tier_for(displayed).class,
                title: title_for(displayed),
                problems,
                rating
            }
        })
        .collect();

    ContestReport {
        contest,
        results,
        saved
    }
}

/// Rates a contest against the current leaderboard and, when committing,
/// writes every touched record back in one transaction.
pub async fn rate_contest(
    db: &mut DbClient,
    options: &RateOptions,
    now: DateTime<FixedOffset>
) -> Result<ContestReport, ProcessorError> {
    let (contest, rows, records) = db.load_contest(options.contest_id).await?;
    let mut tracker = RatingTracker::from_records(records);

    let mut results = compute_contest_standings(&contest, &rows, &tracker.lookup(), &options.config, now)?;

    if !options.commit {
        return Ok(build_report(contest, &rows, results, 0));
    }

    if contest.phase(now) != ContestPhase::Ended {
        if !options.force {
            return Err(ProcessorError::ContestNotFinished(contest.id));
        }

        warn!("Contest {} has not ended, committing anyway", contest.id);
        for r in results.iter_mut() {
            r.provisional = false;
        }
    }

    tracker.apply_contest(&contest, &results)?;

    let changed = tracker.get_changed();
    db.save_records(&changed).await?;
    info!("Committed ratings for contest {}", contest.id);

    Ok(build_report(contest, &rows, results, changed.len()))
}

/// Removes a contest from every stored history. Returns the number of records rewritten.
pub async fn rollback_contest(db: &mut DbClient, contest_id: i32) -> Result<usize, ProcessorError> {
    let records = db.get_leaderboard().await?;
    let mut tracker = RatingTracker::from_records(records);

    let touched = tracker.rollback_contest(contest_id);
    if touched == 0 {
        warn!("Contest {} is not in any rating history", contest_id);
        return Ok(0);
    }

    db.save_records(&tracker.get_changed()).await?;

    Ok(touched)
}

/// Notifies realtime consumers that a contest's ratings were committed.
/// A disabled publisher is not an error.
pub async fn publish_contest_rated(
    config: &RabbitMqConfig,
    contest_id: i32,
    participants: usize
) -> Result<(), ProcessorError> {
    if !config.enabled {
        info!("RabbitMQ publishing disabled");
        return Ok(());
    }

    let mut publisher = RabbitMqPublisher::connect_from_config(config).await?;
    let published = publisher
        .publish_contest_rated(&ContestRatedMessage::new(contest_id, participants))
        .await;
    publisher.close().await?;
    published?;

    Ok(())
}

pub fn render_json(report: &ContestReport) -> Result<String, ProcessorError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_table(report: &ContestReport) -> String {
    let mut out = String::new();
    let status = if report.results.iter().any(|r| r.rating.provisional) {
        " (provisional)"
    } else {
        ""
    };

    let problem_ids = report
        .results
        .iter()
        .flat_map(|r| r.problems.keys())
        .collect::<BTreeSet<_>>();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Contest {}: {}{}", report.contest.id, report.contest.name, status);
    let _ = write!(
        out,
        "{:>5}  {:<20} {:>8} {:>9} {:>6} {:>6} {:>6} {:>6}",
        "Rank", "User", "Score", "Penalty", "Perf", "Old", "New", "Delta"
    );
    for id in &problem_ids {
        let _ = write!(out, " {:>13}", id);
    }
    let _ = writeln!(out, "  Title");

    for row in &report.results {
        let r = &row.rating;
        let _ = write!(
            out,
            "{:>5}  {:<20} {:>8} {:>9} {:>6} {:>6} {:>6} {:>6}",
            r.rank,
            r.user_id,
            r.score,
            format_penalty(r.penalty),
            format_performance(r.performance_rating),
            r.old_displayed_elo,
            r.new_displayed_elo,
            format_delta(r.delta)
        );
        for id in &problem_ids {
            let cell = row.problems.get(*id).map(ProblemCell::to_string).unwrap_or_default();
            let _ = write!(out, " {:>13}", cell);
        }
        let _ = writeln!(out, "  {}", row.title);
    }

    out
}
