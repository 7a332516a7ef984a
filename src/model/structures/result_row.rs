use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::model::{display::format_penalty, structures::verdict::Verdict};

/// One participant's raw row from the contest standing table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRow {
    pub user_id: String,
    pub score: f64,
    /// Seconds, lower is better
    pub penalty: f64,
    /// Keyed by problem id
    #[serde(default)]
    pub problems: BTreeMap<String, ProblemResult>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProblemResult {
    /// Partial score, only present for partially scored problems
    #[serde(default)]
    pub score: Option<f64>,
    /// Unknown verdict codes read as `None` so they only blank their own cell
    #[serde(default, deserialize_with = "lenient_verdict")]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub tries: u32,
    /// Time of the accepted submission
    #[serde(default)]
    pub time: Option<DateTime<FixedOffset>>
}

fn lenient_verdict<'de, D>(deserializer: D) -> Result<Option<Verdict>, D::Error>
where
    D: Deserializer<'de>
{
    let code = Option::<String>::deserialize(deserializer)?;
    Ok(code.and_then(|c| match Verdict::try_from(c.as_str()) {
        Ok(v) => Some(v),
        Err(()) => {
            warn!("Unknown verdict {:?}", c);
            None
        }
    }))
}

impl ProblemResult {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Some(Verdict::Accepted)
    }

    /// Standings cell text: `+` / `+k` when accepted after k failed tries,
    /// the rounded partial score, or `-t` for t failed tries.
    /// Empty when the problem was never attempted.
    pub fn summary(&self) -> String {
        if self.tries == 0 {
            return String::new();
        }

        if self.is_accepted() {
            return match self.tries {
                1 => "+".to_string(),
                t => format!("+{}", t - 1)
            };
        }

        match self.score {
            Some(s) if s > 0.0 => format!("{}", s.round() as i64),
            _ => format!("-{}", self.tries)
        }
    }

    /// Accepted solve time relative to contest start, `HH:MM:SS`.
    pub fn solve_time(&self, contest_start: DateTime<FixedOffset>) -> Option<String> {
        if !self.is_accepted() {
            return None;
        }

        self.time
            .map(|t| format_penalty((t - contest_start).num_seconds() as f64))
    }
}
