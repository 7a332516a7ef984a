use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    pub id: i32,
    pub name: String,
    pub time_start: Option<DateTime<FixedOffset>>,
    pub time_end: Option<DateTime<FixedOffset>>
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContestPhase {
    Upcoming,
    Running,
    Ended
}

impl Contest {
    /// A contest without a start time has not been scheduled and counts as upcoming.
    /// A missing end time means the contest never closes.
    pub fn phase(&self, now: DateTime<FixedOffset>) -> ContestPhase {
        match (self.time_start, self.time_end) {
            (None, _) => ContestPhase::Upcoming,
            (Some(start), _) if now < start => ContestPhase::Upcoming,
            (Some(_), Some(end)) if now > end => ContestPhase::Ended,
            _ => ContestPhase::Running
        }
    }

    /// Date recorded in rating history entries
    pub fn history_date(&self) -> Option<NaiveDate> {
        self.time_end.or(self.time_start).map(|t| t.date_naive())
    }
}
