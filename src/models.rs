use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::clock::to_minutes;
use crate::error::ScheduleError;
use crate::navigation::SchoolDay;

/// A named slot in the daily skeleton, shared by every day of the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub is_lesson: bool,
}

impl Period {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub subject: String,
    #[serde(default)]
    pub teachers: Vec<String>,
    #[serde(default)]
    pub session_code: String,
}

pub type DaySessions = HashMap<String, Session>;

/// The loaded timetable. Read-only once constructed.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pub periods: Vec<Period>,
    pub week: HashMap<String, DaySessions>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    name: String,
    start_time: String,
    end_time: String,
    is_lesson: bool,
}

#[derive(Debug, Deserialize)]
struct RawSchedule {
    periods: Vec<RawPeriod>,
    #[serde(default)]
    week: HashMap<String, DaySessions>,
}

impl Schedule {
    pub fn from_json(content: &str) -> Result<Self, ScheduleError> {
        let raw: RawSchedule = serde_json::from_str(content)?;
        let periods = raw
            .periods
            .into_iter()
            .map(|p| {
                Ok(Period {
                    start: to_minutes(&p.start_time)?,
                    end: to_minutes(&p.end_time)?,
                    name: p.name,
                    is_lesson: p.is_lesson,
                })
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;
        Self::new(periods, raw.week)
    }

    /// Builds a schedule, rejecting period lists that break the skeleton's
    /// ordering: periods must be non-empty, non-overlapping and sorted.
    pub fn new(
        periods: Vec<Period>,
        week: HashMap<String, DaySessions>,
    ) -> Result<Self, ScheduleError> {
        if periods.is_empty() {
            return Err(ScheduleError::NoPeriods);
        }

        let mut seen = HashSet::new();
        for period in &periods {
            if period.end <= period.start {
                return Err(ScheduleError::InvertedPeriod {
                    name: period.name.clone(),
                });
            }
            if !seen.insert(period.name.as_str()) {
                return Err(ScheduleError::DuplicatePeriod(period.name.clone()));
            }
        }

        for pair in periods.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(ScheduleError::OutOfOrder {
                    earlier: pair[0].name.clone(),
                    later: pair[1].name.clone(),
                });
            }
        }

        Ok(Self { periods, week })
    }

    /// Sessions for a day; `None` when the file has no entry for it.
    pub fn sessions_for(&self, day: SchoolDay) -> Option<&DaySessions> {
        self.week.get(day.name())
    }

    pub fn day_start(&self) -> u32 {
        self.periods.first().map(|p| p.start).unwrap_or(0)
    }

    pub fn day_end(&self) -> u32 {
        self.periods.last().map(|p| p.end).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Lesson,
    FreePeriod,
    Break,
    ShortGap,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Lesson => "lesson",
            BlockKind::FreePeriod => "free-period",
            BlockKind::Break => "break",
            BlockKind::ShortGap => "short-gap",
        }
    }
}

/// Display fields for a session attached to a lesson block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub title: String,
    pub teachers: String,
    pub code: String,
}

/// One unit of the rendered day: a period or a short gap between two periods.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub start: u32,
    pub end: u32,
    pub size_fraction: f64,
    pub period: Option<String>,
    pub label: Option<String>,
    pub corner_tag: Option<String>,
    pub session: Option<SessionView>,
}

impl Block {
    pub fn contains(&self, minutes: u32) -> bool {
        self.start <= minutes && minutes < self.end
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Where the "now" marker sits: which block, and how far into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub block: usize,
    pub offset_fraction: f64,
}
