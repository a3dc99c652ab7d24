use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::error::ScheduleError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Converts an `HH:MM` time of day into minutes after midnight.
///
/// Hours may be written with one or two digits; minutes always take two.
/// `24:00` is accepted so a period can run to the end of the day.
pub fn to_minutes(value: &str) -> Result<u32, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime {
        value: value.to_string(),
    };

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.chars().all(|c| c.is_ascii_digit())
        || !minutes.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 || hours > 24 {
        return Err(invalid());
    }

    let total = hours * 60 + minutes;
    if total > MINUTES_PER_DAY {
        return Err(invalid());
    }
    Ok(total)
}

pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// A wall-clock reading reduced to what the day view needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub weekday: Weekday,
    pub minutes: u32,
}

impl WallClock {
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            weekday: at.weekday(),
            minutes: at.hour() * 60 + at.minute(),
        }
    }
}
