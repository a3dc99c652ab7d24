use chrono::Weekday;

/// Days that carry a timetable. The weekend never has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
        }
    }

    pub fn short_name(&self) -> &'static str {
        &self.name()[..3]
    }

    pub fn index(&self) -> usize {
        match self {
            SchoolDay::Monday => 0,
            SchoolDay::Tuesday => 1,
            SchoolDay::Wednesday => 2,
            SchoolDay::Thursday => 3,
            SchoolDay::Friday => 4,
        }
    }

    pub fn from_index(index: usize) -> SchoolDay {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn from_weekday(weekday: Weekday) -> Option<SchoolDay> {
        match weekday {
            Weekday::Mon => Some(SchoolDay::Monday),
            Weekday::Tue => Some(SchoolDay::Tuesday),
            Weekday::Wed => Some(SchoolDay::Wednesday),
            Weekday::Thu => Some(SchoolDay::Thursday),
            Weekday::Fri => Some(SchoolDay::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            SchoolDay::Monday => Weekday::Mon,
            SchoolDay::Tuesday => Weekday::Tue,
            SchoolDay::Wednesday => Weekday::Wed,
            SchoolDay::Thursday => Weekday::Thu,
            SchoolDay::Friday => Weekday::Fri,
        }
    }

    pub fn next(&self) -> SchoolDay {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> SchoolDay {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

/// The day shown at startup: today, or Monday over the weekend.
pub fn initial_day(today: Weekday) -> SchoolDay {
    SchoolDay::from_weekday(today).unwrap_or(SchoolDay::Monday)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    Select(SchoolDay),
    Next,
    Previous,
    Today,
}

impl NavRequest {
    pub fn resolve(self, current: SchoolDay, today: Weekday) -> SchoolDay {
        match self {
            NavRequest::Select(day) => day,
            NavRequest::Next => current.next(),
            NavRequest::Previous => current.previous(),
            NavRequest::Today => initial_day(today),
        }
    }
}

pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// Classifies a drag from `start` to `end` as a day-change swipe.
///
/// The horizontal distance has to exceed both `threshold` and the vertical
/// distance, so scroll-like drags are ignored. Dragging left moves forward.
pub fn classify_swipe(start: (f64, f64), end: (f64, f64), threshold: f64) -> Option<NavRequest> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    if dx.abs() <= threshold || dx.abs() <= dy.abs() {
        return None;
    }
    if dx < 0.0 {
        Some(NavRequest::Next)
    } else {
        Some(NavRequest::Previous)
    }
}
