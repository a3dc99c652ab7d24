use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating timetable data.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid time {value:?}: expected HH:MM")]
    InvalidTime { value: String },
    #[error("timetable has no periods")]
    NoPeriods,
    #[error("period {name:?} ends before it starts")]
    InvertedPeriod { name: String },
    #[error("period {later:?} overlaps or precedes period {earlier:?}")]
    OutOfOrder { earlier: String, later: String },
    #[error("period name {0:?} is used more than once")]
    DuplicatePeriod(String),
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch timetable: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("failed to parse timetable: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("timetable loader stopped without a result")]
    LoaderStopped,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("failed to save config to {path:?}: {source}")]
    ConfigSave {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
