use reqwest::blocking::Client;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crate::error::ScheduleError;
use crate::models::Schedule;

/// Where the timetable JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    File(PathBuf),
    Remote(String),
}

impl ScheduleSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            ScheduleSource::Remote(location.to_string())
        } else {
            ScheduleSource::File(PathBuf::from(location))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ScheduleSource::File(path) => path.display().to_string(),
            ScheduleSource::Remote(url) => url.clone(),
        }
    }

    pub fn load(&self, timeout: Duration) -> Result<Schedule, ScheduleError> {
        let content = match self {
            ScheduleSource::File(path) => {
                fs::read_to_string(path).map_err(|source| ScheduleError::Read {
                    path: path.clone(),
                    source,
                })?
            }
            ScheduleSource::Remote(url) => fetch(url, timeout)?,
        };
        Schedule::from_json(&content)
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<String, ScheduleError> {
    let client = Client::builder().timeout(timeout).build()?;
    let resp = client.get(url).send()?.error_for_status()?;
    Ok(resp.text()?)
}

pub type LoadResult = Result<Schedule, ScheduleError>;

/// Loads the schedule on a worker thread; the result arrives on the receiver.
pub fn spawn_load(source: ScheduleSource, timeout: Duration) -> Receiver<LoadResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        tracing::debug!(source = %source.describe(), "loading timetable");
        let _ = tx.send(source.load(timeout));
    });
    rx
}
