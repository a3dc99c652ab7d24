use crate::app::App;
use crate::error::ScheduleError;
use crate::navigation::{NavRequest, initial_day};
use chrono::{Datelike, NaiveDateTime};
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

/// A fixed-interval recurring task driven by the event loop.
///
/// The loop asks how long it may wait for input, then polls `fire`. Once
/// cancelled the ticker never fires again.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: Some(now),
        }
    }

    /// Time left until the next tick, or `None` when cancelled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true when a tick is due and schedules the following one.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        // Skip missed ticks instead of bursting to catch up.
        let mut next = due + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.next_due = Some(next);
        true
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }
}

pub fn tick(app: &mut App, now: NaiveDateTime) {
    handle_load_completion(app);
    handle_day_rollover(app, now);
    app.set_now(now);

    if let Some(expiry) = app.toast_expiry
        && now >= expiry
    {
        app.toast_expiry = None;
        app.toast_message = None;
    }
}

/// Applies the background load result once it has arrived.
pub fn handle_load_completion(app: &mut App) {
    let result = {
        let Some(receiver) = app.load_receiver.as_ref() else {
            return;
        };
        receiver.try_recv()
    };

    match result {
        Ok(loaded) => {
            app.load_receiver = None;
            let ok = loaded.is_ok();
            app.apply_load_result(loaded);
            if ok {
                app.toast("Timetable loaded.");
            }
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            app.load_receiver = None;
            app.apply_load_result(Err(ScheduleError::LoaderStopped));
        }
    }
}

fn handle_day_rollover(app: &mut App, now: NaiveDateTime) {
    let today = now.date();
    if today == app.active_date {
        return;
    }

    // Follow the calendar only when the viewer was looking at "today".
    let was_on_today = app.current_day == initial_day(app.active_date.weekday());
    app.active_date = today;
    app.now = now;
    if was_on_today {
        app.navigate(NavRequest::Today);
        tracing::info!(day = app.current_day.name(), "new day, following today");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Schedule;
    use crate::navigation::SchoolDay;
    use crate::storage::ScheduleSource;
    use chrono::NaiveDate;
    use std::sync::mpsc;

    const JSON: &str = r#"{
        "periods": [
            { "name": "P1", "start_time": "09:00", "end_time": "10:00", "is_lesson": true },
            { "name": "P2", "start_time": "10:10", "end_time": "11:00", "is_lesson": true }
        ],
        "week": {}
    }"#;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn app_at(now: NaiveDateTime) -> App {
        App::new(Config::default(), ScheduleSource::parse("t.json"), now)
    }

    #[test]
    fn ticker_fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::start(Duration::from_secs(1), start);
        assert!(ticker.fire(start));
        assert!(!ticker.fire(start + Duration::from_millis(500)));
        assert_eq!(
            ticker.time_until_due(start + Duration::from_millis(500)),
            Some(Duration::from_millis(500))
        );
        assert!(ticker.fire(start + Duration::from_millis(1000)));
        // A long stall produces a single tick, not a burst.
        assert!(ticker.fire(start + Duration::from_millis(5500)));
        assert!(!ticker.fire(start + Duration::from_millis(5600)));
    }

    #[test]
    fn cancelled_ticker_stays_silent() {
        let start = Instant::now();
        let mut ticker = Ticker::start(Duration::from_secs(1), start);
        ticker.cancel();
        assert!(!ticker.fire(start + Duration::from_secs(10)));
        assert_eq!(ticker.time_until_due(start), None);
    }

    #[test]
    fn tick_applies_finished_load() {
        let mut app = app_at(at(15, 10, 5));
        let (tx, rx) = mpsc::channel();
        app.load_receiver = Some(rx);

        tick(&mut app, at(15, 10, 5));
        assert!(app.schedule.is_none());

        tx.send(Schedule::from_json(JSON)).unwrap();
        tick(&mut app, at(15, 10, 5));
        assert!(app.load_receiver.is_none());
        assert_eq!(app.blocks.len(), 3);
        assert_eq!(app.indicator.map(|i| i.block), Some(1));
        assert_eq!(app.toast_message.as_deref(), Some("Timetable loaded."));
    }

    #[test]
    fn dropped_loader_is_reported_as_failure() {
        let mut app = app_at(at(15, 10, 5));
        let (tx, rx) = mpsc::channel();
        app.load_receiver = Some(rx);
        drop(tx);

        tick(&mut app, at(15, 10, 5));
        assert!(matches!(app.load_state, crate::app::LoadState::Failed(_)));
    }

    #[test]
    fn expires_toasts() {
        let mut app = app_at(at(15, 10, 0));
        app.toast("hello");
        tick(&mut app, at(15, 10, 0));
        assert!(app.toast_message.is_some());
        tick(&mut app, at(15, 10, 1));
        assert!(app.toast_message.is_none());
    }

    #[test]
    fn rollover_follows_today_only_when_viewing_today() {
        let mut app = app_at(at(15, 23, 59));
        app.apply_load_result(Schedule::from_json(JSON));
        assert_eq!(app.current_day, SchoolDay::Wednesday);

        tick(&mut app, at(16, 0, 1));
        assert_eq!(app.current_day, SchoolDay::Thursday);

        app.navigate(NavRequest::Select(SchoolDay::Monday));
        tick(&mut app, at(17, 0, 1));
        assert_eq!(app.current_day, SchoolDay::Monday);
    }
}
