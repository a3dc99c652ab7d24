use crate::clock::WallClock;
use crate::config::Config;
use crate::indicator::locate;
use crate::layout::layout;
use crate::models::{Block, Indicator, Schedule};
use crate::navigation::{NavRequest, SchoolDay, classify_swipe, initial_day};
use crate::storage::{LoadResult, ScheduleSource, spawn_load};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use ratatui::layout::{Position, Rect};
use std::sync::mpsc::Receiver;

const TOAST_SECONDS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Owns everything the day view needs. Input, the ticker and the loader all
/// go through methods here; the renderer only reads the result.
pub struct App {
    pub config: Config,
    pub source: ScheduleSource,
    pub schedule: Option<Schedule>,
    pub load_state: LoadState,
    pub load_receiver: Option<Receiver<LoadResult>>,

    pub current_day: SchoolDay,
    pub now: NaiveDateTime,
    pub active_date: NaiveDate,
    pub blocks: Vec<Block>,
    pub indicator: Option<Indicator>,
    /// Set when the indicator appears or moves to another block; the renderer
    /// scrolls it into view and clears the flag.
    pub indicator_scroll_pending: bool,

    pub scroll_offset: u16,
    // Filled in during render.
    pub viewport_height: u16,
    pub content_height: u16,
    pub day_tabs: Vec<(Rect, SchoolDay)>,

    pub drag_origin: Option<(u16, u16)>,
    pub show_help_popup: bool,
    pub toast_message: Option<String>,
    pub toast_expiry: Option<NaiveDateTime>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, source: ScheduleSource, now: NaiveDateTime) -> App {
        let current_day = initial_day(now.weekday());
        App {
            config,
            source,
            schedule: None,
            load_state: LoadState::Loading,
            load_receiver: None,
            current_day,
            now,
            active_date: now.date(),
            blocks: Vec::new(),
            indicator: None,
            indicator_scroll_pending: false,
            scroll_offset: 0,
            viewport_height: 0,
            content_height: 0,
            day_tabs: Vec::new(),
            drag_origin: None,
            show_help_popup: false,
            toast_message: None,
            toast_expiry: None,
            should_quit: false,
        }
    }

    pub fn clock(&self) -> WallClock {
        WallClock::from_datetime(self.now)
    }

    pub fn begin_load(&mut self) {
        tracing::info!(source = %self.source.describe(), "loading timetable");
        self.load_state = LoadState::Loading;
        self.load_receiver = Some(spawn_load(
            self.source.clone(),
            self.config.source.timeout(),
        ));
    }

    pub fn apply_load_result(&mut self, result: LoadResult) {
        match result {
            Ok(schedule) => {
                tracing::info!(
                    periods = schedule.periods.len(),
                    days = schedule.week.len(),
                    "timetable loaded"
                );
                self.schedule = Some(schedule);
                self.load_state = LoadState::Ready;
            }
            Err(err) => {
                tracing::error!(source = %self.source.describe(), "error loading timetable: {err}");
                self.schedule = None;
                self.load_state = LoadState::Failed(err.to_string());
            }
        }
        self.relayout();
    }

    pub fn navigate(&mut self, request: NavRequest) {
        let day = request.resolve(self.current_day, self.now.weekday());
        tracing::debug!(?request, from = self.current_day.name(), to = day.name(), "navigate");
        self.current_day = day;
        self.relayout();
    }

    /// Rebuilds the block list for the current day from the loaded schedule.
    pub fn relayout(&mut self) {
        self.blocks = match &self.schedule {
            Some(schedule) => layout(
                &schedule.periods,
                schedule.sessions_for(self.current_day),
            ),
            None => Vec::new(),
        };
        self.scroll_offset = 0;
        self.indicator = None;
        self.refresh_indicator();
    }

    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.refresh_indicator();
    }

    pub fn refresh_indicator(&mut self) {
        let clock = self.clock();
        let located = locate(&self.blocks, clock.minutes, clock.weekday, self.current_day);
        let moved = match (self.indicator, located) {
            (None, Some(_)) => true,
            (Some(before), Some(after)) => before.block != after.block,
            _ => false,
        };
        if moved && self.config.ui.auto_scroll {
            self.indicator_scroll_pending = true;
        }
        self.indicator = located;
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.indicator.and_then(|indicator| self.blocks.get(indicator.block))
    }

    pub fn is_today(&self) -> bool {
        self.current_day.weekday() == self.now.weekday()
    }

    fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(self.max_scroll());
    }

    /// Scrolls so `row` sits roughly in the middle of the viewport.
    pub fn scroll_to_row(&mut self, row: u16) {
        let half = self.viewport_height / 2;
        self.scroll_offset = row.saturating_sub(half).min(self.max_scroll());
    }

    pub fn day_at(&self, column: u16, row: u16) -> Option<SchoolDay> {
        self.day_tabs
            .iter()
            .find(|(area, _)| area.contains(Position::new(column, row)))
            .map(|(_, day)| *day)
    }

    pub fn begin_drag(&mut self, column: u16, row: u16) {
        self.drag_origin = Some((column, row));
    }

    /// Ends a drag. A long horizontal drag changes day; a release on a day tab
    /// selects that day.
    pub fn end_drag(&mut self, column: u16, row: u16) {
        let Some((start_column, start_row)) = self.drag_origin.take() else {
            return;
        };

        let swipe = classify_swipe(
            (start_column as f64, start_row as f64),
            (column as f64, row as f64),
            self.config.navigation.swipe_threshold,
        );
        if let Some(request) = swipe {
            self.navigate(request);
            return;
        }

        if let Some(day) = self.day_at(column, row)
            && self.day_at(start_column, start_row) == Some(day)
        {
            self.navigate(NavRequest::Select(day));
        }
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(self.now + Duration::seconds(TOAST_SECONDS));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::{BlockKind, Period, Session};
    use std::collections::HashMap;

    // 2025-01-15 is a Wednesday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn schedule() -> Schedule {
        let periods = vec![
            Period { name: "P1".into(), start: 540, end: 600, is_lesson: true },
            Period { name: "P2".into(), start: 610, end: 660, is_lesson: true },
        ];
        let mut wednesday = HashMap::new();
        wednesday.insert(
            "P1".to_string(),
            Session {
                subject: "Maths".into(),
                teachers: vec!["Ms Lee".into()],
                session_code: "MAT-EXP-2".into(),
            },
        );
        let mut week = HashMap::new();
        week.insert("Wednesday".to_string(), wednesday);
        Schedule::new(periods, week).unwrap()
    }

    fn loaded_app(now: NaiveDateTime) -> App {
        let mut app = App::new(
            Config::default(),
            ScheduleSource::parse("timetable.json"),
            now,
        );
        app.apply_load_result(Ok(schedule()));
        app
    }

    #[test]
    fn starts_on_today_or_monday() {
        let app = App::new(Config::default(), ScheduleSource::parse("t.json"), at(15, 8, 0));
        assert_eq!(app.current_day, SchoolDay::Wednesday);
        assert_eq!(app.load_state, LoadState::Loading);

        let weekend = App::new(Config::default(), ScheduleSource::parse("t.json"), at(18, 8, 0));
        assert_eq!(weekend.current_day, SchoolDay::Monday);
    }

    #[test]
    fn lays_out_today_after_load() {
        let app = loaded_app(at(15, 9, 30));
        assert_eq!(app.blocks.len(), 3);
        assert_eq!(app.blocks[0].kind, BlockKind::Lesson);
        assert_eq!(
            app.blocks[0].session.as_ref().map(|s| s.title.as_str()),
            Some("Maths - Explore")
        );
        let indicator = app.indicator.unwrap();
        assert_eq!(indicator.block, 0);
        assert!((indicator.offset_fraction - 0.5).abs() < 1e-9);
        assert!(app.indicator_scroll_pending);
    }

    #[test]
    fn other_days_have_no_indicator_and_no_lessons() {
        let mut app = loaded_app(at(15, 9, 30));
        app.navigate(NavRequest::Next);
        assert_eq!(app.current_day, SchoolDay::Thursday);
        assert!(app.indicator.is_none());
        assert!(app.blocks.iter().all(|b| b.kind != BlockKind::Lesson));

        app.navigate(NavRequest::Today);
        assert_eq!(app.current_day, SchoolDay::Wednesday);
        assert!(app.indicator.is_some());
    }

    #[test]
    fn tick_moves_indicator_between_blocks() {
        let mut app = loaded_app(at(15, 9, 59));
        app.indicator_scroll_pending = false;

        app.set_now(at(15, 9, 59));
        assert!(!app.indicator_scroll_pending);

        app.set_now(at(15, 10, 5));
        assert_eq!(app.indicator.map(|i| i.block), Some(1));
        assert!(app.indicator_scroll_pending);

        app.set_now(at(15, 11, 0));
        assert!(app.indicator.is_none());
    }

    #[test]
    fn failed_load_leaves_view_empty() {
        let mut app = loaded_app(at(15, 9, 30));
        app.apply_load_result(Err(ScheduleError::NoPeriods));
        assert!(app.schedule.is_none());
        assert!(app.blocks.is_empty());
        assert!(app.indicator.is_none());
        assert!(matches!(app.load_state, LoadState::Failed(_)));
    }

    #[test]
    fn horizontal_drag_changes_day() {
        let mut app = loaded_app(at(15, 9, 30));
        app.config.navigation.swipe_threshold = 10.0;

        app.begin_drag(40, 10);
        app.end_drag(20, 11);
        assert_eq!(app.current_day, SchoolDay::Thursday);

        app.begin_drag(20, 10);
        app.end_drag(40, 10);
        assert_eq!(app.current_day, SchoolDay::Wednesday);

        app.begin_drag(20, 5);
        app.end_drag(35, 30);
        assert_eq!(app.current_day, SchoolDay::Wednesday);
    }

    #[test]
    fn clicking_a_tab_selects_its_day() {
        let mut app = loaded_app(at(15, 9, 30));
        app.day_tabs = vec![
            (Rect::new(0, 0, 10, 1), SchoolDay::Monday),
            (Rect::new(10, 0, 10, 1), SchoolDay::Tuesday),
        ];
        app.begin_drag(12, 0);
        app.end_drag(13, 0);
        assert_eq!(app.current_day, SchoolDay::Tuesday);
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut app = loaded_app(at(15, 9, 30));
        app.viewport_height = 10;
        app.content_height = 25;
        app.scroll_down(100);
        assert_eq!(app.scroll_offset, 15);
        app.scroll_up(4);
        assert_eq!(app.scroll_offset, 11);
        app.scroll_to_row(3);
        assert_eq!(app.scroll_offset, 0);
    }
}
