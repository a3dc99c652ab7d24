use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{self, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, LoadState};
use crate::clock::format_minutes;
use crate::models::{Block, BlockKind};
use crate::navigation::SchoolDay;

pub mod color_parser;
pub mod components;
pub mod popups;
pub mod theme;

use components::{RowSpan, block_rows, content_rows, fit_to_width, indicator_row};
use popups::render_help_popup;
use theme::ThemeTokens;

const GUTTER_WIDTH: usize = 6; // "HH:MM "

pub fn ui(f: &mut Frame, app: &mut App) {
    let tokens = ThemeTokens::from_theme(&app.config.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_day_tabs(f, app, chunks[0], &tokens);
    render_day_view(f, app, chunks[1], &tokens);
    render_status_line(f, app, chunks[2], &tokens);

    if app.show_help_popup {
        render_help_popup(f, app, &tokens);
    }
}

fn render_day_tabs(f: &mut Frame, app: &mut App, area: Rect, tokens: &ThemeTokens) {
    let tab_width = area.width / SchoolDay::ALL.len() as u16;
    app.day_tabs.clear();

    for (i, day) in SchoolDay::ALL.iter().enumerate() {
        let x = area.x + tab_width * i as u16;
        let width = if i + 1 == SchoolDay::ALL.len() {
            area.width.saturating_sub(tab_width * i as u16)
        } else {
            tab_width
        };
        let tab_area = Rect::new(x, area.y, width, 1);
        app.day_tabs.push((tab_area, *day));

        let is_today = day.weekday() == app.now.weekday();
        let label = if width as usize >= day.name().len() + 4 {
            day.name()
        } else {
            day.short_name()
        };
        let label = if is_today {
            format!("{label} •")
        } else {
            label.to_string()
        };
        let style = if *day == app.current_day {
            Style::default()
                .fg(Color::Black)
                .bg(tokens.tab_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(tokens.tab_inactive)
        };
        f.render_widget(
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(style),
            tab_area,
        );
    }
}

fn render_day_view(f: &mut Frame, app: &mut App, area: Rect, tokens: &ThemeTokens) {
    let title = if app.is_today() {
        format!(" {} (today) ", app.current_day.name())
    } else {
        format!(" {} ", app.current_day.name())
    };
    let frame = widgets::Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tokens.ui_border));
    let inner = frame.inner(area);
    f.render_widget(frame, area);

    app.viewport_height = inner.height;
    let placeholder = match (&app.load_state, app.blocks.is_empty()) {
        (LoadState::Loading, _) => Some(("Loading timetable…".to_string(), tokens.status)),
        (LoadState::Failed(message), _) => Some((
            format!("Could not load timetable: {message}"),
            tokens.error,
        )),
        (LoadState::Ready, true) => Some(("No periods to show.".to_string(), tokens.status)),
        (LoadState::Ready, false) => None,
    };
    if let Some((text, color)) = placeholder {
        app.content_height = inner.height;
        app.scroll_offset = 0;
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(color)),
            inner,
        );
        return;
    }

    let span_minutes = app
        .schedule
        .as_ref()
        .map(|schedule| schedule.day_end() - schedule.day_start())
        .unwrap_or(0);
    let rows = content_rows(span_minutes, app.config.ui.rows_per_hour, inner.height);
    app.content_height = rows;

    let spans = block_rows(&app.blocks, rows);
    let marker_row = app
        .indicator
        .as_ref()
        .and_then(|indicator| indicator_row(&spans, indicator));

    if app.indicator_scroll_pending {
        if let Some(row) = marker_row {
            app.scroll_to_row(row);
        }
        app.indicator_scroll_pending = false;
    }
    app.scroll_offset = app.scroll_offset.min(rows.saturating_sub(inner.height));

    let marker = marker_row.map(|row| (row, app.clock().minutes));
    let lines = day_lines(&app.blocks, &spans, rows, marker, inner.width, tokens);
    f.render_widget(
        Paragraph::new(lines).scroll((app.scroll_offset, 0)),
        inner,
    );
}

/// Materializes the block list into one line per content row.
///
/// `marker` is the indicator row and the minute it represents; that row is
/// drawn as a rule across the column instead of block content.
pub fn day_lines(
    blocks: &[Block],
    spans: &[RowSpan],
    total_rows: u16,
    marker: Option<(u16, u32)>,
    width: u16,
    tokens: &ThemeTokens,
) -> Vec<Line<'static>> {
    let width = width as usize;
    let body_width = width.saturating_sub(GUTTER_WIDTH);
    let mut lines: Vec<Line<'static>> = (0..total_rows).map(|_| Line::default()).collect();

    for (block, span) in blocks.iter().zip(spans) {
        let content = block_content(block, body_width);
        for offset in 0..span.height {
            let row = (span.start + offset) as usize;
            let Some(slot) = lines.get_mut(row) else {
                break;
            };
            *slot = block_line(block, offset, &content, body_width, tokens);
        }
    }

    if let Some((row, minutes)) = marker
        && let Some(slot) = lines.get_mut(row as usize)
    {
        let style = Style::default()
            .fg(tokens.indicator)
            .add_modifier(Modifier::BOLD);
        *slot = Line::from(vec![
            Span::styled(format!("{:<GUTTER_WIDTH$}", format_minutes(minutes)), style),
            Span::styled("━".repeat(body_width), style),
        ]);
    }

    lines
}

fn block_content(block: &Block, width: usize) -> Vec<(String, Style)> {
    let wrap_width = width.saturating_sub(2).max(1);
    match (&block.session, block.kind) {
        (Some(session), _) => {
            let mut content: Vec<(String, Style)> = textwrap::wrap(&session.title, wrap_width)
                .into_iter()
                .map(|line| (line.into_owned(), Style::default().add_modifier(Modifier::BOLD)))
                .collect();
            if !session.teachers.is_empty() {
                content.push((session.teachers.clone(), Style::default()));
            }
            if !session.code.is_empty() {
                content.push((
                    session.code.clone(),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            content
        }
        (None, BlockKind::ShortGap) => Vec::new(),
        (None, kind) => {
            let style = if kind == BlockKind::FreePeriod {
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM)
            } else {
                Style::default()
            };
            block
                .label
                .iter()
                .map(|label| (label.clone(), style))
                .collect()
        }
    }
}

fn block_line(
    block: &Block,
    offset: u16,
    content: &[(String, Style)],
    body_width: usize,
    tokens: &ThemeTokens,
) -> Line<'static> {
    let bg = tokens.block_background(block.kind);
    let gutter = if offset == 0 && block.kind != BlockKind::ShortGap {
        format!("{:<GUTTER_WIDTH$}", format_minutes(block.start))
    } else {
        " ".repeat(GUTTER_WIDTH)
    };

    let mut spans = vec![Span::styled(gutter, Style::default().fg(tokens.gutter))];
    let (text, style) = content
        .get(offset as usize)
        .map(|(text, style)| (format!(" {text}"), *style))
        .unwrap_or_default();

    let tag = if offset == 0 {
        block.corner_tag.as_deref().map(|tag| format!("{tag} "))
    } else {
        None
    };
    let tag_width = tag.as_ref().map(|t| t.width()).unwrap_or(0);
    let text_room = body_width.saturating_sub(tag_width);
    let text = fit_to_width(&text, text_room);
    let padding = text_room.saturating_sub(text.width());

    spans.push(Span::styled(text, style.bg(bg)));
    spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
    if let Some(tag) = tag
        && tag_width <= body_width
    {
        spans.push(Span::styled(
            tag,
            Style::default()
                .fg(tokens.corner_tag)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect, tokens: &ThemeTokens) {
    let muted = Style::default().fg(tokens.status);
    let mut spans = Vec::new();

    if app.config.ui.show_clock {
        spans.push(Span::styled(
            format!(" {} ", app.now.format("%a %H:%M")),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    let now_text = match app.current_block() {
        Some(block) => format!("Now: {}", describe_block(block)),
        None if app.is_today() => "Outside school hours".to_string(),
        None => format!("Viewing {}", app.current_day.name()),
    };
    spans.push(Span::styled(format!(" {now_text} "), muted));

    if let Some(message) = &app.toast_message {
        spans.push(Span::styled(
            format!("· {message}"),
            Style::default().fg(tokens.tab_active),
        ));
    } else if let LoadState::Failed(_) = app.load_state {
        let reload = app
            .config
            .keybindings
            .reload
            .first()
            .map(String::as_str)
            .unwrap_or("r");
        spans.push(Span::styled(
            format!("· press {reload} to retry"),
            Style::default().fg(tokens.error),
        ));
    } else {
        spans.push(Span::styled("· ? for help", muted));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn describe_block(block: &Block) -> String {
    let range = format!("{}–{}", format_minutes(block.start), format_minutes(block.end));
    match (&block.session, &block.label) {
        (Some(session), _) => format!("{} ({range})", session.title),
        (None, Some(label)) => format!("{label} ({range})"),
        (None, None) => format!("{} ({range})", block.kind.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Theme};
    use crate::models::{Period, Schedule, Session};
    use crate::storage::ScheduleSource;
    use chrono::NaiveDate;
    use ratatui::{Terminal, backend::TestBackend};
    use std::collections::HashMap;

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect::<String>()
    }

    fn schedule() -> Schedule {
        let periods = vec![
            Period { name: "P1".into(), start: 540, end: 600, is_lesson: true },
            Period { name: "P2".into(), start: 610, end: 660, is_lesson: true },
            Period { name: "Lunch".into(), start: 660, end: 700, is_lesson: false },
        ];
        let mut wednesday = HashMap::new();
        wednesday.insert(
            "P1".to_string(),
            Session {
                subject: "Science".into(),
                teachers: vec!["Ms Lee".into(), "Mr Ode".into()],
                session_code: "SCI-LEARN-3".into(),
            },
        );
        let mut week = HashMap::new();
        week.insert("Wednesday".to_string(), wednesday);
        Schedule::new(periods, week).unwrap()
    }

    fn app_at(hour: u32, minute: u32) -> App {
        // Wednesday.
        let now = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        let mut app = App::new(Config::default(), ScheduleSource::parse("t.json"), now);
        app.apply_load_result(Ok(schedule()));
        app
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_lesson_and_break_content() {
        let tokens = ThemeTokens::from_theme(&Theme::default());
        let app = app_at(8, 0);
        let spans = block_rows(&app.blocks, 32);
        let lines = day_lines(&app.blocks, &spans, 32, None, 40, &tokens);

        assert_eq!(lines.len(), 32);
        let first = line_to_string(&lines[0]);
        assert!(first.starts_with("09:00  Science - Learn"));
        assert!(first.trim_end().ends_with("P1"));
        assert!(line_to_string(&lines[1]).contains("Ms Lee, Mr Ode"));
        assert!(line_to_string(&lines[2]).contains("SCI-LEARN-3"));

        let lunch_row = spans[3].start as usize;
        assert!(line_to_string(&lines[lunch_row]).starts_with("11:00  Lunch"));
    }

    #[test]
    fn free_periods_show_their_marker() {
        let tokens = ThemeTokens::from_theme(&Theme::default());
        let app = app_at(8, 0);
        let spans = block_rows(&app.blocks, 32);
        let lines = day_lines(&app.blocks, &spans, 32, None, 40, &tokens);
        let p2_row = spans[2].start as usize;
        assert!(line_to_string(&lines[p2_row]).contains("(free period)"));
    }

    #[test]
    fn draws_indicator_rule_with_time() {
        let tokens = ThemeTokens::from_theme(&Theme::default());
        let app = app_at(10, 5);
        let spans = block_rows(&app.blocks, 32);
        let row = indicator_row(&spans, &app.indicator.unwrap()).unwrap();
        let lines = day_lines(&app.blocks, &spans, 32, Some((row, 605)), 20, &tokens);
        let rule = line_to_string(&lines[row as usize]);
        assert!(rule.starts_with("10:05 ━"));
        assert_eq!(rule.chars().filter(|c| *c == '━').count(), 14);
    }

    #[test]
    fn renders_full_frame_and_records_tabs() {
        let mut app = app_at(9, 30);
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Wednesday (today)"));
        assert!(text.contains("Science - Learn"));
        assert!(text.contains("Now: Science - Learn"));
        assert_eq!(app.day_tabs.len(), 5);
        assert_eq!(app.day_tabs[2].1, SchoolDay::Wednesday);
        assert!(!app.indicator_scroll_pending);
        assert_eq!(app.viewport_height, 20);
    }

    #[test]
    fn shows_load_failure() {
        let mut app = app_at(9, 30);
        app.apply_load_result(Err(crate::error::ScheduleError::NoPeriods));
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Could not load timetable"));
    }

    #[test]
    fn describes_blocks_for_status_line() {
        let app = app_at(9, 30);
        assert_eq!(describe_block(&app.blocks[0]), "Science - Learn (09:00–10:00)");
        assert_eq!(describe_block(&app.blocks[1]), "short-gap (10:00–10:10)");
        assert_eq!(describe_block(&app.blocks[3]), "Lunch (11:00–11:40)");
    }
}
