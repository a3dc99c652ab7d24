use crate::models::{Block, Indicator};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Helper function to calculate centered popup position
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Rows a block occupies in the scrollable day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub start: u16,
    pub height: u16,
}

/// Total rows for the day: the time span at `rows_per_hour`, stretched to fill
/// the viewport when that is shorter.
pub fn content_rows(span_minutes: u32, rows_per_hour: u16, viewport: u16) -> u16 {
    let scaled = (span_minutes as u64 * rows_per_hour as u64).div_ceil(60);
    let scaled = u16::try_from(scaled).unwrap_or(u16::MAX);
    scaled.max(viewport)
}

/// Converts size fractions into whole rows. Boundaries are rounded from the
/// running fraction total, so heights never drift from `total_rows`.
pub fn block_rows(blocks: &[Block], total_rows: u16) -> Vec<RowSpan> {
    let boundary = |fraction: f64| -> u16 {
        let row = (fraction * total_rows as f64).round();
        row.clamp(0.0, total_rows as f64) as u16
    };

    let mut cumulative = 0.0;
    let mut start = 0;
    blocks
        .iter()
        .map(|block| {
            cumulative += block.size_fraction;
            let end = boundary(cumulative).max(start);
            let span = RowSpan {
                start,
                height: end - start,
            };
            start = end;
            span
        })
        .collect()
}

/// Row of the "now" marker. A block that rounded down to no rows still gets
/// the marker at the row where it would have started.
pub fn indicator_row(spans: &[RowSpan], indicator: &Indicator) -> Option<u16> {
    let span = spans.get(indicator.block)?;
    if span.height == 0 {
        let total = spans.last().map(|last| last.start + last.height)?;
        return total.checked_sub(1).map(|last_row| span.start.min(last_row));
    }
    let within = (indicator.offset_fraction * span.height as f64).floor() as u16;
    Some(span.start + within.min(span.height - 1))
}

/// Truncates `text` to `width` display columns, marking the cut with an ellipsis.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    fitted.push('…');
    fitted
}
