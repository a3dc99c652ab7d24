use crate::models::{Block, BlockKind, DaySessions, Period, Session, SessionView};

/// Gaps up to this many minutes between two periods get their own filler block.
pub const SHORT_GAP_MINUTES: u32 = 15;
pub const FREE_PERIOD_LABEL: &str = "(free period)";
const CORNER_TAG_PREFIX: &str = "P";

/// Lays out a day, sizing every block against the span from the first period's
/// start to the last period's end.
pub fn layout(periods: &[Period], day_sessions: Option<&DaySessions>) -> Vec<Block> {
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Vec::new();
    };
    let span = last.end.saturating_sub(first.start);
    layout_with_span(periods, day_sessions, span)
}

/// Produces the ordered block list for one day.
///
/// Each period yields one block. Between consecutive periods a short-gap block
/// is inserted when the gap is positive and at most [`SHORT_GAP_MINUTES`];
/// longer gaps are left out entirely, so they take no room in the view.
pub fn layout_with_span(
    periods: &[Period],
    day_sessions: Option<&DaySessions>,
    span_minutes: u32,
) -> Vec<Block> {
    let fraction = |minutes: u32| {
        if span_minutes == 0 {
            0.0
        } else {
            minutes as f64 / span_minutes as f64
        }
    };

    let mut blocks = Vec::with_capacity(periods.len() * 2);
    for (index, period) in periods.iter().enumerate() {
        let session = day_sessions
            .and_then(|sessions| sessions.get(&period.name))
            .filter(|_| period.is_lesson);
        blocks.push(period_block(period, session, fraction(period.duration())));

        let Some(next) = periods.get(index + 1) else {
            continue;
        };
        if let Some(gap) = next.start.checked_sub(period.end)
            && gap > 0
            && gap <= SHORT_GAP_MINUTES
        {
            blocks.push(Block {
                kind: BlockKind::ShortGap,
                start: period.end,
                end: next.start,
                size_fraction: fraction(gap),
                period: None,
                label: None,
                corner_tag: None,
                session: None,
            });
        }
    }
    blocks
}

fn period_block(period: &Period, session: Option<&Session>, size_fraction: f64) -> Block {
    let (kind, label, session) = match session {
        Some(session) => (BlockKind::Lesson, None, Some(session_view(session))),
        None if period.is_lesson => (
            BlockKind::FreePeriod,
            Some(FREE_PERIOD_LABEL.to_string()),
            None,
        ),
        None => (BlockKind::Break, Some(period.name.clone()), None),
    };

    Block {
        kind,
        start: period.start,
        end: period.end,
        size_fraction,
        period: Some(period.name.clone()),
        label,
        corner_tag: period
            .name
            .starts_with(CORNER_TAG_PREFIX)
            .then(|| period.name.clone()),
        session,
    }
}

pub fn session_view(session: &Session) -> SessionView {
    SessionView {
        title: format!("{}{}", session.subject, category_suffix(&session.session_code)),
        teachers: session.teachers.join(", "),
        code: session.session_code.clone(),
    }
}

/// Suffix derived from the category tag carried in a session code.
pub fn category_suffix(session_code: &str) -> &'static str {
    if session_code.contains("LEARN") {
        " - Learn"
    } else if session_code.contains("EXP") {
        " - Explore"
    } else {
        ""
    }
}
