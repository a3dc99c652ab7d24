use chrono::Weekday;

use crate::models::{Block, Indicator};
use crate::navigation::SchoolDay;

/// Finds the block that contains `now_minutes` on the displayed day.
///
/// Returns `None` when the displayed day is not today, or when no block's
/// half-open span covers the current minute (before school, after school, or
/// inside a long gap that has no block).
pub fn locate(
    blocks: &[Block],
    now_minutes: u32,
    now_day: Weekday,
    displayed_day: SchoolDay,
) -> Option<Indicator> {
    if displayed_day.weekday() != now_day {
        return None;
    }

    let (index, block) = blocks
        .iter()
        .enumerate()
        .find(|(_, block)| block.contains(now_minutes))?;

    let offset_fraction = (now_minutes - block.start) as f64 / block.duration() as f64;
    Some(Indicator {
        block: index,
        offset_fraction,
    })
}
