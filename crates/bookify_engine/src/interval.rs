// --- File: crates/bookify_engine/src/interval.rs ---
//! Interval and conflict primitives.
//!
//! Pure functions over half-open `[start, end)` intervals. The overlap rule
//! here is the single definition used everywhere conflicts are evaluated:
//! strict inequalities, so intervals that merely touch never conflict.

use crate::models::{Buffer, BusyInterval, TimeInterval};
use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

/// Whether two half-open intervals overlap: `a.start < b.end && a.end > b.start`.
///
/// Symmetric, and reflexive on non-degenerate intervals. `9:00–9:20`
/// followed by `9:20–9:40` does not overlap.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start < b.end && a.end > b.start
}

/// Expands an interval by a buffer: `[start - before, end + after)`.
///
/// Only ever applied to booking-sourced intervals, and only during slot
/// generation. Conflict checks run buffer-free.
pub fn expand_with_buffer(interval: &TimeInterval, buffer: &Buffer) -> TimeInterval {
    TimeInterval {
        start: interval.start - Duration::minutes(buffer.before_minutes),
        end: interval.end + Duration::minutes(buffer.after_minutes),
    }
}

/// Whether a full-day busy interval occupies the given calendar day in the
/// tenant's timezone.
///
/// Containment is inclusive at calendar-day granularity: a commitment
/// spanning D1–D3 covers D1, D2 and D3, but not D0 or D4. An interval ending
/// exactly at midnight does not cover the day it ends on.
pub fn covers_day(busy: &BusyInterval, date: NaiveDate, tz: Tz) -> bool {
    if !busy.is_full_day {
        return false;
    }
    let start_local = busy.interval.start.with_timezone(&tz);
    let end_local = busy.interval.end.with_timezone(&tz);

    let first = start_local.date_naive();
    let mut last = end_local.date_naive();
    if end_local.time() == NaiveTime::MIN {
        last = last.pred_opt().unwrap_or(last);
    }
    first <= date && date <= last
}
