// --- File: crates/bookify_engine/src/slots.rs ---
//! Slot generator.
//!
//! Given one operating window, a service duration and the day's busy
//! intervals, enumerates the bookable start times. Candidates are
//! interpreted in the tenant's timezone and compared against busy intervals
//! in UTC. Buffers expand booking-sourced intervals only; time-off, group
//! classes and external imports block at their literal bounds.

use crate::interval::{covers_day, expand_with_buffer, overlaps};
use crate::models::{Buffer, BusyInterval, BusySource, DaySlots, OperatingWindow, Slot, TimeInterval};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use tracing::debug;

/// Slot granularity: short services get tight steps, longer ones snap to
/// `snap_minutes` (the half hour by default).
pub fn slot_step(duration_minutes: i64, snap_minutes: i64) -> i64 {
    let snap = snap_minutes.max(1);
    if duration_minutes <= snap {
        duration_minutes.max(1)
    } else {
        snap
    }
}

/// A local wall-clock time on a date, as UTC. `None` when the local time
/// does not exist (DST gap); ambiguous times resolve to the earlier instant.
pub(crate) fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The UTC bounds of a local calendar day.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> Option<TimeInterval> {
    let start = local_to_utc(date, NaiveTime::MIN, tz)?;
    let end = local_to_utc(date.succ_opt()?, NaiveTime::MIN, tz)?;
    TimeInterval::new(start, end).ok()
}

/// Generates the bookable start times for one operating window.
///
/// A candidate is rejected when it would run past the window's close, starts
/// strictly before `now`, overlaps a buffer-expanded booking interval, or
/// overlaps any other busy interval at its literal bounds. A full-day busy
/// interval covering `date` empties the whole day.
///
/// Call once per window when an employee works split shifts and merge the
/// parts with [`merge_day_slots`].
#[allow(clippy::too_many_arguments)]
pub fn generate_slots(
    date: NaiveDate,
    tz: Tz,
    window: &OperatingWindow,
    duration_minutes: i64,
    busy: &[BusyInterval],
    buffer: &Buffer,
    snap_minutes: i64,
    now: DateTime<Utc>,
) -> DaySlots {
    if window.closed || duration_minutes <= 0 {
        return DaySlots::empty();
    }
    if busy.iter().any(|b| covers_day(b, date, tz)) {
        debug!(%date, "day fully blocked by an all-day commitment");
        return DaySlots::empty();
    }

    let step = slot_step(duration_minutes, snap_minutes);
    let open_minute = window.open.num_seconds_from_midnight() as i64 / 60;
    let close_minute = window.close.num_seconds_from_midnight() as i64 / 60;

    let mut slots = Vec::new();
    let mut minute = open_minute;
    while minute + duration_minutes <= close_minute {
        let time = match NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0) {
            Some(t) => t,
            None => break,
        };
        // Skip candidates that fall into a DST gap
        if let Some(start) = local_to_utc(date, time, tz) {
            let candidate = TimeInterval {
                start,
                end: start + Duration::minutes(duration_minutes),
            };
            if start >= now && !is_blocked(&candidate, busy, buffer) {
                slots.push(Slot {
                    time: format!("{:02}:{:02}", minute / 60, minute % 60),
                });
            }
        }
        minute += step;
    }

    DaySlots {
        available: !slots.is_empty(),
        slots,
    }
}

fn is_blocked(candidate: &TimeInterval, busy: &[BusyInterval], buffer: &Buffer) -> bool {
    busy.iter().any(|b| match b.source {
        // Buffers protect staff recovery time around real bookings only
        BusySource::Booking | BusySource::ServiceBooking => {
            overlaps(candidate, &expand_with_buffer(&b.interval, buffer))
        }
        BusySource::TimeOff | BusySource::GroupClass | BusySource::ExternalCalendar => {
            overlaps(candidate, &b.interval)
        }
    })
}

/// Unions per-window slot lists, deduplicating by time and sorting
/// lexicographically (safe: all times are zero-padded `HH:MM`).
pub fn merge_day_slots(parts: Vec<DaySlots>) -> DaySlots {
    let mut times = BTreeSet::new();
    for part in parts {
        for slot in part.slots {
            times.insert(slot.time);
        }
    }
    let slots: Vec<Slot> = times.into_iter().map(|time| Slot { time }).collect();
    DaySlots {
        available: !slots.is_empty(),
        slots,
    }
}
