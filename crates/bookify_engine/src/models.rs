// --- File: crates/bookify_engine/src/models.rs ---
//! Data model of the availability engine.
//!
//! Everything here is transient, computed per query and never persisted by
//! the engine itself. Timestamps are structured UTC values throughout; the
//! only strings the engine emits are zero-padded `HH:MM` slot times and the
//! conflict reasons surfaced to operators. Display formatting and locale
//! belong to the presentation boundary.

use crate::error::EngineError;
use bookify_common::store::{EmployeeId, ServiceId, TenantId};
use bookify_config::SchedulingConfig;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

/// Commitments at least this long occupy whole days unless configured
/// otherwise (see [`SchedulingConfig::full_day_threshold_hours`]).
pub const DEFAULT_FULL_DAY_THRESHOLD_HOURS: i64 = 8;

/// A half-open time interval `[start, end)`.
///
/// Invariant: `start < end`. Two intervals that merely touch do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, EngineError> {
        if start < end {
            Ok(TimeInterval { start, end })
        } else {
            Err(EngineError::InvalidInterval { start, end })
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Where a busy interval came from. Buffers apply to booking-sourced
/// intervals only; blocked and imported time is never padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusySource {
    Booking,
    ServiceBooking,
    TimeOff,
    GroupClass,
    ExternalCalendar,
}

/// A time range during which a resource cannot accept a new booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusyInterval {
    pub interval: TimeInterval,
    pub source: BusySource,
    pub reason: Option<String>,
    /// Set when the underlying commitment lasts at least the configured
    /// full-day threshold; such commitments block every day they touch.
    pub is_full_day: bool,
}

/// Open/close times for one day. `closed` marks a day the business does not
/// operate at all; an absent window falls back one level (employee shifts →
/// tenant hours → engine default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub closed: bool,
}

impl OperatingWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        OperatingWindow {
            open,
            close,
            closed: false,
        }
    }

    pub fn closed_day() -> Self {
        OperatingWindow {
            open: NaiveTime::MIN,
            close: NaiveTime::MIN,
            closed: true,
        }
    }
}

/// Tenant-wide opening hours, one optional window per weekday.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyHours {
    windows: [Option<OperatingWindow>; 7],
}

impl WeeklyHours {
    /// No hours defined for any day.
    pub fn empty() -> Self {
        WeeklyHours::default()
    }

    /// The same window on every day of the week.
    pub fn uniform(window: OperatingWindow) -> Self {
        WeeklyHours {
            windows: [Some(window); 7],
        }
    }

    pub fn set(&mut self, weekday: Weekday, window: Option<OperatingWindow>) {
        self.windows[weekday.num_days_from_monday() as usize] = window;
    }

    pub fn for_weekday(&self, weekday: Weekday) -> Option<&OperatingWindow> {
        self.windows[weekday.num_days_from_monday() as usize].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.iter().all(|w| w.is_none())
    }
}

/// One weekly availability row for an employee. An employee may have several
/// rows on the same weekday (split shifts); slot generation runs per row and
/// the results are unioned.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyShift {
    pub weekday: Weekday,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// An employee's weekly availability rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSchedule {
    pub employee_id: EmployeeId,
    pub shifts: Vec<WeeklyShift>,
}

impl EmployeeSchedule {
    /// Whether the employee has any defined availability at all. With none,
    /// tenant opening hours apply; with some but none on a given weekday,
    /// that day is simply not worked.
    pub fn has_shifts(&self) -> bool {
        !self.shifts.is_empty()
    }

    pub fn windows_for(&self, weekday: Weekday) -> Vec<OperatingWindow> {
        self.shifts
            .iter()
            .filter(|shift| shift.weekday == weekday)
            .map(|shift| OperatingWindow::new(shift.open, shift.close))
            .collect()
    }
}

/// Tenant-level scheduling configuration, supplied already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantSchedule {
    pub tenant_id: TenantId,
    pub timezone: Tz,
    pub opening_hours: WeeklyHours,
    /// Maximum days into the future a customer may book. 0 = unlimited.
    pub advance_days: u32,
}

/// Protected recovery time around a booking. Applied when generating slots,
/// never when checking a submitted booking for conflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Buffer {
    pub before_minutes: i64,
    pub after_minutes: i64,
}

impl Buffer {
    pub fn none() -> Self {
        Buffer::default()
    }

    pub fn new(before_minutes: i64, after_minutes: i64) -> Self {
        Buffer {
            before_minutes,
            after_minutes,
        }
    }
}

/// Duration bounds for a flexible service; the customer picks any duration
/// in `[min, max]` stepped by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexibleDuration {
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub step_minutes: i64,
}

/// Per-service scheduling configuration, supplied already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub service_id: ServiceId,
    pub duration_minutes: i64,
    pub buffer: Buffer,
    pub flexible: Option<FlexibleDuration>,
    /// Employees assigned to this service. Empty means the service is booked
    /// service-wide with no staff dimension.
    pub employee_ids: Vec<EmployeeId>,
}

/// Which employee an availability query targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeSelector {
    /// No employee named; resolves service-wide for staff-less services and
    /// to any assigned employee otherwise.
    Unassigned,
    /// Explicit "any available" request.
    Any,
    Id(EmployeeId),
}

/// Parameters of one availability query.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    pub service_id: ServiceId,
    pub employee: EmployeeSelector,
    pub date: NaiveDate,
    /// Customer-chosen duration for flexible services. `None` uses the
    /// service's fixed duration.
    pub duration_minutes: Option<i64>,
}

/// A bookable start time, zero-padded `HH:MM` in the tenant's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub time: String,
}

/// Slot generator output for one operating window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySlots {
    pub available: bool,
    pub slots: Vec<Slot>,
}

impl DaySlots {
    pub fn empty() -> Self {
        DaySlots {
            available: false,
            slots: Vec::new(),
        }
    }
}

/// One bookable start time with the employees free at that time. For the
/// "any employee" strategy the first id is the default assignee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotEntry {
    pub time: String,
    pub employee_ids: Vec<EmployeeId>,
}

/// Resolver output for one availability query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    pub slots: Vec<SlotEntry>,
    pub message: Option<String>,
}

impl AvailabilityResult {
    pub fn unavailable(message: impl Into<String>) -> Self {
        AvailabilityResult {
            available: false,
            slots: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn from_slots(slots: Vec<SlotEntry>) -> Self {
        AvailabilityResult {
            available: !slots.is_empty(),
            slots,
            message: None,
        }
    }
}

/// What a submitted booking collides with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    Booking,
    ServiceBooking,
    TimeOff { reason: Option<String> },
    GroupClass { title: String },
}

/// A detected scheduling conflict. Computed synchronously per check and
/// consumed immediately by the caller to reject the write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub interval: TimeInterval,
    #[serde(flatten)]
    pub kind: ConflictKind,
}

impl Conflict {
    /// Human-readable reason, when the conflict kind carries one.
    pub fn reason(&self) -> Option<String> {
        match &self.kind {
            ConflictKind::Booking | ConflictKind::ServiceBooking => None,
            ConflictKind::TimeOff { reason } => {
                Some(reason.clone().unwrap_or_else(|| "Urlop/blokada".to_string()))
            }
            ConflictKind::GroupClass { title } => Some(format!("Zajęcia grupowe: {}", title)),
        }
    }

    /// Operator-facing message naming the conflict kind and the literal
    /// overlapping interval, rendered in the tenant's timezone.
    pub fn message(&self, tz: Tz) -> String {
        let what = match &self.kind {
            ConflictKind::Booking => "an existing booking",
            ConflictKind::ServiceBooking => "an existing booking for this service",
            ConflictKind::TimeOff { .. } => "a time-off block",
            ConflictKind::GroupClass { .. } => "a group class",
        };
        let start = self.interval.start.with_timezone(&tz).to_rfc3339();
        let end = self.interval.end.with_timezone(&tz).to_rfc3339();
        match self.reason() {
            Some(reason) => format!("Conflicts with {} from {} to {} ({})", what, start, end, reason),
            None => format!("Conflicts with {} from {} to {}", what, start, end),
        }
    }
}

/// Engine-level fallbacks, usually loaded from [`SchedulingConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDefaults {
    /// Window used when neither employee shifts nor tenant hours exist.
    pub default_window: OperatingWindow,
    pub slot_snap_minutes: i64,
    pub full_day_threshold_hours: i64,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        EngineDefaults {
            default_window: OperatingWindow::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            ),
            slot_snap_minutes: 30,
            full_day_threshold_hours: DEFAULT_FULL_DAY_THRESHOLD_HOURS,
        }
    }
}

impl From<&SchedulingConfig> for EngineDefaults {
    fn from(config: &SchedulingConfig) -> Self {
        EngineDefaults {
            default_window: OperatingWindow::new(config.default_open, config.default_close),
            slot_snap_minutes: config.slot_snap_minutes,
            full_day_threshold_hours: config.full_day_threshold_hours,
        }
    }
}
