// --- File: crates/bookify_engine/src/resolver.rs ---
//! Availability resolver.
//!
//! Orchestrates the booking scenarios (staff-less service, one specific
//! employee, "any available" employee) by combining the commitment source
//! adapters with the slot generator. Identical inputs against an
//! unchanged store always produce identical results; stale reads are
//! acceptable here because the conflict checker is the authoritative gate
//! at write time.

use crate::error::EngineError;
use crate::models::{
    AvailabilityResult, Buffer, DaySlots, EmployeeSchedule, EmployeeSelector, EngineDefaults,
    ServiceConfig, ServiceRequest, SlotEntry, TenantSchedule, TimeInterval,
};
use crate::slots::{day_bounds, generate_slots, merge_day_slots};
use crate::sources::CommitmentSources;
use bookify_common::store::{CommitmentScope, CommitmentStore, EmployeeId};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

const MSG_NOT_WORKING: &str = "Employee does not work on this day";
const MSG_CLOSED: &str = "Business is closed on this day";

/// Per-employee day resolution: either a slot list or an explanatory
/// negative. Availability messages never disclose why an employee is busy,
/// only whether slots exist.
struct EmployeeDay {
    slots: DaySlots,
    message: Option<String>,
}

impl EmployeeDay {
    fn into_result(self, employee_id: &str) -> AvailabilityResult {
        if let Some(message) = self.message {
            return AvailabilityResult::unavailable(message);
        }
        let slots = self
            .slots
            .slots
            .into_iter()
            .map(|slot| SlotEntry {
                time: slot.time,
                employee_ids: vec![employee_id.to_string()],
            })
            .collect();
        AvailabilityResult::from_slots(slots)
    }
}

pub struct AvailabilityResolver<S> {
    sources: CommitmentSources<S>,
    defaults: EngineDefaults,
}

impl<S: CommitmentStore> AvailabilityResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_defaults(store, EngineDefaults::default())
    }

    pub fn with_defaults(store: Arc<S>, defaults: EngineDefaults) -> Self {
        AvailabilityResolver {
            sources: CommitmentSources::with_full_day_threshold(
                store,
                defaults.full_day_threshold_hours,
            ),
            defaults,
        }
    }

    /// Resolves the bookable slots for one service request.
    ///
    /// Validation and the advance-booking limit run before any store query.
    /// All commitment reads for a resolution must succeed; a failed source
    /// fails the whole resolution closed rather than omitting its conflicts.
    pub async fn resolve(
        &self,
        tenant: &TenantSchedule,
        employees: &[EmployeeSchedule],
        service: &ServiceConfig,
        request: &ServiceRequest,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResult, EngineError> {
        let duration = validate_duration(service, request)?;

        // Advance-booking limit, checked before any busy-interval query.
        // The boundary date itself is still bookable.
        let today = now.with_timezone(&tenant.timezone).date_naive();
        if tenant.advance_days > 0 {
            if let Some(last_bookable) = today.checked_add_days(Days::new(tenant.advance_days as u64))
            {
                if request.date > last_bookable {
                    debug!(date = %request.date, %last_bookable, "date past advance-booking limit");
                    return Ok(AvailabilityResult::unavailable(format!(
                        "Bookings are accepted at most {} days ahead; last bookable date is {}",
                        tenant.advance_days, last_bookable
                    )));
                }
            }
        }

        let range = day_bounds(request.date, tenant.timezone).ok_or_else(|| {
            EngineError::InvalidRequest(format!("date {} is not representable", request.date))
        })?;

        if service.employee_ids.is_empty() {
            return self
                .resolve_service_only(tenant, service, request.date, duration, &range, now)
                .await;
        }

        match &request.employee {
            EmployeeSelector::Id(employee_id) => {
                let schedule = employees
                    .iter()
                    .find(|schedule| &schedule.employee_id == employee_id);
                let day = self
                    .resolve_employee(
                        tenant,
                        service,
                        employee_id,
                        schedule,
                        request.date,
                        duration,
                        &range,
                        now,
                    )
                    .await?;
                Ok(day.into_result(employee_id))
            }
            EmployeeSelector::Any | EmployeeSelector::Unassigned => {
                self.resolve_any(tenant, employees, service, request.date, duration, &range, now)
                    .await
            }
        }
    }

    /// Service with no assigned staff: conflicts are service-wide, the
    /// window comes from tenant hours, and time-off/group-class sources are
    /// meaningless without an employee.
    async fn resolve_service_only(
        &self,
        tenant: &TenantSchedule,
        service: &ServiceConfig,
        date: NaiveDate,
        duration: i64,
        range: &TimeInterval,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResult, EngineError> {
        let window = match tenant.opening_hours.for_weekday(date.weekday()) {
            Some(window) if window.closed => {
                return Ok(AvailabilityResult::unavailable(MSG_CLOSED))
            }
            Some(window) => *window,
            None => self.defaults.default_window,
        };

        let scope = CommitmentScope::Service(service.service_id.clone());
        let booking_range = booking_query_range(range, &service.buffer);
        let (mut busy, external) = tokio::try_join!(
            self.sources
                .bookings_for(&tenant.tenant_id, &scope, &booking_range, None),
            self.sources.external_events_for(&tenant.tenant_id, range),
        )?;
        busy.extend(external);

        let day = generate_slots(
            date,
            tenant.timezone,
            &window,
            duration,
            &busy,
            &service.buffer,
            self.defaults.slot_snap_minutes,
            now,
        );
        let slots = day
            .slots
            .into_iter()
            .map(|slot| SlotEntry {
                time: slot.time,
                employee_ids: Vec::new(),
            })
            .collect();
        Ok(AvailabilityResult::from_slots(slots))
    }

    /// One employee's day: windows from their weekly shifts (split shifts
    /// are generated separately and unioned), falling back to tenant hours
    /// when the employee has no availability rows at all.
    #[allow(clippy::too_many_arguments)]
    async fn resolve_employee(
        &self,
        tenant: &TenantSchedule,
        service: &ServiceConfig,
        employee_id: &str,
        schedule: Option<&EmployeeSchedule>,
        date: NaiveDate,
        duration: i64,
        range: &TimeInterval,
        now: DateTime<Utc>,
    ) -> Result<EmployeeDay, EngineError> {
        let weekday = date.weekday();
        let windows = match schedule {
            Some(schedule) if schedule.has_shifts() => {
                let windows = schedule.windows_for(weekday);
                if windows.is_empty() {
                    // Defined availability elsewhere in the week, nothing
                    // on this weekday: the employee does not work today.
                    return Ok(EmployeeDay {
                        slots: DaySlots::empty(),
                        message: Some(MSG_NOT_WORKING.to_string()),
                    });
                }
                windows
            }
            _ => match tenant.opening_hours.for_weekday(weekday) {
                Some(window) if window.closed => {
                    return Ok(EmployeeDay {
                        slots: DaySlots::empty(),
                        message: Some(MSG_CLOSED.to_string()),
                    });
                }
                Some(window) => vec![*window],
                None => vec![self.defaults.default_window],
            },
        };

        let scope = CommitmentScope::Employee(employee_id.to_string());
        let booking_range = booking_query_range(range, &service.buffer);
        let (mut busy, time_off, classes, external) = tokio::try_join!(
            self.sources
                .bookings_for(&tenant.tenant_id, &scope, &booking_range, None),
            self.sources
                .time_off_for(&tenant.tenant_id, employee_id, range),
            self.sources
                .group_classes_for(&tenant.tenant_id, employee_id, range),
            self.sources.external_events_for(&tenant.tenant_id, range),
        )?;
        busy.extend(time_off);
        busy.extend(classes);
        busy.extend(external);

        let parts = windows
            .iter()
            .map(|window| {
                generate_slots(
                    date,
                    tenant.timezone,
                    window,
                    duration,
                    &busy,
                    &service.buffer,
                    self.defaults.slot_snap_minutes,
                    now,
                )
            })
            .collect();
        Ok(EmployeeDay {
            slots: merge_day_slots(parts),
            message: None,
        })
    }

    /// "Any available" employee: union of the per-employee resolutions. A
    /// slot is shown when at least one assigned employee is free; the
    /// attached ids are the free employees, first one the default assignee.
    #[allow(clippy::too_many_arguments)]
    async fn resolve_any(
        &self,
        tenant: &TenantSchedule,
        employees: &[EmployeeSchedule],
        service: &ServiceConfig,
        date: NaiveDate,
        duration: i64,
        range: &TimeInterval,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResult, EngineError> {
        let mut by_time: BTreeMap<String, Vec<EmployeeId>> = BTreeMap::new();
        for employee_id in &service.employee_ids {
            let schedule = employees
                .iter()
                .find(|schedule| &schedule.employee_id == employee_id);
            let day = self
                .resolve_employee(
                    tenant,
                    service,
                    employee_id,
                    schedule,
                    date,
                    duration,
                    range,
                    now,
                )
                .await?;
            for slot in day.slots.slots {
                by_time.entry(slot.time).or_default().push(employee_id.clone());
            }
        }

        let slots = by_time
            .into_iter()
            .map(|(time, employee_ids)| SlotEntry { time, employee_ids })
            .collect();
        Ok(AvailabilityResult::from_slots(slots))
    }
}

/// The range to fetch bookings over: the day widened by the service buffer,
/// so a booking just outside the day still thins its edge slots once
/// expanded. A booking reaches into the day through its after-buffer and
/// out of it through its before-buffer, hence the mirrored extension.
fn booking_query_range(range: &TimeInterval, buffer: &Buffer) -> TimeInterval {
    TimeInterval {
        start: range.start - Duration::minutes(buffer.after_minutes.max(0)),
        end: range.end + Duration::minutes(buffer.before_minutes.max(0)),
    }
}

/// Validates the requested duration before any query is issued.
fn validate_duration(service: &ServiceConfig, request: &ServiceRequest) -> Result<i64, EngineError> {
    let duration = match (service.flexible.as_ref(), request.duration_minutes) {
        (Some(flexible), Some(duration)) => {
            if duration < flexible.min_minutes || duration > flexible.max_minutes {
                return Err(EngineError::InvalidRequest(format!(
                    "duration {} minutes is outside the allowed range {}-{} minutes",
                    duration, flexible.min_minutes, flexible.max_minutes
                )));
            }
            if (duration - flexible.min_minutes) % flexible.step_minutes.max(1) != 0 {
                return Err(EngineError::InvalidRequest(format!(
                    "duration {} minutes does not match the {}-minute step",
                    duration, flexible.step_minutes
                )));
            }
            duration
        }
        (None, Some(duration)) if duration != service.duration_minutes => {
            return Err(EngineError::InvalidRequest(format!(
                "this service has a fixed duration of {} minutes",
                service.duration_minutes
            )));
        }
        _ => service.duration_minutes,
    };
    if duration <= 0 {
        return Err(EngineError::InvalidRequest(
            "duration must be positive".to_string(),
        ));
    }
    Ok(duration)
}
