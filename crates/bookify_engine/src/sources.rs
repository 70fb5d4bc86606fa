// --- File: crates/bookify_engine/src/sources.rs ---
//! Commitment source adapters.
//!
//! Read-only queries that turn store rows from the four commitment sources
//! (bookings, time-off, group classes, external calendar imports) into
//! [`BusyInterval`]s for the slot generator and conflict checker. Results
//! come back in ascending start order. Any store failure propagates as
//! [`EngineError::StorageUnavailable`]; a source that cannot be read is
//! never silently treated as empty.

use crate::error::EngineError;
use crate::models::{BusyInterval, BusySource, TimeInterval, DEFAULT_FULL_DAY_THRESHOLD_HOURS};
use bookify_common::store::{BookingId, CommitmentScope, CommitmentStore};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::warn;

pub struct CommitmentSources<S> {
    store: Arc<S>,
    full_day_threshold: Duration,
}

impl<S: CommitmentStore> CommitmentSources<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_full_day_threshold(store, DEFAULT_FULL_DAY_THRESHOLD_HOURS)
    }

    pub fn with_full_day_threshold(store: Arc<S>, hours: i64) -> Self {
        CommitmentSources {
            store,
            full_day_threshold: Duration::hours(hours.max(1)),
        }
    }

    /// Non-cancelled bookings intersecting the range.
    ///
    /// Scoping by employee yields [`BusySource::Booking`]; scoping by service
    /// (services with no assigned staff conflict service-wide) yields
    /// [`BusySource::ServiceBooking`]. `exclude` lets an update check skip
    /// the booking being modified.
    pub async fn bookings_for(
        &self,
        tenant_id: &str,
        scope: &CommitmentScope,
        range: &TimeInterval,
        exclude: Option<&BookingId>,
    ) -> Result<Vec<BusyInterval>, EngineError> {
        let rows = self
            .store
            .bookings_in(tenant_id, scope, range.start, range.end)
            .await?;
        let source = match scope {
            CommitmentScope::Employee(_) => BusySource::Booking,
            CommitmentScope::Service(_) => BusySource::ServiceBooking,
        };
        Ok(rows
            .into_iter()
            .filter(|row| row.status.blocks() && exclude != Some(&row.id))
            .filter_map(|row| self.to_busy(row.start, row.end, source, None))
            .collect())
    }

    /// Explicit leave/block intervals for an employee.
    pub async fn time_off_for(
        &self,
        tenant_id: &str,
        employee_id: &str,
        range: &TimeInterval,
    ) -> Result<Vec<BusyInterval>, EngineError> {
        let rows = self
            .store
            .time_off_in(tenant_id, employee_id, range.start, range.end)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| self.to_busy(row.start, row.end, BusySource::TimeOff, row.reason))
            .collect())
    }

    /// Group-class sessions blocking an employee. Cancelled and draft
    /// sessions never block.
    pub async fn group_classes_for(
        &self,
        tenant_id: &str,
        employee_id: &str,
        range: &TimeInterval,
    ) -> Result<Vec<BusyInterval>, EngineError> {
        let rows = self
            .store
            .group_classes_in(tenant_id, employee_id, range.start, range.end)
            .await?;
        Ok(rows
            .into_iter()
            .filter(|row| row.status.blocks())
            .filter_map(|row| {
                self.to_busy(row.start, row.end, BusySource::GroupClass, Some(row.title))
            })
            .collect())
    }

    /// Imported external calendar events intersecting the range, tenant-wide.
    pub async fn external_events_for(
        &self,
        tenant_id: &str,
        range: &TimeInterval,
    ) -> Result<Vec<BusyInterval>, EngineError> {
        let rows = self
            .store
            .external_events_in(tenant_id, range.start, range.end)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                self.to_busy(row.start, row.end, BusySource::ExternalCalendar, row.summary)
            })
            .collect())
    }

    fn to_busy(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        source: BusySource,
        reason: Option<String>,
    ) -> Option<BusyInterval> {
        match TimeInterval::new(start, end) {
            Ok(interval) => Some(BusyInterval {
                is_full_day: interval.duration() >= self.full_day_threshold,
                interval,
                source,
                reason,
            }),
            Err(_) => {
                warn!(%start, %end, ?source, "skipping commitment with inverted interval");
                None
            }
        }
    }
}
