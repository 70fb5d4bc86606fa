// --- File: crates/bookify_common/src/store.rs ---
//! Storage collaborator contract for the availability engine.
//!
//! This module defines the read-side contract the engine expects from the
//! persistence layer: four range queries over a tenant's commitments
//! (bookings, time-off blocks, group-class sessions and imported external
//! calendar events). The engine never persists anything itself; the write
//! path, transactions and multi-tenancy isolation live with the consumer.
//!
//! All reads are fallible: a store that cannot be reached must surface a
//! [`StoreError`], never an empty result, so the engine can fail closed
//! instead of reporting a false "available".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

pub type TenantId = String;
pub type EmployeeId = String;
pub type ServiceId = String;
pub type BookingId = String;

/// Errors that can occur when reading from the booking store.
///
/// Both variants are retryable from the caller's point of view. A timeout is
/// kept distinct so the consumer can pick a different backoff, but neither
/// may ever be interpreted as "no commitments found".
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage read timed out: {0}")]
    Timeout(String),
}

/// Lifecycle status of a booking.
///
/// `Pending → Confirmed → Completed`, with `Cancelled` and `NoShow` reachable
/// from `Pending`/`Confirmed`. A no-show can be corrected back to any status;
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its time slot.
    pub fn blocks(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Whether a transition from this status to `next` is allowed.
    pub fn can_transition(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        if self == next {
            return false;
        }
        match self {
            Pending => matches!(next, Confirmed | Cancelled | NoShow),
            Confirmed => matches!(next, Completed | Cancelled | NoShow),
            Completed | Cancelled => false,
            // A no-show entered by mistake can be corrected to anything.
            NoShow => true,
        }
    }
}

/// Status of a group-class session. Only `Open` and `Full` sessions block
/// employee time; cancelled or draft sessions never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupClassStatus {
    Open,
    Full,
    Cancelled,
    Draft,
}

impl GroupClassStatus {
    pub fn blocks(&self) -> bool {
        matches!(self, GroupClassStatus::Open | GroupClassStatus::Full)
    }
}

/// The resource a commitment query is scoped to.
///
/// Services with no assigned employees are booked service-wide, so their
/// bookings conflict with each other regardless of staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitmentScope {
    Employee(EmployeeId),
    Service(ServiceId),
}

/// A booking row as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub employee_id: Option<EmployeeId>,
    pub service_id: ServiceId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
}

/// An explicit leave or block interval for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOffRecord {
    pub employee_id: EmployeeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: Option<String>,
}

/// A group-class session led by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupClassRecord {
    pub employee_id: EmployeeId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: GroupClassStatus,
}

/// An imported event from an external calendar sync. Tenant-wide: external
/// events block every employee of the tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEventRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: Option<String>,
}

/// Read-side contract for commitment queries.
///
/// Implementations return every row whose interval intersects the requested
/// range, in ascending order of start time. Status filtering (cancelled
/// bookings, draft sessions) and `exclude` handling are the engine's job;
/// a store may additionally push them into its query as an optimization,
/// but must not rely on it.
pub trait CommitmentStore: Send + Sync {
    /// Bookings for an employee or a staff-less service intersecting the range.
    #[allow(clippy::type_complexity)]
    fn bookings_in(
        &self,
        tenant_id: &str,
        scope: &CommitmentScope,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookingRecord>, StoreError>;

    /// Time-off blocks for an employee intersecting the range.
    fn time_off_in(
        &self,
        tenant_id: &str,
        employee_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<TimeOffRecord>, StoreError>;

    /// Group-class sessions for an employee intersecting the range, any status.
    fn group_classes_in(
        &self,
        tenant_id: &str,
        employee_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<GroupClassRecord>, StoreError>;

    /// Imported external events intersecting the range. Matching is a
    /// three-way OR (starts in range, ends in range, or spans the whole
    /// range) so day-spanning imports are caught.
    fn external_events_in(
        &self,
        tenant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<ExternalEventRecord>, StoreError>;
}

pub mod mock {
    //! An in-memory [`CommitmentStore`] for tests and examples.

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Inner {
        bookings: Vec<(TenantId, BookingRecord)>,
        time_off: Vec<(TenantId, TimeOffRecord)>,
        group_classes: Vec<(TenantId, GroupClassRecord)>,
        external_events: Vec<(TenantId, ExternalEventRecord)>,
        failure: Option<StoreError>,
    }

    /// A hand-rolled in-memory store. Rows are matched with the same
    /// intersection semantics a SQL implementation would use, and a failure
    /// can be injected to exercise the engine's fail-closed paths.
    #[derive(Default)]
    pub struct InMemoryStore {
        inner: Mutex<Inner>,
    }

    impl InMemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_booking(&self, tenant_id: &str, record: BookingRecord) {
            let mut inner = self.inner.lock().unwrap();
            inner.bookings.push((tenant_id.to_string(), record));
        }

        pub fn add_time_off(&self, tenant_id: &str, record: TimeOffRecord) {
            let mut inner = self.inner.lock().unwrap();
            inner.time_off.push((tenant_id.to_string(), record));
        }

        pub fn add_group_class(&self, tenant_id: &str, record: GroupClassRecord) {
            let mut inner = self.inner.lock().unwrap();
            inner.group_classes.push((tenant_id.to_string(), record));
        }

        pub fn add_external_event(&self, tenant_id: &str, record: ExternalEventRecord) {
            let mut inner = self.inner.lock().unwrap();
            inner.external_events.push((tenant_id.to_string(), record));
        }

        /// Make every subsequent read fail with the given error.
        pub fn set_failure(&self, failure: Option<StoreError>) {
            let mut inner = self.inner.lock().unwrap();
            inner.failure = failure;
        }

        fn check_failure(&self) -> Result<(), StoreError> {
            match &self.inner.lock().unwrap().failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn intersects(row_start: DateTime<Utc>, row_end: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        row_start < end && row_end > start
    }

    impl CommitmentStore for InMemoryStore {
        fn bookings_in(
            &self,
            tenant_id: &str,
            scope: &CommitmentScope,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<BookingRecord>, StoreError> {
            let tenant_id = tenant_id.to_string();
            let scope = scope.clone();
            let result = self.check_failure().map(|_| {
                let inner = self.inner.lock().unwrap();
                let mut rows: Vec<BookingRecord> = inner
                    .bookings
                    .iter()
                    .filter(|(tenant, row)| {
                        *tenant == tenant_id
                            && intersects(row.start, row.end, start, end)
                            && match &scope {
                                CommitmentScope::Employee(id) => {
                                    row.employee_id.as_deref() == Some(id.as_str())
                                }
                                CommitmentScope::Service(id) => {
                                    row.employee_id.is_none() && row.service_id == *id
                                }
                            }
                    })
                    .map(|(_, row)| row.clone())
                    .collect();
                rows.sort_by_key(|row| row.start);
                rows
            });
            Box::pin(async move { result })
        }

        fn time_off_in(
            &self,
            tenant_id: &str,
            employee_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<TimeOffRecord>, StoreError> {
            let tenant_id = tenant_id.to_string();
            let employee_id = employee_id.to_string();
            let result = self.check_failure().map(|_| {
                let inner = self.inner.lock().unwrap();
                let mut rows: Vec<TimeOffRecord> = inner
                    .time_off
                    .iter()
                    .filter(|(tenant, row)| {
                        *tenant == tenant_id
                            && row.employee_id == employee_id
                            && intersects(row.start, row.end, start, end)
                    })
                    .map(|(_, row)| row.clone())
                    .collect();
                rows.sort_by_key(|row| row.start);
                rows
            });
            Box::pin(async move { result })
        }

        fn group_classes_in(
            &self,
            tenant_id: &str,
            employee_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<GroupClassRecord>, StoreError> {
            let tenant_id = tenant_id.to_string();
            let employee_id = employee_id.to_string();
            let result = self.check_failure().map(|_| {
                let inner = self.inner.lock().unwrap();
                let mut rows: Vec<GroupClassRecord> = inner
                    .group_classes
                    .iter()
                    .filter(|(tenant, row)| {
                        *tenant == tenant_id
                            && row.employee_id == employee_id
                            && intersects(row.start, row.end, start, end)
                    })
                    .map(|(_, row)| row.clone())
                    .collect();
                rows.sort_by_key(|row| row.start);
                rows
            });
            Box::pin(async move { result })
        }

        fn external_events_in(
            &self,
            tenant_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<ExternalEventRecord>, StoreError> {
            let tenant_id = tenant_id.to_string();
            let result = self.check_failure().map(|_| {
                let inner = self.inner.lock().unwrap();
                let mut rows: Vec<ExternalEventRecord> = inner
                    .external_events
                    .iter()
                    .filter(|(tenant, row)| {
                        // Three-way OR: starts in range, ends in range, or
                        // spans it entirely. Catches day-spanning imports.
                        *tenant == tenant_id
                            && ((row.start >= start && row.start < end)
                                || (row.end > start && row.end <= end)
                                || (row.start <= start && row.end >= end))
                    })
                    .map(|(_, row)| row.clone())
                    .collect();
                rows.sort_by_key(|row| row.start);
                rows
            });
            Box::pin(async move { result })
        }
    }
}
