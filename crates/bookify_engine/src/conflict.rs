// --- File: crates/bookify_engine/src/conflict.rs ---
//! Conflict checker.
//!
//! The authoritative gate at booking create/update time. Checks run in a
//! fixed priority so the most actionable conflict is reported first:
//! bookings, then time-off blocks, then group classes. No buffer is applied
//! here; buffers only thin out offered slots and never retroactively
//! invalidate an otherwise non-overlapping booking. The caller must run the
//! check and the subsequent write under a serialized write path; the
//! contract is "conflict as of this read".

use crate::error::EngineError;
use crate::interval::overlaps;
use crate::models::{BusyInterval, Conflict, ConflictKind, TimeInterval};
use crate::sources::CommitmentSources;
use bookify_common::store::{BookingId, CommitmentScope, CommitmentStore};
use std::sync::Arc;
use tracing::debug;

pub struct ConflictChecker<S> {
    sources: CommitmentSources<S>,
}

impl<S: CommitmentStore> ConflictChecker<S> {
    pub fn new(store: Arc<S>) -> Self {
        ConflictChecker {
            sources: CommitmentSources::new(store),
        }
    }

    /// Checks a requested booking interval against existing commitments.
    ///
    /// Returns `Ok(None)` when the interval is free, `Ok(Some(conflict))`
    /// with the highest-priority collision otherwise. Employee scope checks
    /// bookings, time-off and group classes; service scope (staff-less
    /// services) checks service-wide bookings only. `exclude` skips the
    /// booking being updated. Status-only updates do not need a check.
    pub async fn check(
        &self,
        tenant_id: &str,
        scope: &CommitmentScope,
        interval: &TimeInterval,
        exclude: Option<&BookingId>,
    ) -> Result<Option<Conflict>, EngineError> {
        let conflict = match scope {
            CommitmentScope::Employee(employee_id) => {
                let (bookings, time_off, classes) = tokio::try_join!(
                    self.sources.bookings_for(tenant_id, scope, interval, exclude),
                    self.sources.time_off_for(tenant_id, employee_id, interval),
                    self.sources.group_classes_for(tenant_id, employee_id, interval),
                )?;
                first_overlap(interval, &bookings, |_| ConflictKind::Booking)
                    .or_else(|| {
                        first_overlap(interval, &time_off, |busy| ConflictKind::TimeOff {
                            reason: busy.reason.clone(),
                        })
                    })
                    .or_else(|| {
                        first_overlap(interval, &classes, |busy| ConflictKind::GroupClass {
                            title: busy.reason.clone().unwrap_or_default(),
                        })
                    })
            }
            CommitmentScope::Service(_) => {
                let bookings = self
                    .sources
                    .bookings_for(tenant_id, scope, interval, exclude)
                    .await?;
                first_overlap(interval, &bookings, |_| ConflictKind::ServiceBooking)
            }
        };

        if let Some(conflict) = &conflict {
            debug!(kind = ?conflict.kind, interval = ?conflict.interval, "booking request rejected");
        }
        Ok(conflict)
    }
}

/// The earliest busy interval strictly overlapping the request, if any.
fn first_overlap(
    interval: &TimeInterval,
    busy: &[BusyInterval],
    kind: impl Fn(&BusyInterval) -> ConflictKind,
) -> Option<Conflict> {
    busy.iter()
        .find(|b| overlaps(interval, &b.interval))
        .map(|b| Conflict {
            interval: b.interval,
            kind: kind(b),
        })
}
