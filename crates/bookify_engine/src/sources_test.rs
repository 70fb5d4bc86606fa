// --- File: crates/bookify_engine/src/sources_test.rs ---
#[cfg(test)]
mod tests {
    use crate::error::EngineError;
    use crate::models::{BusySource, TimeInterval};
    use crate::sources::CommitmentSources;
    use bookify_common::store::mock::InMemoryStore;
    use bookify_common::store::{
        BookingRecord, BookingStatus, CommitmentScope, GroupClassRecord, GroupClassStatus,
        StoreError, TimeOffRecord,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    const TENANT: &str = "tenant-1";

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, hour, 0, 0).unwrap()
    }

    fn day_range() -> TimeInterval {
        TimeInterval::new(
            Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn booking(id: &str, status: BookingStatus, start: DateTime<Utc>, len_hours: i64) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            employee_id: Some("emp-1".to_string()),
            service_id: "svc-1".to_string(),
            start,
            end: start + Duration::hours(len_hours),
            status,
        }
    }

    #[tokio::test]
    async fn test_cancelled_bookings_never_block() {
        let store = Arc::new(InMemoryStore::new());
        store.add_booking(TENANT, booking("b-1", BookingStatus::Confirmed, at(10), 1));
        store.add_booking(TENANT, booking("b-2", BookingStatus::Cancelled, at(12), 1));
        store.add_booking(TENANT, booking("b-3", BookingStatus::Pending, at(14), 1));

        let sources = CommitmentSources::new(store);
        let scope = CommitmentScope::Employee("emp-1".to_string());
        let busy = sources
            .bookings_for(TENANT, &scope, &day_range(), None)
            .await
            .unwrap();

        assert_eq!(busy.len(), 2);
        assert!(busy.iter().all(|b| b.source == BusySource::Booking));
        assert_eq!(busy[0].interval.start, at(10));
        assert_eq!(busy[1].interval.start, at(14));
    }

    #[tokio::test]
    async fn test_exclude_skips_the_booking_being_updated() {
        let store = Arc::new(InMemoryStore::new());
        store.add_booking(TENANT, booking("b-1", BookingStatus::Confirmed, at(10), 1));

        let sources = CommitmentSources::new(store);
        let scope = CommitmentScope::Employee("emp-1".to_string());
        let exclude = "b-1".to_string();
        let busy = sources
            .bookings_for(TENANT, &scope, &day_range(), Some(&exclude))
            .await
            .unwrap();
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn test_service_scope_tags_service_booking() {
        let store = Arc::new(InMemoryStore::new());
        let mut record = booking("b-1", BookingStatus::Confirmed, at(10), 1);
        record.employee_id = None;
        store.add_booking(TENANT, record);

        let sources = CommitmentSources::new(store);
        let scope = CommitmentScope::Service("svc-1".to_string());
        let busy = sources
            .bookings_for(TENANT, &scope, &day_range(), None)
            .await
            .unwrap();
        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].source, BusySource::ServiceBooking);
    }

    #[tokio::test]
    async fn test_full_day_tagging_uses_threshold() {
        let store = Arc::new(InMemoryStore::new());
        store.add_booking(TENANT, booking("short", BookingStatus::Confirmed, at(9), 2));
        store.add_booking(TENANT, booking("long", BookingStatus::Confirmed, at(8), 10));

        let sources = CommitmentSources::new(store.clone());
        let scope = CommitmentScope::Employee("emp-1".to_string());
        let busy = sources
            .bookings_for(TENANT, &scope, &day_range(), None)
            .await
            .unwrap();
        let long = busy.iter().find(|b| b.interval.duration() == Duration::hours(10)).unwrap();
        let short = busy.iter().find(|b| b.interval.duration() == Duration::hours(2)).unwrap();
        assert!(long.is_full_day);
        assert!(!short.is_full_day);

        // A raised threshold stops tagging the same commitment
        let relaxed = CommitmentSources::with_full_day_threshold(store, 12);
        let busy = relaxed
            .bookings_for(TENANT, &scope, &day_range(), None)
            .await
            .unwrap();
        assert!(busy.iter().all(|b| !b.is_full_day));
    }

    #[tokio::test]
    async fn test_draft_and_cancelled_classes_never_block() {
        let store = Arc::new(InMemoryStore::new());
        for (title, status) in [
            ("Yoga", GroupClassStatus::Open),
            ("Pilates", GroupClassStatus::Full),
            ("Crossfit", GroupClassStatus::Cancelled),
            ("Stretching", GroupClassStatus::Draft),
        ] {
            store.add_group_class(
                TENANT,
                GroupClassRecord {
                    employee_id: "emp-1".to_string(),
                    title: title.to_string(),
                    start: at(9),
                    end: at(10),
                    status,
                },
            );
        }

        let sources = CommitmentSources::new(store);
        let busy = sources
            .group_classes_for(TENANT, "emp-1", &day_range())
            .await
            .unwrap();
        assert_eq!(busy.len(), 2);
        assert!(busy.iter().all(|b| b.source == BusySource::GroupClass));
        let titles: Vec<_> = busy.iter().map(|b| b.reason.as_deref().unwrap()).collect();
        assert!(titles.contains(&"Yoga"));
        assert!(titles.contains(&"Pilates"));
    }

    #[tokio::test]
    async fn test_time_off_keeps_reason() {
        let store = Arc::new(InMemoryStore::new());
        store.add_time_off(
            TENANT,
            TimeOffRecord {
                employee_id: "emp-1".to_string(),
                start: at(9),
                end: at(12),
                reason: Some("Szkolenie".to_string()),
            },
        );

        let sources = CommitmentSources::new(store);
        let busy = sources
            .time_off_for(TENANT, "emp-1", &day_range())
            .await
            .unwrap();
        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].source, BusySource::TimeOff);
        assert_eq!(busy[0].reason.as_deref(), Some("Szkolenie"));
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_storage_unavailable() {
        let store = Arc::new(InMemoryStore::new());
        store.set_failure(Some(StoreError::Timeout("read deadline".to_string())));

        let sources = CommitmentSources::new(store);
        let result = sources
            .external_events_for(TENANT, &day_range())
            .await;
        assert!(matches!(result, Err(EngineError::StorageUnavailable(_))));
    }
}
