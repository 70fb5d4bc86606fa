// --- File: crates/bookify_engine/src/slots_proptest.rs ---
#[cfg(test)]
mod tests {
    use crate::interval::overlaps;
    use crate::models::{Buffer, BusyInterval, BusySource, OperatingWindow, TimeInterval};
    use crate::slots::generate_slots;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use chrono_tz::Europe::Warsaw;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
    }

    fn local(hour: u32, minute: u32) -> DateTime<Utc> {
        Warsaw
            .with_ymd_and_hms(2025, 5, 5, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn long_before() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
    }

    // Helper to parse a generated "HH:MM" slot back into a UTC interval
    fn slot_interval(time: &str, duration_minutes: i64) -> TimeInterval {
        let parsed = NaiveTime::parse_from_str(time, "%H:%M").expect("slot times are HH:MM");
        let start = Warsaw
            .from_local_datetime(&date().and_time(parsed))
            .single()
            .expect("no DST transition on the fixed test date")
            .with_timezone(&Utc);
        TimeInterval::new(start, start + Duration::minutes(duration_minutes)).unwrap()
    }

    fn bookings(specs: &[(u32, i64)]) -> Vec<BusyInterval> {
        specs
            .iter()
            .map(|&(start_hour, len_hours)| BusyInterval {
                interval: TimeInterval::new(
                    local(start_hour, 0),
                    local(start_hour, 0) + Duration::hours(len_hours),
                )
                .unwrap(),
                source: BusySource::Booking,
                reason: None,
                is_full_day: false,
            })
            .collect()
    }

    proptest! {
        // The overlap test is symmetric for arbitrary interval pairs
        #[test]
        fn prop_overlap_is_symmetric(
            a_start in 0i64..1_000,
            a_len in 1i64..500,
            b_start in 0i64..1_000,
            b_len in 1i64..500,
        ) {
            let base = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();
            let a = TimeInterval::new(
                base + Duration::minutes(a_start),
                base + Duration::minutes(a_start + a_len),
            ).unwrap();
            let b = TimeInterval::new(
                base + Duration::minutes(b_start),
                base + Duration::minutes(b_start + b_len),
            ).unwrap();

            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        // Every generated slot starts at or after open and ends by close
        #[test]
        fn prop_slots_stay_within_the_window(
            open_hour in 0u32..12,
            close_hour in 13u32..23,
            duration_minutes in 15i64..120,
            busy_start in 8u32..16,
            busy_len in 1i64..4,
        ) {
            let window = OperatingWindow::new(
                NaiveTime::from_hms_opt(open_hour, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(close_hour, 0, 0).unwrap(),
            );
            let busy = bookings(&[(busy_start, busy_len)]);

            let day = generate_slots(
                date(), Warsaw, &window, duration_minutes, &busy,
                &Buffer::none(), 30, long_before(),
            );

            let open = window.open;
            let close = window.close;
            for slot in &day.slots {
                let parsed = NaiveTime::parse_from_str(&slot.time, "%H:%M").unwrap();
                prop_assert!(parsed >= open, "slot {} before open {}", slot.time, open);
                let end = parsed + Duration::minutes(duration_minutes);
                prop_assert!(end <= close, "slot {} runs past close {}", slot.time, close);
            }
        }

        // No offered slot ever overlaps a busy interval
        #[test]
        fn prop_slots_never_overlap_busy_periods(
            duration_minutes in 15i64..120,
            first_busy in 6u32..11,
            second_busy in 12u32..20,
            busy_len in 1i64..3,
        ) {
            let window = OperatingWindow::new(
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            );
            let busy = bookings(&[(first_busy, busy_len), (second_busy, busy_len)]);

            let day = generate_slots(
                date(), Warsaw, &window, duration_minutes, &busy,
                &Buffer::none(), 30, long_before(),
            );

            for slot in &day.slots {
                let candidate = slot_interval(&slot.time, duration_minutes);
                for b in &busy {
                    prop_assert!(
                        !overlaps(&candidate, &b.interval),
                        "slot {} overlaps busy {:?}", slot.time, b.interval
                    );
                }
            }
        }

        // Growing a booking's buffer can only shrink the slot set
        #[test]
        fn prop_buffer_growth_is_monotone(
            duration_minutes in 15i64..90,
            busy_start in 10u32..14,
            smaller in 0i64..30,
            extra in 1i64..30,
        ) {
            let window = OperatingWindow::new(
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            );
            let busy = bookings(&[(busy_start, 1)]);

            let slot_set = |buffer: Buffer| -> HashSet<String> {
                generate_slots(
                    date(), Warsaw, &window, duration_minutes, &busy,
                    &buffer, 30, long_before(),
                )
                .slots
                .into_iter()
                .map(|slot| slot.time)
                .collect()
            };

            let wide = slot_set(Buffer::new(smaller + extra, smaller + extra));
            let narrow = slot_set(Buffer::new(smaller, smaller));
            prop_assert!(wide.is_subset(&narrow));
        }
    }
}
