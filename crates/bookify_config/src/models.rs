// --- File: crates/bookify_config/src/models.rs ---

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// --- Scheduling Defaults ---
// Engine-level defaults. Tenant-level values (opening hours, employee shifts,
// buffers, flexible bounds, advance limits) are supplied already parsed by the
// consuming service; they never pass through this crate.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Operating window used when neither employee shifts nor tenant opening
    /// hours exist for a day.
    #[serde(default = "default_open")]
    pub default_open: NaiveTime,
    #[serde(default = "default_close")]
    pub default_close: NaiveTime,

    /// Services longer than this snap to this slot granularity; shorter ones
    /// use their own duration as the step.
    #[serde(default = "default_slot_snap_minutes")]
    pub slot_snap_minutes: i64,

    /// Commitments at least this long are treated as occupying whole days.
    /// TODO(product): confirm whether the inherited 8-hour cutoff is policy
    /// or a workaround for bookings predating the multi-day flag.
    #[serde(default = "default_full_day_threshold_hours")]
    pub full_day_threshold_hours: i64,

    /// Fallback advance-booking limit in days when a tenant sets none.
    /// 0 means unlimited.
    #[serde(default)]
    pub max_advance_days: u32,
}

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 0, 0).unwrap()
}

fn default_slot_snap_minutes() -> i64 {
    30
}

fn default_full_day_threshold_hours() -> i64 {
    8
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        SchedulingConfig {
            default_open: default_open(),
            default_close: default_close(),
            slot_snap_minutes: default_slot_snap_minutes(),
            full_day_threshold_hours: default_full_day_threshold_hours(),
            max_advance_days: 0,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}
