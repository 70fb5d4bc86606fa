// --- File: crates/bookify_engine/src/lib.rs ---
// Declare modules within this crate
pub mod conflict;
pub mod error;
pub mod interval;
pub mod models;
pub mod resolver;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
pub mod sources;
#[cfg(test)]
mod sources_test;

// Re-export the engine surface consumed by the booking service
pub use conflict::ConflictChecker;
pub use error::EngineError;
pub use models::{
    AvailabilityResult, Buffer, BusyInterval, BusySource, Conflict, ConflictKind, DaySlots,
    EmployeeSchedule, EmployeeSelector, EngineDefaults, FlexibleDuration, OperatingWindow,
    ServiceConfig, ServiceRequest, Slot, SlotEntry, TenantSchedule, TimeInterval, WeeklyHours,
    WeeklyShift,
};
pub use resolver::AvailabilityResolver;
