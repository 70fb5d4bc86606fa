// --- File: crates/bookify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod store; // Storage collaborator contract

// Re-export error types and utilities for easier access
pub use error::{
    conflict, internal_error, storage_error, validation_error, BookifyError, Context,
    HttpStatusCode,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error, log_result};

// Re-export the storage contract for easier access
pub use store::{
    BookingId, BookingRecord, BookingStatus, BoxFuture, CommitmentScope, CommitmentStore,
    EmployeeId, ExternalEventRecord, GroupClassRecord, GroupClassStatus, ServiceId, StoreError,
    TenantId, TimeOffRecord,
};
