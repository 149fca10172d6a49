//! Enroll Core - Training session enrollment
//!
//! Decides whether a registration may be accepted:
//! - Validates the submission and canonicalizes it against the catalog
//! - Rejects a person already registered for the same training and date
//! - Counts seats per (date, shift) slot against a fixed capacity
//! - Appends accepted registrations through the store adapter
//!
//! # Example
//!
//! ```rust,ignore
//! use enroll_core::{Company, EnrollConfig, Enrollment, Registration, WorkShift};
//! use enroll_store::MemoryStore;
//!
//! # async fn example() -> Result<(), enroll_core::EnrollError> {
//! let enrollment = Enrollment::new(MemoryStore::new(), EnrollConfig::new());
//! enrollment.ensure_header().await?;
//!
//! let registration = Registration::new(Company::Partner, "Bruno Lima", "B1", "ADM (09-16h)", date, WorkShift::D)
//!     .with_team("Usimig");
//! let accepted = enrollment.submit(registration).await?;
//!
//! println!("{} seats left", accepted.seats_left);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod capacity;
pub mod catalog;
pub mod config;
pub mod duplicate;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod summary;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use capacity::{available_seats, DEFAULT_CAPACITY};
pub use catalog::{Catalog, ShiftCalendar, Teams, Training, SHIFT_DAY, SHIFT_NIGHT};
pub use config::EnrollConfig;
pub use duplicate::{is_duplicate, training_key};
pub use error::{ConfigError, EnrollError, RejectionReason, RowError};
pub use export::to_csv;
pub use orchestrator::{Accepted, Enrollment};
pub use summary::{slot_summary, sort_for_roster, SlotSummary};
pub use types::{header_row, Company, Registration, Slot, WorkShift, HEADER};
pub use validation::validate;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Enroll Core
    pub use crate::{
        Accepted, Catalog, Company, EnrollConfig, EnrollError, Enrollment, Registration, Slot, WorkShift,
    };
    pub use enroll_store::{MemoryStore, RowStore, SheetsConfig, SheetsStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
