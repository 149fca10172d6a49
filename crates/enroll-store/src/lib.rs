//! Enroll Store - Registration store adapter
//!
//! The boundary between the enrollment core and the shared spreadsheet that
//! serves as its database.
//!
//! # Architecture
//!
//! ```text
//! Enrollment ──→ StoreAdapter ──→ RowStore (SheetsStore | MemoryStore)
//!                  │    ↑
//!                  │  RowCache (read-through, invalidated on write)
//!                  └─ RetryPolicy (append backoff: base * 2^attempt)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use enroll_store::{MemoryStore, StoreAdapter};
//!
//! # async fn example() -> Result<(), enroll_store::StoreError> {
//! let adapter = StoreAdapter::new(MemoryStore::new());
//! adapter.ensure_header(&header).await?;
//! adapter.append_row(&row).await?;
//! let rows = adapter.read_all_rows().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod adapter;
pub mod cache;
pub mod error;
pub mod memory;
pub mod retry;
pub mod sheets;
pub mod store;

// Re-exports for convenience
pub use adapter::{HeaderAction, StoreAdapter};
pub use cache::RowCache;
pub use error::StoreError;
pub use memory::{MemoryStore, MemoryStoreStats};
pub use retry::RetryPolicy;
pub use sheets::{SheetsConfig, SheetsStore};
pub use store::{Row, RowStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
