//! In-process row store
//!
//! Keeps rows in memory behind a `parking_lot::RwLock`. Clones share the same
//! rows, so a test can hand one clone to the adapter and inspect another.

use crate::error::StoreError;
use crate::store::{Row, RowStore};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Call counters for a [`MemoryStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// `get_all_rows` calls
    pub reads: usize,
    /// `append_row` calls
    pub appends: usize,
    /// `update_row` calls
    pub updates: usize,
}

impl MemoryStoreStats {
    /// Total remote-equivalent calls
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.reads + self.appends + self.updates
    }
}

#[derive(Debug, Default)]
struct Inner {
    rows: RwLock<Vec<Row>>,
    reads: AtomicUsize,
    appends: AtomicUsize,
    updates: AtomicUsize,
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with rows
    #[must_use]
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let store = Self::new();
        *store.inner.rows.write() = rows;
        store
    }

    /// Copy of the current rows
    #[must_use]
    pub fn snapshot(&self) -> Vec<Row> {
        self.inner.rows.read().clone()
    }

    /// Number of stored rows, header included
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.rows.read().len()
    }

    /// Check if the store holds no rows at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.rows.read().is_empty()
    }

    /// Call counters since creation
    #[must_use]
    pub fn stats(&self) -> MemoryStoreStats {
        MemoryStoreStats {
            reads: self.inner.reads.load(Ordering::SeqCst),
            appends: self.inner.appends.load(Ordering::SeqCst),
            updates: self.inner.updates.load(Ordering::SeqCst),
        }
    }
}

#[async_trait::async_trait]
impl RowStore for MemoryStore {
    async fn get_all_rows(&self) -> Result<Vec<Row>, StoreError> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        self.inner.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.rows.write().push(values.to_vec());
        Ok(())
    }

    async fn update_row(&self, index: usize, values: &[String]) -> Result<(), StoreError> {
        self.inner.updates.fetch_add(1, Ordering::SeqCst);
        if index == 0 {
            return Err(StoreError::Rejected {
                status: 400,
                message: "row index is 1-based".to_string(),
            });
        }

        let mut rows = self.inner.rows.write();
        if rows.len() < index {
            rows.resize_with(index, Vec::new);
        }
        rows[index - 1] = values.to_vec();
        Ok(())
    }
}
