//! Store adapter - the only path from the core to the remote store
//!
//! Wraps a [`RowStore`] with:
//! - a read-through [`RowCache`] invalidated after every successful write
//! - bounded exponential backoff for appends ([`RetryPolicy`])
//! - idempotent header maintenance
//!
//! # Consistency
//!
//! The adapter adds no locking. A read followed by an append is two remote
//! calls, so concurrent writers from other processes can interleave.

use crate::cache::{RowCache, DEFAULT_TTL};
use crate::error::StoreError;
use crate::retry::RetryPolicy;
use crate::sheets::DEFAULT_WORKSHEET;
use crate::store::{Row, RowStore};
use std::sync::Arc;
use std::time::Duration;

/// What [`StoreAdapter::ensure_header`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Header already matched
    Unchanged,
    /// Store was empty; header appended
    Created,
    /// First row differed; overwritten
    Replaced,
}

/// Cached, retrying front for a row store
#[derive(Debug)]
pub struct StoreAdapter<S> {
    store: S,
    sheet: String,
    cache: RowCache,
    retry: RetryPolicy,
}

impl<S: RowStore> StoreAdapter<S> {
    /// Create adapter with default retry policy and cache TTL
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            sheet: DEFAULT_WORKSHEET.to_string(),
            cache: RowCache::with_ttl(DEFAULT_TTL),
            retry: RetryPolicy::default(),
        }
    }

    /// With retry policy for appends
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With cache time-to-live
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = RowCache::with_ttl(ttl);
        self
    }

    /// With worksheet name used as the cache key
    #[inline]
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active retry policy
    #[inline]
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// All rows, header included, through the cache
    ///
    /// # Errors
    /// Whatever the store reports; reads are not retried.
    pub async fn read_all_rows(&self) -> Result<Arc<Vec<Row>>, StoreError> {
        self.cache
            .try_get_or_load(&self.sheet, || self.store.get_all_rows())
            .await
    }

    /// All rows read straight from the store
    ///
    /// Drops any cached read first and caches the result for later
    /// [`read_all_rows`](Self::read_all_rows) calls. Decisions that must see
    /// rows written by other processes go through here.
    ///
    /// # Errors
    /// Whatever the store reports; reads are not retried.
    pub async fn read_fresh(&self) -> Result<Arc<Vec<Row>>, StoreError> {
        self.cache.invalidate(&self.sheet).await;
        self.read_all_rows().await
    }

    /// Make row 1 equal `expected`
    ///
    /// Appends the header to an empty store, overwrites a differing first row,
    /// and does nothing otherwise. Reads bypass the cache.
    ///
    /// # Errors
    /// Read or write failure from the store.
    pub async fn ensure_header(&self, expected: &[String]) -> Result<HeaderAction, StoreError> {
        self.cache.invalidate(&self.sheet).await;
        let rows = self.store.get_all_rows().await?;

        let action = match rows.first() {
            None => {
                self.retry
                    .run("ensure_header", || self.store.append_row(expected))
                    .await?;
                HeaderAction::Created
            }
            Some(first) if first.as_slice() == expected => HeaderAction::Unchanged,
            Some(first) => {
                tracing::warn!(found = ?first, "header mismatch, overwriting row 1");
                self.retry
                    .run("ensure_header", || self.store.update_row(1, expected))
                    .await?;
                HeaderAction::Replaced
            }
        };

        if action != HeaderAction::Unchanged {
            self.cache.invalidate(&self.sheet).await;
            tracing::info!(sheet = %self.sheet, ?action, "header written");
        }
        Ok(action)
    }

    /// Append one row, retrying transient failures
    ///
    /// Not idempotent: a write that landed remotely but timed out locally is
    /// attempted again and may leave a duplicate row.
    ///
    /// # Errors
    /// The last store error once attempts are exhausted, or the first
    /// non-transient one.
    pub async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        self.retry
            .run("append_row", || self.store.append_row(values))
            .await?;
        self.cache.invalidate(&self.sheet).await;
        Ok(())
    }

    /// Drop any cached read
    #[inline]
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.sheet).await;
    }
}
