//! Read-through row cache using moka
//!
//! Holds the last full read of a worksheet for a short time-to-live so that a
//! burst of seat and duplicate checks costs one remote read. Every successful
//! write must invalidate it.

use crate::store::Row;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default time-to-live for a cached read
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Cached worksheet reads, keyed by worksheet name
#[derive(Debug, Clone)]
pub struct RowCache {
    inner: Cache<String, Arc<Vec<Row>>>,
}

impl RowCache {
    /// Create cache with the given time-to-live
    #[inline]
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(16).time_to_live(ttl).build(),
        }
    }

    /// Cached rows for `sheet`, if any
    #[inline]
    pub async fn get(&self, sheet: &str) -> Option<Arc<Vec<Row>>> {
        self.inner.get(sheet).await
    }

    /// Store rows for `sheet`
    #[inline]
    pub async fn insert(&self, sheet: &str, rows: Arc<Vec<Row>>) {
        self.inner.insert(sheet.to_string(), rows).await;
    }

    /// Return cached rows or load them with `f`
    ///
    /// Failed loads are not cached.
    pub async fn try_get_or_load<E, F, Fut>(&self, sheet: &str, f: F) -> Result<Arc<Vec<Row>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Row>, E>>,
    {
        if let Some(cached) = self.get(sheet).await {
            tracing::debug!(sheet, rows = cached.len(), "row cache hit");
            return Ok(cached);
        }

        tracing::debug!(sheet, "row cache miss");
        let rows = Arc::new(f().await?);
        self.insert(sheet, Arc::clone(&rows)).await;
        Ok(rows)
    }

    /// Drop the cached read for `sheet`
    #[inline]
    pub async fn invalidate(&self, sheet: &str) {
        self.inner.invalidate(sheet).await;
    }

    /// Check if `sheet` has a live cached read
    #[inline]
    pub async fn contains(&self, sheet: &str) -> bool {
        self.inner.get(sheet).await.is_some()
    }
}

impl Default for RowCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| vec![i.to_string()]).collect()
    }

    #[tokio::test]
    async fn loads_once_until_invalidated() {
        let cache = RowCache::default();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .try_get_or_load::<(), _, _>("Inscricoes", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(rows(2))
                })
                .await
                .unwrap();
            assert_eq!(got.len(), 2);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate("Inscricoes").await;
        assert!(!cache.contains("Inscricoes").await);

        cache
            .try_get_or_load::<(), _, _>("Inscricoes", || async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(rows(3))
            })
            .await
            .unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let cache = RowCache::default();
        let result = cache
            .try_get_or_load("Inscricoes", || async { Err::<Vec<Row>, _>("offline") })
            .await;
        assert_eq!(result, Err("offline"));
        assert!(!cache.contains("Inscricoes").await);
    }

    #[tokio::test]
    async fn sheets_are_cached_independently() {
        let cache = RowCache::default();
        cache.insert("a", Arc::new(rows(1))).await;
        cache.insert("b", Arc::new(rows(2))).await;
        cache.invalidate("a").await;

        assert!(!cache.contains("a").await);
        assert_eq!(cache.get("b").await.map(|r| r.len()), Some(2));
    }
}
