//! Raw row-store contract
//!
//! A remote tabular store seen as an ordered list of string rows. Row 1 is
//! the header. Implementations perform exactly one remote call per method;
//! retry and caching live in [`StoreAdapter`](crate::StoreAdapter).

use crate::error::StoreError;

/// One stored row, cells in column order
pub type Row = Vec<String>;

/// Remote tabular store
///
/// Implement this trait to plug a new backend under the adapter.
#[async_trait::async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch every row, header included, in storage order
    async fn get_all_rows(&self) -> Result<Vec<Row>, StoreError>;

    /// Append one row after the last non-empty row
    async fn append_row(&self, values: &[String]) -> Result<(), StoreError>;

    /// Overwrite the row at `index` (1-based, as the remote addresses it)
    async fn update_row(&self, index: usize, values: &[String]) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S: RowStore + ?Sized> RowStore for std::sync::Arc<S> {
    async fn get_all_rows(&self) -> Result<Vec<Row>, StoreError> {
        (**self).get_all_rows().await
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        (**self).append_row(values).await
    }

    async fn update_row(&self, index: usize, values: &[String]) -> Result<(), StoreError> {
        (**self).update_row(index, values).await
    }
}
