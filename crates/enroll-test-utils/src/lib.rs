//! Testing utilities for the enroll workspace
//!
//! Shared fixtures, scripted stores and tracing setup.

#![allow(missing_docs)]

use chrono::NaiveDate;
use enroll_core::{Company, EnrollConfig, Enrollment, Registration, WorkShift, SHIFT_DAY};
use enroll_store::{MemoryStore, RetryPolicy, Row, RowStore, StoreError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// First B1 day session
pub fn first_b1_day() -> NaiveDate {
    date(2025, 9, 22)
}

pub fn cells(values: &[&str]) -> Row {
    values.iter().map(|c| (*c).to_string()).collect()
}

pub fn internal_registration(name: &str, employee_id: &str) -> Registration {
    Registration::new(Company::Internal, name, "B1", SHIFT_DAY, first_b1_day(), WorkShift::A)
        .with_employee_id(employee_id)
        .with_team("Gerência de Pátio")
}

pub fn partner_registration(name: &str) -> Registration {
    Registration::new(Company::Partner, name, "B1", SHIFT_DAY, first_b1_day(), WorkShift::D).with_team("Usimig")
}

/// Header followed by `rows`
pub fn rows_with_header(rows: impl IntoIterator<Item = Row>) -> Vec<Row> {
    std::iter::once(enroll_core::header_row()).chain(rows).collect()
}

/// Retry policy with the default attempt count and a short base delay
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

/// Enrollment over an empty in-memory sheet with its header in place
pub fn setup_enrollment() -> (MemoryStore, Enrollment<MemoryStore>) {
    setup_enrollment_with(EnrollConfig::new().with_retry(fast_retry()))
}

pub fn setup_enrollment_with(config: EnrollConfig) -> (MemoryStore, Enrollment<MemoryStore>) {
    let store = MemoryStore::with_rows(vec![enroll_core::header_row()]);
    let enrollment = Enrollment::new(store.clone(), config);
    (store, enrollment)
}

/// Store whose writes fail with a scripted error a fixed number of times
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryStore,
    error: StoreError,
    failures_left: AtomicUsize,
    append_calls: AtomicUsize,
}

impl FlakyStore {
    /// Fail the next `failures` appends with a transient error
    pub fn transient(failures: usize) -> Self {
        Self::failing_with(failures, StoreError::Transient("backend error".to_string()))
    }

    pub fn failing_with(failures: usize, error: StoreError) -> Self {
        Self {
            inner: MemoryStore::with_rows(vec![enroll_core::header_row()]),
            error,
            failures_left: AtomicUsize::new(failures),
            append_calls: AtomicUsize::new(0),
        }
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Row> {
        self.inner.snapshot()
    }
}

#[async_trait::async_trait]
impl RowStore for FlakyStore {
    async fn get_all_rows(&self) -> Result<Vec<Row>, StoreError> {
        self.inner.get_all_rows().await
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(self.error.clone());
        }
        self.inner.append_row(values).await
    }

    async fn update_row(&self, index: usize, values: &[String]) -> Result<(), StoreError> {
        self.inner.update_row(index, values).await
    }
}

/// Store that cannot be read
#[derive(Debug)]
pub struct FailingStore {
    error: StoreError,
    writes: Mutex<Vec<Row>>,
}

impl FailingStore {
    pub fn new(error: StoreError) -> Self {
        Self {
            error,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Rows that reached the store
    pub fn writes(&self) -> Vec<Row> {
        self.writes.lock().clone()
    }
}

#[async_trait::async_trait]
impl RowStore for FailingStore {
    async fn get_all_rows(&self) -> Result<Vec<Row>, StoreError> {
        Err(self.error.clone())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        self.writes.lock().push(values.to_vec());
        Ok(())
    }

    async fn update_row(&self, _index: usize, values: &[String]) -> Result<(), StoreError> {
        self.writes.lock().push(values.to_vec());
        Ok(())
    }
}

/// Route tracing output to the test writer, filtered by `RUST_LOG`
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
