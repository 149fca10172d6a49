//! Registration orchestrator
//!
//! Sequences a submission:
//! 1. Validate input (no store access on failure)
//! 2. Read rows fresh from the store (the cache only serves display calls)
//! 3. Duplicate guard
//! 4. Capacity check
//! 5. Append with retry; the adapter invalidates its cache on success
//!
//! Steps 2-5 are separate remote calls with no lock or concurrency token.
//! Two concurrent submitters can both see the last seat and both append.

use crate::capacity;
use crate::catalog::Catalog;
use crate::config::EnrollConfig;
use crate::duplicate::is_duplicate;
use crate::error::{ConfigError, EnrollError, RowError};
use crate::export::to_csv;
use crate::summary::{slot_summary, sort_for_roster, SlotSummary};
use crate::types::{data_rows, header_row, Registration, Slot};
use crate::validation::validate;
use chrono::NaiveDate;
use enroll_store::{HeaderAction, Row, RowStore, SheetsStore, StoreAdapter};
use std::sync::Arc;

/// A registration the store accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Registration as written (canonical form)
    pub registration: Registration,
    /// Seats left in the slot after this one, as observed before writing
    pub seats_left: u32,
}

/// Enrollment front end used by the form layer
#[derive(Debug)]
pub struct Enrollment<S> {
    config: EnrollConfig,
    adapter: StoreAdapter<S>,
}

impl<S: RowStore> Enrollment<S> {
    /// Create enrollment over `store`
    #[must_use]
    pub fn new(store: S, config: EnrollConfig) -> Self {
        let adapter = StoreAdapter::new(store)
            .with_retry(config.retry)
            .with_cache_ttl(config.cache_ttl())
            .with_sheet(config.worksheet());
        Self { config, adapter }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EnrollConfig {
        &self.config
    }

    /// Store adapter
    #[inline]
    #[must_use]
    pub fn adapter(&self) -> &StoreAdapter<S> {
        &self.adapter
    }

    fn enforced_catalog(&self) -> Option<&Catalog> {
        self.config.enforce_catalog.then_some(&self.config.catalog)
    }

    /// Submit a registration
    ///
    /// # Errors
    /// - `InvalidInput` before any store access
    /// - `StoreUnavailable` if rows cannot be read
    /// - `DuplicateRegistration` if the person already holds this training and date
    /// - `SlotFull` if the (date, shift) pool is exhausted
    /// - `StoreWriteFailed` if the append failed after retries
    #[tracing::instrument(
        skip(self, registration),
        fields(training = %registration.training_id, date = %registration.session_date, shift = %registration.shift_label)
    )]
    pub async fn submit(&self, registration: Registration) -> Result<Accepted, EnrollError> {
        let registration = validate(&registration, self.enforced_catalog()).map_err(|e| {
            tracing::warn!(error = %e, "registration rejected before store access");
            e
        })?;

        let rows = self
            .adapter
            .read_fresh()
            .await
            .map_err(EnrollError::StoreUnavailable)?;
        let existing = data_rows(&rows);

        if is_duplicate(
            existing,
            &registration.full_name,
            &registration.training_id,
            registration.session_date,
            Some(&self.config.catalog),
        ) {
            tracing::warn!(name = %registration.full_name, "duplicate registration");
            return Err(EnrollError::DuplicateRegistration {
                name: registration.full_name,
                training: registration.training_id,
                date: registration.session_date,
            });
        }

        let slot = Slot::new(registration.session_date, registration.shift_label.clone());
        let seats = capacity::available_seats(existing, &slot, self.config.capacity);
        if seats == 0 {
            tracing::warn!(%slot, "slot full");
            return Err(EnrollError::SlotFull {
                date: slot.date,
                shift: slot.shift_label,
            });
        }

        self.adapter
            .append_row(&registration.to_row())
            .await
            .map_err(EnrollError::StoreWriteFailed)?;

        let seats_left = seats - 1;
        tracing::info!(%slot, seats_left, "registration accepted");
        Ok(Accepted {
            registration,
            seats_left,
        })
    }

    /// Seats left for a training session, for display
    ///
    /// The count is keyed on (date, shift) only; `training_id` is accepted for
    /// the form's convenience and does not narrow the pool. Served from the
    /// cache, so it may lag writes by other processes; `submit` re-reads.
    ///
    /// # Errors
    /// `StoreUnavailable` if rows cannot be read.
    pub async fn available_seats(
        &self,
        training_id: &str,
        session_date: NaiveDate,
        shift_label: &str,
    ) -> Result<u32, EnrollError> {
        let rows = self.read_all_rows().await?;
        let seats = capacity::available_seats(
            data_rows(&rows),
            &Slot::new(session_date, shift_label),
            self.config.capacity,
        );
        tracing::debug!(training_id, %session_date, shift_label, seats, "seat check");
        Ok(seats)
    }

    /// All rows, header included, through the cache
    ///
    /// # Errors
    /// `StoreUnavailable` if the store cannot be read.
    pub async fn read_all_rows(&self) -> Result<Arc<Vec<Row>>, EnrollError> {
        self.adapter
            .read_all_rows()
            .await
            .map_err(EnrollError::StoreUnavailable)
    }

    /// Stored registrations in roster order
    ///
    /// Rows that do not parse are skipped with a warning.
    ///
    /// # Errors
    /// `StoreUnavailable` if the store cannot be read.
    pub async fn list_registrations(&self) -> Result<Vec<Registration>, EnrollError> {
        let rows = self.read_all_rows().await?;
        let mut registrations: Vec<Registration> = data_rows(&rows)
            .iter()
            .enumerate()
            .filter_map(|(index, row)| match Registration::from_row(row) {
                Ok(registration) => Some(registration),
                Err(RowError::MissingCell(_)) if row.iter().all(|c| c.trim().is_empty()) => None,
                Err(err) => {
                    // +2: 1-based and the header row
                    tracing::warn!(row = index + 2, error = %err, "skipping malformed row");
                    None
                }
            })
            .collect();
        sort_for_roster(&mut registrations);
        Ok(registrations)
    }

    /// Make sure row 1 is the worksheet header
    ///
    /// # Errors
    /// `StoreUnavailable` if the store cannot be read or written.
    pub async fn ensure_header(&self) -> Result<HeaderAction, EnrollError> {
        self.adapter
            .ensure_header(&header_row())
            .await
            .map_err(EnrollError::StoreUnavailable)
    }

    /// Every stored registration as UTF-8 CSV with the header columns
    ///
    /// # Errors
    /// `StoreUnavailable` if the store cannot be read.
    pub async fn export_csv(&self) -> Result<Vec<u8>, EnrollError> {
        let rows = self.read_all_rows().await?;
        Ok(to_csv(&header_row(), data_rows(&rows)))
    }

    /// Head counts per class for the instructor view
    ///
    /// # Errors
    /// `StoreUnavailable` if the store cannot be read.
    pub async fn slot_summary(&self) -> Result<Vec<SlotSummary>, EnrollError> {
        let rows = self.read_all_rows().await?;
        Ok(slot_summary(data_rows(&rows), self.config.capacity, Some(&self.config.catalog)))
    }
}

impl Enrollment<SheetsStore> {
    /// Connect to the spreadsheet named in `config.sheets`
    ///
    /// # Errors
    /// - `ConfigError::Invalid` if no spreadsheet is configured
    /// - `ConfigError::Store` if the HTTP client cannot be built
    pub fn connect(config: EnrollConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sheets = config
            .sheets
            .clone()
            .ok_or_else(|| ConfigError::Invalid("no [sheets] section configured".to_string()))?;
        let store = SheetsStore::new(sheets)?;
        Ok(Self::new(store, config))
    }
}
