//! Enrollment configuration
//!
//! Everything the core needs that is not code: seat capacity, write retry
//! policy, cache lifetime, the catalog, and optionally the spreadsheet
//! connection. Loadable from TOML; every field has a default. The worksheet
//! header is fixed by the row layout and cannot be configured.

use crate::capacity::DEFAULT_CAPACITY;
use crate::catalog::Catalog;
use crate::error::ConfigError;
use enroll_store::sheets::DEFAULT_WORKSHEET;
use enroll_store::{RetryPolicy, SheetsConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Enrollment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrollConfig {
    /// Seats per (date, shift) slot
    pub capacity: u32,
    /// Backoff for store writes
    pub retry: RetryPolicy,
    /// Lifetime of a cached read, in seconds
    pub cache_ttl_secs: u64,
    /// Validate training, shift, date and team against the catalog
    pub enforce_catalog: bool,
    /// Reference data
    pub catalog: Catalog,
    /// Spreadsheet connection
    pub sheets: Option<SheetsConfig>,
}

impl EnrollConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML and check consistency
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - `ConfigError::Invalid` if values are inconsistent
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - see [`EnrollConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), capacity = config.capacity, "loaded enrollment config");
        Ok(config)
    }

    /// Check consistency
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".to_string()));
        }
        self.catalog.check().map_err(ConfigError::Invalid)
    }

    /// With capacity
    #[inline]
    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With catalog
    #[inline]
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// With catalog enforcement switched on or off
    #[inline]
    #[must_use]
    pub fn with_enforce_catalog(mut self, enforce: bool) -> Self {
        self.enforce_catalog = enforce;
        self
    }

    /// With spreadsheet connection
    #[inline]
    #[must_use]
    pub fn with_sheets(mut self, sheets: SheetsConfig) -> Self {
        self.sheets = Some(sheets);
        self
    }

    /// Cache lifetime
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Worksheet the registrations live in
    #[must_use]
    pub fn worksheet(&self) -> &str {
        self.sheets
            .as_ref()
            .map_or(DEFAULT_WORKSHEET, |s| s.worksheet.as_str())
    }
}

impl Default for EnrollConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            retry: RetryPolicy::default(),
            cache_ttl_secs: 30,
            enforce_catalog: true,
            catalog: Catalog::builtin(),
            sheets: None,
        }
    }
}
