//! Error types for the enrollment core
//!
//! Provides error handling for:
//! - Submission outcomes (invalid input, duplicates, full slots)
//! - Store read and write failures
//! - Malformed stored rows
//! - Configuration loading

use chrono::NaiveDate;
use enroll_store::StoreError;
use std::path::PathBuf;

/// Main enrollment error type
///
/// Every variant is terminal for the current attempt. Only the adapter's own
/// write backoff retries anything automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollError {
    /// Missing required field or malformed value; the store was not touched
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Same person already registered for this training and date
    #[error("{name} is already registered for {training} on {date}")]
    DuplicateRegistration {
        /// Name as submitted
        name: String,
        /// Training title
        training: String,
        /// Session date
        date: NaiveDate,
    },

    /// No seats left in the slot
    #[error("no seats left for {date} ({shift})")]
    SlotFull {
        /// Session date
        date: NaiveDate,
        /// Shift label
        shift: String,
    },

    /// Reading the store failed
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Writing the store failed after exhausting retries
    #[error("store write failed: {0}")]
    StoreWriteFailed(#[source] StoreError),
}

/// Why a submission was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// See [`EnrollError::InvalidInput`]
    InvalidInput,
    /// See [`EnrollError::DuplicateRegistration`]
    DuplicateRegistration,
    /// See [`EnrollError::SlotFull`]
    SlotFull,
    /// See [`EnrollError::StoreUnavailable`]
    StoreUnavailable,
    /// See [`EnrollError::StoreWriteFailed`]
    StoreWriteFailed,
}

impl EnrollError {
    /// Create invalid input error
    #[inline]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Classification of this error
    #[must_use]
    pub fn reason(&self) -> RejectionReason {
        match self {
            Self::InvalidInput(_) => RejectionReason::InvalidInput,
            Self::DuplicateRegistration { .. } => RejectionReason::DuplicateRegistration,
            Self::SlotFull { .. } => RejectionReason::SlotFull,
            Self::StoreUnavailable(_) => RejectionReason::StoreUnavailable,
            Self::StoreWriteFailed(_) => RejectionReason::StoreWriteFailed,
        }
    }

    /// Check if the caller may retry the whole operation later
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::StoreWriteFailed(_))
    }
}

/// A stored row that does not describe a registration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// Required cell is empty or absent
    #[error("missing value for column '{0}'")]
    MissingCell(&'static str),

    /// Company cell is not a known company
    #[error("unknown company: '{0}'")]
    UnknownCompany(String),

    /// Work shift cell is not a known shift
    #[error("unknown work shift: '{0}'")]
    UnknownWorkShift(String),

    /// Date cell is not an ISO date
    #[error("invalid date: '{0}'")]
    InvalidDate(String),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Store backend could not be built from the config
    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),
}
