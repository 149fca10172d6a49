//! Duplicate guard
//!
//! A person may register once per (training, date). Names, trainings and
//! dates compare after trimming and case-folding; there is no fuzzy matching.
//! With a catalog, a training cell holding either the code (`B2`) or the full
//! title identifies the same training.

use crate::catalog::Catalog;
use crate::types::{columns, format_date};
use chrono::NaiveDate;
use enroll_store::Row;

/// Trim and case-fold for comparison
#[inline]
#[must_use]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Comparison key for a training cell
///
/// The folded catalog code when `value` resolves, the folded text otherwise.
#[must_use]
pub fn training_key(value: &str, catalog: Option<&Catalog>) -> String {
    catalog
        .and_then(|c| c.find_training(value))
        .map_or_else(|| normalize(value), |training| normalize(&training.code))
}

/// Check whether `rows` already hold (name, training, date)
///
/// `rows` are data rows (no header). Rows too short to carry a date never
/// match.
#[must_use]
pub fn is_duplicate(
    rows: &[Row],
    name: &str,
    training_id: &str,
    session_date: NaiveDate,
    catalog: Option<&Catalog>,
) -> bool {
    let name = normalize(name);
    let training = training_key(training_id, catalog);
    let date = format_date(session_date);

    rows.iter().filter(|row| row.len() > columns::DATE).any(|row| {
        normalize(&row[columns::NAME]) == name
            && training_key(&row[columns::TRAINING], catalog) == training
            && row[columns::DATE].trim() == date
    })
}
