//! Instructor summary
//!
//! Head counts per class (training, date, shift) and the roster ordering used
//! when listing registrants.

use crate::catalog::Catalog;
use crate::duplicate::training_key;
use crate::types::{columns, Registration};
use enroll_store::Row;
use serde::Serialize;
use std::collections::BTreeMap;

/// Enrollment of one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    /// Training title as stored
    pub training: String,
    /// Session date as stored
    pub date: String,
    /// Shift label as stored
    pub shift: String,
    /// Registrants in this class
    pub enrolled: u32,
    /// Seats left in the (date, shift) pool
    pub remaining: u32,
}

/// Group data rows by (training, date, shift)
///
/// With a catalog, cells naming a training by code or by title fall in one
/// class reported under the catalog title. `remaining` reflects the shared
/// (date, shift) pool, so two trainings on the same slot report the same
/// figure.
#[must_use]
pub fn slot_summary(rows: &[Row], capacity: u32, catalog: Option<&Catalog>) -> Vec<SlotSummary> {
    let mut classes: BTreeMap<(String, String, String), u32> = BTreeMap::new();
    let mut pools: BTreeMap<(String, String), u32> = BTreeMap::new();

    for row in rows.iter().filter(|row| row.len() > columns::SHIFT) {
        let cell = row[columns::TRAINING].trim();
        let training = catalog
            .and_then(|c| c.find_training(cell))
            .map_or_else(|| cell.to_string(), |t| t.title.clone());
        let date = row[columns::DATE].trim().to_string();
        let shift = row[columns::SHIFT].trim().to_string();

        *pools.entry((date.clone(), shift.clone())).or_default() += 1;
        *classes.entry((training, date, shift)).or_default() += 1;
    }

    classes
        .into_iter()
        .map(|((training, date, shift), enrolled)| {
            let used = pools.get(&(date.clone(), shift.clone())).copied().unwrap_or(enrolled);
            SlotSummary {
                training,
                date,
                shift,
                enrolled,
                remaining: capacity.saturating_sub(used),
            }
        })
        .collect()
}

/// Order registrations by training, date, then shift
pub fn sort_for_roster(registrations: &mut [Registration]) {
    registrations.sort_by(|a, b| {
        (&a.training_id, a.session_date, &a.shift_label).cmp(&(&b.training_id, b.session_date, &b.shift_label))
    });
}
