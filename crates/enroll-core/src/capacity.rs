//! Capacity checker
//!
//! Seats are counted per slot: (date, training shift). The training column is
//! not part of the key, so two trainings scheduled on the same date and shift
//! label draw from one pool.

use crate::types::{columns, format_date, Slot};
use enroll_store::Row;

/// Seats per slot
pub const DEFAULT_CAPACITY: u32 = 4;

/// Data rows occupying `slot`
#[must_use]
pub fn occupied(rows: &[Row], slot: &Slot) -> usize {
    let date = format_date(slot.date);
    let shift = slot.shift_label.trim();
    rows.iter()
        .filter(|row| row.len() > columns::SHIFT)
        .filter(|row| row[columns::DATE].trim() == date && row[columns::SHIFT].trim() == shift)
        .count()
}

/// Seats left in `slot`, never below zero
#[must_use]
pub fn available_seats(rows: &[Row], slot: &Slot, capacity: u32) -> u32 {
    let used = u32::try_from(occupied(rows, slot)).unwrap_or(u32::MAX);
    capacity.saturating_sub(used)
}
