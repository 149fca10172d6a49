//! Input validation
//!
//! Runs before any store access. Produces a canonical registration: text
//! fields trimmed and, when a catalog is enforced, the training resolved to
//! its stored title and the shift to its catalog label.

use crate::catalog::Catalog;
use crate::duplicate::normalize;
use crate::error::EnrollError;
use crate::types::Registration;

/// Length of an employee ID
pub const EMPLOYEE_ID_LEN: usize = 8;

/// Check an employee ID: exactly 8 ASCII digits
#[inline]
#[must_use]
pub fn is_valid_employee_id(id: &str) -> bool {
    id.len() == EMPLOYEE_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a submission and return its canonical form
///
/// # Errors
/// `EnrollError::InvalidInput` describing the first problem found.
pub fn validate(registration: &Registration, catalog: Option<&Catalog>) -> Result<Registration, EnrollError> {
    let mut canonical = Registration {
        full_name: registration.full_name.trim().to_string(),
        employee_id: registration.employee_id.trim().to_string(),
        team: registration.team.trim().to_string(),
        training_id: registration.training_id.trim().to_string(),
        shift_label: registration.shift_label.trim().to_string(),
        ..registration.clone()
    };

    for (value, field) in [
        (&canonical.full_name, "full name"),
        (&canonical.team, "team"),
        (&canonical.training_id, "training"),
        (&canonical.shift_label, "shift"),
    ] {
        if value.is_empty() {
            return Err(EnrollError::invalid(format!("{field} is required")));
        }
    }

    if canonical.company.requires_employee_id() && !is_valid_employee_id(&canonical.employee_id) {
        return Err(EnrollError::invalid(format!(
            "employee ID must be exactly {EMPLOYEE_ID_LEN} digits for {} staff",
            canonical.company
        )));
    }

    let Some(catalog) = catalog else {
        return Ok(canonical);
    };

    let training = catalog
        .find_training(&canonical.training_id)
        .ok_or_else(|| EnrollError::invalid(format!("unknown training '{}'", canonical.training_id)))?;
    let shift = training.shift(&canonical.shift_label).ok_or_else(|| {
        EnrollError::invalid(format!(
            "training {} has no shift '{}'",
            training.code, canonical.shift_label
        ))
    })?;
    if !shift.has_date(canonical.session_date) {
        return Err(EnrollError::invalid(format!(
            "training {} has no {} session on {}",
            training.code, shift.label, canonical.session_date
        )));
    }
    let wanted_team = normalize(&canonical.team);
    let team = catalog
        .teams
        .for_company(canonical.company)
        .iter()
        .find(|t| normalize(t) == wanted_team)
        .ok_or_else(|| {
            EnrollError::invalid(format!(
                "team '{}' does not belong to {}",
                canonical.team, canonical.company
            ))
        })?;

    canonical.team.clone_from(team);
    canonical.training_id.clone_from(&training.title);
    canonical.shift_label.clone_from(&shift.label);
    Ok(canonical)
}
