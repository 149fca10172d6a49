//! Core types for enrollment
//!
//! Defines:
//! - Company and work-shift enums with their stored labels
//! - The registration record and its row mapping
//! - Column layout of the registration worksheet

use crate::error::RowError;
use chrono::NaiveDate;
use enroll_store::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Worksheet header, in column order
pub const HEADER: [&str; 8] = [
    "Empresa",
    "Nome",
    "Matrícula",
    "Equipe/Gerência",
    "Treinamento",
    "Data",
    "Horário",
    "Turno",
];

/// Column positions in a registration row
pub mod columns {
    /// Empresa
    pub const COMPANY: usize = 0;
    /// Nome
    pub const NAME: usize = 1;
    /// Matrícula
    pub const EMPLOYEE_ID: usize = 2;
    /// Equipe/Gerência
    pub const TEAM: usize = 3;
    /// Treinamento
    pub const TRAINING: usize = 4;
    /// Data
    pub const DATE: usize = 5;
    /// Horário
    pub const SHIFT: usize = 6;
    /// Turno
    pub const WORK_SHIFT: usize = 7;
}

/// Stored date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header as owned cells
#[must_use]
pub fn header_row() -> Row {
    HEADER.iter().map(|h| (*h).to_string()).collect()
}

/// Rows after the header
#[inline]
#[must_use]
pub fn data_rows(rows: &[Row]) -> &[Row] {
    rows.get(1..).unwrap_or_default()
}

/// Render a date the way it is stored
#[inline]
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Employer of the registrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Company {
    /// Own staff, identified by an 8-digit employee ID
    #[serde(rename = "Vale")]
    Internal,
    /// Contractor staff
    #[serde(rename = "Parceira")]
    Partner,
}

impl Company {
    /// Label written to the store
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Company::Internal => "Vale",
            Company::Partner => "Parceira",
        }
    }

    /// Check if an employee ID is mandatory
    #[inline]
    #[must_use]
    pub fn requires_employee_id(&self) -> bool {
        matches!(self, Company::Internal)
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Company {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [Company::Internal, Company::Partner]
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RowError::UnknownCompany(trimmed.to_string()))
    }
}

/// Crew rotation the registrant works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkShift {
    /// Turno A
    #[serde(rename = "Turno A")]
    A,
    /// Turno B
    #[serde(rename = "Turno B")]
    B,
    /// Turno C
    #[serde(rename = "Turno C")]
    C,
    /// Turno D
    #[serde(rename = "Turno D")]
    D,
}

impl WorkShift {
    /// All shifts in display order
    pub const ALL: [WorkShift; 4] = [WorkShift::A, WorkShift::B, WorkShift::C, WorkShift::D];

    /// Label written to the store
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            WorkShift::A => "Turno A",
            WorkShift::B => "Turno B",
            WorkShift::C => "Turno C",
            WorkShift::D => "Turno D",
        }
    }

    fn letter(self) -> &'static str {
        &self.label()[6..]
    }
}

impl fmt::Display for WorkShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkShift {
    type Err = RowError;

    /// Accepts the stored label (`Turno A`) or the bare letter (`A`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        WorkShift::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(trimmed) || w.letter().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RowError::UnknownWorkShift(trimmed.to_string()))
    }
}

/// One registration; one row in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Employer
    pub company: Company,
    /// Full name as typed
    pub full_name: String,
    /// 8-digit ID, required for internal staff
    pub employee_id: String,
    /// Management unit (internal) or contractor firm (partner)
    pub team: String,
    /// Training code or title
    pub training_id: String,
    /// Training shift label, e.g. `ADM (09-16h)`
    pub shift_label: String,
    /// Session day
    pub session_date: NaiveDate,
    /// Crew rotation
    pub work_shift: WorkShift,
}

impl Registration {
    /// Create registration; employee ID and team start empty
    #[must_use]
    pub fn new(
        company: Company,
        full_name: impl Into<String>,
        training_id: impl Into<String>,
        shift_label: impl Into<String>,
        session_date: NaiveDate,
        work_shift: WorkShift,
    ) -> Self {
        Self {
            company,
            full_name: full_name.into(),
            employee_id: String::new(),
            team: String::new(),
            training_id: training_id.into(),
            shift_label: shift_label.into(),
            session_date,
            work_shift,
        }
    }

    /// With employee ID
    #[inline]
    #[must_use]
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = employee_id.into();
        self
    }

    /// With team
    #[inline]
    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    /// Cells in header order
    #[must_use]
    pub fn to_row(&self) -> Row {
        vec![
            self.company.label().to_string(),
            self.full_name.clone(),
            self.employee_id.clone(),
            self.team.clone(),
            self.training_id.clone(),
            format_date(self.session_date),
            self.shift_label.clone(),
            self.work_shift.label().to_string(),
        ]
    }

    /// Parse a stored row
    ///
    /// Trailing cells may be absent (the remote drops empty trailing cells).
    ///
    /// # Errors
    /// `RowError` when a required cell is empty or a value is unknown.
    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let cell = |index: usize| row.get(index).map_or("", |c| c.trim());
        let required = |index: usize, name: &'static str| {
            let value = cell(index);
            if value.is_empty() {
                Err(RowError::MissingCell(name))
            } else {
                Ok(value.to_string())
            }
        };

        let company: Company = required(columns::COMPANY, HEADER[columns::COMPANY])?.parse()?;
        let date_cell = required(columns::DATE, HEADER[columns::DATE])?;
        let session_date = NaiveDate::parse_from_str(&date_cell, DATE_FORMAT)
            .map_err(|_| RowError::InvalidDate(date_cell.clone()))?;
        let work_shift: WorkShift =
            required(columns::WORK_SHIFT, HEADER[columns::WORK_SHIFT])?.parse()?;

        Ok(Self {
            company,
            full_name: required(columns::NAME, HEADER[columns::NAME])?,
            employee_id: cell(columns::EMPLOYEE_ID).to_string(),
            team: required(columns::TEAM, HEADER[columns::TEAM])?,
            training_id: required(columns::TRAINING, HEADER[columns::TRAINING])?,
            shift_label: required(columns::SHIFT, HEADER[columns::SHIFT])?,
            session_date,
            work_shift,
        })
    }
}

/// A shared seat pool: one date and one training shift
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    /// Session day
    pub date: NaiveDate,
    /// Training shift label
    pub shift_label: String,
}

impl Slot {
    /// Create slot
    #[inline]
    #[must_use]
    pub fn new(date: NaiveDate, shift_label: impl Into<String>) -> Self {
        Self {
            date,
            shift_label: shift_label.into(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", format_date(self.date), self.shift_label)
    }
}
