//! Training catalog
//!
//! Fixed reference data the form offers: teams per company, trainings, their
//! shifts, and the session calendar of each shift. Loaded from configuration;
//! [`Catalog::builtin`] carries the Sep-Dec 2025 schedule.

use crate::duplicate::normalize;
use crate::types::Company;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day shift label
pub const SHIFT_DAY: &str = "ADM (09-16h)";

/// Night shift label
pub const SHIFT_NIGHT: &str = "Noite (19h-02h)";

/// Teams offered per company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teams {
    /// Management units of internal staff
    pub internal: Vec<String>,
    /// Contractor firms
    pub partner: Vec<String>,
}

impl Teams {
    /// Teams for a company
    #[inline]
    #[must_use]
    pub fn for_company(&self, company: Company) -> &[String] {
        match company {
            Company::Internal => &self.internal,
            Company::Partner => &self.partner,
        }
    }
}

/// Session calendar of one training shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCalendar {
    /// Shift label
    pub label: String,
    /// Session days, in order
    pub dates: Vec<NaiveDate>,
}

impl ShiftCalendar {
    /// Weekly sessions starting at `start`
    #[must_use]
    pub fn weekly(label: impl Into<String>, start: NaiveDate, sessions: usize) -> Self {
        Self {
            label: label.into(),
            dates: start.iter_weeks().take(sessions).collect(),
        }
    }

    /// Check if a session runs on `date`
    #[inline]
    #[must_use]
    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// One training offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    /// Short code, e.g. `B1`
    pub code: String,
    /// Full title as written to the store
    pub title: String,
    /// Shifts with their calendars
    pub shifts: Vec<ShiftCalendar>,
}

impl Training {
    /// Calendar for a shift label
    #[must_use]
    pub fn shift(&self, label: &str) -> Option<&ShiftCalendar> {
        let wanted = normalize(label);
        self.shifts.iter().find(|s| normalize(&s.label) == wanted)
    }

    /// Shift labels in catalog order
    #[must_use]
    pub fn shift_labels(&self) -> Vec<&str> {
        self.shifts.iter().map(|s| s.label.as_str()).collect()
    }
}

/// Reference data for the enrollment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Teams per company
    pub teams: Teams,
    /// Trainings in display order
    pub trainings: Vec<Training>,
}

impl Catalog {
    /// Find a training by code (`B1`) or full title, ignoring case and padding
    #[must_use]
    pub fn find_training(&self, key: &str) -> Option<&Training> {
        let wanted = normalize(key);
        self.trainings
            .iter()
            .find(|t| normalize(&t.code) == wanted || normalize(&t.title) == wanted)
    }

    /// Session days for a training shift, empty when unknown
    #[must_use]
    pub fn dates_for(&self, training: &str, shift: &str) -> &[NaiveDate] {
        self.find_training(training)
            .and_then(|t| t.shift(shift))
            .map(|s| s.dates.as_slice())
            .unwrap_or_default()
    }

    /// Check internal consistency
    ///
    /// # Errors
    /// Message describing the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.trainings.is_empty() {
            return Err("catalog has no trainings".to_string());
        }
        if self.teams.internal.is_empty() || self.teams.partner.is_empty() {
            return Err("every company needs at least one team".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for training in &self.trainings {
            if !seen.insert(normalize(&training.code)) {
                return Err(format!("duplicate training code '{}'", training.code));
            }
            if training.shifts.is_empty() {
                return Err(format!("training '{}' has no shifts", training.code));
            }
        }
        Ok(())
    }

    /// The Sep-Dec 2025 schedule
    #[must_use]
    pub fn builtin() -> Self {
        let week = |label: &str, (y, m, d): (i32, u32, u32), sessions: usize| {
            NaiveDate::from_ymd_opt(y, m, d).map_or_else(
                || ShiftCalendar { label: label.to_string(), dates: Vec::new() },
                |start| ShiftCalendar::weekly(label, start, sessions),
            )
        };
        let training = |code: &str, title: &str, day: ShiftCalendar, night: ShiftCalendar| Training {
            code: code.to_string(),
            title: format!("{code} - {title}"),
            shifts: vec![day, night],
        };

        Self {
            teams: Teams {
                internal: vec!["Gerência de Pátio".to_string(), "Gerência de Usina".to_string()],
                partner: vec!["Usimig".to_string(), "Plagecon".to_string(), "NDT".to_string()],
            },
            trainings: vec![
                training(
                    "B1",
                    "Substituir Caçamba Recuperadora Tipo Ponte",
                    week(SHIFT_DAY, (2025, 9, 22), 15),
                    week(SHIFT_NIGHT, (2025, 9, 23), 15),
                ),
                training(
                    "B2",
                    "Substituir Cavaletes de Impacto articulado e rolos na mesa de impacto",
                    week(SHIFT_DAY, (2025, 9, 25), 14),
                    week(SHIFT_NIGHT, (2025, 9, 26), 14),
                ),
                training(
                    "B3",
                    "Regular Freios Eletromagnéticos Do Giro da Lança Da EP2091KS e RCs 2092KS",
                    week(SHIFT_DAY, (2025, 9, 23), 15),
                    week(SHIFT_NIGHT, (2025, 9, 25), 14),
                ),
                training(
                    "B4",
                    "Substituir Atuador de Freio Vulkan SH13",
                    week(SHIFT_DAY, (2025, 9, 26), 14),
                    week(SHIFT_NIGHT, (2025, 9, 24), 15),
                ),
                training(
                    "B5",
                    "Realizar Substituição De Chapas De Revestimentos Silos e Chutes",
                    week(SHIFT_DAY, (2025, 9, 24), 15),
                    week(SHIFT_NIGHT, (2025, 9, 22), 15),
                ),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn builtin_is_consistent() {
        let catalog = Catalog::builtin();
        assert!(catalog.check().is_ok());
        assert_eq!(catalog.trainings.len(), 5);
        for training in &catalog.trainings {
            assert_eq!(training.shift_labels(), vec![SHIFT_DAY, SHIFT_NIGHT]);
        }
    }

    #[test]
    fn builtin_calendars_run_weekly_to_year_end() {
        let catalog = Catalog::builtin();
        let b1_day = catalog.dates_for("B1", SHIFT_DAY);
        assert_eq!(b1_day.first(), Some(&date(2025, 9, 22)));
        assert_eq!(b1_day.last(), Some(&date(2025, 12, 29)));

        let b2_night = catalog.dates_for("B2", SHIFT_NIGHT);
        assert_eq!(b2_night.len(), 14);
        assert_eq!(b2_night.last(), Some(&date(2025, 12, 26)));

        let b4_night = catalog.dates_for("B4", SHIFT_NIGHT);
        assert_eq!(b4_night.last(), Some(&date(2025, 12, 31)));
    }

    #[test]
    fn no_two_trainings_share_a_slot() {
        let catalog = Catalog::builtin();
        let mut slots = std::collections::HashSet::new();
        for training in &catalog.trainings {
            for shift in &training.shifts {
                for d in &shift.dates {
                    assert!(slots.insert((*d, shift.label.clone())), "{d} {} reused", shift.label);
                }
            }
        }
    }

    #[test]
    fn training_lookup_by_code_or_title() {
        let catalog = Catalog::builtin();
        let by_code = catalog.find_training(" b3 ").unwrap();
        let by_title = catalog.find_training(&by_code.title.to_uppercase()).unwrap();
        assert_eq!(by_code, by_title);
        assert!(catalog.find_training("B9").is_none());
    }

    #[test]
    fn unknown_shift_has_no_dates() {
        let catalog = Catalog::builtin();
        assert!(catalog.dates_for("B1", "Madrugada").is_empty());
        assert!(catalog.dates_for("B9", SHIFT_DAY).is_empty());
    }

    #[test]
    fn check_rejects_duplicate_codes() {
        let mut catalog = Catalog::builtin();
        let copy = catalog.trainings[0].clone();
        catalog.trainings.push(copy);
        assert!(catalog.check().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn teams_follow_company() {
        let catalog = Catalog::builtin();
        assert!(catalog.teams.for_company(Company::Partner).contains(&"NDT".to_string()));
        assert!(!catalog.teams.for_company(Company::Internal).contains(&"NDT".to_string()));
    }
}
