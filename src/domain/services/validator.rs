use crate::domain::models::availability::{weekday_name, Language, TimeRange};
use crate::domain::models::serde_time::hhmm;
use crate::domain::services::availability::AvailabilityIndex;
use crate::error::ValidationError;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use thiserror::Error;
use tracing::debug;

/// Why a proposed slot does not fit the teacher's availability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotRejection {
    #[error("The teacher has no availability on {}", english_name(.day))]
    NoAvailabilityThatDay { day: Weekday },
    #[error(
        "The requested time is outside the teacher's availability on {}. Available: {}",
        english_name(.day),
        join_ranges(.windows)
    )]
    TimeOutsideWindows { day: Weekday, windows: Vec<TimeRange> },
}

impl SlotRejection {
    pub fn day(&self) -> Weekday {
        match self {
            SlotRejection::NoAvailabilityThatDay { day } => *day,
            SlotRejection::TimeOutsideWindows { day, .. } => *day,
        }
    }

    /// User-facing feedback in the given language.
    pub fn message(&self, language: Language) -> String {
        let day = weekday_name(self.day(), language);
        match (self, language) {
            (SlotRejection::NoAvailabilityThatDay { .. }, Language::En) => {
                format!("The teacher has no availability on {}", day)
            }
            (SlotRejection::NoAvailabilityThatDay { .. }, Language::Es) => {
                format!("El docente no tiene disponibilidad el día {}", day)
            }
            (SlotRejection::TimeOutsideWindows { windows, .. }, Language::En) => format!(
                "The requested time is outside the teacher's availability on {}. Available: {}",
                day,
                join_ranges(windows)
            ),
            (SlotRejection::TimeOutsideWindows { windows, .. }, Language::Es) => format!(
                "La hora elegida está fuera del horario disponible del {}. Horarios disponibles: {}",
                day,
                join_ranges(windows)
            ),
        }
    }
}

fn english_name(day: &Weekday) -> &'static str {
    weekday_name(*day, Language::En)
}

fn join_ranges(windows: &[TimeRange]) -> String {
    windows.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(SlotRejection),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn into_result(self) -> Result<(), SlotRejection> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(rejection) => Err(rejection),
        }
    }
}

/// Checks a proposed slot against the teacher's availability. Pure and synchronous.
pub fn validate(date: NaiveDate, time: NaiveTime, availability: &AvailabilityIndex) -> ValidationResult {
    if availability.is_empty() {
        return ValidationResult::Valid;
    }

    let time = hhmm::truncate(time);
    let day = date.weekday();
    let windows = availability.windows_for(day);
    if windows.is_empty() {
        return ValidationResult::Invalid(SlotRejection::NoAvailabilityThatDay { day });
    }

    if windows.iter().any(|w| w.range().contains(time)) {
        return ValidationResult::Valid;
    }

    ValidationResult::Invalid(SlotRejection::TimeOutsideWindows {
        day,
        windows: windows.iter().map(|w| w.range()).collect(),
    })
}

/// Full pre-submission gate: the date must not be before `today`, then the
/// slot must fit the availability.
pub fn validate_submission(
    date: NaiveDate,
    time: NaiveTime,
    today: NaiveDate,
    availability: &AvailabilityIndex,
) -> Result<(), ValidationError> {
    if date < today {
        debug!(%date, %today, "Rejected tutoring slot in the past");
        return Err(ValidationError::DateInPast { date, today });
    }

    validate(date, time, availability).into_result().map_err(|rejection| {
        debug!(%date, %time, %rejection, "Rejected tutoring slot outside availability");
        ValidationError::from(rejection)
    })
}
