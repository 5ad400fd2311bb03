use crate::domain::models::availability::AvailabilityWindow;
use crate::domain::models::serde_time::hhmm;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// A teacher's recurring weekly availability.
///
/// Overlapping windows are allowed and each one counts on its own. An index
/// with no windows at all places no restriction on requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    windows: Vec<AvailabilityWindow>,
}

impl AvailabilityIndex {
    pub fn new(windows: Vec<AvailabilityWindow>) -> Self {
        Self { windows }
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn windows(&self) -> &[AvailabilityWindow] {
        &self.windows
    }

    /// Windows on `day`, ordered by start time.
    pub fn windows_for(&self, day: Weekday) -> Vec<&AvailabilityWindow> {
        let mut matching: Vec<&AvailabilityWindow> = self
            .windows
            .iter()
            .filter(|w| w.day_of_week == day)
            .collect();
        matching.sort_by_key(|w| (w.start_time, w.end_time));
        matching
    }

    /// Seconds in `time` are ignored; windows have minute precision.
    pub fn is_within_availability(&self, date: NaiveDate, time: NaiveTime) -> bool {
        if self.windows.is_empty() {
            return true;
        }

        let time = hhmm::truncate(time);
        let day = date.weekday();
        self.windows
            .iter()
            .filter(|w| w.day_of_week == day)
            .any(|w| w.range().contains(time))
    }
}

impl From<Vec<AvailabilityWindow>> for AvailabilityIndex {
    fn from(windows: Vec<AvailabilityWindow>) -> Self {
        Self::new(windows)
    }
}

impl FromIterator<AvailabilityWindow> for AvailabilityIndex {
    fn from_iter<I: IntoIterator<Item = AvailabilityWindow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
