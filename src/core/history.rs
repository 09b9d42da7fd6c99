//! Price observation and history types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recorded price for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Price")]
    pub price: u64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, price: u64) -> Self {
        Self { date, price }
    }
}

/// Append-ordered observations for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistory {
    observations: Vec<PriceObservation>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.observations.iter().any(|o| o.date == date)
    }

    /// Price of the most recently appended observation.
    pub fn latest(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    /// Appends unless `date` is already recorded. Returns whether it appended.
    pub fn push_if_new(&mut self, observation: PriceObservation) -> bool {
        if self.contains_date(observation.date) {
            return false;
        }
        self.observations.push(observation);
        true
    }

    pub fn min_price(&self) -> Option<u64> {
        self.observations.iter().map(|o| o.price).min()
    }

    pub fn max_price(&self) -> Option<u64> {
        self.observations.iter().map(|o| o.price).max()
    }
}

impl From<Vec<PriceObservation>> for PriceHistory {
    fn from(observations: Vec<PriceObservation>) -> Self {
        Self { observations }
    }
}

impl IntoIterator for PriceHistory {
    type Item = PriceObservation;
    type IntoIter = std::vec::IntoIter<PriceObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

/// Result of recording an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Appended,
    /// The date was already present; nothing was written.
    AlreadyRecorded,
}

impl RecordOutcome {
    pub fn appended(&self) -> bool {
        matches!(self, RecordOutcome::Appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_push_if_new_keeps_first_price_for_date() {
        let mut history = PriceHistory::new();
        assert!(history.push_if_new(PriceObservation::new(day(1), 999)));
        assert!(!history.push_if_new(PriceObservation::new(day(1), 1099)));

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().price, 999);
    }

    #[test]
    fn test_latest_is_last_appended_not_latest_date() {
        let history = PriceHistory::from(vec![
            PriceObservation::new(day(5), 500),
            PriceObservation::new(day(2), 200),
        ]);

        assert_eq!(history.latest().unwrap().price, 200);
        assert_eq!(history.min_price(), Some(200));
        assert_eq!(history.max_price(), Some(500));
    }

    #[test]
    fn test_empty_history() {
        let history = PriceHistory::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(history.min_price().is_none());
    }
}
