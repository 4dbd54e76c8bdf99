use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{TradingDate, ValidationError};

/// Records that can live in a [`Series`].
pub trait Dated {
    fn date(&self) -> TradingDate;
}

/// One cleaned daily OHLCV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Dated for PriceRecord {
    fn date(&self) -> TradingDate {
        self.date
    }
}

/// A [`PriceRecord`] with its trailing moving average attached.
///
/// `sma` is `None` until enough closes exist to fill one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturedRecord {
    #[serde(flatten)]
    pub price: PriceRecord,
    pub sma: Option<f64>,
}

impl FeaturedRecord {
    pub const fn new(price: PriceRecord, sma: Option<f64>) -> Self {
        Self { price, sma }
    }

    pub const fn close(&self) -> f64 {
        self.price.close
    }

    pub const fn volume(&self) -> u64 {
        self.price.volume
    }
}

impl Dated for FeaturedRecord {
    fn date(&self) -> TradingDate {
        self.price.date
    }
}

/// Date-ordered records, unique by date and strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series<R = FeaturedRecord> {
    records: Vec<R>,
}

impl<R: Dated> Series<R> {
    /// Build a series, rejecting records that are not strictly increasing by date.
    pub fn new(records: Vec<R>) -> Result<Self, ValidationError> {
        if let Some(index) = records
            .windows(2)
            .position(|pair| pair[0].date() >= pair[1].date())
        {
            return Err(ValidationError::UnorderedSeries {
                date: records[index + 1].date().to_string(),
                index: index + 1,
            });
        }

        Ok(Self { records })
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&R> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&R> {
        self.records.last()
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    /// Keys of a `BTreeMap` are unique and ascending, so no check is needed.
    pub(crate) fn from_date_map(map: BTreeMap<TradingDate, R>) -> Self {
        Self {
            records: map.into_values().collect(),
        }
    }

    /// Mapping that keeps each record's date keeps the ordering invariant.
    pub(crate) fn map_preserving_dates<T, F>(&self, mut f: F) -> Series<T>
    where
        F: FnMut(usize, &R) -> T,
    {
        Series {
            records: self
                .records
                .iter()
                .enumerate()
                .map(|(index, record)| f(index, record))
                .collect(),
        }
    }
}

impl<R: Dated + Clone> Series<R> {
    /// Last `n` records in original order, or all of them when shorter.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.records.len().saturating_sub(n);
        Self {
            records: self.records[start..].to_vec(),
        }
    }
}

impl<'a, R> IntoIterator for &'a Series<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, close: f64) -> PriceRecord {
        PriceRecord {
            date: TradingDate::parse(date).expect("valid date"),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    #[test]
    fn accepts_strictly_increasing_dates() {
        let series = Series::new(vec![record("2024-01-01", 1.0), record("2024-01-02", 2.0)])
            .expect("ordered series");
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().map(|r| r.close), Some(2.0));
    }

    #[test]
    fn rejects_duplicate_and_descending_dates() {
        let duplicate = Series::new(vec![record("2024-01-01", 1.0), record("2024-01-01", 2.0)]);
        assert!(matches!(
            duplicate,
            Err(ValidationError::UnorderedSeries { index: 1, .. })
        ));

        let descending = Series::new(vec![record("2024-01-02", 1.0), record("2024-01-01", 2.0)]);
        assert!(descending.is_err());
    }

    #[test]
    fn featured_record_serializes_flat_with_null_sma() {
        let featured = FeaturedRecord::new(record("2024-01-01", 10.0), None);
        let value = serde_json::to_value(featured).expect("serializable");
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["close"], 10.0);
        assert!(value["sma"].is_null());
    }
}
