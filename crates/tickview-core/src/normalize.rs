//! Raw provider rows to a clean, date-ordered [`Series`] of [`PriceRecord`]s.
//!
//! Rows are parse-or-drop: a row with any unusable field is excluded whole
//! and reported as a [`DroppedRow`], never zero-filled.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::adapters::{RawSeries, RawSeriesPoint};
use crate::{PriceRecord, Series, TradingDate};

/// Canonical OHLCV columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    /// Label the provider uses for this column.
    pub const fn provider_label(self) -> &'static str {
        match self {
            Self::Open => "1. open",
            Self::High => "2. high",
            Self::Low => "3. low",
            Self::Close => "4. close",
            Self::Volume => "5. volume",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a raw row did not survive normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    InvalidDate,
    MissingField { field: Field },
    NonNumeric { field: Field, value: String },
    NonPositivePrice { field: Field, value: String },
    InvalidVolume { value: String },
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate => f.write_str("date is not YYYY-MM-DD"),
            Self::MissingField { field } => write!(f, "{field} is missing"),
            Self::NonNumeric { field, value } => write!(f, "{field} '{value}' is not numeric"),
            Self::NonPositivePrice { field, value } => {
                write!(f, "{field} '{value}' is not a positive price")
            }
            Self::InvalidVolume { value } => {
                write!(f, "volume '{value}' is not a non-negative integer")
            }
        }
    }
}

/// Diagnostic for one excluded row, keyed by the provider's date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    pub date: String,
    #[serde(flatten)]
    pub reason: DropReason,
}

impl Display for DroppedRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "dropped row {}: {}", self.date, self.reason)
    }
}

/// Normalizer output: the surviving rows and an account of the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub series: Series<PriceRecord>,
    pub dropped: Vec<DroppedRow>,
}

/// Parse, filter and sort a raw series.
///
/// Dropped rows are listed in date-string order so repeated calls agree.
pub fn normalize(raw: &RawSeries) -> Normalized {
    let mut rows = BTreeMap::new();
    let mut dropped = Vec::new();

    for (date, point) in raw.iter() {
        match parse_row(date, point) {
            Ok(record) => {
                if rows.insert(record.date, record).is_some() {
                    tracing::debug!(date, "duplicate trading date; keeping the later row");
                }
            }
            Err(reason) => {
                tracing::debug!(date, %reason, "dropping raw row");
                dropped.push(DroppedRow {
                    date: date.to_owned(),
                    reason,
                });
            }
        }
    }

    dropped.sort_by(|a, b| a.date.cmp(&b.date));

    if !dropped.is_empty() {
        tracing::warn!(
            dropped = dropped.len(),
            kept = rows.len(),
            "normalization dropped invalid rows"
        );
    }

    Normalized {
        series: Series::from_date_map(rows),
        dropped,
    }
}

fn parse_row(date: &str, point: &RawSeriesPoint) -> Result<PriceRecord, DropReason> {
    let date = TradingDate::parse(date).map_err(|_| DropReason::InvalidDate)?;

    Ok(PriceRecord {
        date,
        open: parse_price(point, Field::Open)?,
        high: parse_price(point, Field::High)?,
        low: parse_price(point, Field::Low)?,
        close: parse_price(point, Field::Close)?,
        volume: parse_volume(point)?,
    })
}

fn field_text(point: &RawSeriesPoint, field: Field) -> Result<&str, DropReason> {
    point
        .get(field.provider_label())
        .map(str::trim)
        .ok_or(DropReason::MissingField { field })
}

fn parse_price(point: &RawSeriesPoint, field: Field) -> Result<f64, DropReason> {
    let text = field_text(point, field)?;
    let value = text
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DropReason::NonNumeric {
            field,
            value: text.to_owned(),
        })?;

    if value <= 0.0 {
        return Err(DropReason::NonPositivePrice {
            field,
            value: text.to_owned(),
        });
    }

    Ok(value)
}

fn parse_volume(point: &RawSeriesPoint) -> Result<u64, DropReason> {
    let text = field_text(point, Field::Volume)?;
    if let Ok(volume) = text.parse::<u64>() {
        return Ok(volume);
    }

    let value = text
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DropReason::NonNumeric {
            field: Field::Volume,
            value: text.to_owned(),
        })?;

    // integral decimals like "1200.0" are accepted
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(DropReason::InvalidVolume {
            value: text.to_owned(),
        });
    }

    Ok(value as u64)
}
