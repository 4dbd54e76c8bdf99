//! Renderer contract and the presentation-neutral data renderers consume.

use serde::Serialize;
use thiserror::Error;

use crate::{Series, SmaPeriod, Symbol, TradingDate};

/// Failures a renderer can report.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render: the series is empty")]
    EmptySeries,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] std::fmt::Error),
}

/// Turns a windowed series into something displayable.
pub trait Renderer {
    fn render(
        &self,
        series: &Series,
        symbol: &Symbol,
        period: SmaPeriod,
    ) -> Result<String, RenderError>;
}

/// Headline facts about the latest session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub latest_date: TradingDate,
    pub latest_close: f64,
    /// `None` when the window holds fewer rows than the period.
    pub latest_sma: Option<f64>,
}

impl Summary {
    pub fn from_series(series: &Series) -> Option<Self> {
        series.last().map(|record| Self {
            latest_date: record.price.date,
            latest_close: record.close(),
            latest_sma: record.sma,
        })
    }
}

/// Column-oriented chart data: two price lines and volume bars on one date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub dates: Vec<TradingDate>,
    pub close: Vec<f64>,
    /// Gaps (`None`) where the average is not yet defined.
    pub sma: Vec<Option<f64>>,
    pub volume: Vec<u64>,
}

impl ChartFrame {
    pub fn from_series(series: &Series) -> Self {
        let mut frame = Self {
            dates: Vec::with_capacity(series.len()),
            close: Vec::with_capacity(series.len()),
            sma: Vec::with_capacity(series.len()),
            volume: Vec::with_capacity(series.len()),
        };

        for record in series {
            frame.dates.push(record.price.date);
            frame.close.push(record.close());
            frame.sma.push(record.sma);
            frame.volume.push(record.volume());
        }

        frame
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Lowest and highest value across both price lines.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.close
            .iter()
            .copied()
            .chain(self.sma.iter().flatten().copied())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((low, high)) => Some((low.min(value), high.max(value))),
            })
    }

    pub fn max_volume(&self) -> u64 {
        self.volume.iter().copied().max().unwrap_or(0)
    }
}
