//! # Domain Models
//!
//! Validated value types shared by every pipeline stage.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`ApiKey`] | Provider credential, redacted in `Debug` |
//! | [`OutputSize`] | Provider history size (`compact` / `full`) |
//! | [`SmaPeriod`] | Moving average window, at least 1 |
//! | [`TradingDate`] | Calendar date of a session |
//! | [`PriceRecord`] | Cleaned OHLCV row |
//! | [`FeaturedRecord`] | Row plus its moving average |
//! | [`Series`] | Strictly date-ordered records |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Construction validates invariants, so a value that exists is usable:
//!
//! ```rust
//! use tickview_core::{Series, PriceRecord, TradingDate, ValidationError};
//!
//! let row = |date: &str| PriceRecord {
//!     date: TradingDate::parse(date).unwrap(),
//!     open: 1.0, high: 1.0, low: 1.0, close: 1.0, volume: 0,
//! };
//!
//! let unordered = Series::new(vec![row("2024-01-02"), row("2024-01-01")]);
//! assert!(matches!(unordered, Err(ValidationError::UnorderedSeries { .. })));
//! ```

mod api_key;
mod date;
mod output_size;
mod period;
mod records;
mod symbol;
mod timestamp;

pub use api_key::ApiKey;
pub use date::TradingDate;
pub use output_size::OutputSize;
pub use period::SmaPeriod;
pub use records::{Dated, FeaturedRecord, PriceRecord, Series};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
