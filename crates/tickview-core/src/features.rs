//! Derived columns computed over a date-ordered series.

use crate::{FeaturedRecord, PriceRecord, Series, SmaPeriod};

/// Attach a trailing simple moving average of `close` to every row.
///
/// Row `i` gets the mean of closes `i + 1 - period ..= i` once that many rows
/// exist and `None` before. A period longer than the series leaves every row
/// at `None`. Values are not rounded.
pub fn with_sma(series: &Series<PriceRecord>, period: SmaPeriod) -> Series<FeaturedRecord> {
    let closes = series.iter().map(|record| record.close).collect::<Vec<_>>();
    let window = period.get();

    series.map_preserving_dates(|index, record| {
        let sma = (index + 1 >= window).then(|| {
            let slice = &closes[index + 1 - window..=index];
            slice.iter().sum::<f64>() / window as f64
        });
        FeaturedRecord::new(*record, sma)
    })
}
