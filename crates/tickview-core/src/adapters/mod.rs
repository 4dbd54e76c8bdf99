//! Provider adapters. Alpha Vantage is the only supported provider.

pub mod alphavantage;

pub use alphavantage::{
    parse_daily_response, AlphaVantageClient, DailySeriesPayload, DailySeriesRequest, RawSeries,
    RawSeriesPoint, SeriesMetadata, DEFAULT_BASE_URL,
};
