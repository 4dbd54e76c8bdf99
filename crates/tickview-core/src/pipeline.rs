//! Fetch → normalize → moving average → window, run strictly in sequence.

use std::future::Future;
use std::time::Instant;

use crate::adapters::{AlphaVantageClient, DailySeriesPayload, DailySeriesRequest, SeriesMetadata};
use crate::features::with_sma;
use crate::normalize::{normalize, DroppedRow};
use crate::window::{tail, DEFAULT_WINDOW};
use crate::{ApiKey, OutputSize, PipelineError, Series, SmaPeriod, Symbol};

/// Inputs for one run. Built once by the caller and passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub symbol: Symbol,
    pub api_key: ApiKey,
    pub output_size: OutputSize,
    pub sma_period: SmaPeriod,
    pub window: usize,
}

impl PipelineConfig {
    /// Config with full history, a 20-day average and a 180-row window.
    pub fn new(symbol: Symbol, api_key: ApiKey) -> Self {
        Self {
            symbol,
            api_key,
            output_size: OutputSize::default(),
            sma_period: SmaPeriod::DEFAULT,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_sma_period(mut self, sma_period: SmaPeriod) -> Self {
        self.sma_period = sma_period;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    fn request(&self) -> DailySeriesRequest {
        DailySeriesRequest::new(self.symbol.clone(), self.api_key.clone(), self.output_size)
    }
}

/// Result of a successful run, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub symbol: Symbol,
    pub sma_period: SmaPeriod,
    /// Windowed rows with the moving average attached.
    pub series: Series,
    /// Rows that survived normalization, before windowing.
    pub total_rows: usize,
    pub dropped: Vec<DroppedRow>,
    pub metadata: Option<SeriesMetadata>,
    pub latency_ms: u64,
}

/// One-shot pipeline over an Alpha Vantage client.
#[derive(Clone, Default)]
pub struct Pipeline {
    client: AlphaVantageClient,
}

impl Pipeline {
    pub fn new(client: AlphaVantageClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
        let started = Instant::now();
        let payload = self.client.fetch_daily(&config.request()).await?;
        process(config, payload, started)
    }

    /// Run, giving up with `Cancelled` if `cancel` resolves while the fetch is in flight.
    ///
    /// Later stages are pure and short, so the fetch is the only cancellation point.
    pub async fn run_until<F>(
        &self,
        config: &PipelineConfig,
        cancel: F,
    ) -> Result<PipelineOutput, PipelineError>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let payload = self
            .client
            .fetch_daily_until(&config.request(), cancel)
            .await?;
        process(config, payload, started)
    }
}

fn process(
    config: &PipelineConfig,
    payload: DailySeriesPayload,
    started: Instant,
) -> Result<PipelineOutput, PipelineError> {
    let raw_rows = payload.series.len();
    let normalized = normalize(&payload.series);

    if normalized.series.is_empty() {
        return Err(PipelineError::empty_series(format!(
            "no valid rows for {} ({} raw rows, {} dropped)",
            config.symbol,
            raw_rows,
            normalized.dropped.len()
        )));
    }

    let total_rows = normalized.series.len();
    let featured = with_sma(&normalized.series, config.sma_period);
    let series = tail(&featured, config.window);
    let latency_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        symbol = %config.symbol,
        raw_rows,
        kept = total_rows,
        dropped = normalized.dropped.len(),
        windowed = series.len(),
        sma_period = config.sma_period.get(),
        latency_ms,
        "pipeline complete"
    );

    Ok(PipelineOutput {
        symbol: config.symbol.clone(),
        sma_period: config.sma_period,
        series,
        total_rows,
        dropped: normalized.dropped,
        metadata: payload.metadata,
        latency_ms,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http_client::CannedHttpClient;
    use crate::PipelineErrorKind;

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            Symbol::parse("IBM").expect("valid"),
            ApiKey::new("demo").expect("valid"),
        )
    }

    #[test]
    fn config_defaults_match_the_daily_dashboard() {
        let config = config();
        assert_eq!(config.output_size, OutputSize::Full);
        assert_eq!(config.sma_period.get(), 20);
        assert_eq!(config.window, 180);
    }

    #[tokio::test]
    async fn all_rows_invalid_is_an_empty_series_failure() {
        let body = r#"{"Time Series (Daily)": {
            "2024-01-02": {"1. open": "x", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"}
        }}"#;
        let pipeline = Pipeline::new(AlphaVantageClient::with_http_client(Arc::new(
            CannedHttpClient::ok_json(body),
        )));

        let err = pipeline.run(&config()).await.expect_err("must fail");
        assert_eq!(err.kind(), PipelineErrorKind::EmptySeries);
        assert!(err.message().contains("1 dropped"), "{}", err.message());
    }
}
