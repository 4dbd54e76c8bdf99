use serde::Serialize;
use tickview_core::{
    ChartFrame, Envelope, EnvelopeMeta, RenderError, Renderer, Series, SmaPeriod, Summary, Symbol,
};

/// Payload of a successful `analyze` envelope.
#[derive(Debug, Serialize)]
struct AnalysisData {
    symbol: Symbol,
    sma_period: SmaPeriod,
    total_rows: usize,
    window_rows: usize,
    summary: Summary,
    chart: ChartFrame,
}

/// Renders the windowed series as a single [`Envelope`].
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    pretty: bool,
    latency_ms: u64,
    total_rows: usize,
    warnings: Vec<String>,
}

impl JsonRenderer {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            ..Self::default()
        }
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Rows that survived normalization, before windowing.
    pub fn with_total_rows(mut self, total_rows: usize) -> Self {
        self.total_rows = total_rows;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

impl Renderer for JsonRenderer {
    fn render(
        &self,
        series: &Series,
        symbol: &Symbol,
        period: SmaPeriod,
    ) -> Result<String, RenderError> {
        let summary = Summary::from_series(series).ok_or(RenderError::EmptySeries)?;

        let mut meta = EnvelopeMeta::new(symbol.clone(), self.latency_ms);
        for warning in &self.warnings {
            meta.push_warning(warning.clone());
        }

        let envelope = Envelope::success(
            meta,
            AnalysisData {
                symbol: symbol.clone(),
                sma_period: period,
                total_rows: self.total_rows.max(series.len()),
                window_rows: series.len(),
                summary,
                chart: ChartFrame::from_series(series),
            },
        );

        let json = if self.pretty {
            serde_json::to_string_pretty(&envelope)?
        } else {
            serde_json::to_string(&envelope)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tickview_core::{FeaturedRecord, PriceRecord, TradingDate};

    use super::*;

    fn series() -> Series {
        let row = |date: &str, close: f64, sma: Option<f64>| {
            FeaturedRecord::new(
                PriceRecord {
                    date: TradingDate::parse(date).expect("valid"),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 10,
                },
                sma,
            )
        };
        Series::new(vec![
            row("2024-01-01", 10.0, None),
            row("2024-01-02", 11.0, Some(10.5)),
        ])
        .expect("ordered")
    }

    #[test]
    fn renders_envelope_with_chart_and_summary() {
        let renderer = JsonRenderer::new(false)
            .with_latency_ms(42)
            .with_total_rows(2)
            .with_warnings(vec![String::from("dropped row 2024-01-03: close is missing")]);
        let symbol = Symbol::parse("IBM").expect("valid");

        let json = renderer
            .render(&series(), &symbol, SmaPeriod::new(2).expect("valid"))
            .expect("renders");
        let value: Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["meta"]["provider"], "alphavantage");
        assert_eq!(value["meta"]["schema_version"], "v1.0.0");
        assert_eq!(value["meta"]["symbol"], "IBM");
        assert_eq!(value["meta"]["latency_ms"], 42);
        assert_eq!(value["meta"]["warnings"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["data"]["sma_period"], 2);
        assert_eq!(value["data"]["summary"]["latest_date"], "2024-01-02");
        assert_eq!(value["data"]["summary"]["latest_sma"], 10.5);
        assert!(value["data"]["chart"]["sma"][0].is_null());
        assert_eq!(value["data"]["chart"]["volume"][1], 10);
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn empty_series_is_a_render_error() {
        let symbol = Symbol::parse("IBM").expect("valid");
        let result = JsonRenderer::new(true).render(
            &Series::empty(),
            &symbol,
            SmaPeriod::DEFAULT,
        );
        assert!(matches!(result, Err(RenderError::EmptySeries)));
    }
}
