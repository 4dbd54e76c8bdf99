mod json;
mod text;

use serde_json::Value;
use tickview_core::{
    Envelope, EnvelopeError, EnvelopeMeta, PipelineError, PipelineOutput, Renderer, Symbol,
};

pub use self::json::JsonRenderer;
pub use self::text::{TextRenderer, TABLE_ROWS};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// `table_rows` only applies to the table format.
pub fn render(
    output: &PipelineOutput,
    format: OutputFormat,
    pretty: bool,
    table_rows: usize,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Table => TextRenderer::new()
            .with_table_rows(table_rows)
            .with_dropped(output.dropped.len())
            .render(&output.series, &output.symbol, output.sma_period)?,
        OutputFormat::Json => JsonRenderer::new(pretty)
            .with_latency_ms(output.latency_ms)
            .with_total_rows(output.total_rows)
            .with_warnings(output.dropped.iter().map(ToString::to_string).collect())
            .render(&output.series, &output.symbol, output.sma_period)?,
    };

    Ok(rendered)
}

/// Envelope for a failed run: `null` data and the single pipeline error.
pub fn render_failure(
    symbol: &Symbol,
    error: &PipelineError,
    latency_ms: u64,
    pretty: bool,
) -> Result<String, CliError> {
    let meta = EnvelopeMeta::new(symbol.clone(), latency_ms);
    let envelope = Envelope::with_errors(meta, Value::Null, vec![EnvelopeError::from(error)])?;
    Ok(envelope.to_json(pretty)?)
}

#[cfg(test)]
mod tests {
    use tickview_core::adapters::parse_daily_response;

    use super::*;

    #[test]
    fn failure_envelope_carries_code_and_retry_hint() {
        let symbol = Symbol::parse("IBM").expect("valid");
        let error =
            PipelineError::rate_limited("Our standard API call frequency is 5 calls per minute");

        let json = render_failure(&symbol, &error, 7, false).expect("renders");
        let value: Value = serde_json::from_str(&json).expect("valid json");

        assert!(value["data"].is_null());
        assert_eq!(value["meta"]["symbol"], "IBM");
        assert_eq!(value["errors"][0]["code"], "pipeline.rate_limited");
        assert_eq!(value["errors"][0]["retryable"], true);
    }

    #[test]
    fn blank_provider_error_is_reported_as_provider_failure() {
        let symbol = Symbol::parse("IBM").expect("valid");
        let error = parse_daily_response(r#"{"Error Message": ""}"#).expect_err("must fail");

        let json = render_failure(&symbol, &error, 1, false).expect("renders");
        let value: Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["errors"][0]["code"], "pipeline.provider");
        assert_eq!(
            value["errors"][0]["message"],
            "alphavantage returned an empty 'Error Message' notice"
        );
        assert_eq!(CliError::from(error).exit_code(), 3);
    }

    #[test]
    fn blank_throttling_note_keeps_the_rate_limited_exit_code() {
        let symbol = Symbol::parse("IBM").expect("valid");
        let error = parse_daily_response(r#"{"Note": ""}"#).expect_err("must fail");

        let json = render_failure(&symbol, &error, 1, true).expect("renders");
        assert!(json.contains("pipeline.rate_limited"));
        assert_eq!(CliError::from(error).exit_code(), 6);
    }
}
