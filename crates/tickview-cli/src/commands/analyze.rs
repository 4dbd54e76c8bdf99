use std::ops::RangeInclusive;
use std::time::Instant;

use tickview_core::{AlphaVantageClient, ApiKey, Pipeline, PipelineConfig, SmaPeriod, Symbol};

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::CommandOutput;

const SMA_PERIOD_RANGE: RangeInclusive<usize> = 5..=100;

pub async fn run(
    args: &AnalyzeArgs,
    format: OutputFormat,
    pretty: bool,
) -> Result<CommandOutput, CliError> {
    let config = build_config(args)?;
    let pipeline = Pipeline::new(build_client(args));
    let started = Instant::now();

    match pipeline.run_until(&config, ctrl_c()).await {
        Ok(result) => Ok(CommandOutput::ok(output::render(&result, format, pretty, args.rows)?)),
        Err(error) if format == OutputFormat::Json => {
            let latency_ms = started.elapsed().as_millis() as u64;
            let body = output::render_failure(&config.symbol, &error, latency_ms, pretty)?;
            Ok(CommandOutput::failed(body, error))
        }
        Err(error) => Err(error.into()),
    }
}

fn build_config(args: &AnalyzeArgs) -> Result<PipelineConfig, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let api_key = ApiKey::new(args.api_key.clone().unwrap_or_default())?;
    let sma_period = SmaPeriod::bounded(args.sma_period, SMA_PERIOD_RANGE)?;

    Ok(PipelineConfig::new(symbol, api_key)
        .with_output_size(args.output_size)
        .with_sma_period(sma_period)
        .with_window(args.window as usize))
}

fn build_client(args: &AnalyzeArgs) -> AlphaVantageClient {
    let client = AlphaVantageClient::default().with_timeout_ms(args.timeout_ms);
    match &args.base_url {
        Some(base_url) => client.with_base_url(base_url.as_str()),
        None => client,
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "cannot listen for ctrl-c; cancellation disabled");
        std::future::pending::<()>().await;
    }
}
