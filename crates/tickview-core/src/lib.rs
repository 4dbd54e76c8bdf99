//! # Tickview Core
//!
//! Daily price pipeline for a single stock symbol.
//!
//! ## Overview
//!
//! One run fetches the Alpha Vantage daily time series, cleans it into a
//! date-ordered series, attaches a simple moving average of the close and
//! keeps the most recent rows for display:
//!
//! - **Fetch** with a bounded timeout and caller-driven cancellation
//! - **Normalize** raw rows, dropping (and reporting) anything unusable
//! - **Moving average** over a configurable period, undefined until one period fills
//! - **Window** to the trailing rows a chart needs
//!
//! Each stage is a plain function of its input, so a run is reproducible from
//! the provider payload alone.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage fetcher and envelope classification |
//! | [`domain`] | Validated value types and series records |
//! | [`envelope`] | JSON output envelope with metadata and errors |
//! | [`error`] | Validation and serialization errors |
//! | [`failure`] | Terminal pipeline failure kinds |
//! | [`features`] | Simple moving average |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Raw rows to clean records |
//! | [`pipeline`] | Stage orchestration |
//! | [`render`] | Renderer contract and chart data |
//! | [`window`] | Trailing-row selection |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tickview_core::{ApiKey, Pipeline, PipelineConfig, SmaPeriod, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::new(Symbol::parse("IBM")?, ApiKey::new("demo")?)
//!         .with_sma_period(SmaPeriod::new(50)?);
//!
//!     let output = Pipeline::default().run(&config).await?;
//!     if let Some(latest) = output.series.last() {
//!         println!("{} close {:.2}", latest.price.date, latest.close());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A run either yields a full [`PipelineOutput`] or one [`PipelineError`]:
//!
//! ```rust
//! use tickview_core::{PipelineError, PipelineErrorKind};
//!
//! fn describe(error: &PipelineError) -> &'static str {
//!     match error.kind() {
//!         PipelineErrorKind::RateLimited => "wait and try again",
//!         PipelineErrorKind::Network => "check connectivity",
//!         PipelineErrorKind::EmptySeries => "no usable rows",
//!         _ => "request failed",
//!     }
//! }
//!
//! assert_eq!(describe(&PipelineError::rate_limited("slow down")), "wait and try again");
//! ```
//!
//! ## Security
//!
//! - The API key is redacted in `Debug` output and request logs
//! - Transport errors are reported without the request URL

pub mod adapters;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod failure;
pub mod features;
pub mod http_client;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod window;

// Fetcher
pub use adapters::{AlphaVantageClient, DailySeriesPayload, DailySeriesRequest, SeriesMetadata};

// Domain models
pub use domain::{
    ApiKey, Dated, FeaturedRecord, OutputSize, PriceRecord, Series, SmaPeriod, Symbol,
    TradingDate, UtcDateTime,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::{CoreError, ValidationError};
pub use failure::{PipelineError, PipelineErrorKind};

// Stages
pub use features::with_sma;
pub use normalize::{normalize, DropReason, DroppedRow, Normalized};
pub use window::tail;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Orchestration and rendering
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use render::{ChartFrame, RenderError, Renderer, Summary};
