use std::fmt::{Display, Formatter};

use crate::http_client::{HttpError, HttpErrorKind};
use crate::ValidationError;

/// Terminal failure classes of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineErrorKind {
    InvalidRequest,
    Network,
    MalformedResponse,
    Provider,
    RateLimited,
    EmptySeries,
    Cancelled,
}

/// Structured pipeline failure. No partial output accompanies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineError {
    kind: PipelineErrorKind,
    message: String,
}

impl PipelineError {
    pub fn new(kind: PipelineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::InvalidRequest, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Network, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::MalformedResponse, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Provider, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::RateLimited, message)
    }

    pub fn empty_series(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::EmptySeries, message)
    }

    pub fn cancelled() -> Self {
        Self::new(
            PipelineErrorKind::Cancelled,
            "fetch cancelled before the provider answered",
        )
    }

    pub const fn kind(&self) -> PipelineErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether running the same request later can plausibly succeed.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind,
            PipelineErrorKind::Network | PipelineErrorKind::RateLimited
        )
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            PipelineErrorKind::InvalidRequest => "pipeline.invalid_request",
            PipelineErrorKind::Network => "pipeline.network",
            PipelineErrorKind::MalformedResponse => "pipeline.malformed_response",
            PipelineErrorKind::Provider => "pipeline.provider",
            PipelineErrorKind::RateLimited => "pipeline.rate_limited",
            PipelineErrorKind::EmptySeries => "pipeline.empty_series",
            PipelineErrorKind::Cancelled => "pipeline.cancelled",
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for PipelineError {}

impl From<ValidationError> for PipelineError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

impl From<HttpError> for PipelineError {
    fn from(error: HttpError) -> Self {
        let context = match error.kind() {
            HttpErrorKind::Timeout => "alphavantage request timed out",
            HttpErrorKind::Connect => "could not connect to alphavantage",
            HttpErrorKind::Body => "alphavantage response body could not be read",
            HttpErrorKind::Transport => "alphavantage transport error",
        };
        Self::network(format!("{context}: {}", error.message()))
    }
}
