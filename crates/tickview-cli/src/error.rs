use thiserror::Error;
use tickview_core::{CoreError, PipelineError, PipelineErrorKind, RenderError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Pipeline(error) => match error.kind() {
                PipelineErrorKind::InvalidRequest => 2,
                PipelineErrorKind::RateLimited => 6,
                PipelineErrorKind::Cancelled => 130,
                _ => 3,
            },
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Core(CoreError::Serialization(_)) | Self::Serialization(_) => 4,
            Self::Render(_) => 5,
            Self::Io(_) | Self::Logging(_) => 10,
        }
    }
}
