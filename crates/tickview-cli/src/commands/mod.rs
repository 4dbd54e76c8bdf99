mod analyze;

use tickview_core::PipelineError;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command produced: text for stdout, and the run failure it describes, if any.
///
/// A failed run can still have a body (the JSON error envelope); the failure
/// then decides the exit code after the body is printed.
#[derive(Debug)]
pub struct CommandOutput {
    pub body: String,
    pub failure: Option<PipelineError>,
}

impl CommandOutput {
    pub fn ok(body: String) -> Self {
        Self {
            body,
            failure: None,
        }
    }

    pub fn failed(body: String, failure: PipelineError) -> Self {
        Self {
            body,
            failure: Some(failure),
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    match &cli.command {
        Command::Analyze(args) => analyze::run(args, cli.format, cli.pretty).await,
    }
}
