use std::process::Stdio;

use tokio::process::Command as Process;
use tracing::debug;

use crate::composition::command::Command;

/// Result of running a command to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub error_message: Option<String>,
}

impl ExecutionOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Capability for running a planned command
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Run `command` to completion with the caller's stdio
    async fn execute(&self, command: &Command) -> ExecutionOutcome;

    /// Whether `program` can be started at all
    async fn is_available(&self, program: &str) -> bool {
        let _ = program;
        true
    }
}

/// Executor that spawns the real engine
#[derive(Debug, Clone, Default)]
pub struct FfmpegExecutor;

impl FfmpegExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for FfmpegExecutor {
    async fn execute(&self, command: &Command) -> ExecutionOutcome {
        debug!("Spawning {} with {} arguments", command.program(), command.args().len());

        let status = Process::new(command.program())
            .args(command.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => ExecutionOutcome::succeeded(),
            Ok(status) => ExecutionOutcome::failed(format!(
                "Command failed: {} exited with {}",
                command.program(),
                status
            )),
            Err(e) => ExecutionOutcome::failed(format!(
                "Failed to spawn {}: {}",
                command.program(),
                e
            )),
        }
    }

    async fn is_available(&self, program: &str) -> bool {
        Process::new(program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let executor = FfmpegExecutor::new();
        assert!(!executor.is_available("definitely-not-a-real-ffmpeg-binary").await);
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(ExecutionOutcome::succeeded().success);

        let failed = ExecutionOutcome::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.error_message.as_deref(), Some("boom"));
    }
}
