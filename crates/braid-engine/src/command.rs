//! External command execution.
//!
//! Composition and publication both shell out to CLI tooling. The
//! [`CommandRunner`] trait is the seam that keeps process spawning out of
//! the reconcile logic and out of its tests.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Captured result of a finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// True when the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands and captures their output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] when the process cannot be spawned or
    /// waited on. A non-zero exit is not an error here; callers inspect
    /// [`CommandOutput::success`].
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Process-spawning runner backed by tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::command_with_source(program, "failed to spawn", e))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_runs_command_and_captures_stdout() {
        let runner = TokioCommandRunner;
        let output = runner.run("echo", &["hello"]).await.expect("run echo");

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let runner = TokioCommandRunner;
        let output = runner.run("false", &[]).await.expect("run false");

        assert!(!output.success());
        assert_eq!(output.code, Some(1));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let runner = TokioCommandRunner;
        let err = runner
            .run("braid-test-no-such-program", &[])
            .await
            .expect_err("spawn should fail");

        assert!(matches!(err, Error::Command { .. }));
        assert!(err.to_string().contains("braid-test-no-such-program"));
    }

    #[test]
    fn test_success_requires_zero_exit() {
        let output = CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(output.success());

        let killed = CommandOutput {
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!killed.success());
    }
}
