//! External type checker collaborator interface
//!
//! The checker is invoked as a subprocess. Its verdict and output are the
//! oracle for the annotation loop; a process that fails to launch is a
//! [`CheckerError`], a distinct condition from the checker running fine and
//! reporting type errors.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;

/// A checker invocation, program plus arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCommand {
    program: String,
    args: Vec<String>,
}

impl CheckCommand {
    /// Build a command from a program and its arguments
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Default mypy baseline invocation for one file
    #[must_use]
    pub fn mypy(file: &Path) -> Self {
        Self::new(
            "mypy",
            vec![
                "--ignore-missing-imports".to_string(),
                "--no-error-summary".to_string(),
                "--soft-error-limit".to_string(),
                "10".to_string(),
                file.display().to_string(),
            ],
        )
    }

    /// Same command, reading content for `real` from `shadow`
    ///
    /// Diagnostics keep reporting against the real path while the checker
    /// sees the shadow file's content.
    #[must_use]
    pub fn with_shadow(&self, real: &Path, shadow: &Path) -> Self {
        let mut args = self.args.clone();
        args.push("--shadow-file".to_string());
        args.push(real.display().to_string());
        args.push(shadow.display().to_string());
        Self {
            program: self.program.clone(),
            args,
        }
    }

    /// Program name
    #[inline]
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Single-line rendering for logs
    #[must_use]
    pub fn rendered(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// Checker verdict with captured output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Whether the checker exited successfully
    pub success: bool,
    /// Combined stdout and stderr text
    pub output: String,
}

/// The checker process could not run at all
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    /// Spawning or awaiting the process failed
    #[error("failed to run type checker '{command}': {source}")]
    Invocation {
        /// Rendered command line
        command: String,
        /// Originating error
        #[source]
        source: std::io::Error,
    },
}

/// Runs checker commands
#[async_trait]
pub trait TypeChecker: Send + Sync {
    /// Run one invocation to completion
    ///
    /// # Errors
    /// [`CheckerError`] only when the process cannot be run; a checker that
    /// runs and reports problems is a `CheckReport { success: false, .. }`.
    async fn run(&self, command: &CheckCommand) -> Result<CheckReport, CheckerError>;
}

/// Subprocess-backed checker
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandChecker;

#[async_trait]
impl TypeChecker for CommandChecker {
    async fn run(&self, command: &CheckCommand) -> Result<CheckReport, CheckerError> {
        tracing::debug!(command = %command.rendered(), "running type checker");
        let output = tokio::process::Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CheckerError::Invocation {
                command: command.rendered(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CheckReport {
            success: output.status.success(),
            output: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mypy_command_shape() {
        let cmd = CheckCommand::mypy(Path::new("pkg/mod.py"));
        assert_eq!(cmd.program(), "mypy");
        assert_eq!(
            cmd.rendered(),
            "mypy --ignore-missing-imports --no-error-summary --soft-error-limit 10 pkg/mod.py"
        );
    }

    #[test]
    fn shadow_command_appends_both_paths() {
        let real = PathBuf::from("pkg/mod.py");
        let shadow = PathBuf::from("pkg/mod.py.shadow");
        let cmd = CheckCommand::mypy(&real).with_shadow(&real, &shadow);
        let args = cmd.args();
        assert_eq!(
            &args[args.len() - 3..],
            &[
                "--shadow-file".to_string(),
                "pkg/mod.py".to_string(),
                "pkg/mod.py.shadow".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn missing_program_is_invocation_error() {
        let cmd = CheckCommand::new("typeforge-no-such-checker", vec![]);
        let result = CommandChecker.run(&cmd).await;
        assert!(matches!(result, Err(CheckerError::Invocation { .. })));
    }

    #[tokio::test]
    async fn failing_command_is_report_not_error() {
        // `false` runs fine and exits non-zero.
        let cmd = CheckCommand::new("false", vec![]);
        let report = CommandChecker.run(&cmd).await.unwrap();
        assert!(!report.success);
    }
}
