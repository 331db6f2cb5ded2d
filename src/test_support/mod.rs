//! Test utilities and mocks for unit tests.
//!
//! Provides a scripted [`ToolInvoker`] so code that shells out to the Elm
//! tools can be tested without the binaries installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use elm_workspace::test_support::MockInvoker;
//!
//! #[test]
//! fn test_example() {
//!     let invoker = MockInvoker::new();
//!     invoker.expect("elm --version", ToolOutput::ok("0.19.1\n"));
//!
//!     // Hand `&invoker` to the code under test...
//!     invoker.verify().unwrap();
//! }
//! ```

pub mod fixtures;

use std::io;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::util::process::{ProcessBuilder, ToolInvoker, ToolOutput};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Pattern for matching commands in [`MockInvoker`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Any => true,
        }
    }
}

/// What a matched command produces.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Output(ToolOutput),
    /// The process cannot be started.
    LaunchFailure(io::ErrorKind),
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub response: MockResponse,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    pub used: usize,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, response: MockResponse) -> Self {
        CommandExpectation {
            pattern,
            response,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub command: String,
    pub cwd: Option<std::path::PathBuf>,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<RecordedCall>,
}

/// Scripted tool invoker.
///
/// Commands are matched against expectations in registration order using
/// their display form (`program arg1 arg2`). Unmatched commands fail to
/// launch with `NotFound`, like a missing binary.
#[derive(Debug, Default)]
pub struct MockInvoker {
    state: Mutex<MockState>,
}

impl MockInvoker {
    pub fn new() -> Self {
        MockInvoker::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: ToolOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            MockResponse::Output(output),
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: ToolOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            MockResponse::Output(output),
        ))
    }

    /// Make commands starting with `prefix` fail to launch.
    pub fn expect_launch_failure(&self, prefix: &str) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            MockResponse::LaunchFailure(io::ErrorKind::PermissionDenied),
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.lock().expectations.push(expectation);
        self
    }

    /// Get all commands that were run.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        let state = self.lock();
        for (i, exp) in state.expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ToolInvoker for MockInvoker {
    fn run(&self, command: &ProcessBuilder) -> io::Result<ToolOutput> {
        let full_cmd = command.display_command();
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            command: full_cmd.clone(),
            cwd: command.get_cwd().map(|p| p.to_path_buf()),
        });

        for exp in &mut state.expectations {
            if exp.pattern.matches(&full_cmd) && exp.available() {
                exp.used += 1;
                return match &exp.response {
                    MockResponse::Output(output) => Ok(output.clone()),
                    MockResponse::LaunchFailure(kind) => {
                        Err(io::Error::new(*kind, format!("cannot launch `{}`", full_cmd)))
                    }
                };
            }
        }

        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unexpected command: {}", full_cmd),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_invoker() {
        let invoker = MockInvoker::new();
        invoker.expect("elm --version", ToolOutput::ok("0.19.1\n"));
        invoker.expect_prefix("elm-format", ToolOutput::ok(""));

        let output = invoker
            .run(&ProcessBuilder::new("elm").arg("--version"))
            .unwrap();
        assert!(output.is_success());
        assert_eq!(output.stdout, "0.19.1\n");

        invoker
            .run(&ProcessBuilder::new("elm-format").args(["--yes", "src/Main.elm"]))
            .unwrap();

        let calls = invoker.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].command, "elm --version");
    }

    #[test]
    fn test_mock_invoker_unexpected_command() {
        let invoker = MockInvoker::new();
        let err = invoker
            .run(&ProcessBuilder::new("elm-test"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_invoker_times() {
        let invoker = MockInvoker::new();
        invoker.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Exact("elm --version".to_string()),
                MockResponse::Output(ToolOutput::ok("0.19.1")),
            )
            .times(2),
        );

        let cmd = ProcessBuilder::new("elm").arg("--version");
        invoker.run(&cmd).unwrap();
        assert!(invoker.verify().is_err());

        invoker.run(&cmd).unwrap();
        assert!(invoker.verify().is_ok());

        assert!(invoker.run(&cmd).is_err());
    }

    #[test]
    fn test_mock_invoker_records_cwd() {
        let invoker = MockInvoker::new();
        invoker.expect_launch_failure("elm-review");

        let err = invoker
            .run(&ProcessBuilder::new("elm-review").cwd("/work/a"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(
            invoker.calls()[0].cwd.as_deref(),
            Some(std::path::Path::new("/work/a"))
        );
    }
}
