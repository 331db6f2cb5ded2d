//! User-friendly diagnostic messages.
//!
//! Every error printed by the CLI says what went wrong, what caused it and,
//! where possible, what to do about it.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a path holds no manifest.
    pub const NO_MANIFEST: &str =
        "help: Point at an elm.json or elm-package.json, or a directory containing one";

    /// Suggestion when a file is outside every attached project.
    pub const NO_PROJECT: &str = "help: Run `elm-workspace discover` to rescan the workspace";

    /// Suggestion when a tool is missing.
    pub const TOOL_NOT_CONFIGURED: &str =
        "help: Set the tool path under [toolchain] in .elm-workspace/config.toml";

    /// Suggestion when the state file cannot be read.
    pub const CORRUPT_STATE: &str =
        "help: Delete .elm-workspace/state.toml and run `elm-workspace discover`";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related file
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Build an error diagnostic from a typed error.
    ///
    /// The source chain becomes context lines, the `help` text becomes a
    /// suggestion and the code is shown last.
    pub fn from_diagnostic(err: &dyn MietteDiagnostic) -> Self {
        let mut diag = Diagnostic::error(err.to_string());

        let mut source = err.source();
        while let Some(cause) = source {
            diag = diag.with_context(cause.to_string());
            source = cause.source();
        }
        if let Some(help) = err.help() {
            diag = diag.with_suggestion(help.to_string());
        }
        if let Some(code) = err.code() {
            diag = diag.with_context(format!("[{}]", code));
        }
        diag
    }

    /// Build an error diagnostic from any error and its causes.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut diag = Diagnostic::error(err.to_string());
        let mut source = err.source();
        while let Some(cause) = source {
            diag = diag.with_context(cause.to_string());
            source = cause.source();
        }
        diag
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
