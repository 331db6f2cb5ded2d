//! Running `elm-review` and reading its JSON report.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::core::workspace::Workspace;
use crate::ops::toolchain::{ElmToolchain, ExternalToolError, ToolKind};
use crate::util::process::ToolInvoker;

/// Namespace passed to `elm-review` so its cache does not collide with
/// other editors running it on the same project.
const REVIEW_NAMESPACE: &str = "elm-workspace";

/// A position in a source file, 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Region {
    pub start: Position,
    pub end: Position,
}

/// One problem reported by a review rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewMessage {
    /// File path as reported, relative to the project directory
    pub path: String,
    pub rule: String,
    pub message: String,
    pub details: Vec<String>,
    pub region: Region,
}

impl ReviewMessage {
    fn location_cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then(self.region.start.line.cmp(&other.region.start.line))
            .then(self.region.start.column.cmp(&other.region.start.column))
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ReviewError {
    #[error("{} does not belong to any attached Elm project", .file.display())]
    #[diagnostic(
        code(elm_workspace::review::no_project),
        help("run `elm-workspace discover` or attach the project that owns this file")
    )]
    NoProject { file: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tool(#[from] ExternalToolError),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawReport {
    ReviewErrors { errors: Vec<RawFileErrors> },
    Error {
        title: String,
        #[serde(default)]
        message: RawText,
    },
}

#[derive(Debug, Deserialize)]
struct RawFileErrors {
    path: String,
    errors: Vec<RawRuleError>,
}

#[derive(Debug, Deserialize)]
struct RawRuleError {
    rule: String,
    message: String,
    #[serde(default)]
    details: Vec<String>,
    region: Region,
}

/// Text that `elm-review` sends either plain or as styled chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawText {
    Plain(String),
    Chunks(Vec<RawChunk>),
}

impl Default for RawText {
    fn default() -> Self {
        RawText::Plain(String::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChunk {
    Plain(String),
    Styled { string: String },
}

impl RawText {
    fn into_string(self) -> String {
        match self {
            RawText::Plain(s) => s,
            RawText::Chunks(chunks) => chunks
                .into_iter()
                .map(|chunk| match chunk {
                    RawChunk::Plain(s) | RawChunk::Styled { string: s } => s,
                })
                .collect(),
        }
    }
}

/// Review the project that owns `file`.
///
/// `elm-review` runs in the project directory with a JSON report. When the
/// compiler is configured it is passed along so both tools agree on the
/// Elm version.
pub fn run_review(
    workspace: &Workspace,
    toolchain: &ElmToolchain,
    invoker: &dyn ToolInvoker,
    file: &Path,
) -> Result<Vec<ReviewMessage>, ReviewError> {
    let project = workspace
        .find_project_for_file(file)
        .ok_or_else(|| ReviewError::NoProject {
            file: file.to_path_buf(),
        })?;

    let mut args = vec![
        "--report=json".to_string(),
        format!("--namespace={}", REVIEW_NAMESPACE),
    ];
    if let Some(compiler) = toolchain.path(ToolKind::Compiler) {
        args.push("--compiler".to_string());
        args.push(compiler.display().to_string());
    }

    tracing::debug!("reviewing {}", project);
    let output = toolchain.run(invoker, ToolKind::Reviewer, &args, Some(project.as_ref()))?;

    // A non-zero exit is how elm-review says "found problems".
    if !output.is_success() && output.stdout.trim().is_empty() {
        return Err(ExternalToolError::Failed {
            tool: ToolKind::Reviewer,
            project: project.presentable_name(),
            status: output.status,
            stderr: output.stderr,
        }
        .into());
    }

    let messages = parse_review_report(&output.stdout).map_err(|reason| {
        ExternalToolError::Output {
            tool: ToolKind::Reviewer,
            project: project.presentable_name(),
            reason,
        }
    })?;
    tracing::info!("{} review messages for {}", messages.len(), project);
    Ok(messages)
}

/// Turn `elm-review --report=json` output into messages sorted by location.
///
/// Empty output means nothing was reported. An `error` report is returned
/// as `Err` with its title and message.
pub fn parse_review_report(json: &str) -> Result<Vec<ReviewMessage>, String> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let report: RawReport =
        serde_json::from_str(json).map_err(|e| format!("unreadable report: {}", e))?;

    let files = match report {
        RawReport::ReviewErrors { errors } => errors,
        RawReport::Error { title, message } => {
            let message = message.into_string();
            return Err(if message.is_empty() {
                title
            } else {
                format!("{}: {}", title, message)
            });
        }
    };

    let mut messages: Vec<ReviewMessage> = files
        .into_iter()
        .flat_map(|file| {
            let path = file.path;
            file.errors.into_iter().map(move |e| ReviewMessage {
                path: path.clone(),
                rule: e.rule,
                message: e.message,
                details: e.details,
                region: e.region,
            })
        })
        .collect();
    messages.sort_by(ReviewMessage::location_cmp);
    Ok(messages)
}
