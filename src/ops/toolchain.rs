//! External Elm tools.
//!
//! Resolves where `elm`, `elm-format`, `elm-test` and `elm-review` live,
//! launches them through a [`ToolInvoker`] and reports their versions.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::core::project::ElmProject;
use crate::core::version::Version;
use crate::core::workspace::ToolchainSettings;
use crate::util::process::{find_executable, ProcessBuilder, ToolInvoker, ToolOutput};

/// One of the external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    Compiler,
    Formatter,
    TestRunner,
    Reviewer,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Compiler,
        ToolKind::Formatter,
        ToolKind::TestRunner,
        ToolKind::Reviewer,
    ];

    /// Executable name looked up on `PATH`.
    pub fn binary_name(self) -> &'static str {
        match self {
            ToolKind::Compiler => "elm",
            ToolKind::Formatter => "elm-format",
            ToolKind::TestRunner => "elm-test",
            ToolKind::Reviewer => "elm-review",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.binary_name())
    }
}

/// Failure running an external tool. Always names the tool and the project
/// it was run for.
#[derive(Debug, Error, Diagnostic)]
pub enum ExternalToolError {
    #[error("`{tool}` is not configured (needed for {project})")]
    #[diagnostic(
        code(elm_workspace::tool::not_configured),
        help("set the path under [toolchain] in .elm-workspace/config.toml or put the tool on PATH")
    )]
    NotConfigured { tool: ToolKind, project: String },

    #[error("failed to launch `{tool}` at {} for {project}", .path.display())]
    #[diagnostic(
        code(elm_workspace::tool::launch),
        help("check that the configured path points at an executable")
    )]
    Launch {
        tool: ToolKind,
        project: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{tool}` failed for {project} ({})", exit_description(.status))]
    #[diagnostic(code(elm_workspace::tool::failed))]
    Failed {
        tool: ToolKind,
        project: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("unexpected output from `{tool}` for {project}: {reason}")]
    #[diagnostic(code(elm_workspace::tool::output))]
    Output {
        tool: ToolKind,
        project: String,
        reason: String,
    },
}

impl ExternalToolError {
    pub fn tool(&self) -> ToolKind {
        match self {
            ExternalToolError::NotConfigured { tool, .. }
            | ExternalToolError::Launch { tool, .. }
            | ExternalToolError::Failed { tool, .. }
            | ExternalToolError::Output { tool, .. } => *tool,
        }
    }

    pub fn project(&self) -> &str {
        match self {
            ExternalToolError::NotConfigured { project, .. }
            | ExternalToolError::Launch { project, .. }
            | ExternalToolError::Failed { project, .. }
            | ExternalToolError::Output { project, .. } => project,
        }
    }
}

fn exit_description(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Name used in errors for runs that are not tied to a project.
const NO_PROJECT: &str = "the workspace";

fn scope_name(project: Option<&ElmProject>) -> String {
    project
        .map(|p| p.presentable_name())
        .unwrap_or_else(|| NO_PROJECT.to_string())
}

/// Resolved tool locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElmToolchain {
    compiler: Option<PathBuf>,
    formatter: Option<PathBuf>,
    test_runner: Option<PathBuf>,
    reviewer: Option<PathBuf>,
}

impl ElmToolchain {
    /// Take tool paths from workspace settings; empty strings stay unset.
    pub fn from_settings(settings: &ToolchainSettings) -> Self {
        let path = |s: &str| (!s.trim().is_empty()).then(|| PathBuf::from(s.trim()));
        ElmToolchain {
            compiler: path(&settings.elm_compiler_path),
            formatter: path(&settings.elm_format_path),
            test_runner: path(&settings.elm_test_path),
            reviewer: path(&settings.elm_review_path),
        }
    }

    pub fn path(&self, tool: ToolKind) -> Option<&Path> {
        self.slot(tool).as_deref()
    }

    pub fn set_path(&mut self, tool: ToolKind, path: Option<PathBuf>) {
        *self.slot_mut(tool) = path;
    }

    /// Fill unset tools from `PATH`. Returns the tools that were found.
    pub fn suggest(&mut self) -> Vec<ToolKind> {
        self.suggest_with(find_executable)
    }

    fn suggest_with(&mut self, lookup: impl Fn(&str) -> Option<PathBuf>) -> Vec<ToolKind> {
        let mut found = Vec::new();
        for tool in ToolKind::ALL {
            if self.path(tool).is_some() {
                continue;
            }
            if let Some(path) = lookup(tool.binary_name()) {
                tracing::debug!("found {} at {}", tool, path.display());
                self.set_path(tool, Some(path));
                found.push(tool);
            }
        }
        found
    }

    /// Write the tool paths back into `settings`, leaving other fields alone.
    pub fn apply_to(&self, settings: &mut ToolchainSettings) {
        let text = |p: Option<&Path>| p.map(|p| p.display().to_string()).unwrap_or_default();
        settings.elm_compiler_path = text(self.path(ToolKind::Compiler));
        settings.elm_format_path = text(self.path(ToolKind::Formatter));
        settings.elm_test_path = text(self.path(ToolKind::TestRunner));
        settings.elm_review_path = text(self.path(ToolKind::Reviewer));
    }

    /// The tool's path, or an error naming the tool and project.
    pub fn require(
        &self,
        tool: ToolKind,
        project: Option<&ElmProject>,
    ) -> Result<&Path, ExternalToolError> {
        self.path(tool)
            .ok_or_else(|| ExternalToolError::NotConfigured {
                tool,
                project: scope_name(project),
            })
    }

    /// Run `tool` with `args`, inside the project directory when given.
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    pub fn run(
        &self,
        invoker: &dyn ToolInvoker,
        tool: ToolKind,
        args: &[String],
        project: Option<&ElmProject>,
    ) -> Result<ToolOutput, ExternalToolError> {
        let path = self.require(tool, project)?;
        let mut command = ProcessBuilder::new(path).args(args);
        if let Some(project) = project {
            command = command.cwd(project.project_dir());
        }

        invoker
            .run(&command)
            .map_err(|source| ExternalToolError::Launch {
                tool,
                project: scope_name(project),
                path: path.to_path_buf(),
                source,
            })
    }

    /// First line of `<tool> --version`.
    pub fn tool_version(
        &self,
        invoker: &dyn ToolInvoker,
        tool: ToolKind,
    ) -> Result<String, ExternalToolError> {
        let output = self.run(invoker, tool, &["--version".to_string()], None)?;
        if !output.is_success() {
            return Err(ExternalToolError::Failed {
                tool,
                project: NO_PROJECT.to_string(),
                status: output.status,
                stderr: output.stderr,
            });
        }

        output
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ExternalToolError::Output {
                tool,
                project: NO_PROJECT.to_string(),
                reason: "empty version output".to_string(),
            })
    }

    /// The compiler's version, from `elm --version`.
    pub fn compiler_version(&self, invoker: &dyn ToolInvoker) -> Result<Version, ExternalToolError> {
        let text = self.tool_version(invoker, ToolKind::Compiler)?;
        Version::parse(&text).map_err(|e| ExternalToolError::Output {
            tool: ToolKind::Compiler,
            project: NO_PROJECT.to_string(),
            reason: e.to_string(),
        })
    }

    /// Probe every tool.
    pub fn report(&self, invoker: &dyn ToolInvoker) -> Vec<ToolStatus> {
        ToolKind::ALL
            .iter()
            .map(|&tool| ToolStatus {
                tool,
                path: self.path(tool).map(Path::to_path_buf),
                version: self.tool_version(invoker, tool),
            })
            .collect()
    }

    fn slot(&self, tool: ToolKind) -> &Option<PathBuf> {
        match tool {
            ToolKind::Compiler => &self.compiler,
            ToolKind::Formatter => &self.formatter,
            ToolKind::TestRunner => &self.test_runner,
            ToolKind::Reviewer => &self.reviewer,
        }
    }

    fn slot_mut(&mut self, tool: ToolKind) -> &mut Option<PathBuf> {
        match tool {
            ToolKind::Compiler => &mut self.compiler,
            ToolKind::Formatter => &mut self.formatter,
            ToolKind::TestRunner => &mut self.test_runner,
            ToolKind::Reviewer => &mut self.reviewer,
        }
    }
}

/// Result of probing one tool.
#[derive(Debug)]
pub struct ToolStatus {
    pub tool: ToolKind,
    pub path: Option<PathBuf>,
    pub version: Result<String, ExternalToolError>,
}

impl ToolStatus {
    pub fn is_ok(&self) -> bool {
        self.version.is_ok()
    }
}

/// Render a probe report for the terminal.
pub fn format_report(statuses: &[ToolStatus]) -> String {
    let mut output = String::new();
    for status in statuses {
        let mark = if status.is_ok() { "✓" } else { "✗" };
        let location = status
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not configured".to_string());
        match &status.version {
            Ok(version) => output.push_str(&format!(
                "{} {:<11} {} ({})\n",
                mark, status.tool, version, location
            )),
            Err(ExternalToolError::NotConfigured { .. }) => {
                output.push_str(&format!("{} {:<11} {}\n", mark, status.tool, location))
            }
            Err(e) => output.push_str(&format!(
                "{} {:<11} {} ({})\n",
                mark, status.tool, location, e
            )),
        }
    }
    output
}
