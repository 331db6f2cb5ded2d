//! High-level operations.
//!
//! This module contains the workflows behind the `elm-workspace` commands.

pub mod discover;
pub mod review;
pub mod toolchain;

pub use discover::{open_workspace, open_workspace_with, persist_workspace};
pub use review::{parse_review_report, run_review, Position, Region, ReviewError, ReviewMessage};
pub use toolchain::{format_report, ElmToolchain, ExternalToolError, ToolKind, ToolStatus};
