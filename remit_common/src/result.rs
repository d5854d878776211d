//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `RemitError`, so functions can simply return `Result<T>`.
use crate::error::RemitError;

/// Workspace-wide `Result` alias with `RemitError` as the default error.
pub type Result<T, E = RemitError> = std::result::Result<T, E>;
