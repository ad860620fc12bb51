//! Error conversion utilities for CLI.
//!
//! Converts warpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::fmt::Write;
use std::process::ExitCode;
use warpack_core::LaunchError;
use warpack_core::PackError;
use warpack_core::error::ControlError;

/// Converts `PackError` to a user-friendly anyhow error.
///
/// Validation errors stay a single line; packaging failures keep their
/// cause chain.
pub fn convert_pack_error(err: PackError) -> anyhow::Error {
    match err {
        err @ (PackError::MissingInput { .. } | PackError::NotAFile { .. }) => {
            anyhow!(err.to_string())
        }
        PackError::UnsafeEntry { archive, entry } => {
            anyhow!(
                "Archive '{}' contains an entry that escapes the output tree: '{}'\n\
                 HINT: This archive may be malicious. Rebuild it from trusted sources.",
                archive.display(),
                entry
            )
        }
        PackError::InvalidArchive { path, reason } => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: Both inputs must be ZIP-based archives (.jar, .war).",
                path.display(),
                reason
            )
        }
        err @ PackError::StagingCollision { .. } => {
            anyhow::Error::from(err).context("Packaging failed\nHINT: Retry the command.")
        }
        err @ PackError::Io { .. } => anyhow::Error::from(err).context("Packaging failed"),
    }
}

/// Converts `LaunchError` to a user-friendly anyhow error.
pub fn convert_launch_error(err: LaunchError) -> anyhow::Error {
    match err {
        LaunchError::Control(ControlError::Bind { host, port, source }) => {
            anyhow!(
                "Cannot open control channel on {host}:{port}: {source}\n\
                 HINT: Another instance may be running. Use --control-port to pick another \
                 port, or a negative value to disable the channel."
            )
        }
        err @ LaunchError::NoHomeDirectory => anyhow!(err.to_string()),
        other => anyhow::Error::from(other).context("Failed to run instance"),
    }
}

/// Renders an error and its cause chain without any captured backtrace.
///
/// A validation error renders as the single line `Error: <message>`.
pub fn format_error(err: &anyhow::Error) -> String {
    let mut rendered = format!("Error: {err}");
    for cause in err.chain().skip(1) {
        let _ = write!(rendered, "\n\nCaused by:\n    {cause}");
    }
    rendered
}

/// Prints `err` to stderr and returns the failure exit code.
pub fn report_error(err: &anyhow::Error) -> ExitCode {
    eprintln!("{}", format_error(err));
    ExitCode::FAILURE
}
