//! Error types and handling for the installer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Two layers live here:
//! - [`InstallerError`]: the crate-wide error type surfaced to the operator
//! - [`ErrorKind`]: the coarse classification attached to step results, used
//!   by the pipeline to decide fatal vs. non-fatal handling

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum InstallerError {
    // Pre-flight validation errors
    #[error("License must be accepted before installation")]
    #[diagnostic(
        code(mcwrap::license::not_accepted),
        help(
            "Pass --accept-license, set \"accept_license\": true in the config file, or accept the agreement in the interactive wizard."
        )
    )]
    LicenseNotAccepted,

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(mcwrap::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(mcwrap::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Invalid installation path: {path}: {reason}")]
    #[diagnostic(code(mcwrap::path::invalid))]
    InvalidInstallPath { path: String, reason: String },

    // Path and permission errors
    #[error("Permission denied for installation path: {path}")]
    #[diagnostic(
        code(mcwrap::path::permission_denied),
        help(
            "This location likely requires elevated privileges. You can: \
             1) re-run the installer elevated (Administrator / sudo), \
             2) choose another installation directory, or \
             3) use the per-user default path."
        )
    )]
    PermissionDenied { path: String },

    // Pipeline errors
    #[error("Installation step '{step}' failed ({kind}): {detail}")]
    #[diagnostic(code(mcwrap::pipeline::step_failed))]
    StepFailed {
        step: String,
        kind: ErrorKind,
        detail: String,
    },

    #[error("Failed to write uninstall record: {path}")]
    #[diagnostic(
        code(mcwrap::pipeline::commit_failed),
        help(
            "Without install_info.json the application cannot be uninstalled later, \
             so the installation is reported as failed even though files were copied."
        )
    )]
    CommitFailed { path: String, reason: String },

    #[error("Installation cancelled")]
    #[diagnostic(code(mcwrap::pipeline::cancelled))]
    Cancelled,

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(mcwrap::fs::io_error))]
    IoError { message: String },

    // Interactive prompt errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(mcwrap::ui::prompt_failed))]
    PromptFailed { message: String },
}

/// Coarse failure classification carried by step results.
///
/// Steps report one of these alongside a human-readable detail string; the
/// pipeline maps the kind to remediation guidance and the fatal/non-fatal
/// policy for the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Elevation likely required; triggers the three-remedy guidance
    PermissionDenied,
    /// Source or target path missing
    PathNotFound,
    /// Any other I/O failure, no special remediation
    OtherIoError,
    /// Configuration file could not be parsed (pre-flight)
    ConfigParseError,
    /// License was not accepted through any source (pre-flight)
    LicenseNotAccepted,
    /// Non-fatal per-component failure in shortcut/service steps
    PartialStepFailure,
    /// The final uninstall-record write failed
    CommitFailure,
}

impl ErrorKind {
    /// Classify an I/O error into the step-failure taxonomy
    pub fn classify(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::NotFound => ErrorKind::PathNotFound,
            _ => ErrorKind::OtherIoError,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::PathNotFound => "PathNotFound",
            ErrorKind::OtherIoError => "OtherIOError",
            ErrorKind::ConfigParseError => "ConfigParseError",
            ErrorKind::LicenseNotAccepted => "LicenseNotAccepted",
            ErrorKind::PartialStepFailure => "PartialStepFailure",
            ErrorKind::CommitFailure => "CommitFailure",
        };
        write!(f, "{}", name)
    }
}

impl From<std::io::Error> for InstallerError {
    fn from(err: std::io::Error) -> Self {
        InstallerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for InstallerError {
    fn from(err: serde_json::Error) -> Self {
        InstallerError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for InstallerError {
    fn from(err: inquire::InquireError) -> Self {
        InstallerError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, InstallerError>;
