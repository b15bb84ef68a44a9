//! Error types and exit-code constants for hipify-rs.
//!
//! Bridges the failure modes of every subsystem (CLI parsing, the driver's
//! file-copy/rename steps, the embedded front end) into one type so `main`
//! can convert any of them into a process exit code without matching on
//! subsystem-specific errors itself.

use std::path::PathBuf;

use thiserror::Error;

/// Process exit codes.
///
/// `0` (success) and `1` (option conflict) are fixed; anything else
/// is the sum of front-end failure counts across jobs, so this type only
/// names the codes the core itself can produce directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Option conflict detected before any work was performed.
    OptionConflict = 1,
    /// A filesystem operation the driver depends on failed.
    IoFailure = 2,
    /// The embedded front end could not be constructed (e.g. libclang not
    /// found/loadable).
    FrontEndUnavailable = 3,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Unified error type for hipify-rs.
#[derive(Debug, Error)]
pub enum HipifyError {
    /// Two or more CLI flags were given together and are mutually exclusive.
    #[error("conflicting options: {message}")]
    OptionConflict { message: String },

    /// A filesystem operation (copy, rename, delete) failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The embedded front end could not be constructed.
    #[error("front end unavailable: {message}")]
    FrontEndUnavailable { message: String },

    /// The front end failed to parse a translation unit.
    #[error("parse failed for {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

impl HipifyError {
    pub fn option_conflict(message: impl Into<String>) -> Self {
        HipifyError::OptionConflict {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HipifyError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn front_end_unavailable(message: impl Into<String>) -> Self {
        HipifyError::FrontEndUnavailable {
            message: message.into(),
        }
    }

    pub fn parse_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        HipifyError::ParseFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Exit code this error should produce if it aborts the process outright.
    ///
    /// Per-file parse failures are *not* fatal; the driver counts them and
    /// continues. This mapping only applies to errors raised before or
    /// outside the per-file loop.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            HipifyError::OptionConflict { .. } => ExitCode::OptionConflict,
            HipifyError::Io { .. } => ExitCode::IoFailure,
            HipifyError::FrontEndUnavailable { .. } => ExitCode::FrontEndUnavailable,
            HipifyError::ParseFailed { .. } => ExitCode::IoFailure,
        }
    }
}
