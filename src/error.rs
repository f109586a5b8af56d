// src/error.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for log generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running a generation.
#[derive(Error, Debug)]
pub enum Error {
    /// Format identifier outside the supported set.
    #[error("unknown log format '{0}' (expected one of: {})", crate::format::LogFormat::NAMES.join(", "))]
    UnknownFormat(String),

    /// Destination kind outside the supported set.
    #[error("unknown output type '{0}' (expected one of: stdout, log, gz)")]
    UnknownSinkKind(String),

    /// Option combination that cannot be run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Starting timestamp that does not parse as RFC 3339.
    #[error("invalid start timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Destination could not be created.
    #[error("failed to open {}: {source}", .path.display())]
    OpenSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Continuous-mode side-channel file could not be created.
    #[error("failed to open diagnostic file {}: {source} (use --diagnostic-path to choose a writable location)", .path.display())]
    OpenDiagnostic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination could not be flushed and released.
    #[error("failed to close {}: {source}", .path.display())]
    CloseSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// True for errors raised before any sink is touched.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat(_)
                | Error::UnknownSinkKind(_)
                | Error::InvalidConfig(_)
                | Error::InvalidTimestamp { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
