//! Pipeline error type and its mapping to process exit codes.

use crate::compiler::CompileError;
use crate::fetch::FetchError;
use std::path::PathBuf;

/// Exit status for an invalid URL (`exit(-1)` as seen by the shell).
pub const EXIT_INVALID_URL: i32 = 255;
/// Exit status for every other pipeline failure.
pub const EXIT_FAILURE: i32 = 1;

/// Failure of one pipeline stage. Every variant is surfaced to the caller;
/// nothing is only logged.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid url given: {url} ({reason})")]
    InvalidUrl { url: String, reason: String },

    #[error("problem creating file for download at {}", path.display())]
    StreamCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("problem downloading {url}")]
    Network {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to create type declarations from {}", schema_path.display())]
    Compilation {
        schema_path: PathBuf,
        #[source]
        source: CompileError,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Process exit status the CLI should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::InvalidUrl { .. } => EXIT_INVALID_URL,
            _ => EXIT_FAILURE,
        }
    }
}
