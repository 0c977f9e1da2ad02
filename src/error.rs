//! Error taxonomy for profiling sessions
//!
//! Usage errors (re-entrant start, summarizing a live session, bad targets)
//! are reported to the caller synchronously. Malformed line events are not
//! errors at all: the attribution engine drops them and only counts them.

use thiserror::Error;

/// Errors that can occur while driving a profiling session
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profiler is already enabled")]
    AlreadyActive,

    #[error("profiler is still running; stop the session before summarizing")]
    StillActive,

    #[error("invalid profile target: {0}")]
    InvalidTarget(String),

    #[error("failed to grow line storage to hold line {line}")]
    Allocation { line: usize },

    #[error("profiling halted: {0}")]
    Halted(String),

    #[error("malformed trace event on line {line}: {message}")]
    Replay { line: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for profiling operations
pub type Result<T> = std::result::Result<T, ProfileError>;
