//! lineprof - per-source-line execution time profiler
//!
//! This library attributes wall-clock time to individual source lines from a
//! stream of "about to execute line L of file F" events, with exact-file or
//! pattern-based file admission, and produces a per-file array of cumulative
//! microseconds per line at the end of a session.

pub mod attribution;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod line_timer;
pub mod matcher;
pub mod registry;
pub mod replay;
pub mod report;
pub mod session;
pub mod source_file;
pub mod target;

pub use attribution::LineHook;
pub use error::{ProfileError, Result};
pub use report::Report;
pub use session::{lineprof, ActiveSession, Session, SessionState};
pub use target::ProfileTarget;
