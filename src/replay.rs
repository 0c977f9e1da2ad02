//! Recorded line-event traces
//!
//! A trace is JSON Lines, one event per line:
//!
//! ```text
//! {"file": "app.rb", "line": 3, "at_us": 100}
//! ```
//!
//! Replaying a trace drives a session with a manual clock set to each
//! event's timestamp, so the report is exactly what a live session would
//! have produced for the same timings.

use crate::attribution::LineHook;
use crate::clock::ManualClock;
use crate::config::ProfilerConfig;
use crate::error::{ProfileError, Result};
use crate::report::Report;
use crate::session::Session;
use crate::target::ProfileTarget;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One recorded line event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub file: String,
    pub line: i64,
    /// Microsecond timestamp at which the line began executing
    pub at_us: u64,
}

impl TraceEvent {
    pub fn new(file: impl Into<String>, line: i64, at_us: u64) -> Self {
        Self {
            file: file.into(),
            line,
            at_us,
        }
    }
}

/// Parse a JSON Lines trace; blank lines are skipped
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<TraceEvent>> {
    let mut events = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let event = serde_json::from_str(text).map_err(|e| ProfileError::Replay {
            line: idx + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }

    Ok(events)
}

/// Read and parse a trace file
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<TraceEvent>> {
    let file = File::open(path.as_ref())?;
    parse_trace(BufReader::new(file))
}

/// Feed `events` to `hook`, setting `clock` to each event's time first
pub fn replay_events<H: LineHook>(hook: &mut H, clock: &ManualClock, events: &[TraceEvent]) {
    for event in events {
        clock.set(event.at_us);
        hook.on_line(&event.file, event.line);
    }
}

/// Profile `target` over a recorded trace and return the report
pub fn replay(
    target: ProfileTarget,
    events: &[TraceEvent],
    config: ProfilerConfig,
) -> Result<Report> {
    let clock = ManualClock::new();
    let mut session = Session::with_config(clock.clone(), config);

    let (_, report) = session.profile(target, |hook| replay_events(hook, &clock, events))?;

    tracing::debug!(
        events = events.len(),
        files = report.len(),
        "replayed line trace"
    );
    Ok(report)
}
