//! Tracking record for one admitted source file

use crate::error::Result;
use crate::line_timer::LineTimes;
use std::sync::Arc;

/// Line timings plus the file's open interval, if any
#[derive(Debug, Clone)]
pub struct SourceFile {
    filename: Arc<str>,
    lines: LineTimes,
    /// Start of the open interval in microseconds, `None` when closed
    last_time: Option<u64>,
    last_line: usize,
}

impl SourceFile {
    pub fn new(filename: Arc<str>, padding: usize) -> Self {
        Self {
            filename,
            lines: LineTimes::with_padding(padding),
            last_time: None,
            last_line: 0,
        }
    }

    pub fn filename(&self) -> &Arc<str> {
        &self.filename
    }

    pub fn lines(&self) -> &LineTimes {
        &self.lines
    }

    /// Close the open interval at `now` and open a new one at `line`
    ///
    /// Returns whether a sample was recorded. Nothing is recorded when no
    /// interval was open.
    pub fn advance(&mut self, line: usize, now: u64) -> Result<bool> {
        let recorded = match self.last_time {
            Some(started) => {
                self.lines
                    .record(self.last_line, now.saturating_sub(started))?;
                true
            }
            None => false,
        };

        self.last_time = Some(now);
        self.last_line = line;
        Ok(recorded)
    }

    /// Drop the open interval without recording it
    pub fn invalidate(&mut self) {
        self.last_time = None;
    }

    /// The open interval as `(line, started_at_us)`
    pub fn open_interval(&self) -> Option<(usize, u64)> {
        self.last_time.map(|t| (self.last_line, t))
    }
}
