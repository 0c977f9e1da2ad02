//! Per-file line timing storage
//!
//! Each tracked file owns one `LineTimes`: a vector of microsecond
//! accumulators indexed directly by line number. Index 0 is never written
//! because line numbers start at 1.

use crate::error::{ProfileError, Result};

/// Slack added past the requested line whenever storage has to grow
///
/// Growing to `line + DEFAULT_LINE_PADDING` keeps files whose line numbers
/// creep upwards from reallocating on every new line.
pub const DEFAULT_LINE_PADDING: usize = 100;

/// Cumulative microseconds per line number
#[derive(Debug, Clone)]
pub struct LineTimes {
    lines: Vec<u64>,
    padding: usize,
    grow_count: u64,
}

impl Default for LineTimes {
    fn default() -> Self {
        Self::with_padding(DEFAULT_LINE_PADDING)
    }
}

impl LineTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that grows to `line + padding` (padding of at least 1)
    pub fn with_padding(padding: usize) -> Self {
        Self {
            lines: Vec::new(),
            padding: padding.max(1),
            grow_count: 0,
        }
    }

    /// Add `elapsed_us` to the accumulator for `line`
    ///
    /// Storage grows when `line` is past the end; accumulated values below
    /// the old length are left as they were.
    pub fn record(&mut self, line: usize, elapsed_us: u64) -> Result<()> {
        if line >= self.lines.len() {
            self.grow_to(line)?;
        }

        let slot = &mut self.lines[line];
        *slot = slot.saturating_add(elapsed_us);
        Ok(())
    }

    fn grow_to(&mut self, line: usize) -> Result<()> {
        let new_len = line
            .checked_add(self.padding)
            .ok_or(ProfileError::Allocation { line })?;
        let additional = new_len - self.lines.len();

        self.lines
            .try_reserve_exact(additional)
            .map_err(|_| ProfileError::Allocation { line })?;
        self.lines.resize(new_len, 0);
        self.grow_count += 1;
        Ok(())
    }

    /// Number of line slots (the `nlines` of the report)
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Accumulated time for `line`, 0 for lines past the end
    pub fn get(&self, line: usize) -> u64 {
        self.lines.get(line).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.lines
    }

    /// Sum over all lines
    pub fn total_us(&self) -> u64 {
        self.lines.iter().fold(0u64, |acc, &t| acc.saturating_add(t))
    }

    /// How many times storage was reallocated
    pub fn grow_count(&self) -> u64 {
        self.grow_count
    }

    pub fn padding(&self) -> usize {
        self.padding
    }
}
