// Interval state machine driven by line events
//
// Idle until a tracked file reports a line; from then on every event either
// closes the file's open interval into its line store or, after a switch
// between files, starts a fresh one without a sample.

use crate::clock::Clock;
use crate::error::Result;
use crate::registry::{FileId, FileRegistry};

/// Event counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Every event delivered, valid or not
    pub events_seen: u64,
    /// Events dropped for an empty filename or non-positive line
    pub events_rejected: u64,
    /// Valid events for files the registry does not track
    pub events_untracked: u64,
    /// Intervals closed into a line store
    pub samples_recorded: u64,
}

/// Routes line events to the tracked file's line store
#[derive(Debug, Default)]
pub struct AttributionEngine {
    /// File holding the session's only live interval
    open: Option<FileId>,
    stats: EngineStats,
}

impl AttributionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle "line `line` of `file` is about to run"
    ///
    /// Malformed events and untracked files leave all state untouched. The
    /// only error is a failure to grow the file's line storage.
    pub fn on_line<C: Clock + ?Sized>(
        &mut self,
        registry: &mut FileRegistry,
        clock: &C,
        file: &str,
        line: i64,
    ) -> Result<()> {
        self.stats.events_seen += 1;

        let line = match usize::try_from(line) {
            Ok(line) if line > 0 && !file.is_empty() => line,
            _ => {
                self.stats.events_rejected += 1;
                return Ok(());
            }
        };

        let Some(id) = registry.resolve(file) else {
            self.stats.events_untracked += 1;
            return Ok(());
        };

        let now = clock.now_us();
        if registry.get_mut(id).advance(line, now)? {
            self.stats.samples_recorded += 1;
        }

        if let Some(previous) = self.open {
            if previous != id {
                registry.get_mut(previous).invalidate();
            }
        }
        self.open = Some(id);

        Ok(())
    }

    /// Drop the live interval without recording it
    pub fn close(&mut self, registry: &mut FileRegistry) {
        if let Some(id) = self.open.take() {
            registry.get_mut(id).invalidate();
        }
    }

    /// File currently holding the open interval
    pub fn open_file(&self) -> Option<FileId> {
        self.open
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }
}
