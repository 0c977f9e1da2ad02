//! Profiling session lifecycle
//!
//! A `Session` is created idle. `start` resets all per-file data and begins
//! routing line events through the attribution engine; `stop` ends routing
//! and drops whatever interval was still open; `summarize` turns the
//! registry into a `Report`. The scoped entry points (`begin`, `profile`,
//! `try_profile`) hand out an `ActiveSession` guard whose `Drop` stops the
//! session on every exit path, panics included.

use crate::attribution::{AttributionEngine, EngineStats, LineHook};
use crate::clock::{Clock, WallClock};
use crate::config::ProfilerConfig;
use crate::error::{ProfileError, Result};
use crate::registry::FileRegistry;
use crate::report::Report;
use crate::target::ProfileTarget;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Never started
    Idle,
    /// Routing line events
    Active,
    /// Stopped; data kept until the next start
    Stopped,
}

/// Owns all profiling state for one logical execution stream
#[derive(Debug)]
pub struct Session<C: Clock = WallClock> {
    clock: C,
    config: ProfilerConfig,
    state: SessionState,
    registry: Option<FileRegistry>,
    engine: AttributionEngine,
    /// Set when routing failed; the session is unusable until restarted
    fault: Option<Fault>,
}

/// Why a session stopped routing events
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fault {
    /// Line whose storage could not grow
    Allocation(usize),
    Halted(String),
}

impl Fault {
    fn to_error(&self) -> ProfileError {
        match self {
            Fault::Allocation(line) => ProfileError::Allocation { line: *line },
            Fault::Halted(reason) => ProfileError::Halted(reason.clone()),
        }
    }
}

impl Session<WallClock> {
    /// Session timed by the wall clock
    pub fn new() -> Self {
        Self::with_clock(WallClock)
    }
}

impl Default for Session<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_config(clock, ProfilerConfig::default())
    }

    pub fn with_config(clock: C, config: ProfilerConfig) -> Self {
        Self {
            clock,
            config,
            state: SessionState::Idle,
            registry: None,
            engine: AttributionEngine::new(),
            fault: None,
        }
    }

    /// Begin profiling `target`, discarding data from any earlier session
    ///
    /// # Errors
    /// `ProfileError::AlreadyActive` if a session is running; its data is
    /// left untouched.
    pub fn start(&mut self, target: ProfileTarget) -> Result<()> {
        if self.state == SessionState::Active {
            return Err(ProfileError::AlreadyActive);
        }

        tracing::debug!(
            profile_target = %target,
            padding = self.config.line_padding,
            "starting line profiler"
        );

        self.registry = Some(FileRegistry::new(target, self.config.line_padding));
        self.engine = AttributionEngine::new();
        self.fault = None;
        self.state = SessionState::Active;
        Ok(())
    }

    /// Start and return a guard that stops the session when dropped
    pub fn begin(&mut self, target: ProfileTarget) -> Result<ActiveSession<'_, C>> {
        self.start(target)?;
        Ok(ActiveSession { session: self })
    }

    /// Stop routing events; the open interval, if any, is discarded
    ///
    /// Does nothing unless the session is active.
    pub fn stop(&mut self) {
        if self.state != SessionState::Active {
            return;
        }

        if let Some(registry) = self.registry.as_mut() {
            self.engine.close(registry);
        }
        self.state = SessionState::Stopped;

        let stats = self.engine.stats();
        tracing::debug!(
            events = stats.events_seen,
            rejected = stats.events_rejected,
            untracked = stats.events_untracked,
            samples = stats.samples_recorded,
            "stopped line profiler"
        );
    }

    /// Build the report for the last session
    ///
    /// A session that never started yields an empty report.
    ///
    /// # Errors
    /// `ProfileError::StillActive` while running, `ProfileError::Allocation`
    /// if line storage could not grow during the session, or
    /// `ProfileError::Halted` if routing failed for any other reason.
    pub fn summarize(&self) -> Result<Report> {
        if self.state == SessionState::Active {
            return Err(ProfileError::StillActive);
        }
        if let Some(fault) = &self.fault {
            return Err(fault.to_error());
        }

        Ok(self
            .registry
            .as_ref()
            .map(FileRegistry::to_report)
            .unwrap_or_default())
    }

    /// Run `block` under profiling and return its result with the report
    ///
    /// # Example
    /// ```
    /// use lineprof::attribution::LineHook;
    /// use lineprof::clock::ManualClock;
    /// use lineprof::session::Session;
    /// use lineprof::target::ProfileTarget;
    ///
    /// let clock = ManualClock::new();
    /// let mut session = Session::with_clock(clock.clone());
    /// let (_, report) = session
    ///     .profile(ProfileTarget::file("f.rb"), |hook| {
    ///         hook.on_line("f.rb", 1);
    ///         clock.set(100);
    ///         hook.on_line("f.rb", 2);
    ///     })
    ///     .unwrap();
    /// assert_eq!(report.line_time("f.rb", 1), 100);
    /// ```
    pub fn profile<F, R>(&mut self, target: ProfileTarget, block: F) -> Result<(R, Report)>
    where
        F: FnOnce(&mut ActiveSession<'_, C>) -> R,
    {
        let mut active = self.begin(target)?;
        let output = block(&mut active);
        drop(active);
        Ok((output, self.summarize()?))
    }

    /// Like `profile`, for blocks that can fail
    ///
    /// The session is stopped before the block's error is returned.
    pub fn try_profile<F, R, E>(
        &mut self,
        target: ProfileTarget,
        block: F,
    ) -> std::result::Result<(R, Report), E>
    where
        F: FnOnce(&mut ActiveSession<'_, C>) -> std::result::Result<R, E>,
        E: From<ProfileError>,
    {
        let mut active = self.begin(target)?;
        let output = block(&mut active);
        drop(active);
        Ok((output?, self.summarize()?))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn stats(&self) -> EngineStats {
        self.engine.stats()
    }

    /// Registry of the current or last session
    pub fn registry(&self) -> Option<&FileRegistry> {
        self.registry.as_ref()
    }

    fn route(&mut self, file: &str, line: i64) {
        if self.state != SessionState::Active || self.fault.is_some() {
            return;
        }
        let Some(registry) = self.registry.as_mut() else {
            return;
        };

        if let Err(err) = self.engine.on_line(registry, &self.clock, file, line) {
            self.record_fault(file, err);
        }
    }

    fn record_fault(&mut self, file: &str, err: ProfileError) {
        let fault = match err {
            ProfileError::Allocation { line } => {
                tracing::warn!(file, line, "line storage exhausted; profiling halted");
                Fault::Allocation(line)
            }
            other => {
                tracing::warn!(file, error = %other, "line event failed; profiling halted");
                Fault::Halted(other.to_string())
            }
        };
        self.fault = Some(fault);
    }
}

impl<C: Clock> LineHook for Session<C> {
    fn on_line(&mut self, file: &str, line: i64) {
        self.route(file, line);
    }
}

/// Scoped handle to a running session
///
/// Holds the session exclusively, so no second session can start through
/// it, and stops the session when dropped.
#[derive(Debug)]
pub struct ActiveSession<'a, C: Clock = WallClock> {
    session: &'a mut Session<C>,
}

impl<C: Clock> ActiveSession<'_, C> {
    /// Stop and summarize in one step
    pub fn finish(self) -> Result<Report> {
        self.session.stop();
        self.session.summarize()
    }

    pub fn stats(&self) -> EngineStats {
        self.session.stats()
    }

    pub fn registry(&self) -> Option<&FileRegistry> {
        self.session.registry()
    }
}

impl<C: Clock> LineHook for ActiveSession<'_, C> {
    fn on_line(&mut self, file: &str, line: i64) {
        self.session.route(file, line);
    }
}

impl<C: Clock> Drop for ActiveSession<'_, C> {
    fn drop(&mut self) {
        self.session.stop();
    }
}

/// Profile `block` with a fresh wall-clock session
pub fn lineprof<F, R>(target: ProfileTarget, block: F) -> Result<(R, Report)>
where
    F: FnOnce(&mut ActiveSession<'_, WallClock>) -> R,
{
    Session::new().profile(target, block)
}
