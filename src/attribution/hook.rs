// Line event sink installed for the duration of a profiling session

/// Receives "about to execute line `line` of `file`" events
///
/// Whatever produces events (an interpreter hook, a trace replay, a test)
/// calls `on_line` synchronously for every executed line. Implementations
/// must tolerate empty filenames and non-positive line numbers.
pub trait LineHook {
    fn on_line(&mut self, file: &str, line: i64);

    /// Deliver a batch of events in order
    fn on_lines<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = (&'a str, i64)>,
        Self: Sized,
    {
        for (file, line) in events {
            self.on_line(file, line);
        }
    }
}

impl<H: LineHook + ?Sized> LineHook for &mut H {
    fn on_line(&mut self, file: &str, line: i64) {
        (**self).on_line(file, line);
    }
}
