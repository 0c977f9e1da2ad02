//! Pattern matching capability used by the file registry
//!
//! The registry only needs a yes/no answer for a filename, so anything that
//! can answer that can drive pattern-mode admission.

use regex::Regex;

/// Decides whether a filename should be tracked
pub trait PatternMatcher {
    fn matches(&self, filename: &str) -> bool;
}

impl PatternMatcher for Regex {
    fn matches(&self, filename: &str) -> bool {
        self.is_match(filename)
    }
}

impl<F> PatternMatcher for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, filename: &str) -> bool {
        self(filename)
    }
}
