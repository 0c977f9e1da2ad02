//! What a profiling session tracks
//!
//! A target is either one exact filename or a pattern. On the command line
//! and in `ProfileTarget::parse`, a pattern is written between slashes the
//! same way trace filters are (`/app\/models/`); anything else is a filename.

use crate::error::{ProfileError, Result};
use crate::matcher::PatternMatcher;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Pattern used for pattern-mode admission
pub struct Pattern {
    source: String,
    matcher: Box<dyn PatternMatcher>,
}

impl Pattern {
    /// Wrap any matcher; `source` is only used for display
    pub fn new(source: impl Into<String>, matcher: impl PatternMatcher + 'static) -> Self {
        Self {
            source: source.into(),
            matcher: Box::new(matcher),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.matcher.matches(filename)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self {
            source: re.as_str().to_string(),
            matcher: Box::new(re),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// Session mode: one exact file, or every file a pattern accepts
#[derive(Debug)]
pub enum ProfileTarget {
    SingleFile(Arc<str>),
    PatternMatch(Pattern),
}

impl ProfileTarget {
    /// Track exactly one file
    pub fn file(name: impl Into<Arc<str>>) -> Self {
        Self::SingleFile(name.into())
    }

    /// Track every file the pattern matches
    pub fn pattern(pattern: impl Into<Pattern>) -> Self {
        Self::PatternMatch(pattern.into())
    }

    /// Parse a target argument: `/REGEX/` or a plain filename
    ///
    /// # Example
    /// ```
    /// use lineprof::target::ProfileTarget;
    ///
    /// assert!(matches!(ProfileTarget::parse("/\\.rb$/").unwrap(), ProfileTarget::PatternMatch(_)));
    /// assert!(matches!(ProfileTarget::parse("app.rb").unwrap(), ProfileTarget::SingleFile(_)));
    /// assert!(ProfileTarget::parse("").is_err());
    /// ```
    pub fn parse(arg: &str) -> Result<Self> {
        if arg.is_empty() {
            return Err(ProfileError::InvalidTarget(
                "argument must be a filename or /pattern/".to_string(),
            ));
        }

        if let Some(inner) = arg
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            if inner.is_empty() {
                return Err(ProfileError::InvalidTarget("empty pattern".to_string()));
            }
            let re = Regex::new(inner)
                .map_err(|e| ProfileError::InvalidTarget(format!("bad pattern /{}/: {}", inner, e)))?;
            return Ok(Self::pattern(re));
        }

        Ok(Self::file(arg))
    }
}

impl fmt::Display for ProfileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileTarget::SingleFile(name) => write!(f, "{}", name),
            ProfileTarget::PatternMatch(pattern) => write!(f, "/{}/", pattern.source()),
        }
    }
}
