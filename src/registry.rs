//! File admission and ownership of per-file tracking records
//!
//! In single-file mode the registry owns exactly one record and admits only
//! the target filename. In pattern mode every filename is tested against
//! the pattern once; the decision (accept or reject) is memoized for the
//! rest of the session so the hot path never runs the matcher twice for the
//! same name.

use crate::report::Report;
use crate::source_file::SourceFile;
use crate::target::{Pattern, ProfileTarget};
use fnv::FnvHashMap;
use std::sync::Arc;

/// Handle to a tracked file's record inside the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

/// Admission state of a filename in pattern mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEntry {
    /// Never seen this session
    Unresolved,
    /// Pattern did not match; never re-tested
    Negative,
    /// Pattern matched; the record is owned by the registry
    Positive(FileId),
}

#[derive(Debug)]
enum Admission {
    SingleFile(Arc<str>),
    Pattern {
        pattern: Pattern,
        entries: FnvHashMap<Arc<str>, FileEntry>,
    },
}

/// Maps filenames to tracking records for one session
#[derive(Debug)]
pub struct FileRegistry {
    admission: Admission,
    files: Vec<SourceFile>,
    padding: usize,
    matcher_calls: u64,
    negatives: usize,
}

impl FileRegistry {
    /// Empty registry for `target`; records grow with `padding` spare lines
    pub fn new(target: ProfileTarget, padding: usize) -> Self {
        match target {
            ProfileTarget::SingleFile(name) => Self {
                files: vec![SourceFile::new(Arc::clone(&name), padding)],
                admission: Admission::SingleFile(name),
                padding,
                matcher_calls: 0,
                negatives: 0,
            },
            ProfileTarget::PatternMatch(pattern) => Self {
                admission: Admission::Pattern {
                    pattern,
                    entries: FnvHashMap::default(),
                },
                files: Vec::new(),
                padding,
                matcher_calls: 0,
                negatives: 0,
            },
        }
    }

    /// Resolve `filename` to a tracked record, admitting it on first sight
    ///
    /// Returns `None` for files that are not tracked.
    pub fn resolve(&mut self, filename: &str) -> Option<FileId> {
        match &mut self.admission {
            Admission::SingleFile(target) => {
                if std::ptr::eq(filename, &**target) || filename == &**target {
                    Some(FileId(0))
                } else {
                    None
                }
            }
            Admission::Pattern { pattern, entries } => {
                if let Some(entry) = entries.get(filename) {
                    return match *entry {
                        FileEntry::Positive(id) => Some(id),
                        FileEntry::Negative | FileEntry::Unresolved => None,
                    };
                }

                self.matcher_calls += 1;
                let name: Arc<str> = Arc::from(filename);

                if pattern.matches(filename) {
                    let id = FileId(self.files.len());
                    self.files.push(SourceFile::new(Arc::clone(&name), self.padding));
                    entries.insert(name, FileEntry::Positive(id));
                    tracing::trace!(file = filename, "admitted file for line profiling");
                    Some(id)
                } else {
                    entries.insert(name, FileEntry::Negative);
                    self.negatives += 1;
                    tracing::trace!(file = filename, "file rejected by pattern");
                    None
                }
            }
        }
    }

    /// Current admission state of `filename` without resolving it
    pub fn entry(&self, filename: &str) -> FileEntry {
        match &self.admission {
            Admission::SingleFile(target) if filename == &**target => {
                FileEntry::Positive(FileId(0))
            }
            Admission::SingleFile(_) => FileEntry::Negative,
            Admission::Pattern { entries, .. } => entries
                .get(filename)
                .copied()
                .unwrap_or(FileEntry::Unresolved),
        }
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn get_mut(&mut self, id: FileId) -> &mut SourceFile {
        &mut self.files[id.0]
    }

    /// Records of all admitted files, in admission order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// How many times the pattern matcher has been consulted
    pub fn matcher_calls(&self) -> u64 {
        self.matcher_calls
    }

    /// Number of memoized rejections
    pub fn negative_count(&self) -> usize {
        self.negatives
    }

    /// Snapshot every admitted file's line timings
    ///
    /// Single-file mode always yields exactly one entry, even if nothing was
    /// recorded. Rejected files never appear.
    pub fn to_report(&self) -> Report {
        let mut report = Report::new();
        for file in &self.files {
            report.insert(file.filename().to_string(), file.lines().as_slice().to_vec());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_timer::DEFAULT_LINE_PADDING;
    use regex::Regex;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_pattern(re: &str) -> (ProfileTarget, Rc<Cell<u64>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let re = Regex::new(re).unwrap();
        let pattern = Pattern::new(re.as_str().to_string(), move |name: &str| {
            seen.set(seen.get() + 1);
            re.is_match(name)
        });
        (ProfileTarget::pattern(pattern), calls)
    }

    #[test]
    fn test_single_file_admits_only_target() {
        let mut registry = FileRegistry::new(ProfileTarget::file("app.rb"), DEFAULT_LINE_PADDING);
        assert_eq!(registry.resolve("app.rb"), Some(FileId(0)));
        assert_eq!(registry.resolve("lib.rb"), None);
        assert_eq!(registry.files().len(), 1);
        assert_eq!(registry.matcher_calls(), 0);
    }

    #[test]
    fn test_single_file_shared_name_is_admitted() {
        let name: Arc<str> = Arc::from("app.rb");
        let mut registry =
            FileRegistry::new(ProfileTarget::SingleFile(Arc::clone(&name)), DEFAULT_LINE_PADDING);
        assert_eq!(registry.resolve(&name), Some(FileId(0)));
    }

    #[test]
    fn test_pattern_admits_and_memoizes_positive() {
        let (target, calls) = counting_pattern(r"\.src$");
        let mut registry = FileRegistry::new(target, DEFAULT_LINE_PADDING);

        let id = registry.resolve("foo.src").unwrap();
        assert_eq!(registry.resolve("foo.src"), Some(id));
        assert_eq!(registry.resolve("foo.src"), Some(id));
        assert_eq!(calls.get(), 1);
        assert_eq!(registry.entry("foo.src"), FileEntry::Positive(id));
        assert_eq!(&**registry.get(id).filename(), "foo.src");
    }

    #[test]
    fn test_pattern_negative_is_cached() {
        let (target, calls) = counting_pattern(r"foo");
        let mut registry = FileRegistry::new(target, DEFAULT_LINE_PADDING);

        assert_eq!(registry.entry("bar.src"), FileEntry::Unresolved);
        for _ in 0..10 {
            assert_eq!(registry.resolve("bar.src"), None);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(registry.matcher_calls(), 1);
        assert_eq!(registry.negative_count(), 1);
        assert_eq!(registry.entry("bar.src"), FileEntry::Negative);
        assert!(registry.files().is_empty());
    }

    #[test]
    fn test_pattern_distinct_files_get_distinct_records() {
        let mut registry = FileRegistry::new(
            ProfileTarget::pattern(Regex::new(r"\.rb$").unwrap()),
            DEFAULT_LINE_PADDING,
        );
        let a = registry.resolve("a.rb").unwrap();
        let b = registry.resolve("b.rb").unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.files().len(), 2);
    }

    #[test]
    fn test_report_single_file_without_samples() {
        let registry = FileRegistry::new(ProfileTarget::file("app.rb"), DEFAULT_LINE_PADDING);
        let report = registry.to_report();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("app.rb"), Some(&[][..]));
    }

    #[test]
    fn test_report_excludes_negatives() {
        let mut registry = FileRegistry::new(
            ProfileTarget::pattern(Regex::new(r"foo").unwrap()),
            DEFAULT_LINE_PADDING,
        );
        registry.resolve("foo.src");
        registry.resolve("bar.src");
        let report = registry.to_report();
        assert_eq!(report.len(), 1);
        assert!(report.get("foo.src").is_some());
        assert!(report.get("bar.src").is_none());
    }

    #[test]
    fn test_records_use_configured_padding() {
        let mut registry = FileRegistry::new(ProfileTarget::file("app.rb"), 8);
        let id = registry.resolve("app.rb").unwrap();
        let file = registry.get_mut(id);
        file.advance(1, 0).unwrap();
        file.advance(2, 10).unwrap();
        assert_eq!(registry.get(id).lines().len(), 9);
    }
}
