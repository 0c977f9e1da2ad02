//! Final per-file, per-line timing report
//!
//! Each file maps to the raw accumulator array: index `i` holds the total
//! microseconds attributed to line `i`, index 0 is unused. Arrays are
//! emitted exactly as accumulated, trailing zeros included.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Time spent on one line of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHotspot {
    pub file: String,
    pub line: usize,
    pub time_us: u64,
}

impl fmt::Display for LineHotspot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}us", self.file, self.line, self.time_us)
    }
}

/// Immutable result of a profiling session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    files: BTreeMap<String, Vec<u64>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, filename: String, lines: Vec<u64>) {
        self.files.insert(filename, lines);
    }

    /// Line array for `filename`
    pub fn get(&self, filename: &str) -> Option<&[u64]> {
        self.files.get(filename).map(|v| v.as_slice())
    }

    /// Time recorded for `line` of `filename`, 0 if absent
    pub fn line_time(&self, filename: &str, line: usize) -> u64 {
        self.get(filename)
            .and_then(|lines| lines.get(line).copied())
            .unwrap_or(0)
    }

    /// Iterate over `(filename, lines)` sorted by filename
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of every line in every file
    pub fn total_us(&self) -> u64 {
        self.files
            .values()
            .flatten()
            .fold(0u64, |acc, &t| acc.saturating_add(t))
    }

    /// The `n` lines with the most time, busiest first
    ///
    /// Lines with no recorded time are skipped. Ties are broken by filename
    /// and line number so the order is stable.
    pub fn hottest_lines(&self, n: usize) -> Vec<LineHotspot> {
        let mut hot: Vec<LineHotspot> = self
            .files
            .iter()
            .flat_map(|(file, lines)| {
                lines
                    .iter()
                    .enumerate()
                    .filter(|&(_, &t)| t > 0)
                    .map(move |(line, &time_us)| LineHotspot {
                        file: file.clone(),
                        line,
                        time_us,
                    })
            })
            .collect();

        hot.sort_by(|a, b| {
            b.time_us
                .cmp(&a.time_us)
                .then_with(|| a.file.cmp(&b.file))
                .then_with(|| a.line.cmp(&b.line))
        });
        hot.truncate(n);
        hot
    }

    /// Serialize as a JSON object of filename to line array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One `file,line,time_us` row per line with recorded time
    pub fn to_csv(&self) -> String {
        let mut output = String::from("file,line,time_us\n");

        for (file, lines) in &self.files {
            let file = escape_field(file);
            for (line, &t) in lines.iter().enumerate().filter(|&(_, &t)| t > 0) {
                output.push_str(&format!("{},{},{}\n", file, line, t));
            }
        }

        output
    }

    /// Print the busiest lines to stderr
    pub fn print_summary(&self, top: usize) {
        if self.is_empty() {
            eprintln!("\nNo line profiling data collected.");
            return;
        }

        let total = self.total_us();
        let hot = self.hottest_lines(top);

        eprintln!("\n╔════════════════════════════════════════════════════════════════════════════════╗");
        eprintln!("║  Line Timing Summary (sorted by total time)                                   ║");
        eprintln!("╚════════════════════════════════════════════════════════════════════════════════╝");
        eprintln!();
        eprintln!("{:<56} {:>8} {:>12} {:>8}", "File", "Line", "Total Time", "Share");
        eprintln!("{}", "─".repeat(88));

        for spot in &hot {
            let seconds = spot.time_us as f64 / 1_000_000.0;
            let share = if total > 0 {
                spot.time_us as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            eprintln!(
                "{:<56} {:>8} {:>11.6}s {:>7.1}%",
                spot.file, spot.line, seconds, share
            );
        }

        eprintln!("{}", "─".repeat(88));
        eprintln!(
            "{} file(s), {:.6}s attributed",
            self.len(),
            total as f64 / 1_000_000.0
        );
    }
}

/// Quote a CSV field containing commas, quotes or newlines
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
