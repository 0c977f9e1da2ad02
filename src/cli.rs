//! CLI argument parsing for lineprof

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the line report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary of the busiest lines (default)
    Text,
    /// JSON object of filename to per-line microseconds
    Json,
    /// CSV rows for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "lineprof")]
#[command(version)]
#[command(about = "Replay a recorded line-event trace and report time per source line", long_about = None)]
pub struct Cli {
    /// File to profile, or /REGEX/ to profile every matching file
    #[arg(short = 't', long = "target", value_name = "NAME|/REGEX/")]
    pub target: String,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of lines shown by the text summary (overrides the config file)
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Spare line slots allocated when line storage grows (overrides the config file)
    #[arg(long = "line-padding", value_name = "N")]
    pub line_padding: Option<usize>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// JSON Lines trace of {"file", "line", "at_us"} events
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,
}
