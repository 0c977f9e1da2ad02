use anyhow::{Context, Result};
use clap::Parser;
use lineprof::cli::{Cli, OutputFormat};
use lineprof::config::ProfilerConfig;
use lineprof::replay;
use lineprof::target::ProfileTarget;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file values with command-line overrides applied
fn resolve_config(args: &Cli) -> Result<ProfilerConfig> {
    let mut config = match &args.config {
        Some(path) => ProfilerConfig::from_toml(path)?,
        None => ProfilerConfig::default(),
    };

    if let Some(top) = args.top {
        config.top_lines = top;
    }
    if let Some(padding) = args.line_padding {
        config.line_padding = padding;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    let target = ProfileTarget::parse(&args.target)?;
    let events = replay::load_trace(&args.trace)
        .with_context(|| format!("Failed to load trace: {}", args.trace.display()))?;

    let top = config.top_lines;
    let report = replay::replay(target, &events, config)?;

    match args.format {
        OutputFormat::Text => report.print_summary(top),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Csv => print!("{}", report.to_csv()),
    }

    Ok(())
}
