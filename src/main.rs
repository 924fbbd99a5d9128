use anyhow::{Context, Result};
use clap::Parser;
use pathorder::cli::{Cli, OutputFormat};
use pathorder::paths::{read_paths, PathStatistics};
use pathorder::selection::ModelOrderSelector;
use tracing::info;
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

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = args.selection_config()?;

    let sequences = read_paths(&args.input, args.weighted)?;
    let statistics = if config.parallel {
        PathStatistics::from_sequences_par(&sequences, config.max_order)
    } else {
        PathStatistics::from_sequences(&sequences, config.max_order)
    }
    .context("Failed to build subpath statistics")?;

    info!(
        sequences = statistics.sequence_count(),
        entities = statistics.entity_count(),
        "loaded paths"
    );

    if args.stats {
        eprint!("{}", statistics.summary());
    }

    let result = ModelOrderSelector::new(&statistics, config)?.select()?;

    match args.format {
        OutputFormat::Text => print!("{}", result.to_report_string()),
        OutputFormat::Json => println!("{}", result.to_json()?),
        OutputFormat::Csv => print!("{}", result.to_csv()),
    }

    Ok(())
}
