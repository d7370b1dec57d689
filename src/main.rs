use anyhow::{Context, Result};
use causeway::{
    analysis::analyze,
    cli::{AnalyzeArgs, Cli, Command, NormalizeArgs, OutputFormat},
    dependency_graph::DependencyGraph,
    normalizer::{write_normalized_json, LogNormalizer},
    report, validate,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG or warn
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.resolve_config()?;
    tracing::debug!(?config, "resolved configuration");

    let graph = DependencyGraph::from_json_file(&config.dependencies)?;

    let filter = args.event_filter(&config)?;
    let records = validate::load_records(&args.logs)?;
    let records = filter.apply_records(records);

    // A schema violation in any surviving record aborts the run before any output.
    let events = validate::validate_records(&records)
        .with_context(|| format!("Rejected log batch: {}", args.logs.display()))?;

    let reports = analyze(&events, &graph, &config.analysis_config());

    let output = match args.format {
        OutputFormat::Text => report::render_text(&reports),
        OutputFormat::Json => report::render_json(&reports)?,
    };
    print!("{}", output);
    if args.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let mut normalizer = LogNormalizer::new()?;
    if let Some(year) = args.year {
        normalizer = normalizer.with_year(year);
    }

    let events = normalizer.normalize_files(&args.sources)?;
    write_normalized_json(&events, &args.output)?;
    eprintln!(
        "Normalized {} events into {}",
        events.len(),
        args.output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    match &cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Normalize(args) => run_normalize(args),
    }
}
