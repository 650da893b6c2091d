#![deny(unsafe_code)]
//! Reconciliation demo binary.
//!
//! Runs the built-in order-migration scenario, or compares one column of two
//! JSON tables given on the command line:
//! 1. load configuration (file, or lenient defaults in UTC)
//! 2. build scalar and collection mappings
//! 3. consolidate collections sharing a destination
//! 4. validate the batch and print the report
//!
//! Exits non-zero when the batch does not reconcile.

mod scenario;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use recon_engine::{Mapping, ReconcileContext, Table, Validate};
use recon_types::{LocalZone, LoggingConfig, ReconcileConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════╗
 ║            Source-to-Destination Reconciliation              ║
 ╚══════════════════════════════════════════════════════════════╝
"#;

/// Reconcile a source against a destination and report every discrepancy
#[derive(Parser)]
#[command(name = "recon-demo")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long, env = "RECON_CONFIG")]
    config: Option<PathBuf>,

    /// Source table (JSON)
    #[arg(long, requires_all = ["destination", "column"])]
    source: Option<PathBuf>,

    /// Destination table (JSON)
    #[arg(long, requires_all = ["source", "column"])]
    destination: Option<PathBuf>,

    /// Column to compare between the two tables
    #[arg(long)]
    column: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn section(title: &str) {
    println!();
    println!(" ── {} {}", title, "─".repeat(56usize.saturating_sub(title.len())));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(fmt::layer().with_target(false).without_time())
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ReconcileConfig> {
    match path {
        Some(path) => ReconcileConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ReconcileConfig::lenient().with_local_zone(LocalZone::utc())),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("   [FATAL]  {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the batch reconciled.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging, cli.verbose);
    let ctx = ReconcileContext::new(config).context("invalid configuration")?;

    if !cli.json {
        println!("{}", BANNER);
        section("Configuration");
        let defaults = &ctx.config().defaults;
        info(&format!("numeric defaults     {}", defaults.numeric));
        info(&format!("collection defaults  {}", defaults.collection));
        info(&format!("date/time defaults   {}", defaults.date_time));
        info(&format!("string defaults      {}", defaults.string));
        info(&format!("local zone           {:?}", ctx.config().local_zone));
    }

    let (collections, mut batch) = match (&cli.source, &cli.destination, &cli.column) {
        (Some(source), Some(destination), Some(column)) => {
            let source = Table::load(source)
                .with_context(|| format!("loading source table {}", source.display()))?;
            let destination = Table::load(destination).with_context(|| {
                format!("loading destination table {}", destination.display())
            })?;
            (scenario::tables(&ctx, source, destination, column)?, Vec::new())
        }
        _ => (scenario::collections(&ctx)?, scenario::scalars(&ctx)?),
    };

    let incoming = collections.len();
    let consolidated = ctx.consolidate(collections)?;
    if !cli.json {
        section("Consolidation");
        ok(&format!(
            "{} collection mappings -> {}",
            incoming,
            consolidated.len()
        ));
        for mapping in &consolidated {
            info(mapping.name());
        }
    }
    batch.extend(consolidated.into_iter().map(Mapping::from));

    let report = ctx.validate_all(&batch);
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        section("Report");
        println!("{}", report);
    }
    Ok(report.is_clean())
}
