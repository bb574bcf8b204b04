//! fundview - Startup funding CSV explorer
//!
//! Loads a funding export, normalizes it, and prints the company, investor
//! or overview dashboard as terminal tables or JSON, optionally writing PNG
//! charts alongside.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fundview::charts::StaticChartRenderer;
use fundview::report::{ReportBuilder, TerminalRenderer};
use fundview::{DashboardConfig, FundingStore, Selection};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Startup funding dashboard on the command line", long_about = None)]
struct Cli {
    /// Funding CSV export
    #[arg(long, short)]
    input: PathBuf,

    /// JSON file overriding view sizes and chart dimensions
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write PNG charts for the selected view into this directory
    #[arg(long)]
    charts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Funding trend, top sectors, cities and investors
    Overview,
    /// One startup's rounds and totals
    Company {
        /// Startup name (matched on its cleaned key)
        name: String,
    },
    /// One investor's portfolio
    Investor(InvestorArgs),
    /// List selectable startups or investors
    List {
        #[arg(value_enum)]
        entity: Entity,
    },
}

#[derive(Args, Debug)]
struct InvestorArgs {
    /// Investor name (matched on its cleaned key)
    name: String,

    /// Match rounds where the investor is any of the listed co-investors
    #[arg(long)]
    co_invested: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Entity {
    Companies,
    Investors,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fundview=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let mut store = FundingStore::new();
    let df = store
        .load(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let renderer = StaticChartRenderer::new(config.chart_width, config.chart_height);

    match &cli.command {
        Command::Overview => {
            let report = ReportBuilder::overview(df, &config)?;
            if let Some(dir) = &cli.charts {
                let written = renderer.render_overview(&report, dir)?;
                info!(charts = written.len(), dir = %dir.display(), "overview charts written");
            }
            emit(cli.format, &report, || TerminalRenderer::overview(&report))?;
        }
        Command::Company { name } => match ReportBuilder::company(df, name)? {
            Some(report) => {
                if let Some(dir) = &cli.charts {
                    renderer.render_company(&report, dir)?;
                }
                emit(cli.format, &report, || TerminalRenderer::company(&report))?;
            }
            None => warn!(startup = %name, "no data available for this startup"),
        },
        Command::Investor(args) => {
            match ReportBuilder::investor(df, &args.name, args.co_invested, &config)? {
                Some(report) => {
                    if let Some(dir) = &cli.charts {
                        renderer.render_investor(&report, dir)?;
                    }
                    emit(cli.format, &report, || TerminalRenderer::investor(&report))?;
                }
                None => warn!(investor = %args.name, "no data available for this investor"),
            }
        }
        Command::List { entity } => {
            let keys = match entity {
                Entity::Companies => Selection::startup_keys(df)?,
                Entity::Investors => Selection::investor_keys(df)?,
            };
            emit(cli.format, &keys, || TerminalRenderer::keys(&keys))?;
        }
    }

    Ok(())
}

fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Table => print!("{}", table()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
