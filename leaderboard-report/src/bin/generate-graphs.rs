// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! # Leaderboard Graph Generator
//!
//! Reads the benchmark logs under the data directory, renders a speedup
//! thumbnail for every (configuration, operation) and writes the markdown
//! table that embeds them in the leaderboard page.
//!
//! For example, preview locally with:
//!   cargo run --bin generate-graphs
//! and build the published assets with:
//!   cargo run --release --bin generate-graphs -- --prod

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::Context;
use leaderboard_data::loader::Loader;
use leaderboard_report::chart::PlottersRenderer;
use leaderboard_report::config::{DEFAULT_CONF_FILE, Mode, ReportConfig};
use leaderboard_report::report::ReportGenerator;
use log::{LevelFilter, info};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Generate graphs for the leaderboard page")]
struct Cli {
    /// Production pass: write timestamped SVGs instead of PNG previews
    #[arg(long)]
    prod: bool,

    /// Enable debug log messages
    #[arg(short, long)]
    debug: bool,

    /// Configuration file (TOML)
    #[arg(long, default_value = DEFAULT_CONF_FILE)]
    conf_file: PathBuf,

    /// Override the directory containing the benchmark logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the directory the graphs are written to
    #[arg(long)]
    graphs_dir: Option<PathBuf>,

    /// Override the path of the markdown table
    #[arg(long)]
    table: Option<PathBuf>,
}

/// Configure the logger level and formating string.
fn setup_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    setup_logger(args.debug);

    let mut config = ReportConfig::load(&args.conf_file)
        .wrap_err_with(|| format!("Failed to configure from {}", args.conf_file.display()))?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(graphs_dir) = args.graphs_dir {
        config.graphs_dir = graphs_dir;
    }
    if let Some(table) = args.table {
        config.table_path = table;
    }

    let mode = if args.prod {
        Mode::production_now()
    } else {
        Mode::Development
    };

    let loader = Loader::new(
        &config.data_dir,
        &config.baseline_name,
        &config.candidate_name,
    );
    let records = loader
        .load()
        .wrap_err_with(|| format!("Failed to load {}", config.data_dir.display()))?;

    let mut renderer = PlottersRenderer::new(&config.chart, mode.image_format())?;
    let report = ReportGenerator::new(&config, mode).generate(&records, &mut renderer)?;
    report.write_table(&config.table_path)?;

    info!(
        "Rendered {} graphs with {} warnings",
        report.charts().len(),
        report.warnings().len()
    );
    Ok(())
}
