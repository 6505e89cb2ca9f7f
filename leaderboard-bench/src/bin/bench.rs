// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! # Leaderboard Benchmark Driver
//!
//! Runs `nccl-tests` with NCCL and with each selected MSCCL algorithm and
//! appends the timings to `<output>/results.txt`.
//!
//! For example:
//!   bench --directory ~/sccl-presynth/sccl_presynth --filter '*gather.n16*' -o output \
//!     mpirun --bind-to numa --tag-output -hostfile /job/hostfile -x NCCL_DEBUG=INFO \
//!     ~/msccl-tools/msccl/autosynth/msccl_ndv2_launcher.sh ~/nccl-tests/build \
//!     -b 1KB -e 1MB -f 2 -g 1 -c 1 -w 100 -n 100
//!
//! Use `--run-mode test` to go through the algorithms without running
//! anything.

use std::env;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use leaderboard_bench::command_line::{LaunchCommand, find_mpirun};
use leaderboard_bench::filter::GlobFilter;
use leaderboard_bench::runner::RunMode;
use leaderboard_bench::sweep::Sweep;
use log::{LevelFilter, debug};

const DEFAULT_DIRECTORY: &str = "sccl-presynth/sccl_presynth";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    about = "Run NCCL benchmark tests using NCCL and MSCCL",
    override_usage = "bench [OPTIONS] --filter <FILTER> --output-directory <OUTPUT_DIRECTORY> \
        <mpirun> <mpirun arguments> [<launcher.sh>] <nccl-tests/build> <nccl-tests arguments>",
    after_help = "The -np option of mpirun may be omitted: it is set from the ngpus of each \
        algorithm and checked against it when given."
)]
struct Cli {
    /// Whether to run the benchmarks or only go through the algorithms
    #[arg(short, long, value_enum, default_value_t = RunMode::Run)]
    run_mode: RunMode,

    /// Directory containing the MSCCL algorithm files [default: ~/sccl-presynth/sccl_presynth]
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Shell style pattern selecting the algorithm files to benchmark
    #[arg(short, long)]
    filter: String,

    /// Directory receiving the run outputs and results.txt
    #[arg(short, long)]
    output_directory: PathBuf,

    /// Enable debug log messages
    #[arg(long)]
    debug: bool,
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

fn default_directory() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_DIRECTORY)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let argv: Vec<String> = env::args().collect();
    let mpirun_index = find_mpirun(&argv);
    let own_args = &argv[..mpirun_index.unwrap_or(argv.len())];
    let args = Cli::parse_from(own_args);

    setup_logger(args.debug);
    debug!("{args:?}");

    let Some(mpirun_index) = mpirun_index else {
        return Err(eyre!("mpirun command not found in arguments"));
    };
    let launch = LaunchCommand::parse(&argv[mpirun_index..])?;
    debug!("{launch:?}");

    let sweep = Sweep {
        mode: args.run_mode,
        directory: args.directory.unwrap_or_else(default_directory),
        filter: GlobFilter::new(&args.filter)?,
        output_dir: args.output_directory,
    };
    sweep
        .run(&launch)
        .wrap_err_with(|| format!("Benchmark sweep of {} failed", sweep.directory.display()))?;
    Ok(())
}
