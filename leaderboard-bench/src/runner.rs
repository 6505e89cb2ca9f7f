// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run one algorithm with both libraries.

use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::types::Library;
use log::{info, warn};

use crate::algo::Algorithm;
use crate::canned::{MSCCL_LOADED_MARKER, NCCL_TESTS_OUTPUT, candidate_output};
use crate::command_line::{LaunchCommand, MSCCL_XML_FILES};

const FAILURE_MARKERS: [&str; 2] = ["NCCL WARN", "NCCL ERROR"];

#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    /// Execute the benchmarks
    Run,

    /// Go through the algorithms without starting any process
    Test,
}

/// Name of a library in the driver's outputs.
#[must_use]
pub fn library_label(library: Library) -> &'static str {
    match library {
        Library::Baseline => "NCCL",
        Library::Candidate => "MSCCL",
    }
}

/// Where the output of running `file_name` with `library` is kept.
#[must_use]
pub fn log_path(output_dir: &Path, file_name: &str, library: Library) -> PathBuf {
    let tag = match library {
        Library::Baseline => "nccl",
        Library::Candidate => "msccl",
    };
    output_dir.join(format!("{file_name}_{tag}_result.txt"))
}

/// Check the output of a run. Returns the reason a run is rejected.
#[must_use]
pub fn rejection(library: Library, contents: &str) -> Option<String> {
    let upper = contents.to_uppercase();
    if let Some(marker) = FAILURE_MARKERS.iter().find(|m| upper.contains(*m)) {
        return Some(format!("output contains {marker}"));
    }
    if library == Library::Candidate && !contents.contains(MSCCL_LOADED_MARKER) {
        return Some(format!("\"{MSCCL_LOADED_MARKER}\" not found in output"));
    }
    None
}

/// Look for an executable in the `PATH`, unless `program` is itself a path.
#[must_use]
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return is_executable(path).then(|| path.to_path_buf());
    }
    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A run whose output was accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedLog {
    pub library: Library,
    pub path: PathBuf,
}

pub struct Runner<'a> {
    mode: RunMode,
    launch: &'a LaunchCommand,
    output_dir: &'a Path,
}

impl<'a> Runner<'a> {
    #[must_use]
    pub fn new(mode: RunMode, launch: &'a LaunchCommand, output_dir: &'a Path) -> Self {
        Self {
            mode,
            launch,
            output_dir,
        }
    }

    /// The full `mpirun` command line for one library.
    ///
    /// `algo_path` is only passed to the candidate run.
    pub fn command_line(
        &self,
        algo: &Algorithm,
        algo_path: &Path,
        library: Library,
    ) -> LeaderboardResult<Vec<String>> {
        let perf_test = algo.perf_test(algo_path)?;

        let mut args = vec![
            self.launch.mpirun().to_string(),
            "-np".to_string(),
            algo.num_gpus().to_string(),
        ];
        args.extend(self.launch.mpirun_args().iter().cloned());
        if library == Library::Candidate {
            args.push("-x".to_string());
            args.push(format!("{MSCCL_XML_FILES}={}", algo_path.display()));
        }
        if let Some(launcher) = self.launch.launcher() {
            args.push(launcher.display().to_string());
        }
        args.push(self.launch.nccl_tests().join(perf_test).display().to_string());
        args.extend(self.launch.nccl_tests_args().iter().cloned());
        Ok(args)
    }

    /// Run the baseline then the candidate and return the accepted outputs.
    pub fn run(
        &self,
        algo: &Algorithm,
        algo_path: &Path,
        file_name: &str,
    ) -> LeaderboardResult<Vec<AcceptedLog>> {
        info!("Benchmarking {file_name} ({:?} mode)", self.mode);

        let mut accepted = Vec::new();
        for library in [Library::Baseline, Library::Candidate] {
            let path = log_path(self.output_dir, file_name, library);
            let command_line = self.command_line(algo, algo_path, library)?;
            info!(
                "Running {} test: {} > {}",
                library_label(library),
                command_line.join(" "),
                path.display()
            );

            match self.mode {
                RunMode::Test => {
                    let contents = match library {
                        Library::Baseline => NCCL_TESTS_OUTPUT.to_string(),
                        Library::Candidate => candidate_output(file_name),
                    };
                    fs::write(&path, contents).map_err(|e| LeaderboardError::io(&path, e))?;
                }
                RunMode::Run => execute(&command_line, &path)?,
            }

            let contents =
                fs::read_to_string(&path).map_err(|e| LeaderboardError::io(&path, e))?;
            match rejection(library, &contents) {
                Some(reason) => warn!(
                    "The {} benchmark of {file_name} failed: {} {reason}",
                    library_label(library),
                    path.display()
                ),
                None => {
                    info!("Successful benchmark run, output in {}", path.display());
                    accepted.push(AcceptedLog { library, path });
                }
            }
        }
        Ok(accepted)
    }
}

/// Run a command with its standard output sent to `output`.
fn execute(command_line: &[String], output: &Path) -> LeaderboardResult<()> {
    let Some((program, args)) = command_line.split_first() else {
        return Err(LeaderboardError::Bench("empty command line".to_string()));
    };
    let stdout = File::create(output).map_err(|e| LeaderboardError::io(output, e))?;
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::from(stdout))
        .status()
        .map_err(|e| LeaderboardError::io(Path::new(program), e))?;
    if !status.success() {
        warn!("{program} exited with {status}");
    }
    Ok(())
}
