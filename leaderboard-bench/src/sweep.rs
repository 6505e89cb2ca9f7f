// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Benchmark every selected algorithm of a directory.

use std::fs;
use std::path::{Path, PathBuf};

use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::nccl_log::NcclLog;
use log::{info, warn};

use crate::algo::Algorithm;
use crate::canned::ALGORITHM_XML;
use crate::command_line::LaunchCommand;
use crate::filter::GlobFilter;
use crate::results::{ResultsFile, SweepInfo};
use crate::runner::{RunMode, Runner, find_executable};

pub struct Sweep {
    pub mode: RunMode,

    /// Directory holding the algorithm files.
    pub directory: PathBuf,

    pub filter: GlobFilter,

    /// Where run outputs and `results.txt` are written.
    pub output_dir: PathBuf,
}

impl Sweep {
    /// Check that the tools needed to run the benchmarks are available.
    pub fn check_tools(&self, launch: &LaunchCommand) -> LeaderboardResult<()> {
        if self.mode == RunMode::Test {
            return Ok(());
        }
        if find_executable(launch.mpirun()).is_none() {
            return Err(LeaderboardError::Bench(format!(
                "{} must be a valid executable for the mpirun command",
                launch.mpirun()
            )));
        }
        if !launch.nccl_tests().is_dir() {
            return Err(LeaderboardError::Bench(format!(
                "{} must be a valid nccl-tests build directory",
                launch.nccl_tests().display()
            )));
        }
        Ok(())
    }

    /// Names of the files of `directory` selected by the filter, sorted.
    pub fn selected_files(&self) -> LeaderboardResult<Vec<String>> {
        let entries =
            fs::read_dir(&self.directory).map_err(|e| LeaderboardError::io(&self.directory, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LeaderboardError::io(&self.directory, e))?;
            if let Some(name) = entry.file_name().to_str()
                && self.filter.matches(name)
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn algorithm(&self, path: &Path) -> LeaderboardResult<Algorithm> {
        match self.mode {
            RunMode::Test => Algorithm::parse(path, ALGORITHM_XML),
            RunMode::Run => {
                let content =
                    fs::read_to_string(path).map_err(|e| LeaderboardError::io(path, e))?;
                Algorithm::parse(path, &content)
            }
        }
    }

    /// Benchmark every selected algorithm and append the results.
    ///
    /// Returns the names of the files processed.
    pub fn run(&self, launch: &LaunchCommand) -> LeaderboardResult<Vec<String>> {
        self.check_tools(launch)?;

        if !self.output_dir.exists() {
            info!("Creating output directory: {}", self.output_dir.display());
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| LeaderboardError::io(&self.output_dir, e))?;
        }
        let mut results = ResultsFile::open(&self.output_dir)?;
        let sweep = SweepInfo::now(self.filter.pattern());
        let runner = Runner::new(self.mode, launch, &self.output_dir);

        let files = self.selected_files()?;
        for file_name in &files {
            let algo_path = self.directory.join(file_name);
            let algo = self.algorithm(&algo_path)?;

            if let Some(np) = launch.np()
                && np != algo.num_gpus()
            {
                return Err(LeaderboardError::Bench(format!(
                    "-np value {np} does not match ngpus value {} in {file_name}",
                    algo.num_gpus()
                )));
            }

            for accepted in runner.run(&algo, &algo_path, file_name)? {
                let log = match NcclLog::from_file(&accepted.path) {
                    Ok(log) => log,
                    Err(e) => {
                        warn!("Ignoring {}: {e}", accepted.path.display());
                        continue;
                    }
                };
                let rows = results.append(&sweep, &algo, file_name, accepted.library, &log)?;
                info!("Added {rows} rows to {}", results.path().display());
            }
        }

        if files.is_empty() {
            warn!("No files were processed. Consider changing the filter or -np arguments.");
        } else {
            info!("Processed files: {}", files.join(", "));
        }
        Ok(files)
    }
}
