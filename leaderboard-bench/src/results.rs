// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The tab separated results file shared by every run of the driver.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::nccl_log::NcclLog;
use leaderboard_data::types::{Library, Place};
use log::{debug, info};

use crate::algo::Algorithm;
use crate::runner::library_label;

pub const RESULTS_FILE_NAME: &str = "results.txt";
const SEPARATOR: &str = "\t";
const UNKNOWN_VERSION: &str = "unknown";

pub const COLUMNS: [&str; 12] = [
    "Collective",
    "Filter",
    "TimeOfTest",
    "nGPUs",
    "Protocol",
    "Library",
    "NcclVersion",
    "InPlace",
    "Size",
    "Time",
    "MSCCL_Algo_Name",
    "MSCCL_File",
];

/// Values shared by every row of one driver invocation.
#[derive(Clone, Debug)]
pub struct SweepInfo {
    pub filter: String,
    pub time_of_test: String,
}

impl SweepInfo {
    /// Stamp the sweep with the current local time.
    #[must_use]
    pub fn now(filter: &str) -> Self {
        Self {
            filter: filter.to_string(),
            time_of_test: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub struct ResultsFile {
    path: PathBuf,
    file: File,
}

impl ResultsFile {
    /// Open `results.txt` in `output_dir` for appending. The header is only
    /// written when the file is created.
    pub fn open(output_dir: &Path) -> LeaderboardResult<Self> {
        let path = output_dir.join(RESULTS_FILE_NAME);
        if !path.exists() {
            info!("Creating result file: {}", path.display());
            let header = format!("{}\n", COLUMNS.join(SEPARATOR));
            fs::write(&path, header).map_err(|e| LeaderboardError::io(&path, e))?;
        }
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| LeaderboardError::io(&path, e))?;
        Ok(Self { path, file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the timings of one accepted run and return the number of rows
    /// written.
    ///
    /// Baseline runs measure both places. Candidate runs only measure the
    /// place implemented by the algorithm.
    pub fn append(
        &mut self,
        sweep: &SweepInfo,
        algo: &Algorithm,
        file_name: &str,
        library: Library,
        log: &NcclLog,
    ) -> LeaderboardResult<usize> {
        let algo_place = [algo.place()];
        let places: &[Place] = match library {
            Library::Baseline => &[Place::OutOfPlace, Place::InPlace],
            Library::Candidate => &algo_place,
        };
        let version = log.version().unwrap_or(UNKNOWN_VERSION);

        let mut written = 0;
        for row in log.rows() {
            for &place in places {
                let Some(time) = row.time_us(Some(place)) else {
                    debug!("No {place} time for size {} in {file_name}", row.size);
                    continue;
                };
                let in_place = match place {
                    Place::InPlace => "1",
                    Place::OutOfPlace => "0",
                };
                let fields = [
                    algo.collective().to_string(),
                    sweep.filter.clone(),
                    sweep.time_of_test.clone(),
                    algo.num_gpus().to_string(),
                    algo.protocol().to_string(),
                    library_label(library).to_string(),
                    version.to_string(),
                    in_place.to_string(),
                    row.size.to_string(),
                    time.to_string(),
                    algo.name().to_string(),
                    file_name.to_string(),
                ];
                writeln!(self.file, "{}", fields.join(SEPARATOR))
                    .map_err(|e| LeaderboardError::io(&self.path, e))?;
                written += 1;
            }
        }
        Ok(written)
    }
}
