// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Find and load all of the benchmark logs under a data directory.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::data_format_error;
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::nccl_log::NcclLog;
use crate::types::{Library, MeasurementRecord, Operation};

const LOG_EXTENSION: &str = "txt";

/// Depth of the logs below the data directory.
const LOG_DEPTH: usize = 3;

/// A log file found at `<data>/<configuration>/<operation>/<name>.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLog {
    pub configuration: String,
    pub operation: String,
    pub name: String,
    pub path: PathBuf,
}

/// Find every log file under `data_dir`, sorted by path.
///
/// Only `.txt` files exactly three levels down are logs. Anything else is
/// ignored.
pub fn find_data_logs(data_dir: &Path) -> LeaderboardResult<Vec<DataLog>> {
    let mut logs = Vec::new();
    let walker = WalkDir::new(data_dir)
        .min_depth(LOG_DEPTH)
        .max_depth(LOG_DEPTH)
        .follow_links(true)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(data_dir, e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != LOG_EXTENSION) {
            continue;
        }
        let operation_dir = path.parent();
        let config_dir = operation_dir.and_then(Path::parent);
        logs.push(DataLog {
            configuration: file_name(config_dir),
            operation: file_name(operation_dir),
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: path.to_path_buf(),
        });
    }
    Ok(logs)
}

fn file_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Turn a failed directory walk into an I/O error on the offending path.
fn walk_error(data_dir: &Path, err: walkdir::Error) -> LeaderboardError {
    let path = err.path().unwrap_or(data_dir).to_path_buf();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    LeaderboardError::Io { path, source }
}

/// Loads the measurements of the baseline and candidate libraries.
pub struct Loader {
    data_dir: PathBuf,
    baseline_name: String,
    candidate_name: String,
}

impl Loader {
    #[must_use]
    pub fn new(data_dir: &Path, baseline_name: &str, candidate_name: &str) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            baseline_name: baseline_name.to_string(),
            candidate_name: candidate_name.to_string(),
        }
    }

    /// Map a log file name onto the library it measures.
    #[must_use]
    pub fn library_for(&self, name: &str) -> Option<Library> {
        if name == self.baseline_name {
            Some(Library::Baseline)
        } else if name == self.candidate_name {
            Some(Library::Candidate)
        } else {
            None
        }
    }

    /// Load every record. Fails on the first malformed log.
    pub fn load(&self) -> LeaderboardResult<Vec<MeasurementRecord>> {
        let mut records = Vec::new();
        for data_log in find_data_logs(&self.data_dir)? {
            let Some(library) = self.library_for(&data_log.name) else {
                debug!("Ignoring {}", data_log.path.display());
                continue;
            };
            records.extend(self.load_log(&data_log, library)?);
        }
        info!(
            "Loaded {} records from {}",
            records.len(),
            self.data_dir.display()
        );
        Ok(records)
    }

    fn load_log(
        &self,
        data_log: &DataLog,
        library: Library,
    ) -> LeaderboardResult<Vec<MeasurementRecord>> {
        let path = data_log.path.as_path();
        let operation = match data_log.operation.parse::<Operation>() {
            Ok(operation) => operation,
            Err(msg) => {
                return data_format_error!(path, None, "{msg}");
            }
        };

        debug!("Loading {}", path.display());
        let log = NcclLog::from_file(path)?;

        let mut seen_sizes = HashSet::new();
        let mut records = Vec::with_capacity(log.rows().len());
        for row in log.rows() {
            if !seen_sizes.insert(row.size) {
                return data_format_error!(
                    path,
                    Some(row.line),
                    "duplicate message size {}",
                    row.size
                );
            }
            let Some(time_us) = row.time_us(operation.place()) else {
                return data_format_error!(
                    path,
                    Some(row.line),
                    "no {} time for message size {}",
                    operation,
                    row.size
                );
            };
            records.push(MeasurementRecord::new(
                &data_log.configuration,
                operation.clone(),
                library,
                row.size,
                time_us,
            ));
        }
        Ok(records)
    }
}
