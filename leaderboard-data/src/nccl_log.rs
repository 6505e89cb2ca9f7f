// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Parser for the logs written by `nccl-tests`.
//!
//! A log typically looks like:
//!
//! ```text
//! [1,0]<stdout>:NCCL version 2.12.12.MSCCL.0.7.3+cuda11.6
//! [1,0]<stdout>:#                                                              out-of-place                       in-place
//! [1,0]<stdout>:#       size         count      type   redop    root     time   algbw   busbw #wrong     time   algbw   busbw #wrong
//! [1,0]<stdout>:#        (B)    (elements)                               (us)  (GB/s)  (GB/s)            (us)  (GB/s)  (GB/s)
//! [1,0]<stdout>:az-eus-v100-32gb-5-worker-zphjiy:18075:18075 [0] NCCL INFO Launch mode Parallel
//! [1,0]<stdout>:        1024           256     float     sum      -1    75.18    0.01    0.03      0    78.30    0.01    0.02      0
//! [1,0]<stdout>:        2048           512     float     sum      -1    79.54    0.03    0.05      0    82.56    0.02    0.05      0
//! [1,0]<stdout>:# Avg bus bandwidth    : 1.23
//! ```
//!
//! The `[job,rank]<stdout>:` prefix is added by `mpirun --tag-output` and is
//! optional. Only rank 0 prints results to stdout so other ranks and stderr
//! are ignored.
//!
//! The column header is used to find the two `time` columns, which keeps the
//! parser independent of the columns each `nccl-tests` version prints. Once
//! the header has been seen every line starting with a digit must be a
//! result row. Other lines are messages interleaved with the table.

use std::fs;
use std::path::Path;

use log::debug;
use regex::Regex;

use crate::data_format_error;
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::types::Place;

const RANK_PREFIX_PATTERN: &str = r"^\[(?<job>\d+),(?<rank>\d+)\]<(?<stream>stdout|stderr)>:";

const VERSION_MARKER: &str = "NCCL version ";
const LOG_MARKER: &str = "NCCL ";
const TABLE_END_MARKER: &str = "Avg bus bandwidth";
const TIME_COLUMN: &str = "time";
const SIZE_COLUMN: &str = "size";
const NOT_AVAILABLE: &str = "N/A";

/// A single result row.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRow {
    /// Line number (1-based) of the row in the log.
    pub line: usize,

    /// Message size in bytes.
    pub size: u64,

    /// Out-of-place time in microseconds.
    pub out_of_place_us: f64,

    /// In-place time in microseconds. Some collectives report `N/A`.
    pub in_place_us: Option<f64>,
}

impl LogRow {
    /// Time for the given place, falling back to out-of-place when no place
    /// is given.
    #[must_use]
    pub fn time_us(&self, place: Option<Place>) -> Option<f64> {
        match place {
            Some(Place::InPlace) => self.in_place_us,
            Some(Place::OutOfPlace) | None => Some(self.out_of_place_us),
        }
    }
}

/// Indices of the interesting columns found in the header.
#[derive(Debug)]
struct Columns {
    out_of_place: usize,
    in_place: Option<usize>,
}

impl Columns {
    /// Try to interpret a comment line (without its `#`) as the column header.
    fn from_header(comment: &str) -> Option<Self> {
        let names: Vec<&str> = comment.split_whitespace().collect();
        if names.first() != Some(&SIZE_COLUMN) {
            return None;
        }
        let mut time_columns = names
            .iter()
            .enumerate()
            .filter(|(_, name)| **name == TIME_COLUMN)
            .map(|(i, _)| i);
        let out_of_place = time_columns.next()?;
        let in_place = time_columns.next();
        Some(Self {
            out_of_place,
            in_place,
        })
    }
}

/// The parsed contents of one `nccl-tests` log.
#[derive(Debug, Default)]
pub struct NcclLog {
    version: Option<String>,
    rows: Vec<LogRow>,
}

impl NcclLog {
    pub fn from_file(path: &Path) -> LeaderboardResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| LeaderboardError::io(path, e))?;
        Self::from_string(path, &content)
    }

    /// Parse the log contents. `path` is only used to report errors.
    pub fn from_string(path: &Path, content: &str) -> LeaderboardResult<Self> {
        let prefix_re =
            Regex::new(RANK_PREFIX_PATTERN).expect("`RANK_PREFIX_PATTERN` should be a valid regex");

        let mut log = NcclLog::default();
        let mut columns = None;
        let mut in_table = false;

        for (index, raw_line) in content.lines().enumerate() {
            let line_num = index + 1;
            let Some(line) = strip_rank_prefix(&prefix_re, raw_line) else {
                continue;
            };

            if let Some((_, version)) = line.split_once(VERSION_MARKER) {
                if log.version.is_none() {
                    log.version = Some(version.trim().to_string());
                }
                continue;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                if let Some(header) = Columns::from_header(comment) {
                    debug!("{}:{line_num}: column header {header:?}", path.display());
                    columns = Some(header);
                    in_table = true;
                } else if comment.trim_start().starts_with(TABLE_END_MARKER) {
                    in_table = false;
                }
                continue;
            }

            if !in_table || line.contains(LOG_MARKER) {
                continue;
            }
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                debug!("{}:{line_num}: skipping '{line}'", path.display());
                continue;
            }

            if let Some(columns) = &columns {
                log.rows.push(parse_row(path, line_num, line, columns)?);
            }
        }

        if columns.is_none() {
            return data_format_error!(path, None, "no nccl-tests column header found");
        }
        Ok(log)
    }

    /// The `NCCL version` reported in the log, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }
}

/// Remove any `mpirun` rank tag. Returns `None` for lines of ranks other than
/// rank 0 and for anything written to stderr.
fn strip_rank_prefix<'a>(prefix_re: &Regex, line: &'a str) -> Option<&'a str> {
    match prefix_re.captures(line) {
        Some(caps) => {
            if &caps["rank"] != "0" || &caps["stream"] != "stdout" {
                return None;
            }
            let prefix_len = caps.get(0).map_or(0, |m| m.end());
            Some(&line[prefix_len..])
        }
        None => Some(line),
    }
}

fn parse_row(path: &Path, line_num: usize, line: &str, columns: &Columns) -> LeaderboardResult<LogRow> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let size_str = fields[0];
    let Ok(size) = size_str.parse::<u64>() else {
        return data_format_error!(
            path,
            Some(line_num),
            "message size '{size_str}' is not numeric"
        );
    };

    let out_of_place_us = match parse_time(&fields, columns.out_of_place) {
        Ok(Some(time)) => time,
        Ok(None) => {
            return data_format_error!(
                path,
                Some(line_num),
                "no out-of-place time for message size {size}"
            );
        }
        Err(msg) => return data_format_error!(path, Some(line_num), "{msg}"),
    };

    let in_place_us = match columns.in_place {
        Some(column) => match parse_time(&fields, column) {
            Ok(time) => time,
            Err(msg) => return data_format_error!(path, Some(line_num), "{msg}"),
        },
        None => None,
    };

    Ok(LogRow {
        line: line_num,
        size,
        out_of_place_us,
        in_place_us,
    })
}

/// Parse the time in `column`. `N/A` is returned as `None`.
fn parse_time(fields: &[&str], column: usize) -> Result<Option<f64>, String> {
    let Some(value) = fields.get(column) else {
        return Err(format!(
            "missing time column {} (row has {} columns)",
            column + 1,
            fields.len()
        ));
    };
    if *value == NOT_AVAILABLE {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(time) if time.is_finite() => Ok(Some(time)),
        _ => Err(format!("time '{value}' is not numeric")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "#       size         count      type   redop    root     time   algbw   busbw #wrong     time   algbw   busbw #wrong";

    fn parse(content: &str) -> LeaderboardResult<NcclLog> {
        NcclLog::from_string(Path::new("test.txt"), content)
    }

    #[test]
    fn tagged_output() {
        let log = parse(
            "[1,5]<stdout>:host:18101:18135 [5] NCCL INFO comm 0x7f38 rank 5 nranks 16 - Init COMPLETE
[1,0]<stdout>:NCCL version 2.12.12.MSCCL.0.7.3+cuda11.6
[1,0]<stdout>:#                                                              out-of-place                       in-place
[1,0]<stdout>:#       size         count      type   redop    root     time   algbw   busbw #wrong     time   algbw   busbw #wrong
[1,0]<stdout>:#        (B)    (elements)                               (us)  (GB/s)  (GB/s)            (us)  (GB/s)  (GB/s)
[1,0]<stdout>:host:18075:18075 [0] NCCL INFO Launch mode Parallel
[1,0]<stdout>:        1024           256     float     sum      -1    75.18    0.01    0.03      0    78.30    0.01    0.02      0
[1,3]<stdout>:        2048           512     float     sum      -1    11.11    0.03    0.05      0    11.11    0.02    0.05      0
[1,0]<stdout>:        2048           512     float     sum      -1    79.54    0.03    0.05      0    82.56    0.02    0.05      0
[1,0]<stdout>:# Out of bounds values : 0 OK
[1,0]<stdout>:# Avg bus bandwidth    : 0.04
",
        )
        .unwrap();

        assert_eq!(log.version(), Some("2.12.12.MSCCL.0.7.3+cuda11.6"));
        assert_eq!(log.rows().len(), 2);
        assert_eq!(log.rows()[0].size, 1024);
        assert_eq!(log.rows()[0].out_of_place_us, 75.18);
        assert_eq!(log.rows()[0].in_place_us, Some(78.30));
        assert_eq!(log.rows()[1].size, 2048);
        assert_eq!(log.rows()[1].out_of_place_us, 79.54);
        assert_eq!(log.rows()[1].line, 9);
    }

    #[test]
    fn untagged_output_without_root_column() {
        let log = parse(
            "#       size         count    type   redop     time   algbw   busbw  error     time   algbw   busbw  error
        1024           256   float     sum   4019.3    0.00    0.00  4e+00    49.33    0.02    0.04  5e-07
",
        )
        .unwrap();

        assert_eq!(log.version(), None);
        assert_eq!(log.rows()[0].out_of_place_us, 4019.3);
        assert_eq!(log.rows()[0].in_place_us, Some(49.33));
    }

    #[test]
    fn not_available_in_place() {
        let log = parse(&format!(
            "{HEADER}\n        1024           256     float    none      -1    75.18    0.01    0.03      0       N/A     N/A     N/A    N/A\n"
        ))
        .unwrap();

        let row = &log.rows()[0];
        assert_eq!(row.in_place_us, None);
        assert_eq!(row.time_us(Some(Place::InPlace)), None);
        assert_eq!(row.time_us(Some(Place::OutOfPlace)), Some(75.18));
        assert_eq!(row.time_us(None), Some(75.18));
    }

    #[test]
    fn lines_after_table_are_ignored() {
        let log = parse(&format!(
            "{HEADER}\n        1024           256     float     sum      -1    75.18    0.01    0.03      0    78.30    0.01    0.02      0\n# Avg bus bandwidth    : 0.04\nmpirun noticed that the job aborted\n"
        ))
        .unwrap();

        assert_eq!(log.rows().len(), 1);
    }

    #[test]
    fn messages_inside_the_table_are_skipped() {
        let log = parse(&format!(
            "[1,0]<stdout>:{HEADER}
[1,0]<stdout>:        1024           256     float     sum      -1    75.18    0.01    0.03      0    78.30    0.01    0.02      0
[1,3]<stderr>:warning: unable to pin memory, falling back to pageable buffers
[1,0]<stderr>:        9999           256     float     sum      -1    11.11    0.01    0.03      0    11.11    0.01    0.02      0
Warning: Permanently added 'worker-1' to the list of known hosts.
[1,0]<stdout>:        2048           512     float     sum      -1    79.54    0.03    0.05      0    82.56    0.02    0.05      0
[1,0]<stdout>:# Avg bus bandwidth    : 0.04
"
        ))
        .unwrap();

        let sizes: Vec<u64> = log.rows().iter().map(|row| row.size).collect();
        assert_eq!(sizes, [1024, 2048]);
        assert_eq!(log.rows()[1].line, 6);
    }

    #[test]
    fn non_numeric_size() {
        let err = parse(&format!(
            "{HEADER}\n        1KB           256     float     sum      -1    75.18    0.01    0.03      0    78.30    0.01    0.02      0\n"
        ))
        .unwrap_err();

        match err {
            LeaderboardError::DataFormat { line, message, .. } => {
                assert_eq!(line, Some(2));
                assert_eq!(message, "message size '1KB' is not numeric");
            }
            _ => panic!("unexpected error {err}"),
        }
    }

    #[test]
    fn non_numeric_time() {
        let err = parse(&format!(
            "{HEADER}\n        1024           256     float     sum      -1    fast    0.01    0.03      0    78.30    0.01    0.02      0\n"
        ))
        .unwrap_err();

        assert!(err.to_string().contains("time 'fast' is not numeric"));
    }

    #[test]
    fn truncated_row() {
        let err = parse(&format!("{HEADER}\n        1024           256     float\n")).unwrap_err();

        assert!(err.to_string().contains("missing time column 6"));
    }

    #[test]
    fn missing_header() {
        let err = parse("        1024           256     float     sum      -1    75.18\n").unwrap_err();

        assert!(matches!(
            err,
            LeaderboardError::DataFormat { line: None, .. }
        ));
    }
}
