// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Pair baseline and candidate measurements into speedup points.
//!
//! The speedup of a point is `baseline_time / candidate_time`, so values
//! above 1 mean the candidate library is faster.
//!
//! Points are only created for message sizes that both libraries measured.
//! Sizes measured by one library only are reported as
//! [Warning::UnmatchedPoint] and left out of the graph.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use leaderboard_data::types::{Library, MeasurementRecord, Operation};

/// Key of a group: (configuration, operation).
pub type GroupKey = (String, Operation);

/// Speedup at one message size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedupPoint {
    pub message_size: u64,
    pub speedup: f64,
}

/// Compute `baseline_us / candidate_us`.
///
/// Returns `None` unless both times are finite and positive.
#[must_use]
pub fn speedup(baseline_us: f64, candidate_us: f64) -> Option<f64> {
    let valid = |t: f64| t.is_finite() && t > 0.0;
    if valid(baseline_us) && valid(candidate_us) {
        Some(baseline_us / candidate_us)
    } else {
        None
    }
}

/// Problems that are reported but do not stop the report.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// A message size was only measured by one library.
    UnmatchedPoint {
        configuration: String,
        operation: Operation,
        message_size: u64,
        present_in: Library,
    },

    /// Both libraries measured a message size but a time was not positive.
    InvalidPoint {
        configuration: String,
        operation: Operation,
        message_size: u64,
    },

    /// One library has no measurements at all for a group.
    MissingSeries {
        configuration: String,
        operation: Operation,
        missing: Library,
    },

    /// A table cell has no speedup points and shows the placeholder.
    EmptyGroup {
        configuration: String,
        operation: Operation,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::UnmatchedPoint {
                configuration,
                operation,
                message_size,
                present_in,
            } => write!(
                f,
                "{configuration}/{operation}: message size {message_size} only measured by the {present_in}"
            ),
            Warning::InvalidPoint {
                configuration,
                operation,
                message_size,
            } => write!(
                f,
                "{configuration}/{operation}: message size {message_size} has a non-positive time"
            ),
            Warning::MissingSeries {
                configuration,
                operation,
                missing,
            } => write!(f, "{configuration}/{operation}: no {missing} results"),
            Warning::EmptyGroup {
                configuration,
                operation,
            } => write!(f, "{configuration}/{operation}: no data, using placeholder"),
        }
    }
}

/// The speedup points of one (configuration, operation), ordered by message
/// size.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartGroup {
    configuration: String,
    operation: Operation,
    points: Vec<SpeedupPoint>,
}

impl ChartGroup {
    #[must_use]
    pub fn new(configuration: &str, operation: Operation, mut points: Vec<SpeedupPoint>) -> Self {
        points.sort_by_key(|p| p.message_size);
        Self {
            configuration: configuration.to_string(),
            operation,
            points,
        }
    }

    #[must_use]
    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    #[must_use]
    pub fn points(&self) -> &[SpeedupPoint] {
        &self.points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Default)]
struct Series {
    baseline: BTreeMap<u64, f64>,
    candidate: BTreeMap<u64, f64>,
}

/// All groups found in a set of records.
#[derive(Debug, Default)]
pub struct Speedups {
    groups: BTreeMap<GroupKey, ChartGroup>,
    warnings: Vec<Warning>,
}

impl Speedups {
    #[must_use]
    pub fn from_records(records: &[MeasurementRecord]) -> Self {
        let mut series: BTreeMap<GroupKey, Series> = BTreeMap::new();
        for record in records {
            let key = (
                record.configuration().to_string(),
                record.operation().clone(),
            );
            let entry = series.entry(key).or_default();
            let side = match record.library() {
                Library::Baseline => &mut entry.baseline,
                Library::Candidate => &mut entry.candidate,
            };
            side.insert(record.message_size(), record.time_us());
        }

        let mut speedups = Speedups::default();
        for ((configuration, operation), series) in series {
            let points = speedups.pair(&configuration, &operation, &series);
            let group = ChartGroup::new(&configuration, operation.clone(), points);
            speedups.groups.insert((configuration, operation), group);
        }
        speedups
    }

    fn pair(
        &mut self,
        configuration: &str,
        operation: &Operation,
        series: &Series,
    ) -> Vec<SpeedupPoint> {
        let missing = if series.baseline.is_empty() {
            Some(Library::Baseline)
        } else if series.candidate.is_empty() {
            Some(Library::Candidate)
        } else {
            None
        };
        if let Some(missing) = missing {
            self.warnings.push(Warning::MissingSeries {
                configuration: configuration.to_string(),
                operation: operation.clone(),
                missing,
            });
            return Vec::new();
        }

        let sizes: BTreeSet<u64> = series
            .baseline
            .keys()
            .chain(series.candidate.keys())
            .copied()
            .collect();

        let mut points = Vec::new();
        for message_size in sizes {
            let unmatched = |present_in| Warning::UnmatchedPoint {
                configuration: configuration.to_string(),
                operation: operation.clone(),
                message_size,
                present_in,
            };
            match (
                series.baseline.get(&message_size),
                series.candidate.get(&message_size),
            ) {
                (Some(&baseline_us), Some(&candidate_us)) => {
                    match speedup(baseline_us, candidate_us) {
                        Some(speedup) => points.push(SpeedupPoint {
                            message_size,
                            speedup,
                        }),
                        None => self.warnings.push(Warning::InvalidPoint {
                            configuration: configuration.to_string(),
                            operation: operation.clone(),
                            message_size,
                        }),
                    }
                }
                (Some(_), None) => self.warnings.push(unmatched(Library::Baseline)),
                (None, Some(_)) => self.warnings.push(unmatched(Library::Candidate)),
                (None, None) => {}
            }
        }
        points
    }

    /// The group of a (configuration, operation), if any data exists for it.
    #[must_use]
    pub fn group(&self, configuration: &str, operation: &Operation) -> Option<&ChartGroup> {
        self.groups
            .get(&(configuration.to_string(), operation.clone()))
    }

    /// Sorted configurations that have any data.
    #[must_use]
    pub fn configurations(&self) -> Vec<String> {
        let configurations: BTreeSet<&String> = self.groups.keys().map(|(c, _)| c).collect();
        configurations.into_iter().cloned().collect()
    }

    /// Sorted operations that have any data.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        let operations: BTreeSet<&Operation> = self.groups.keys().map(|(_, o)| o).collect();
        operations.into_iter().cloned().collect()
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn allreduce() -> Operation {
        "Allreduce-inplace".parse().unwrap()
    }

    fn record(library: Library, size: u64, time: f64) -> MeasurementRecord {
        MeasurementRecord::new("1xNDv4", allreduce(), library, size, time)
    }

    #[test]
    fn speedup_is_baseline_over_candidate() {
        assert_relative_eq!(speedup(10.0, 5.0).unwrap(), 2.0);
        assert_relative_eq!(speedup(3.0, 4.0).unwrap(), 0.75);
        assert_eq!(speedup(10.0, 0.0), None);
        assert_eq!(speedup(-1.0, 5.0), None);
        assert_eq!(speedup(f64::NAN, 5.0), None);
    }

    #[test]
    fn invalid_times_are_warned() {
        let speedups = Speedups::from_records(&[
            record(Library::Baseline, 1024, 10.0),
            record(Library::Candidate, 1024, 0.0),
            record(Library::Baseline, 2048, 10.0),
            record(Library::Candidate, 2048, 5.0),
        ]);

        let group = speedups.group("1xNDv4", &allreduce()).unwrap();
        assert_eq!(group.points().len(), 1);
        assert_eq!(group.points()[0].message_size, 2048);
        assert_eq!(
            speedups.warnings(),
            [Warning::InvalidPoint {
                configuration: "1xNDv4".to_string(),
                operation: allreduce(),
                message_size: 1024,
            }]
        );
    }

    #[test]
    fn missing_series_is_a_single_warning() {
        let speedups = Speedups::from_records(&[
            record(Library::Candidate, 1024, 5.0),
            record(Library::Candidate, 2048, 5.0),
        ]);

        assert!(speedups.group("1xNDv4", &allreduce()).unwrap().is_empty());
        assert_eq!(
            speedups.warnings(),
            [Warning::MissingSeries {
                configuration: "1xNDv4".to_string(),
                operation: allreduce(),
                missing: Library::Baseline,
            }]
        );
    }

    #[test]
    fn points_are_ordered_by_size() {
        let speedups = Speedups::from_records(&[
            record(Library::Baseline, 4096, 8.0),
            record(Library::Candidate, 4096, 4.0),
            record(Library::Baseline, 1024, 3.0),
            record(Library::Candidate, 1024, 1.0),
        ]);

        let sizes: Vec<u64> = speedups
            .group("1xNDv4", &allreduce())
            .unwrap()
            .points()
            .iter()
            .map(|p| p.message_size)
            .collect();
        assert_eq!(sizes, [1024, 4096]);
    }

    #[test]
    fn warning_messages() {
        let warning = Warning::UnmatchedPoint {
            configuration: "1xNDv4".to_string(),
            operation: allreduce(),
            message_size: 4096,
            present_in: Library::Candidate,
        };
        assert_eq!(
            warning.to_string(),
            "1xNDv4/Allreduce-inplace: message size 4096 only measured by the candidate"
        );
    }
}
