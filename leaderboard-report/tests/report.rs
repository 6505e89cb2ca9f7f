// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::types::{Library, MeasurementRecord, Operation};
use leaderboard_report::chart::ChartRenderer;
use leaderboard_report::config::{Mode, ReportConfig};
use leaderboard_report::report::ReportGenerator;
use leaderboard_report::speedup::{ChartGroup, Warning};

/// Keeps what would have been drawn instead of writing images.
#[derive(Default)]
struct RecordingRenderer {
    rendered: Vec<(ChartGroup, PathBuf)>,
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, group: &ChartGroup, path: &Path) -> LeaderboardResult<()> {
        self.rendered.push((group.clone(), path.to_path_buf()));
        Ok(())
    }
}

struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    fn render(&mut self, _group: &ChartGroup, path: &Path) -> LeaderboardResult<()> {
        Err(LeaderboardError::Render(format!("{}: disk full", path.display())))
    }
}

fn op(name: &str) -> Operation {
    name.parse().unwrap()
}

fn record(config: &str, operation: &str, library: Library, size: u64, time: f64) -> MeasurementRecord {
    MeasurementRecord::new(config, op(operation), library, size, time)
}

const KB: u64 = 1024;

fn example_records() -> Vec<MeasurementRecord> {
    vec![
        record("1xNDv4", "Allgather", Library::Baseline, KB, 10.0),
        record("1xNDv4", "Allgather", Library::Candidate, KB, 5.0),
        record("1xNDv4", "Allgather", Library::Baseline, 2 * KB, 20.0),
        record("1xNDv4", "Allgather", Library::Candidate, 2 * KB, 5.0),
        record("1xNDv4", "Allgather", Library::Candidate, 4 * KB, 5.0),
        record("2xNDv4", "Allreduce", Library::Baseline, KB, 9.0),
        record("2xNDv4", "Allreduce", Library::Candidate, KB, 3.0),
    ]
}

#[test]
fn speedups_are_baseline_over_candidate() {
    let config = ReportConfig::default();
    let mut renderer = RecordingRenderer::default();
    ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut renderer)
        .unwrap();

    let (group, _) = &renderer.rendered[0];
    assert_eq!(group.configuration(), "1xNDv4");
    let points = group.points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].message_size, KB);
    assert_relative_eq!(points[0].speedup, 2.0);
    assert_eq!(points[1].message_size, 2 * KB);
    assert_relative_eq!(points[1].speedup, 4.0);
}

#[test]
fn unmatched_point_is_excluded_and_warned() {
    let config = ReportConfig::default();
    let mut renderer = RecordingRenderer::default();
    let report = ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut renderer)
        .unwrap();

    let (group, _) = &renderer.rendered[0];
    assert!(group.points().iter().all(|p| p.message_size != 4 * KB));
    assert!(group.points().iter().all(|p| p.speedup.is_finite() && p.speedup > 0.0));
    assert!(report.warnings().contains(&Warning::UnmatchedPoint {
        configuration: "1xNDv4".to_string(),
        operation: op("Allgather"),
        message_size: 4 * KB,
        present_in: Library::Candidate,
    }));
}

#[test]
fn discovered_table_layout() {
    let config = ReportConfig::default();
    let mut renderer = RecordingRenderer::default();
    let report = ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut renderer)
        .unwrap();

    let table = report.table();
    assert_eq!(table.headers(), ["Configuration", "Allgather", "Allreduce"]);
    assert_eq!(table.rows().len(), 2);
    assert_eq!(
        table.cell(0, 1),
        Some("![Speedup for Allgather on 1xNDv4](graphs/1xNDv4_Allgather_thumbnail.png)")
    );
    assert_eq!(table.cell(0, 2), Some(""));
    assert_eq!(table.cell(1, 1), Some(""));
    assert_eq!(
        table.cell(1, 2),
        Some("![Speedup for Allreduce on 2xNDv4](graphs/2xNDv4_Allreduce_thumbnail.png)")
    );
    assert_eq!(
        report.charts(),
        [
            PathBuf::from("graphs/1xNDv4_Allgather_thumbnail.png"),
            PathBuf::from("graphs/2xNDv4_Allreduce_thumbnail.png"),
        ]
    );
}

#[test]
fn declared_cell_without_records_gets_placeholder() {
    let config = ReportConfig {
        configurations: Some(vec!["1xNDv4".to_string()]),
        operations: Some(vec!["Allreduce".to_string()]),
        placeholder: "N/A".to_string(),
        ..Default::default()
    };
    let mut renderer = RecordingRenderer::default();
    let report = ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut renderer)
        .unwrap();

    assert!(renderer.rendered.is_empty());
    assert_eq!(report.table().headers(), ["Configuration", "Allreduce"]);
    assert_eq!(report.table().cell(0, 0), Some("1xNDv4"));
    assert_eq!(report.table().cell(0, 1), Some("N/A"));
    assert!(report.warnings().contains(&Warning::EmptyGroup {
        configuration: "1xNDv4".to_string(),
        operation: op("Allreduce"),
    }));
}

#[test]
fn groups_outside_declared_layout_are_not_rendered() {
    let config = ReportConfig {
        configurations: Some(vec!["2xNDv4".to_string()]),
        ..Default::default()
    };
    let mut renderer = RecordingRenderer::default();
    let report = ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut renderer)
        .unwrap();

    let rendered: Vec<&str> = renderer
        .rendered
        .iter()
        .map(|(group, _)| group.configuration())
        .collect();
    assert_eq!(rendered, ["2xNDv4"]);
    assert_eq!(report.table().rows().len(), 1);
    assert_eq!(report.charts().len(), 1);
    assert!(!report.warnings().contains(&Warning::EmptyGroup {
        configuration: "1xNDv4".to_string(),
        operation: op("Allgather"),
    }));
}

#[test]
fn no_records_at_all_still_completes() {
    let config = ReportConfig {
        configurations: Some(vec!["1xNDv4".to_string()]),
        operations: Some(vec!["Allreduce".to_string()]),
        ..Default::default()
    };
    let mut renderer = RecordingRenderer::default();
    let report = ReportGenerator::new(&config, Mode::Development)
        .generate(&[], &mut renderer)
        .unwrap();

    assert_eq!(report.table().cell(0, 1), Some(""));
    assert_eq!(report.warnings().len(), 1);
}

#[test]
fn generation_is_idempotent() {
    let config = ReportConfig::default();
    let mode = Mode::Production {
        timestamp: 1700000000,
    };

    let mut first = RecordingRenderer::default();
    let report_a = ReportGenerator::new(&config, mode)
        .generate(&example_records(), &mut first)
        .unwrap();

    let mut reversed = example_records();
    reversed.reverse();
    let mut second = RecordingRenderer::default();
    let report_b = ReportGenerator::new(&config, mode)
        .generate(&reversed, &mut second)
        .unwrap();

    assert_eq!(report_a.table().to_string(), report_b.table().to_string());
    assert_eq!(first.rendered, second.rendered);
    assert!(
        report_a.table().to_string().contains("1xNDv4_Allgather_thumbnail_1700000000.svg")
    );
}

#[test]
fn render_failure_is_fatal() {
    let config = ReportConfig::default();
    let err = ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut FailingRenderer)
        .unwrap_err();
    assert!(matches!(err, LeaderboardError::Render(_)));
}

#[test]
fn table_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig::default();
    let mut renderer = RecordingRenderer::default();
    let report = ReportGenerator::new(&config, Mode::Development)
        .generate(&example_records(), &mut renderer)
        .unwrap();

    let path = dir.path().join("site").join("speedups_table.md");
    report.write_table(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, report.table().to_string());
    assert!(written.starts_with("| Configuration |"));
}
