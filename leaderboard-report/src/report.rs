// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build the leaderboard table and its graphs.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::types::{MeasurementRecord, Operation};
use log::{info, warn};

use crate::chart::ChartRenderer;
use crate::config::{Mode, ReportConfig};
use crate::speedup::{Speedups, Warning};
use crate::table::MarkdownTable;

const CONFIGURATION_HEADER: &str = "Configuration";

/// The outcome of a report generation.
#[derive(Debug)]
pub struct Report {
    table: MarkdownTable,
    charts: Vec<PathBuf>,
    warnings: Vec<Warning>,
}

impl Report {
    #[must_use]
    pub fn table(&self) -> &MarkdownTable {
        &self.table
    }

    /// Paths of every rendered chart, in table order.
    #[must_use]
    pub fn charts(&self) -> &[PathBuf] {
        &self.charts
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn write_table(&self, path: &Path) -> LeaderboardResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| LeaderboardError::io(parent, e))?;
        }
        info!("Writing {}", path.display());
        fs::write(path, self.table.to_string()).map_err(|e| LeaderboardError::io(path, e))
    }
}

pub struct ReportGenerator<'a> {
    config: &'a ReportConfig,
    mode: Mode,
}

impl<'a> ReportGenerator<'a> {
    #[must_use]
    pub fn new(config: &'a ReportConfig, mode: Mode) -> Self {
        Self { config, mode }
    }

    /// Where the chart of a (configuration, operation) is written.
    #[must_use]
    pub fn chart_path(&self, configuration: &str, operation: &Operation) -> PathBuf {
        self.config.graphs_dir.join(format!(
            "{configuration}_{operation}_thumbnail{}.{}",
            self.mode.file_suffix(),
            self.mode.image_format().extension()
        ))
    }

    fn configurations(&self, speedups: &Speedups) -> Vec<String> {
        match &self.config.configurations {
            Some(declared) => declared
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            None => speedups.configurations(),
        }
    }

    fn operations(&self, speedups: &Speedups) -> LeaderboardResult<Vec<Operation>> {
        Ok(match self.config.declared_operations()? {
            Some(declared) => declared
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            None => speedups.operations(),
        })
    }

    /// Render a chart for every non-empty cell and build the table.
    ///
    /// Cells without any speedup point get the configured placeholder and an
    /// [EmptyGroup](Warning::EmptyGroup) warning. Failing to render a chart
    /// is fatal.
    pub fn generate(
        &self,
        records: &[MeasurementRecord],
        renderer: &mut dyn ChartRenderer,
    ) -> LeaderboardResult<Report> {
        let speedups = Speedups::from_records(records);
        let configurations = self.configurations(&speedups);
        let operations = self.operations(&speedups)?;

        let mut headers = vec![CONFIGURATION_HEADER.to_string()];
        headers.extend(operations.iter().map(|o| o.collective().to_string()));
        let mut table = MarkdownTable::new(headers);

        let mut warnings = speedups.warnings().to_vec();
        let mut charts = Vec::new();
        for configuration in &configurations {
            let mut row = vec![configuration.clone()];
            for operation in &operations {
                match speedups
                    .group(configuration, operation)
                    .filter(|group| !group.is_empty())
                {
                    Some(group) => {
                        let path = self.chart_path(configuration, operation);
                        renderer.render(group, &path)?;
                        row.push(format!(
                            "![Speedup for {operation} on {configuration}]({})",
                            path.display()
                        ));
                        charts.push(path);
                    }
                    None => {
                        warnings.push(Warning::EmptyGroup {
                            configuration: configuration.clone(),
                            operation: operation.clone(),
                        });
                        row.push(self.config.placeholder.clone());
                    }
                }
            }
            table.push_row(row);
        }

        for warning in &warnings {
            warn!("{warning}");
        }

        Ok(Report {
            table,
            charts,
            warnings,
        })
    }
}
