// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Configuration of the graph generator.
//!
//! Values are merged from (lowest to highest priority):
//!  - the defaults in [ReportConfig::default()],
//!  - a TOML file (`leaderboard.toml` unless `--conf-file` is given),
//!  - environment variables prefixed with `LEADERBOARD_` (use `__` to reach
//!    nested keys, e.g. `LEADERBOARD_CHART__WIDTH_PX=800`),
//!  - command-line overrides applied by the binary.
//!
//! For example:
//! ```toml
//! candidate_name = "msccl"
//! baseline_name = "nccl"
//! configurations = ["1xNDv4", "2xNDv4"]
//! operations = ["Allreduce-inplace", "Allgather-inplace"]
//!
//! [chart]
//! width_px = 800
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::types::Operation;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONF_FILE: &str = "leaderboard.toml";
const ENV_PREFIX: &str = "LEADERBOARD_";

/// Look of the rendered thumbnails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Image width in pixels.
    pub width_px: u32,

    /// Width divided by height.
    pub aspect_ratio: f64,

    pub font_family: String,
    pub font_size: u32,

    /// Colour of the speedup line as `#RRGGBB`.
    pub line_color: String,
    pub line_width: u32,

    /// Colour of the axes and of the `speedup = 1` reference line.
    pub secondary_color: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width_px: 1200,
            aspect_ratio: 4.0 / 3.0,
            font_family: "sans-serif".to_string(),
            font_size: 40,
            line_color: "#FF0000".to_string(),
            line_width: 3,
            secondary_color: "#CED0D1".to_string(),
        }
    }
}

impl ChartStyle {
    /// Image size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        let height = (f64::from(self.width_px) / self.aspect_ratio).round() as u32;
        (self.width_px, height)
    }
}

/// Everything the graph generator can be configured with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Log file stem of the library being evaluated.
    pub candidate_name: String,

    /// Log file stem of the library it is compared against.
    pub baseline_name: String,

    /// Root of the `<configuration>/<operation>/<library>.txt` tree.
    pub data_dir: PathBuf,

    /// Where the thumbnails are written.
    pub graphs_dir: PathBuf,

    /// Where the markdown table is written.
    pub table_path: PathBuf,

    /// Rows of the table. All configurations found in the data if not set.
    pub configurations: Option<Vec<String>>,

    /// Columns of the table. All operations found in the data if not set.
    pub operations: Option<Vec<String>>,

    /// Cell contents used where there is no graph.
    pub placeholder: String,

    pub chart: ChartStyle,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            candidate_name: "msccl".to_string(),
            baseline_name: "nccl".to_string(),
            data_dir: PathBuf::from("data"),
            graphs_dir: PathBuf::from("graphs"),
            table_path: PathBuf::from("speedups_table.md"),
            configurations: None,
            operations: None,
            placeholder: String::new(),
            chart: ChartStyle::default(),
        }
    }
}

impl ReportConfig {
    /// Build the layered configuration sources.
    #[must_use]
    pub fn figment(conf_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ReportConfig::default()))
            .merge(Toml::file(conf_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate the configuration.
    pub fn load(conf_file: &Path) -> LeaderboardResult<Self> {
        let config: ReportConfig = Self::figment(conf_file)
            .extract()
            .map_err(|e| LeaderboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LeaderboardResult<()> {
        if self.candidate_name.is_empty() || self.baseline_name.is_empty() {
            return Err(LeaderboardError::Config(
                "library names must not be empty".to_string(),
            ));
        }
        if self.candidate_name == self.baseline_name {
            return Err(LeaderboardError::Config(format!(
                "candidate and baseline are both '{}'",
                self.candidate_name
            )));
        }
        let aspect_ratio = self.chart.aspect_ratio;
        if self.chart.width_px == 0 || aspect_ratio.is_nan() || aspect_ratio <= 0.0 {
            return Err(LeaderboardError::Config(format!(
                "invalid chart size {} px with aspect ratio {}",
                self.chart.width_px, self.chart.aspect_ratio
            )));
        }
        parse_hex_color(&self.chart.line_color)?;
        parse_hex_color(&self.chart.secondary_color)?;
        self.declared_operations()?;
        Ok(())
    }

    /// The operations listed in the configuration, if any.
    pub fn declared_operations(&self) -> LeaderboardResult<Option<Vec<Operation>>> {
        let Some(operations) = &self.operations else {
            return Ok(None);
        };
        let mut parsed = Vec::with_capacity(operations.len());
        for operation in operations {
            let operation = operation
                .parse::<Operation>()
                .map_err(|e| LeaderboardError::Config(format!("operations: {e}")))?;
            parsed.push(operation);
        }
        Ok(Some(parsed))
    }
}

/// Parse a `#RRGGBB` colour.
pub fn parse_hex_color(color: &str) -> LeaderboardResult<(u8, u8, u8)> {
    let invalid = || LeaderboardError::Config(format!("'{color}' is not a #RRGGBB colour"));
    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// File type of the rendered thumbnails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Which pass is being run.
///
/// The production pass writes SVGs whose names carry a timestamp so that the
/// published site never serves a stale cached image. The development pass
/// writes PNGs under stable names for quick previews.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Production { timestamp: u64 },
    Development,
}

impl Mode {
    /// A production pass stamped with the current time.
    #[must_use]
    pub fn production_now() -> Self {
        let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        Mode::Production { timestamp }
    }

    #[must_use]
    pub fn file_suffix(&self) -> String {
        match self {
            Mode::Production { timestamp } => format!("_{timestamp}"),
            Mode::Development => String::new(),
        }
    }

    #[must_use]
    pub fn image_format(&self) -> ImageFormat {
        match self {
            Mode::Production { .. } => ImageFormat::Svg,
            Mode::Development => ImageFormat::Png,
        }
    }
}
