// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Draw the speedup thumbnails.
//!
//! Each thumbnail plots the speedup of one [ChartGroup] against the message
//! size (log scale) with a dashed reference line at a speedup of 1.

use std::fs;
use std::path::Path;

use byte_unit::{Byte, UnitType};
use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::config::{ChartStyle, ImageFormat, parse_hex_color};
use crate::speedup::{ChartGroup, SpeedupPoint};

const MARGIN_PX: u32 = 10;
const DASH_SIZE_PX: u32 = 12;
const DASH_SPACING_PX: u32 = 8;

/// Something that can turn a group into an image file.
pub trait ChartRenderer {
    fn render(&mut self, group: &ChartGroup, path: &Path) -> LeaderboardResult<()>;
}

/// Format a message size with binary units, e.g. `1 KiB` or `1.5 MiB`.
#[must_use]
pub fn format_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes < 1.0 {
        return String::new();
    }
    let adjusted = Byte::from_u64(bytes.round() as u64).get_appropriate_unit(UnitType::Binary);
    let value = adjusted.get_value();
    if (value - value.round()).abs() < 0.05 {
        format!("{value:.0} {}", adjusted.get_unit())
    } else {
        format!("{value:.1} {}", adjusted.get_unit())
    }
}

/// The x range of a group, padded so single points and line ends stay
/// visible on a log axis.
fn size_range(points: &[SpeedupPoint]) -> (f64, f64) {
    let min = points.iter().map(|p| p.message_size).min().unwrap_or(1).max(1);
    let max = points.iter().map(|p| p.message_size).max().unwrap_or(1).max(min);
    (min as f64 / 1.5, max as f64 * 1.5)
}

/// The y range of a group, always including the reference line.
fn speedup_range(points: &[SpeedupPoint]) -> (f64, f64) {
    let min = points.iter().map(|p| p.speedup).fold(1.0_f64, f64::min);
    let max = points.iter().map(|p| p.speedup).fold(1.0_f64, f64::max);
    let pad = ((max - min) * 0.1).max(0.05);
    ((min - pad).max(0.0), max + pad)
}

/// Renders with `plotters`.
pub struct PlottersRenderer {
    style: ChartStyle,
    format: ImageFormat,
    line_color: RGBColor,
    secondary_color: RGBColor,
}

impl PlottersRenderer {
    pub fn new(style: &ChartStyle, format: ImageFormat) -> LeaderboardResult<Self> {
        let (r, g, b) = parse_hex_color(&style.line_color)?;
        let line_color = RGBColor(r, g, b);
        let (r, g, b) = parse_hex_color(&style.secondary_color)?;
        let secondary_color = RGBColor(r, g, b);
        Ok(Self {
            style: style.clone(),
            format,
            line_color,
            secondary_color,
        })
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        group: &ChartGroup,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let points = group.points();
        let (min_size, max_size) = size_range(points);
        let (min_speedup, max_speedup) = speedup_range(points);
        let font_size = self.style.font_size;
        let label_style = (self.style.font_family.as_str(), font_size)
            .into_font()
            .color(&BLACK);

        let mut chart = ChartBuilder::on(root)
            .margin(MARGIN_PX)
            .x_label_area_size(font_size * 2)
            .y_label_area_size(font_size * 3)
            .build_cartesian_2d(
                (min_size..max_size).log_scale(),
                min_speedup..max_speedup,
            )?;

        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(self.secondary_color)
            .label_style(label_style)
            .x_label_formatter(&|x| format_size(*x))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .draw()?;

        chart.draw_series(DashedLineSeries::new(
            vec![(min_size, 1.0), (max_size, 1.0)],
            DASH_SIZE_PX,
            DASH_SPACING_PX,
            self.secondary_color.stroke_width(2),
        ))?;

        chart.draw_series(LineSeries::new(
            points
                .iter()
                .map(|p| (p.message_size as f64, p.speedup)),
            self.line_color.stroke_width(self.style.line_width),
        ))?;

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&mut self, group: &ChartGroup, path: &Path) -> LeaderboardResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LeaderboardError::io(parent, e))?;
        }

        let render_error = |e: String| {
            LeaderboardError::Render(format!("{}: {e}", path.display()))
        };
        let size = self.style.size();
        info!("Writing {}", path.display());
        match self.format {
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                self.draw(&root, group).map_err(|e| render_error(e.to_string()))
            }
            ImageFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                self.draw(&root, group).map_err(|e| render_error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> ChartGroup {
        let points = [(1024, 1.2), (2048, 0.9), (1048576, 2.5)]
            .into_iter()
            .map(|(message_size, speedup)| SpeedupPoint {
                message_size,
                speedup,
            })
            .collect();
        ChartGroup::new("1xNDv4", "Allreduce-inplace".parse().unwrap(), points)
    }

    fn render(format: ImageFormat) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("graphs")
            .join(format!("1xNDv4_Allreduce-inplace_thumbnail.{}", format.extension()));

        let mut renderer = PlottersRenderer::new(&ChartStyle::default(), format).unwrap();
        renderer.render(&group(), &path).unwrap();

        let written = fs::metadata(&path).unwrap();
        assert!(written.is_file());
        assert!(written.len() > 0);
    }

    #[test]
    fn renders_svg() {
        render(ImageFormat::Svg);
    }

    #[test]
    fn renders_png() {
        render(ImageFormat::Png);
    }

    #[test]
    fn invalid_colour_is_rejected() {
        let style = ChartStyle {
            line_color: "blue".to_string(),
            ..ChartStyle::default()
        };
        assert!(matches!(
            PlottersRenderer::new(&style, ImageFormat::Svg),
            Err(LeaderboardError::Config(_))
        ));
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(512.0), "512 B");
        assert_eq!(format_size(1024.0), "1 KiB");
        assert_eq!(format_size(1536.0), "1.5 KiB");
        assert_eq!(format_size(268435456.0), "256 MiB");
        assert_eq!(format_size(0.5), "");
    }

    #[test]
    fn ranges_include_reference_line() {
        let points = [
            SpeedupPoint {
                message_size: 1024,
                speedup: 1.5,
            },
            SpeedupPoint {
                message_size: 4096,
                speedup: 2.5,
            },
        ];
        let (low, high) = speedup_range(&points);
        assert!(low < 1.0);
        assert!(high > 2.5);

        let (min_size, max_size) = size_range(&points);
        assert!(min_size < 1024.0);
        assert!(max_size > 4096.0);
    }

    #[test]
    fn single_point_range_is_not_degenerate() {
        let points = [SpeedupPoint {
            message_size: 1024,
            speedup: 1.0,
        }];
        let (min_size, max_size) = size_range(&points);
        assert!(min_size < max_size);
        let (low, high) = speedup_range(&points);
        assert!(low < high);
    }
}
