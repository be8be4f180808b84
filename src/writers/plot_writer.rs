use crate::error::{ProcessingError, Result};
use crate::models::{LoggerMetadata, SeriesSummary, TimeSeries};
use crate::utils::constants::{DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH};
use chrono::{NaiveDateTime, TimeDelta};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::{info, warn};

const FONT: &str = "sans-serif";
const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 60;
const Y_LABEL_AREA: u32 = 80;

fn render_err<E: std::fmt::Display>(e: E) -> ProcessingError {
    ProcessingError::Render(e.to_string())
}

/// Renders one logger's merged series to a PNG
pub struct PlotWriter {
    width: u32,
    height: u32,
}

impl PlotWriter {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
        }
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Draw the series with a title, optional metadata subtitle and a
    /// min/max/avg box. Returns `Ok(false)` without touching the disk when
    /// the series is empty.
    pub fn write_plot(
        &self,
        series: &TimeSeries,
        title: &str,
        metadata: Option<&LoggerMetadata>,
        output_path: &Path,
    ) -> Result<bool> {
        let Some(summary) = series.summary() else {
            let name = output_path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
            warn!("No data points available for {}, skipping plot", name);
            return Ok(false);
        };

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let root = BitMapBackend::new(output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut area = root.titled(title, (FONT, 30)).map_err(render_err)?;
        if let Some(subtitle) = metadata.and_then(LoggerMetadata::location_summary) {
            area = area.titled(&subtitle, (FONT, 20)).map_err(render_err)?;
        }

        let (x_range, y_range) = axis_ranges(&summary);
        let mut chart = ChartBuilder::on(&area)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(RangedDateTime::from(x_range), y_range)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Timestamp")
            .y_desc("Temperature (°C)")
            .x_labels(10)
            .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%Y-%m-%d").to_string())
            .light_line_style(RGBColor(235, 235, 235).stroke_width(1))
            .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                series
                    .samples()
                    .iter()
                    .filter(|s| s.temperature.is_finite())
                    .map(|s| (s.timestamp, s.temperature)),
                RGBColor(31, 119, 180).stroke_width(1),
            ))
            .map_err(render_err)?;

        self.draw_summary_box(&area, &summary)?;

        root.present().map_err(render_err)?;
        info!("Wrote plot {}", output_path.display());
        Ok(true)
    }

    fn draw_summary_box<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, plotters::coord::Shift>,
        summary: &SeriesSummary,
    ) -> Result<()> {
        let lines = summary_lines(summary);
        let left = (MARGIN + Y_LABEL_AREA + 12) as i32;
        let top = (MARGIN + 12) as i32;
        let line_height = 22;
        let box_height = line_height * lines.len() as i32 + 12;

        area.draw(&Rectangle::new(
            [(left, top), (left + 150, top + box_height)],
            WHITE.mix(0.8).filled(),
        ))
        .map_err(render_err)?;
        area.draw(&Rectangle::new(
            [(left, top), (left + 150, top + box_height)],
            BLACK.mix(0.5).stroke_width(1),
        ))
        .map_err(render_err)?;

        for (i, line) in lines.iter().enumerate() {
            area.draw(&Text::new(
                line.as_str(),
                (left + 10, top + 8 + line_height * i as i32),
                (FONT, 18),
            ))
            .map_err(render_err)?;
        }

        Ok(())
    }
}

impl Default for PlotWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Annotation text for the statistics box
pub fn summary_lines(summary: &SeriesSummary) -> Vec<String> {
    vec![
        format!("Min: {:.1}°C", summary.min),
        format!("Max: {:.1}°C", summary.max),
        format!("Avg: {:.1}°C", summary.avg),
    ]
}

/// Axis extents with a little headroom; degenerate ranges are widened
pub fn axis_ranges(summary: &SeriesSummary) -> (Range<NaiveDateTime>, Range<f64>) {
    let start = summary.start;
    let end = if summary.end > start {
        summary.end
    } else {
        start + TimeDelta::hours(1)
    };

    let (min, max) = if summary.min.is_finite() && summary.max.is_finite() {
        (summary.min, summary.max)
    } else {
        (-1.0, 1.0)
    };

    let padding = if max > min { (max - min) * 0.05 } else { 1.0 };
    (start..end, (min - padding)..(max + padding))
}
