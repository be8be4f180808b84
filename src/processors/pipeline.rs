use crate::error::Result;
use crate::models::LoggerRecord;
use crate::processors::{resolve_title, FileGrouper, SeriesMerger};
use crate::readers::{find_csv_files, find_plot_files, MetadataMap, MetadataReader};
use crate::settings::Settings;
use crate::utils::filename::plot_file_name;
use crate::utils::progress::ProgressReporter;
use crate::writers::{MapWriter, PlotWriter};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Outcome of a plot run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotReport {
    pub groups: usize,
    pub plots_written: usize,
    pub empty_groups: usize,
    pub failed: usize,
}

/// Outcome of a map run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapReport {
    pub plot: Option<PlotReport>,
    pub markers: usize,
    pub map_written: bool,
}

/// Drives the plot and map stages one logger group at a time
pub struct LoggerPipeline {
    settings: Settings,
    quiet: bool,
}

impl LoggerPipeline {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            quiet: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Metadata for plot annotation. Rows keep `location = None` when their
    /// coordinates are missing or invalid.
    pub fn load_plot_metadata(&self, data_root: &Path, metadata_path: Option<&Path>) -> MetadataMap {
        let reader = MetadataReader::with_require_coordinates(false);
        match metadata_path.filter(|p| p.exists()) {
            Some(path) => reader.load(path),
            None => reader.load_all(data_root),
        }
    }

    /// Metadata for the map: located rows only, searched across the usual
    /// data roots until one of them yields anything.
    pub fn load_map_metadata(
        &self,
        data_root: &Path,
        plots_dir: &Path,
        metadata_path: Option<&Path>,
    ) -> MetadataMap {
        let reader = MetadataReader::new();

        if let Some(path) = metadata_path {
            if path.exists() {
                return reader.load(path);
            }
            warn!("Metadata file not found: {}", path.display());
        }

        first_available(&reader, &candidate_roots(data_root, plots_dir))
    }

    /// Parse, merge and title one group
    pub fn process_group(
        &self,
        logger_id: &str,
        files: &[PathBuf],
        metadata: &MetadataMap,
    ) -> LoggerRecord {
        let series = SeriesMerger::new(self.settings.clone()).merge(files);
        let (title, matched) = resolve_title(logger_id, files, metadata);

        LoggerRecord::new(
            logger_id.to_string(),
            files.to_vec(),
            series,
            matched.cloned(),
            title,
        )
    }

    /// Write one combined plot per logger found under `data_root`
    pub fn run_plots(
        &self,
        data_root: &Path,
        output_dir: &Path,
        metadata_path: Option<&Path>,
    ) -> Result<PlotReport> {
        let mut report = PlotReport::default();

        let csv_files = find_csv_files(data_root);
        if csv_files.is_empty() {
            error!("No CSV files found in {}", data_root.display());
            return Ok(report);
        }
        info!("Found {} CSV files", csv_files.len());

        let metadata = self.load_plot_metadata(data_root, metadata_path);
        let groups = FileGrouper::group(&csv_files);
        report.groups = groups.len();

        std::fs::create_dir_all(output_dir)?;
        let writer = PlotWriter::with_size(self.settings.plot_width, self.settings.plot_height);
        let progress = ProgressReporter::new(groups.len() as u64, "Plotting loggers...", self.quiet);

        for (logger_id, files) in &groups {
            info!("Processing logger {} ({} files)", logger_id, files.len());
            progress.set_message(&format!("Logger {}", logger_id));

            let record = self.process_group(logger_id, files, &metadata);
            if !record.has_data() {
                warn!("No valid data for logger {}", logger_id);
                report.empty_groups += 1;
                progress.increment(1);
                continue;
            }

            let output_path = output_dir.join(plot_file_name(logger_id));
            match writer.write_plot(
                &record.series,
                &record.title,
                record.metadata.as_ref(),
                &output_path,
            ) {
                Ok(true) => report.plots_written += 1,
                Ok(false) => report.empty_groups += 1,
                Err(e) => {
                    error!("Failed to plot logger {}: {}", logger_id, e);
                    report.failed += 1;
                }
            }
            progress.increment(1);
        }

        progress.finish_with_message(&format!("Wrote {} plots", report.plots_written));
        info!(
            "Plotting complete: {} plots written, {} groups without data, {} failures",
            report.plots_written, report.empty_groups, report.failed
        );
        Ok(report)
    }

    /// Optionally refresh plots, then write the logger map
    pub fn run_map(
        &self,
        data_root: &Path,
        plots_dir: &Path,
        output: &Path,
        metadata_path: Option<&Path>,
        skip_plots: bool,
    ) -> Result<MapReport> {
        let mut report = MapReport::default();

        if !skip_plots {
            info!("Regenerating plots before building the map");
            report.plot = Some(self.run_plots(data_root, plots_dir, metadata_path)?);
        }

        let metadata = self.load_map_metadata(data_root, plots_dir, metadata_path);
        if metadata.is_empty() {
            error!("No metadata found, map not written");
            return Ok(report);
        }

        let plot_files = find_plot_files(plots_dir);
        info!("Found {} plot files", plot_files.len());

        report.markers = MapWriter::new().write_map(&metadata, &plot_files, output)?;
        report.map_written = true;
        Ok(report)
    }
}

fn first_available(reader: &MetadataReader, roots: &[PathBuf]) -> MetadataMap {
    for root in roots {
        let metadata = reader.load_all(root);
        if !metadata.is_empty() {
            info!("Using metadata from {}", root.display());
            return metadata;
        }
    }
    MetadataMap::new()
}

fn candidate_roots(data_root: &Path, plots_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![data_root.to_path_buf()];
    if let Some(parent) = plots_dir.parent() {
        roots.push(parent.join("data"));
    }
    roots.push(PathBuf::from("data"));
    roots.push(PathBuf::from("."));
    roots.dedup();
    roots
}
