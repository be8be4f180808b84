use crate::models::{TemperatureSample, TimeSeries};
use crate::readers::LogFormat;
use crate::settings::Settings;
use std::path::PathBuf;
use tracing::{info, warn};

/// Combines every file of one logger into a single series
pub struct SeriesMerger {
    settings: Settings,
}

impl SeriesMerger {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Parse each file with the reader its path selects, concatenate in file
    /// order, then sort and collapse repeated timestamps (first one wins).
    /// Files that cannot be read are logged and contribute nothing.
    pub fn merge(&self, file_group: &[PathBuf]) -> TimeSeries {
        let mut combined: Vec<TemperatureSample> = Vec::new();

        for path in file_group {
            let name = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
            info!("  Reading {}", name);

            let format = LogFormat::detect(path);
            let skip_lines = format.skip_lines(&self.settings);
            match format.read_samples(path, skip_lines) {
                Ok(samples) => combined.extend(samples),
                Err(e) => warn!("Failed to read {} as {}: {}", path.display(), format, e),
            }
        }

        let series = Self::merge_samples(combined);
        info!("  Combined into {} unique data points", series.len());
        series
    }

    /// Merge already-parsed per-file sample lists in the given order
    pub fn merge_samples(samples: Vec<TemperatureSample>) -> TimeSeries {
        TimeSeries::from_unsorted(samples)
    }
}

impl Default for SeriesMerger {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::parse_timestamp;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_sangvor(dir: &std::path::Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for i in 0..22 {
            writeln!(file, "header {}", i).unwrap();
        }
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    #[test]
    fn test_overlapping_files_are_deduplicated() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("sangvor");
        std::fs::create_dir(&site).unwrap();

        let first = write_sangvor(
            &site,
            "2005-0070_20220907_0332.csv",
            &["07.09.2022 01:00:00;1.0", "07.09.2022 02:00:00;2.0"],
        );
        let second = write_sangvor(
            &site,
            "2005-0070_20220908_0332.csv",
            &["07.09.2022 02:00:00;2.5", "07.09.2022 03:00:00;3.0"],
        );

        let series = SeriesMerger::default().merge(&[first, second]);

        let timestamps: Vec<_> = series.timestamps().collect();
        assert_eq!(
            timestamps,
            vec![
                parse_timestamp("07.09.2022 01:00:00").unwrap(),
                parse_timestamp("07.09.2022 02:00:00").unwrap(),
                parse_timestamp("07.09.2022 03:00:00").unwrap(),
            ]
        );
        // The earlier file's reading survives the collision
        assert_eq!(series.samples()[1].temperature, 2.0);
    }

    #[test]
    fn test_files_out_of_order_are_sorted() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("sangvor");
        std::fs::create_dir(&site).unwrap();

        let later = write_sangvor(&site, "b_2023.csv", &["01.01.2023 00:00:00;-5.0"]);
        let earlier = write_sangvor(&site, "a_2022.csv", &["01.01.2022 00:00:00;-4.0"]);

        let series = SeriesMerger::default().merge(&[later, earlier]);
        let temps: Vec<f64> = series.temperatures().collect();
        assert_eq!(temps, vec![-4.0, -5.0]);
    }

    #[test]
    fn test_unreadable_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("sangvor");
        std::fs::create_dir(&site).unwrap();
        let empty = write_sangvor(&site, "2005-0070_empty.csv", &[]);

        let series = SeriesMerger::default().merge(&[site.join("missing.csv"), empty]);
        assert!(series.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let ts = |s: &str| parse_timestamp(s).unwrap();
        let samples = vec![
            TemperatureSample::new(ts("01.01.2020 02:00:00"), 2.0),
            TemperatureSample::new(ts("01.01.2020 00:00:00"), 0.0),
            TemperatureSample::new(ts("01.01.2020 02:00:00"), 9.0),
        ];

        let once = SeriesMerger::merge_samples(samples);
        let twice = SeriesMerger::merge_samples(once.samples().to_vec());
        assert_eq!(once, twice);
    }
}
