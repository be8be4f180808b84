use crate::error::Result;
use crate::models::TemperatureSample;
use crate::readers::format::parse_timestamp;
use crate::readers::text::read_lossy;
use crate::utils::constants::SANGVOR_SKIP_LINES;
use std::path::Path;
use tracing::{debug, info};

/// Reader for sangvor BLE exports: a fixed header block, then
/// `DD.MM.YYYY HH:MM:SS;temperature[;...]` lines.
pub struct SangvorReader {
    skip_lines: usize,
}

impl SangvorReader {
    pub fn new(skip_lines: usize) -> Self {
        Self { skip_lines }
    }

    pub fn read_samples(&self, path: &Path) -> Result<Vec<TemperatureSample>> {
        let content = read_lossy(path)?;
        let samples = self.parse_content(&content, path);

        let file_name = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
        info!("Parsed {} data points from {}", samples.len(), file_name);
        Ok(samples)
    }

    fn parse_content(&self, content: &str, path: &Path) -> Vec<TemperatureSample> {
        let mut samples = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            if line_number <= self.skip_lines {
                continue;
            }

            match self.parse_line(line) {
                Some(sample) => samples.push(sample),
                None => {
                    if !line.trim().is_empty() {
                        debug!(
                            "Skipping unparsable row at line {} in {}: {}",
                            line_number,
                            path.display(),
                            line.trim()
                        );
                    }
                }
            }
        }

        samples
    }

    /// Parse one data line; `None` for blank, short or malformed lines
    pub fn parse_line(&self, line: &str) -> Option<TemperatureSample> {
        let line = line.trim();
        if line.is_empty() || !line.contains(';') {
            return None;
        }

        let mut parts = line.split(';');
        let timestamp = parts.next().and_then(parse_timestamp)?;
        let temperature = parts.next()?.trim().parse::<f64>().ok()?;

        Some(TemperatureSample::new(timestamp, temperature))
    }
}

impl Default for SangvorReader {
    fn default() -> Self {
        Self::new(SANGVOR_SKIP_LINES)
    }
}
