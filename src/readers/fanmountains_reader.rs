use crate::error::Result;
use crate::models::TemperatureSample;
use crate::readers::format::parse_timestamp;
use crate::readers::text::read_lossy;
use crate::utils::constants::FANMOUNTAINS_SKIP_LINES;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::{debug, info};

/// Reader for fanmountains exports: a fixed header block, then
/// `NO,TIME,#1:oC[,HK-BAT:V]` rows with `<...>` annotations interleaved.
pub struct FanMountainsReader {
    skip_lines: usize,
}

impl FanMountainsReader {
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
        // Header lines are counted as raw lines, before CSV tokenizing
        let body = skip_lines(content, self.skip_lines);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(body.as_bytes());

        let mut samples = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    debug!("Skipping unreadable row in {}: {}", path.display(), e);
                    continue;
                }
            };

            if let Some(sample) = self.parse_record(&record) {
                samples.push(sample);
            } else if !is_marker_row(&record) {
                let line_number = record
                    .position()
                    .map(|p| p.line() as usize + self.skip_lines)
                    .unwrap_or(0);
                debug!(
                    "Skipping unparsable row at line {} in {}: {:?}",
                    line_number,
                    path.display(),
                    record
                );
            }
        }

        samples
    }

    /// Parse one CSV row; `None` for markers, header repeats and malformed rows
    pub fn parse_record(&self, record: &StringRecord) -> Option<TemperatureSample> {
        if is_marker_row(record) {
            return None;
        }

        let timestamp = record.get(1).and_then(parse_timestamp)?;
        let temperature = record.get(2)?.trim().parse::<f64>().ok()?;

        Some(TemperatureSample::new(timestamp, temperature))
    }
}

impl Default for FanMountainsReader {
    fn default() -> Self {
        Self::new(FANMOUNTAINS_SKIP_LINES)
    }
}

/// Empty rows, `<...>` annotations and repeated `NO,TIME,...` headers
fn is_marker_row(record: &StringRecord) -> bool {
    match record.get(0).map(str::trim) {
        None | Some("") => true,
        Some(first) => first.starts_with('<') || first.eq_ignore_ascii_case("NO"),
    }
}

fn skip_lines(content: &str, count: usize) -> &str {
    let mut rest = content;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}
