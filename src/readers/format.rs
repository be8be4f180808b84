use crate::error::Result;
use crate::models::TemperatureSample;
use crate::readers::{FanMountainsReader, SangvorReader};
use crate::settings::Settings;
use crate::utils::constants::{FANMOUNTAINS_SKIP_LINES, SANGVOR_MARKER, SANGVOR_SKIP_LINES, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::Path;

/// Export format families understood by the readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    Sangvor,
    FanMountains,
}

impl LogFormat {
    /// Classify by path only. Anything without "sangvor" in its path is read
    /// as fanmountains, right or wrong.
    pub fn detect(path: &Path) -> Self {
        let path_str = path.to_string_lossy().to_lowercase();
        if path_str.contains(SANGVOR_MARKER) {
            LogFormat::Sangvor
        } else {
            LogFormat::FanMountains
        }
    }

    pub fn default_skip_lines(&self) -> usize {
        match self {
            LogFormat::Sangvor => SANGVOR_SKIP_LINES,
            LogFormat::FanMountains => FANMOUNTAINS_SKIP_LINES,
        }
    }

    pub fn skip_lines(&self, settings: &Settings) -> usize {
        match self {
            LogFormat::Sangvor => settings.sangvor_skip_lines,
            LogFormat::FanMountains => settings.fanmountains_skip_lines,
        }
    }

    pub fn read_samples(&self, path: &Path, skip_lines: usize) -> Result<Vec<TemperatureSample>> {
        match self {
            LogFormat::Sangvor => SangvorReader::new(skip_lines).read_samples(path),
            LogFormat::FanMountains => FanMountainsReader::new(skip_lines).read_samples(path),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LogFormat::Sangvor => "sangvor",
            LogFormat::FanMountains => "fanmountains",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Parse a `DD.MM.YYYY HH:MM:SS` logger timestamp
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Format a timestamp back into the logger layout
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
