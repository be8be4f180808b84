use std::path::PathBuf;

use crate::models::{LoggerMetadata, TimeSeries};

/// One physical logger after its files have been merged
#[derive(Debug, Clone)]
pub struct LoggerRecord {
    pub logger_id: String,
    pub source_files: Vec<PathBuf>,
    pub series: TimeSeries,
    pub metadata: Option<LoggerMetadata>,
    pub title: String,
}

impl LoggerRecord {
    pub fn new(
        logger_id: String,
        source_files: Vec<PathBuf>,
        series: TimeSeries,
        metadata: Option<LoggerMetadata>,
        title: String,
    ) -> Self {
        Self {
            logger_id,
            source_files,
            series,
            metadata,
            title,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }
}
