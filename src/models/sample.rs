use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
}

impl TemperatureSample {
    pub fn new(timestamp: NaiveDateTime, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
        }
    }
}

/// Time-ordered samples with unique timestamps.
///
/// The only way to build one is [`TimeSeries::from_unsorted`], so every
/// instance is sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    samples: Vec<TemperatureSample>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSeries {
    /// Stable-sort by timestamp, then keep the first sample of each run of
    /// equal timestamps.
    pub fn from_unsorted(mut samples: Vec<TemperatureSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        samples.dedup_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn samples(&self) -> &[TemperatureSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.samples.iter().map(|s| s.timestamp)
    }

    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.temperature)
    }

    pub fn summary(&self) -> Option<SeriesSummary> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for t in self.temperatures() {
            min = min.min(t);
            max = max.max(t);
            sum += t;
        }

        Some(SeriesSummary {
            count: self.samples.len(),
            min,
            max,
            avg: sum / self.samples.len() as f64,
            start: first.timestamp,
            end: last.timestamp,
        })
    }
}
