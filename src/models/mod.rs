pub mod logger;
pub mod metadata;
pub mod sample;

pub use logger::LoggerRecord;
pub use metadata::{GeoPoint, LoggerMetadata};
pub use sample::{SeriesSummary, TemperatureSample, TimeSeries};
