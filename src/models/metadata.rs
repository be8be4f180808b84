use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::utils::coordinates::validate_coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }
}

/// Logger attributes with site-specific column names folded onto one schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerMetadata {
    pub logger_id: String,
    /// `ID` column kept aside when `BLE-ID/Geoprecision` provided the id
    pub waypoint_id: Option<String>,
    pub garmin_waypoint: Option<String>,
    pub location: Option<GeoPoint>,
    pub elevation: Option<String>,
    pub surface: Option<String>,
    pub notes: Option<String>,
    pub installed: Option<String>,
    pub logger_type: Option<String>,
    pub access_code: Option<String>,
}

impl LoggerMetadata {
    pub fn new(logger_id: impl Into<String>) -> Self {
        Self {
            logger_id: logger_id.into(),
            ..Self::default()
        }
    }

    /// Waypoint used in labels: the Garmin waypoint, else the secondary id
    pub fn waypoint(&self) -> Option<&str> {
        self.garmin_waypoint
            .as_deref()
            .or(self.waypoint_id.as_deref())
    }

    pub fn elevation_meters(&self) -> Option<f64> {
        self.elevation
            .as_deref()
            .and_then(|e| e.trim().parse::<f64>().ok())
            .filter(|e| e.is_finite())
    }

    /// "2450m | blocks | north slope", built from whatever fields are present
    pub fn location_summary(&self) -> Option<String> {
        let mut parts = Vec::new();

        match (self.elevation_meters(), self.elevation.as_deref()) {
            (Some(meters), _) => parts.push(format!("{:.0}m", meters)),
            (None, Some(raw)) => parts.push(raw.to_string()),
            (None, None) => {}
        }
        if let Some(surface) = &self.surface {
            parts.push(surface.clone());
        }
        if let Some(notes) = &self.notes {
            parts.push(notes.clone());
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}
