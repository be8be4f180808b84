use crate::error::{ProcessingError, Result};

/// Parse a decimal coordinate value, tolerating surrounding whitespace
///
/// # Examples
/// ```
/// use groundtemp_processor::utils::coordinates::parse_decimal_coordinate;
///
/// let lat = parse_decimal_coordinate(" 39.1234 ").unwrap();
/// assert!((lat - 39.1234).abs() < 1e-9);
/// ```
pub fn parse_decimal_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();
    trimmed.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
    })
}

/// Validate a WGS84 coordinate pair
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}

/// Arithmetic mean of a set of (lat, lon) points
pub fn centroid(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), (lat, lon)| (la + lat, lo + lon));

    Some((lat_sum / n, lon_sum / n))
}

/// South-west and north-east corners enclosing every point
pub fn bounding_box(points: &[(f64, f64)]) -> Option<((f64, f64), (f64, f64))> {
    let first = points.first()?;
    let mut south_west = *first;
    let mut north_east = *first;

    for &(lat, lon) in &points[1..] {
        south_west.0 = south_west.0.min(lat);
        south_west.1 = south_west.1.min(lon);
        north_east.0 = north_east.0.max(lat);
        north_east.1 = north_east.1.max(lon);
    }

    Some((south_west, north_east))
}
