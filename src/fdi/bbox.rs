use super::KM_PER_DEGREE;
use super::error::AnalysisError;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// A bounding box in geographic coordinates (EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Western (minimum) longitude in degrees
    pub min_lon: f64,
    /// Southern (minimum) latitude in degrees
    pub min_lat: f64,
    /// Eastern (maximum) longitude in degrees
    pub max_lon: f64,
    /// Northern (maximum) latitude in degrees
    pub max_lat: f64,
}

impl BoundingBox {
    /// Square box around a center point.
    ///
    /// The radius is turned into a degree delta with the flat approximation
    /// `delta = radius_km / 111`, applied equally to latitude and longitude:
    ///   box = [lon - delta, lat - delta, lon + delta, lat + delta]
    pub fn from_center(lat: f64, lon: f64, radius_km: f64) -> Result<Self, AnalysisError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AnalysisError::InvalidRequest(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(AnalysisError::InvalidRequest(format!(
                "longitude {lon} is outside [-180, 180]"
            )));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(AnalysisError::InvalidRequest(format!(
                "radius must be positive, got {radius_km} km"
            )));
        }

        let delta = degree_delta(radius_km);
        Ok(BoundingBox {
            min_lon: lon - delta,
            min_lat: lat - delta,
            max_lon: lon + delta,
            max_lat: lat + delta,
        })
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`, the order imagery providers expect.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// `[[south, west], [north, east]]`, the order map overlays expect.
    pub fn overlay_bounds(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }
}

pub fn degree_delta(radius_km: f64) -> f64 {
    radius_km / KM_PER_DEGREE
}

/// Inclusive range of calendar days an imagery query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalysisError> {
        if start > end {
            return Err(AnalysisError::InvalidRequest(format!(
                "time window starts after it ends ({start} > {end})"
            )));
        }
        Ok(TimeWindow { start, end })
    }

    /// Window of `days` days ending on `today`.
    pub fn trailing(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        TimeWindow { start, end: today }
    }

    /// RFC 3339 bounds covering the whole of both days.
    pub fn to_rfc3339_range(&self) -> (String, String) {
        (
            format!("{}T00:00:00Z", self.start.format("%Y-%m-%d")),
            format!("{}T23:59:59Z", self.end.format("%Y-%m-%d")),
        )
    }
}
