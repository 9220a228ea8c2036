use crate::config::Config;
use crate::fdi::{AnalysisRequest, AnalysisResult, FieldOrigin, NormalizedGrid, SourceMode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

/// Label of the last triggered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Done,
    NoSignal,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Idle => "Ready to run",
            RunStatus::Running => "Analysis running...",
            RunStatus::Done => "Analysis complete",
            RunStatus::NoSignal => "No valid signal in the selected area",
        }
    }
}

/// Body of a run request. Missing fields take the configured defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnalysisParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<u32>,
    #[serde(default)]
    pub mode: SourceMode,
    /// Seeds the synthetic field so a run can be reproduced.
    pub seed: Option<u64>,
}

impl AnalysisParams {
    pub fn to_request(&self, config: &Config) -> AnalysisRequest {
        AnalysisRequest {
            lat: self.lat.unwrap_or(config.default_lat),
            lon: self.lon.unwrap_or(config.default_lon),
            radius_km: self.radius_km.unwrap_or(config.default_radius_km),
            mode: self.mode,
        }
    }
}

/// Map-overlay corners in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OverlayBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisDetails {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: u32,
    pub mode: SourceMode,
    pub origin: FieldOrigin,
    /// Why the remote source was not used, when the run fell back.
    pub fallback: Option<String>,
    /// Percentage of the area above the concentration threshold.
    pub area_fraction: Option<f64>,
    /// `area_fraction` with two decimals, e.g. `"12.34 %"`.
    pub area_fraction_display: Option<String>,
    pub bounds: OverlayBounds,
    pub opacity: f32,
    /// Present when an overlay can be rendered.
    pub overlay_url: Option<String>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub total_cells: usize,
    pub missing_cells: usize,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisSummary {
    pub status: RunStatus,
    pub status_label: String,
    pub result: Option<AnalysisDetails>,
}

pub const OVERLAY_PATH: &str = "/api/analysis/overlay.png";

impl AnalysisSummary {
    pub fn new(status: RunStatus, last: Option<&AnalysisResult>, opacity: f32) -> Self {
        AnalysisSummary {
            status,
            status_label: status.label().to_string(),
            result: last.map(|r| AnalysisDetails::new(r, opacity)),
        }
    }
}

impl AnalysisDetails {
    fn new(result: &AnalysisResult, opacity: f32) -> Self {
        let [[south, west], [north, east]] = result.bbox.overlay_bounds();
        let area_fraction = result.area_fraction();
        let (total_cells, missing_cells) = result
            .normalized()
            .map(|g| (g.len(), g.missing_count()))
            .unwrap_or((0, 0));

        AnalysisDetails {
            lat: result.request.lat,
            lon: result.request.lon,
            radius_km: result.request.radius_km,
            mode: result.request.mode,
            origin: result.origin,
            fallback: result.fallback.clone(),
            area_fraction,
            area_fraction_display: area_fraction.map(format_percentage),
            bounds: OverlayBounds {
                south,
                west,
                north,
                east,
            },
            opacity,
            overlay_url: result.normalized().map(|_| OVERLAY_PATH.to_string()),
            window_start: result.window.start,
            window_end: result.window.end,
            total_cells,
            missing_cells,
            finished_at: result.finished_at,
        }
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.2} %")
}

/// Normalized grid as nested rows, `null` marking missing cells.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GridResponse {
    pub width: usize,
    pub height: usize,
    pub values: Vec<Vec<Option<f32>>>,
}

impl From<&NormalizedGrid> for GridResponse {
    fn from(grid: &NormalizedGrid) -> Self {
        GridResponse {
            width: grid.width(),
            height: grid.height(),
            values: grid.rows(),
        }
    }
}
