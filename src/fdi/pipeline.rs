//! One analysis run: pick a field source, fall back if it fails, summarize.

use super::bbox::{BoundingBox, TimeWindow};
use super::error::{AnalysisError, SignalError, SourceError};
use super::grid::{NormalizedGrid, RawGrid};
use super::remote::RemoteSource;
use super::summary;
use super::synthetic;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{info, warn};
use utoipa::ToSchema;

pub const MIN_RADIUS_KM: u32 = 5;
pub const MAX_RADIUS_KM: u32 = 50;

/// Where the user asked the field to come from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceMode {
    #[default]
    Demo,
    SentinelHub,
}

/// Which strategy actually produced the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldOrigin {
    Remote,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: u32,
    pub mode: SourceMode,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&self.radius_km) {
            return Err(AnalysisError::InvalidRequest(format!(
                "radius must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM} km, got {}",
                self.radius_km
            )));
        }
        Ok(())
    }
}

/// Everything a run produced. Owned by whoever started the run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub request: AnalysisRequest,
    pub bbox: BoundingBox,
    pub window: TimeWindow,
    pub origin: FieldOrigin,
    /// Why the remote source was not used, when a fallback happened.
    pub fallback: Option<String>,
    /// `Err` when the grid carried no usable signal.
    pub outcome: Result<summary::Summary, SignalError>,
    pub finished_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn normalized(&self) -> Option<&NormalizedGrid> {
        self.outcome.as_ref().ok().map(|s| &s.normalized)
    }

    pub fn area_fraction(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|s| s.area_fraction)
    }
}

/// Settings of a run that do not come from the user.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub raster_size: usize,
    pub lookback_days: u64,
    pub now: DateTime<Utc>,
}

/// Field obtained for a run, with the remote failure if one was swallowed.
pub struct AcquiredField {
    pub grid: RawGrid,
    pub origin: FieldOrigin,
    pub fallback: Option<SourceError>,
}

/// Tries the remote source once when selected, otherwise (or on any failure)
/// synthesizes a demo field.
///
/// The remote attempt never draws from `rng`, so a failed remote run and a
/// demo run with the same generator state yield the same grid.
pub async fn acquire_field<R: Rng + ?Sized>(
    mode: SourceMode,
    remote: &dyn RemoteSource,
    bbox: &BoundingBox,
    window: &TimeWindow,
    size: usize,
    rng: &mut R,
) -> Result<AcquiredField, AnalysisError> {
    let attempt = match mode {
        SourceMode::SentinelHub => remote.fetch(bbox, window, size).await,
        SourceMode::Demo => Err(SourceError::NotSelected),
    };

    match attempt {
        Ok(grid) => Ok(AcquiredField {
            grid,
            origin: FieldOrigin::Remote,
            fallback: None,
        }),
        Err(e) => {
            if mode == SourceMode::SentinelHub {
                warn!(error = %e, "Remote imagery unavailable, using synthetic field");
            }
            let grid = synthetic::synthesize(size, rng)?;
            Ok(AcquiredField {
                grid,
                origin: FieldOrigin::Synthetic,
                fallback: Some(e),
            })
        }
    }
}

/// Runs one analysis end to end.
pub async fn run_analysis<R: Rng + ?Sized>(
    request: AnalysisRequest,
    remote: &dyn RemoteSource,
    settings: RunSettings,
    rng: &mut R,
) -> Result<AnalysisResult, AnalysisError> {
    request.validate()?;
    let bbox = BoundingBox::from_center(request.lat, request.lon, request.radius_km as f64)?;
    let window = TimeWindow::trailing(settings.now.date_naive(), settings.lookback_days);

    info!(
        lat = request.lat,
        lon = request.lon,
        radius_km = request.radius_km,
        mode = %request.mode,
        "Starting analysis"
    );

    let field = acquire_field(
        request.mode,
        remote,
        &bbox,
        &window,
        settings.raster_size,
        rng,
    )
    .await?;

    let outcome = summary::summarize(&field.grid);
    match &outcome {
        Ok(s) => info!(
            origin = %field.origin,
            area_fraction = s.area_fraction,
            missing = field.grid.missing_count(),
            "Analysis finished"
        ),
        Err(e) => warn!(origin = %field.origin, error = %e, "Analysis produced no signal"),
    }

    let fallback = field.fallback.map(|e| e.to_string());

    Ok(AnalysisResult {
        request,
        bbox,
        window,
        origin: field.origin,
        fallback,
        outcome,
        finished_at: Utc::now(),
    })
}
