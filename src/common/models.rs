use crate::fdi::SourceMode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Serialize)]
pub struct HealthCheck {
    pub status: String,
    pub app_name: String,
    pub deployment: String,
}

/// Values the dashboard form starts from.
#[derive(ToSchema, Deserialize, Serialize)]
pub struct Defaults {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: u32,
    pub min_radius_km: u32,
    pub max_radius_km: u32,
    pub modes: Vec<SourceMode>,
    /// Whether provider credentials are configured.
    pub remote_available: bool,
    pub overlay_opacity: f32,
}
