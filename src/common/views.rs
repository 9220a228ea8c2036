use super::models::{Defaults, HealthCheck};
use super::state::AppState;
use crate::fdi::SourceMode;
use crate::fdi::pipeline::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use axum::{Json, extract::State, http::StatusCode};
use tracing::debug;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(healthz))
        .routes(routes!(get_defaults))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (
            status = OK,
            description = "Kubernetes health check",
            body = HealthCheck,
            content_type = "application/json"
        )
    )
)]
pub async fn healthz(State(app_state): State<AppState>) -> (StatusCode, Json<HealthCheck>) {
    let config = &app_state.config;
    debug!(endpoint = "healthz", status = 200, "Health check");
    (
        StatusCode::OK,
        Json(HealthCheck {
            status: "ok".to_string(),
            app_name: config.app_name.clone(),
            deployment: config.deployment.clone(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/config/defaults",
    responses(
        (
            status = OK,
            description = "Default dashboard parameters",
            body = Defaults,
            content_type = "application/json"
        )
    )
)]
pub async fn get_defaults(State(app_state): State<AppState>) -> (StatusCode, Json<Defaults>) {
    let config = &app_state.config;
    let defaults = Defaults {
        lat: config.default_lat,
        lon: config.default_lon,
        radius_km: config.default_radius_km,
        min_radius_km: MIN_RADIUS_KM,
        max_radius_km: MAX_RADIUS_KM,
        modes: vec![SourceMode::Demo, SourceMode::SentinelHub],
        remote_available: config.remote_configured(),
        overlay_opacity: config.overlay_opacity,
    };

    (StatusCode::OK, Json(defaults))
}
