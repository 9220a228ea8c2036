use super::models::{AnalysisParams, AnalysisSummary, GridResponse, RunStatus};
use super::styling;
use crate::common::error::{ApiError, AppError};
use crate::common::state::AppState;
use crate::fdi::pipeline::{AnalysisRequest, RunSettings, run_analysis};
use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{error, info};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(start_analysis, get_analysis))
        .routes(routes!(get_overlay))
        .routes(routes!(get_grid))
        .with_state(state.clone())
}

#[utoipa::path(
    post,
    path = "/api/analysis",
    request_body = AnalysisParams,
    responses(
        (status = 200, description = "Run finished (check status for no_signal)", body = AnalysisSummary),
        (status = 400, description = "Invalid location or radius", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    summary = "Run an analysis",
    description = "Fetches imagery (or synthesizes a demo field), computes the normalized FDI grid and the share of the area above the concentration threshold. Replaces the previous result."
)]
pub async fn start_analysis(
    State(app_state): State<AppState>,
    Json(params): Json<AnalysisParams>,
) -> Result<Json<AnalysisSummary>, AppError> {
    let request = params.to_request(&app_state.config);
    request.validate()?;

    // Detached so the run still settles its status if the client goes away.
    let run = tokio::spawn(execute_run(app_state, request, params.seed));
    let summary = run.await.map_err(|e| {
        error!(error = %e, "Analysis task aborted");
        AppError::Internal(format!("analysis task aborted: {e}"))
    })??;
    Ok(Json(summary))
}

/// Runs one analysis under the run lock and records its outcome.
async fn execute_run(
    app_state: AppState,
    request: AnalysisRequest,
    seed: Option<u64>,
) -> Result<AnalysisSummary, AppError> {
    let config = &app_state.config;
    let _guard = app_state.run_lock.lock().await;
    let previous = {
        let mut run = app_state.run.write().await;
        std::mem::replace(&mut run.status, RunStatus::Running)
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let settings = RunSettings {
        raster_size: config.raster_size,
        lookback_days: config.lookback_days,
        now: Utc::now(),
    };
    let outcome = run_analysis(request, app_state.remote.as_ref(), settings, &mut rng).await;

    let mut run = app_state.run.write().await;
    match outcome {
        Ok(result) => {
            run.status = if result.outcome.is_ok() {
                RunStatus::Done
            } else {
                RunStatus::NoSignal
            };
            let result = Arc::new(result);
            run.last = Some(result.clone());
            Ok(AnalysisSummary::new(
                run.status,
                Some(&result),
                config.overlay_opacity,
            ))
        }
        Err(e) => {
            run.status = previous;
            error!(error = %e, "Analysis failed");
            Err(e.into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/analysis",
    responses(
        (status = 200, description = "Status and the most recent result, if any", body = AnalysisSummary)
    ),
    summary = "Get the last analysis"
)]
pub async fn get_analysis(State(app_state): State<AppState>) -> Json<AnalysisSummary> {
    let run = app_state.run.read().await;
    Json(AnalysisSummary::new(
        run.status,
        run.last.as_deref(),
        app_state.config.overlay_opacity,
    ))
}

#[utoipa::path(
    get,
    path = "/api/analysis/overlay.png",
    responses(
        (status = 200, description = "Concentration overlay", body = [u8], content_type = "image/png"),
        (status = 404, description = "No result with a usable signal", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    summary = "Get the overlay image",
    description = "Red overlay whose alpha equals the normalized index. Missing cells are transparent."
)]
pub async fn get_overlay(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let last = app_state.run.read().await.last.clone();
    let grid = last
        .as_deref()
        .and_then(|r| r.normalized())
        .ok_or_else(|| AppError::NotFound("No analysis result to render".to_string()))?;

    let png_data = styling::render_overlay(grid)?;
    info!(bytes = png_data.len(), "Rendered overlay");
    Ok(([(header::CONTENT_TYPE, "image/png")], png_data))
}

#[utoipa::path(
    get,
    path = "/api/analysis/grid",
    responses(
        (status = 200, description = "Normalized grid, null for missing cells", body = GridResponse),
        (status = 404, description = "No result with a usable signal", body = ApiError)
    ),
    summary = "Get the normalized grid"
)]
pub async fn get_grid(State(app_state): State<AppState>) -> Result<Json<GridResponse>, AppError> {
    let last = app_state.run.read().await.last.clone();
    let grid = last
        .as_deref()
        .and_then(|r| r.normalized())
        .ok_or_else(|| AppError::NotFound("No analysis result available".to_string()))?;
    Ok(Json(GridResponse::from(grid)))
}
