pub mod analysis;
pub mod dashboard;

use crate::common::state::AppState;
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(app_state: &AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(info(
        title = "Plastic Map API",
        description = "Floating Debris Index estimation over a user-selected area"
    ))]
    struct ApiDoc;

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(app_state)) // Health and defaults
        .merge(dashboard::views::router())
        .merge(analysis::views::router(app_state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(CorsLayer::permissive())
}
