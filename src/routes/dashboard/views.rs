use axum::response::Html;
use utoipa_axum::{router::OpenApiRouter, routes};

const INDEX_HTML: &str = include_str!("index.html");

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(index))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Dashboard page", body = String, content_type = "text/html")
    ),
    summary = "Dashboard"
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
