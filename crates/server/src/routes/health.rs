use axum::http::StatusCode;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::state::AppState;

/// Liveness check, answers "OK" while the process serves requests
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn root() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(root))
}
