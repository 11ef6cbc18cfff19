//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use super::dto::{error_response, success_response};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/route", get(search_route))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Query parameters for a route search.
#[derive(Debug, Deserialize)]
struct RouteQuery {
    from: String,
    to: String,
    date: String,
    time: String,
}

/// Search for routes between two stations.
async fn search_route(
    State(state): State<AppState>,
    Query(req): Query<RouteQuery>,
) -> Response {
    info!(from = %req.from, to = %req.to, date = %req.date, time = %req.time, "route search");

    match state
        .resolver
        .resolve(&req.from, &req.to, &req.date, &req.time)
        .await
    {
        Ok(resolved) => {
            let (status, body) = success_response(resolved);
            (status, Json(body)).into_response()
        }
        Err(err) => {
            let (status, body) = error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}
