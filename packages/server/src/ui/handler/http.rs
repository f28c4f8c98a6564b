//! HTTP endpoint handlers.

use std::{any::Any, sync::Arc};

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Response, StatusCode, header},
    response::IntoResponse,
};

use crate::{infrastructure::dto::http::HealthResponse, ui::state::AppState};

pub const STATUS_TEXT: &str = "Hiroba relay server is running";
pub const INTERNAL_ERROR_TEXT: &str = "Internal Server Error";

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.started_at.elapsed().as_secs_f64()))
}

/// Plain status text for every path without its own route
pub async fn fallback() -> impl IntoResponse {
    (StatusCode::OK, STATUS_TEXT)
}

/// Turn a panic inside an HTTP handler into a plain-text 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("HTTP handler panicked: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        INTERNAL_ERROR_TEXT,
    )
        .into_response()
}
