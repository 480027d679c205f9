//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use heli_core::{ResponseEnvelope, TextRequest};
use serde_json::json;
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, error};

use crate::error::AppError;
use crate::service::AppState;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.server.body_limit_bytes;

    Router::new()
        .route("/process", post(process))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Main annotation handler
async fn process(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, AppError> {
    metrics::counter!("heli_requests_total").increment(1);

    let Json(request) = payload.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::InvalidRequest(e.body_text()),
    })?;
    debug!(
        kind = %request.kind,
        bytes = request.content.len(),
        "Received process request"
    );

    let response = state.service.process(request).await?;
    Ok(Json(ResponseEnvelope { response }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let classifier = state.service.channel().status();
    Json(json!({
        "status": "ok",
        "classifier": classifier.as_str(),
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Handler panicked: {}", detail);
    AppError::Internal(detail).into_response()
}
