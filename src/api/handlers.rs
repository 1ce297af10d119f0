//! HTTP request handlers for the preflight API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::evaluate;

use super::request::EvaluationRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .with_state(state)
}

/// Handler for POST /evaluate.
///
/// Validates the batch, runs every rule against the startup configuration
/// and returns the evaluation result. A RED verdict is still a 200; only
/// malformed or invalid input is an error.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = rejection_error(&correlation_id, rejection);
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let (batch, hours) = match request.into_inputs() {
        Ok(inputs) => inputs,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll batch rejected"
            );
            let api_error: ApiErrorResponse = err.into();
            return json_response(api_error.status, api_error.error);
        }
    };

    let start_time = Instant::now();
    let result = evaluate(&batch, hours.as_ref(), state.config());
    info!(
        correlation_id = %correlation_id,
        records = batch.len(),
        status = %result.status,
        violations = result.violation_count,
        potential = result.potential_count,
        duration_us = start_time.elapsed().as_micros(),
        "Evaluation completed"
    );

    json_response(StatusCode::OK, result)
}

fn rejection_error(correlation_id: &Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
