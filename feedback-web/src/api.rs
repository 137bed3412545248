//! JSON API.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use feedback::core::types::{FeedbackInput, FieldErrors};
use feedback::form::{Notification, SubmitOutcome};
use feedback::listing::fetch_all;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/feedbacks", get(list_feedbacks).post(create_feedback))
}

#[derive(Serialize)]
struct ErrorsResponse {
    errors: FieldErrors,
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/feedbacks - all records, newest first.
async fn list_feedbacks(State(state): State<AppState>) -> Response {
    match fetch_all(state.store.as_ref()).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "listing read failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Failed to load feedback" })),
            )
                .into_response()
        }
    }
}

/// POST /api/feedbacks - submit through the same form controller as the page.
async fn create_feedback(
    State(state): State<AppState>,
    Json(input): Json<FeedbackInput>,
) -> Response {
    let form = state.new_form();
    form.fill(input);
    match form.submit().await {
        SubmitOutcome::Created(record) => (StatusCode::CREATED, Json(record)).into_response(),
        SubmitOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorsResponse { errors }),
        )
            .into_response(),
        // Busy needs a shared form; every request builds its own.
        SubmitOutcome::StoreFailed | SubmitOutcome::Busy => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": Notification::submit_failed().title })),
        )
            .into_response(),
    }
}
