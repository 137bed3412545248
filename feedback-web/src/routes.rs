//! HTML page handlers: the form and the submissions listing.

use anyhow::Result;
use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use feedback::core::types::FeedbackInput;
use feedback::form::SubmitOutcome;
use feedback::listing::load_listing;
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;

/// Build the page router.
pub fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .route("/feedback", get(show_listing))
}

/// Urlencoded form body. Unchecked radios and empty fields may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub rating: Option<String>,
    pub comments: Option<String>,
}

impl FormFields {
    /// A rating that does not parse as an integer counts as not selected.
    pub fn into_input(self) -> FeedbackInput {
        FeedbackInput {
            name: self.name,
            email: self.email,
            rating: self.rating.and_then(|r| r.trim().parse().ok()),
            comments: self.comments,
        }
    }
}

/// GET / - empty form.
async fn show_form(State(state): State<AppState>) -> Response {
    let form = state.new_form();
    render(StatusCode::OK, state.pages.form(&form.snapshot(), None))
}

/// POST / - validate and store one submission.
async fn submit_form(State(state): State<AppState>, Form(fields): Form<FormFields>) -> Response {
    let form = state.new_form();
    let mut notices = form.subscribe();
    form.fill(fields.into_input());

    let outcome = form.submit().await;
    let notice = notices.try_recv().ok();
    let snapshot = form.snapshot();
    match outcome {
        SubmitOutcome::Created(_) => render(
            StatusCode::OK,
            state
                .pages
                .success(state.success_display.as_secs(), notice.as_ref()),
        ),
        // Busy needs a shared form; every request builds its own.
        SubmitOutcome::Invalid(_) | SubmitOutcome::Busy => render(
            StatusCode::UNPROCESSABLE_ENTITY,
            state.pages.form(&snapshot, None),
        ),
        SubmitOutcome::StoreFailed => render(
            StatusCode::SERVICE_UNAVAILABLE,
            state.pages.form(&snapshot, notice.as_ref()),
        ),
    }
}

/// GET /feedback - every submission, newest first.
async fn show_listing(State(state): State<AppState>) -> Response {
    let view = load_listing(state.store.as_ref()).await;
    render(StatusCode::OK, state.pages.listing(&view))
}

fn render(status: StatusCode, page: Result<String>) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %format!("{err:#}"), "page render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_rating_is_not_selected() {
        let fields = FormFields {
            rating: Some("five".to_string()),
            ..FormFields::default()
        };
        assert_eq!(fields.into_input().rating, None);
    }

    #[test]
    fn rating_is_parsed_as_integer() {
        let fields = FormFields {
            name: "Ada".to_string(),
            rating: Some(" 4 ".to_string()),
            comments: Some(String::new()),
            ..FormFields::default()
        };
        let input = fields.into_input();
        assert_eq!(input.rating, Some(4));
        assert_eq!(input.name, "Ada");
        assert_eq!(input.comments.as_deref(), Some(""));
    }

    #[test]
    fn out_of_range_rating_is_kept_for_validation() {
        let fields = FormFields {
            rating: Some("9".to_string()),
            ..FormFields::default()
        };
        assert_eq!(fields.into_input().rating, Some(9));
    }
}
