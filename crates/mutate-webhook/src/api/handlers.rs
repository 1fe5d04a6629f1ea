use admission_mutator::ReviewOutcome;
use axum::{
    body::Bytes,
    extract,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::task;
use tracing::{error, Span};

use crate::api::{api_error::ApiError, state::ApiServerState};

#[tracing::instrument(
    name = "mutate",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        allowed=tracing::field::Empty,
        mutated=tracing::field::Empty,
        response_message=tracing::field::Empty,
        error=tracing::field::Empty,
    ),
    skip_all)]
/// Answer an AdmissionReview, injecting the sidecar into the reviewed Pod.
///
/// The body is handed over untouched: deciding what is a valid review is
/// up to the transformer.
pub(crate) async fn mutate_handler(
    extract::State(state): extract::State<Arc<ApiServerState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let span = Span::current();
    let result = task::spawn_blocking(move || {
        let _enter = span.enter();
        state.transformer.transform_with_outcome(&body, state.verbose)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "mutation task failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Something went wrong".to_owned(),
        }
    })?;

    let (response_body, outcome) = result.map_err(|e| {
        Span::current().record("error", e.to_string().as_str());
        error!(error = %e, "cannot mutate admission review");
        ApiError::from(e)
    })?;

    populate_span_with_review_outcome(&outcome);

    Ok((
        [(header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
        response_body,
    ))
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}

fn populate_span_with_review_outcome(outcome: &ReviewOutcome) {
    Span::current().record("request_uid", outcome.uid.as_str());
    Span::current().record("allowed", outcome.allowed);
    Span::current().record("mutated", outcome.mutated);
    if let Some(message) = &outcome.message {
        Span::current().record("response_message", message.as_str());
    }
}
