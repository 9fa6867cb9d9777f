//! Tour request endpoint

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use chrono::Utc;
use serde::Serialize;

use tourstop_core::intake;
use tourstop_core::request::{RequestForm, RequestLog};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/request-stop", post(request_stop))
        .route("/api/request", post(request_stop))
}

#[derive(Serialize)]
pub struct RequestAccepted {
    pub ok: bool,
    pub mailto: String,
}

/// POST /api/request-stop - Validate, store and return the mail handoff.
/// The body is read as JSON whatever its content type; a body that does not
/// parse counts as an empty form.
async fn request_stop(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RequestAccepted>, AppError> {
    let form: RequestForm = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Unreadable request body, treating as empty form");
        RequestForm::default()
    });

    // The log write takes a file lock
    let submission = tokio::task::spawn_blocking(move || {
        let log = RequestLog::new(state.storage());
        intake::submit(&form, &log, &state.config().mail, Utc::now())
    })
    .await??;

    Ok(Json(RequestAccepted {
        ok: true,
        mailto: submission.mailto,
    }))
}
