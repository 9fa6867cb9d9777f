pub mod events;
pub mod page;
pub mod requests;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tourstop_core::TourError;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(page::router())
        .merge(events::router())
        .merge(requests::router())
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

/// Convert anyhow errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<TourError>() {
            Some(TourError::MissingFields(_)) | Some(TourError::InvalidDate(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(TourError::EventNotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self.0.downcast_ref::<TourError>() {
            Some(e) => e.detail(),
            None => self.0.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(%error, "Request failed");
        }

        (status, Json(ErrorResponse { ok: false, error })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
