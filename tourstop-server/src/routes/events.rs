//! Event listing and invite download endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use tourstop_core::TourEvent;
use tourstop_core::filter::{FilterState, filter};
use tourstop_core::invite::{Invite, InviteZone};
use tourstop_core::render::Card;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/search", get(search_events))
        .route("/events/{id}/invite.ics", get(download_invite))
}

/// Filter inputs as query parameters; any may be absent
#[derive(Deserialize, Default)]
pub struct FilterQuery {
    pub q: Option<String>,
    pub state: Option<String>,
    pub month: Option<String>,
}

impl FilterQuery {
    pub fn filter_state(&self) -> FilterState {
        FilterState::from_inputs(self.q.as_deref(), self.state.as_deref(), self.month.as_deref())
    }
}

/// GET /api/events - The whole catalog
async fn list_events(State(state): State<AppState>) -> Json<Vec<TourEvent>> {
    Json(state.catalog().events().to_vec())
}

/// GET /api/events/search - Catalog filtered by q/state/month
async fn search_events(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<TourEvent>> {
    let events = filter(state.catalog(), &query.filter_state())
        .into_iter()
        .cloned()
        .collect();
    Json(events)
}

/// GET /events/:id/invite.ics - Calendar invite as a file download
async fn download_invite(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.catalog().get(id)?;
    let action = Card::from_event(event).calendar;

    let zone = InviteZone::from_config(state.config().timezone.as_deref())?;
    let invite = Invite::for_zone(&action.title, &action.date, zone, &state.config().invite)?;
    tracing::info!(id, uid = %invite.uid, "Serving calendar invite");

    let disposition = format!("attachment; filename=\"{}\"", invite.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        invite.ics().to_string(),
    ))
}
