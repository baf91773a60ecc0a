use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{ReminderDispatch, RemindersInFlight};
use crate::AppState;

use super::ApiError;

pub async fn send_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ReminderDispatch>), ApiError> {
    let tenant = state.store.require_tenant(&id).await?;

    let dispatch = state.reminders.send_reminder(tenant).await;
    Ok((StatusCode::ACCEPTED, Json(dispatch)))
}

pub async fn list_in_flight(State(state): State<Arc<AppState>>) -> Json<RemindersInFlight> {
    Json(RemindersInFlight {
        sending: state.reminders.in_flight().await,
    })
}
