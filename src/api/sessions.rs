use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{LogSessionsRequest, Session, WeekBounds};

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub trainer_id: i64,
    /// Any date inside the week to list; defaults to today.
    pub date: Option<NaiveDate>,
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(log_sessions))
        .route("/:id", delete(delete_session))
}

/// Log one or more delivered classes. Each date is bound to a package by the
/// allocator, or left unpackaged when nothing has room.
pub async fn log_sessions(
    State(state): State<AppState>,
    Json(request): Json<LogSessionsRequest>,
) -> Result<Json<Vec<Session>>, ApiError> {
    if request.dates.is_empty() {
        return Err(ApiError::Validation("dates must not be empty".to_string()));
    }

    let client = state
        .client_service
        .get_client(request.client_id)
        .await?
        .ok_or(ApiError::Validation(format!(
            "client {} does not exist",
            request.client_id
        )))?;
    if client.trainer_id != request.trainer_id
        && client.secondary_trainer_id != Some(request.trainer_id)
    {
        return Err(ApiError::Validation(format!(
            "trainer {} does not work with client {}",
            request.trainer_id, request.client_id
        )));
    }

    let sessions = state.session_service.log_sessions(request).await?;
    Ok(Json(sessions))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let week = WeekBounds::containing(date);
    let sessions = state
        .session_service
        .list_for_trainer_week(query.trainer_id, week)
        .await?;
    Ok(Json(sessions))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.session_service.delete_session(id).await? {
        return Err(ApiError::NotFound("session"));
    }
    Ok(Json(serde_json::json!({ "deleted": id })))
}
