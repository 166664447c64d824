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
use crate::models::{CreateLateFeeRequest, LateFee, WeekBounds};

#[derive(Debug, Deserialize)]
pub struct LateFeeListQuery {
    pub trainer_id: i64,
    /// Any date inside the week to list; defaults to today.
    pub date: Option<NaiveDate>,
}

pub fn late_fee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_late_fees).post(create_late_fee))
        .route("/:id", delete(delete_late_fee))
}

pub async fn create_late_fee(
    State(state): State<AppState>,
    Json(request): Json<CreateLateFeeRequest>,
) -> Result<Json<LateFee>, ApiError> {
    if request.amount <= 0.0 {
        return Err(ApiError::Validation(format!(
            "late fee amount must be positive, got {}",
            request.amount
        )));
    }
    state
        .client_service
        .get_client(request.client_id)
        .await?
        .ok_or(ApiError::Validation(format!(
            "client {} does not exist",
            request.client_id
        )))?;

    let fee = state.late_fee_service.create_late_fee(request).await?;
    Ok(Json(fee))
}

pub async fn list_late_fees(
    State(state): State<AppState>,
    Query(query): Query<LateFeeListQuery>,
) -> Result<Json<Vec<LateFee>>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let week = WeekBounds::containing(date);
    let fees = state
        .late_fee_service
        .list_for_trainer_week(query.trainer_id, week)
        .await?;
    Ok(Json(fees))
}

pub async fn delete_late_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.late_fee_service.delete_late_fee(id).await? {
        return Err(ApiError::NotFound("late fee"));
    }
    Ok(Json(serde_json::json!({ "deleted": id })))
}
