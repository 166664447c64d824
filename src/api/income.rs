use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::error::ApiError;
use super::routes::AppState;
use crate::models::WeeklyIncomeReport;

#[derive(Debug, Deserialize)]
pub struct WeeklyIncomeQuery {
    pub trainer_id: i64,
    /// Any date inside the week to report on; defaults to today.
    pub date: Option<NaiveDate>,
}

pub fn income_routes() -> Router<AppState> {
    Router::new().route("/weekly", get(get_weekly_income))
}

/// The trainer's full weekly income view: breakdown rows plus the summary.
pub async fn get_weekly_income(
    State(state): State<AppState>,
    Query(query): Query<WeeklyIncomeQuery>,
) -> Result<Json<WeeklyIncomeReport>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let report = state
        .weekly_income_service
        .weekly_report(query.trainer_id, date)
        .await?
        .ok_or(ApiError::NotFound("trainer"))?;
    Ok(Json(report))
}
