use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{
    validate_rate_tiers, CreateTrainerRequest, IncomeRateTier, RateTierInput, Trainer,
    UpdateTrainerRequest, WeekBounds,
};

#[derive(Debug, Deserialize)]
pub struct RateQuery {
    /// Any date inside the week of interest; defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRatesRequest {
    /// First week the new schedule applies to; defaults to today. Older
    /// generations stay untouched so historical weeks keep their payouts.
    pub effective_from: Option<NaiveDate>,
    pub tiers: Vec<RateTierInput>,
}

#[derive(Debug, Serialize)]
pub struct IncomeRatesResponse {
    pub trainer_id: i64,
    /// Monday of the week the `tiers` generation governs.
    pub week_start: NaiveDate,
    pub tiers: Vec<IncomeRateTier>,
    /// Every stored generation, newest first.
    pub history: Vec<IncomeRateTier>,
}

pub fn trainer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trainers).post(create_trainer))
        .route("/:id", get(get_trainer).patch(update_trainer))
        .route(
            "/:id/income-rates",
            get(get_income_rates).put(replace_income_rates),
        )
}

pub async fn list_trainers(State(state): State<AppState>) -> Result<Json<Vec<Trainer>>, ApiError> {
    let trainers = state.trainer_service.list_trainers().await?;
    Ok(Json(trainers))
}

pub async fn create_trainer(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainerRequest>,
) -> Result<Json<Trainer>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("trainer name must not be empty".to_string()));
    }
    if !(1..=3).contains(&request.tier) {
        return Err(ApiError::Validation(format!(
            "trainer tier must be 1-3, got {}",
            request.tier
        )));
    }

    let trainer = state.trainer_service.create_trainer(request).await?;
    Ok(Json(trainer))
}

pub async fn get_trainer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Trainer>, ApiError> {
    let trainer = state
        .trainer_service
        .get_trainer(id)
        .await?
        .ok_or(ApiError::NotFound("trainer"))?;
    Ok(Json(trainer))
}

pub async fn update_trainer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTrainerRequest>,
) -> Result<Json<Trainer>, ApiError> {
    if let Some(tier) = request.tier {
        if !(1..=3).contains(&tier) {
            return Err(ApiError::Validation(format!(
                "trainer tier must be 1-3, got {tier}"
            )));
        }
    }

    let trainer = state
        .trainer_service
        .update_trainer(id, request)
        .await?
        .ok_or(ApiError::NotFound("trainer"))?;
    Ok(Json(trainer))
}

/// Rate schedule in force for the week containing the queried date.
pub async fn get_income_rates(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RateQuery>,
) -> Result<Json<IncomeRatesResponse>, ApiError> {
    state
        .trainer_service
        .get_trainer(id)
        .await?
        .ok_or(ApiError::NotFound("trainer"))?;

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let week = WeekBounds::containing(date);

    let tiers = state.income_rate_service.tiers_for_week(id, week.start).await?;
    let history = state.income_rate_service.all_tiers(id).await?;

    Ok(Json(IncomeRatesResponse {
        trainer_id: id,
        week_start: week.start,
        tiers,
        history,
    }))
}

/// Replace one generation of the trainer's rate schedule. The layout is
/// validated here, at write time; reads never re-check it.
pub async fn replace_income_rates(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReplaceRatesRequest>,
) -> Result<Json<Vec<IncomeRateTier>>, ApiError> {
    state
        .trainer_service
        .get_trainer(id)
        .await?
        .ok_or(ApiError::NotFound("trainer"))?;

    validate_rate_tiers(&request.tiers).map_err(ApiError::Validation)?;

    let effective_from = request.effective_from.unwrap_or_else(|| Utc::now().date_naive());
    let tiers = state
        .income_rate_service
        .replace_tiers(id, effective_from, &request.tiers)
        .await?;
    Ok(Json(tiers))
}
