use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{Client, ClientRow, CreateClientRequest, UpdateClientRequest};

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    /// Restrict to clients this trainer works with (primary or secondary).
    pub trainer_id: Option<i64>,
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ClientRowsQuery {
    pub trainer_id: i64,
    /// Any date inside the week the `week_count` column should cover;
    /// defaults to today.
    pub date: Option<NaiveDate>,
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/rows", get(get_client_rows))
        .route("/:id", get(get_client).patch(update_client))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = match query.trainer_id {
        Some(trainer_id) => {
            state
                .client_service
                .list_for_trainer(trainer_id, query.include_inactive.unwrap_or(false))
                .await?
        }
        None => state.client_service.list_clients().await?,
    };
    Ok(Json(clients))
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("client name must not be empty".to_string()));
    }
    state
        .trainer_service
        .get_trainer(request.trainer_id)
        .await?
        .ok_or(ApiError::Validation(format!(
            "trainer {} does not exist",
            request.trainer_id
        )))?;

    let client = state.client_service.create_client(request).await?;
    Ok(Json(client))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    let client = state
        .client_service
        .get_client(id)
        .await?
        .ok_or(ApiError::NotFound("client"))?;
    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    let client = state
        .client_service
        .update_client(id, request)
        .await?
        .ok_or(ApiError::NotFound("client"))?;
    Ok(Json(client))
}

/// Dashboard rows: package usage display per active client of the trainer.
pub async fn get_client_rows(
    State(state): State<AppState>,
    Query(query): Query<ClientRowsQuery>,
) -> Result<Json<Vec<ClientRow>>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let rows = state
        .client_summary_service
        .rows_for_trainer(query.trainer_id, date)
        .await?;
    Ok(Json(rows))
}
