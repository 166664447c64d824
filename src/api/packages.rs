use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{CreatePackageRequest, Package, RebalanceOutcome};

#[derive(Debug, Deserialize)]
pub struct PackageListQuery {
    pub client_id: Option<i64>,
    pub trainer_id: Option<i64>,
}

pub fn package_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_packages).post(create_package))
        .route("/:id", get(get_package).delete(delete_package))
}

pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<PackageListQuery>,
) -> Result<Json<Vec<Package>>, ApiError> {
    let packages = match (query.client_id, query.trainer_id) {
        (Some(client_id), _) => state.package_service.list_for_client(client_id).await?,
        (None, Some(trainer_id)) => state.package_service.list_for_trainer(trainer_id).await?,
        (None, None) => {
            return Err(ApiError::Validation(
                "client_id or trainer_id is required".to_string(),
            ));
        }
    };
    Ok(Json(packages))
}

pub async fn create_package(
    State(state): State<AppState>,
    Json(request): Json<CreatePackageRequest>,
) -> Result<Json<Package>, ApiError> {
    if request.sessions_purchased < 1 {
        return Err(ApiError::Validation(format!(
            "sessions_purchased must be at least 1, got {}",
            request.sessions_purchased
        )));
    }
    if request.sales_bonus.is_some_and(|bonus| bonus < 0.0) {
        return Err(ApiError::Validation("sales_bonus must not be negative".to_string()));
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

    let package = state.package_service.create_package(request).await?;
    Ok(Json(package))
}

pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Package>, ApiError> {
    let package = state
        .package_service
        .get_package(id)
        .await?
        .ok_or(ApiError::NotFound("package"))?;
    Ok(Json(package))
}

/// Delete a package; its sessions move to the newest surviving sibling or
/// become drop-ins. Responds with where they went.
pub async fn delete_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RebalanceOutcome>, ApiError> {
    let outcome = state
        .package_service
        .delete_package(id)
        .await?
        .ok_or(ApiError::NotFound("package"))?;
    Ok(Json(outcome))
}
