use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use super::error::ApiError;
use super::routes::AppState;
use crate::models::{PricingRow, PricingRowInput};

pub fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_pricing).put(replace_pricing))
        .route("/reload", post(reload_pricing))
}

/// Current pricing snapshot, as served to the pricing engine. Reads come
/// from memory, not the database.
pub async fn get_pricing(State(state): State<AppState>) -> Result<Json<Vec<PricingRow>>, ApiError> {
    Ok(Json(state.pricing_service.table().rows().to_vec()))
}

/// Replace the whole pricing table. The engine picks up the new rows as soon
/// as the swap lands; in-flight reads keep the old snapshot.
pub async fn replace_pricing(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<PricingRowInput>>,
) -> Result<Json<Vec<PricingRow>>, ApiError> {
    if inputs.is_empty() {
        return Err(ApiError::Validation("pricing table must not be empty".to_string()));
    }
    for input in &inputs {
        if !(1..=3).contains(&input.tier) {
            return Err(ApiError::Validation(format!(
                "pricing tier must be 1-3, got {}",
                input.tier
            )));
        }
        if input.sessions_min < 1 {
            return Err(ApiError::Validation(format!(
                "sessions_min must be at least 1, got {}",
                input.sessions_min
            )));
        }
        if input.price < 0.0 || input.mode_1v2_premium < 0.0 {
            return Err(ApiError::Validation(
                "prices and premiums must not be negative".to_string(),
            ));
        }
    }

    let table = state.pricing_service.replace_rows(&inputs).await?;
    Ok(Json(table.rows().to_vec()))
}

/// Re-read the pricing rows from the database, for out-of-band edits.
pub async fn reload_pricing(
    State(state): State<AppState>,
) -> Result<Json<Vec<PricingRow>>, ApiError> {
    let table = state.pricing_service.reload().await?;
    Ok(Json(table.rows().to_vec()))
}
