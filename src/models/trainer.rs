use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
    /// Pricing/commission level, 1-3. Drives the base price table.
    pub tier: i16,
    pub email: Option<String>,
    pub is_active: bool,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrainerRequest {
    pub name: String,
    pub tier: i16,
    pub email: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTrainerRequest {
    pub name: Option<String>,
    pub tier: Option<i16>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub location: Option<String>,
}
