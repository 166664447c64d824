use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Independent of packages; counts toward weekly income in the week it was
/// charged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LateFee {
    pub id: i64,
    pub client_id: i64,
    pub trainer_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLateFeeRequest {
    pub client_id: i64,
    pub trainer_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
}
