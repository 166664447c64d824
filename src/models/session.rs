use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::client::TrainingMode;

/// One delivered class. `package_id` is None for drop-ins and for sessions
/// orphaned by a package deletion with no surviving sibling.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i64,
    pub date: NaiveDate,
    pub trainer_id: i64,
    pub client_id: i64,
    pub package_id: Option<i64>,
    pub mode: Option<TrainingMode>,
    pub location_override: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Batch class log: one session per date, each allocated to a package in
/// order so a batch cannot double-spend a package's last slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSessionsRequest {
    pub client_id: i64,
    pub trainer_id: i64,
    pub dates: Vec<NaiveDate>,
    pub mode: Option<TrainingMode>,
    pub location_override: Option<String>,
}
