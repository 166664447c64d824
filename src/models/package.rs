use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::client::TrainingMode;

/// A block of prepaid sessions. Capacity is enforced at allocation time, not
/// retroactively: rebalancing after a deletion may push a package past its
/// capacity, and the read path must tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Package {
    pub id: i64,
    pub client_id: i64,
    pub trainer_id: i64,
    pub sessions_purchased: i32,
    /// Inclusive eligibility floor: a package never absorbs a session dated
    /// before this, but a session on the exact date is eligible.
    pub start_date: NaiveDate,
    /// Flat amount credited once, in the week the package was purchased.
    pub sales_bonus: Option<f64>,
    pub mode: Option<TrainingMode>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackageRequest {
    pub client_id: i64,
    pub trainer_id: i64,
    pub sessions_purchased: i32,
    pub start_date: NaiveDate,
    pub sales_bonus: Option<f64>,
    pub mode: Option<TrainingMode>,
    pub location: Option<String>,
}

/// What happened to a deleted package's sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceOutcome {
    pub deleted_package_id: i64,
    /// Package that absorbed the orphaned sessions; None means they became
    /// drop-ins.
    pub reassigned_to: Option<i64>,
    pub sessions_moved: u64,
}
