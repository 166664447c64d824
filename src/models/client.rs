use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use super::pricing::DEFAULT_MODE_PREMIUM;

/// Training format. `1v2` carries a flat premium on top of the base price;
/// `2v2` is a package shared between two clients and prices like `1v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "training_mode")]
pub enum TrainingMode {
    #[serde(rename = "1v1")]
    #[sqlx(rename = "1v1")]
    OneOnOne,
    #[serde(rename = "1v2")]
    #[sqlx(rename = "1v2")]
    OneOnTwo,
    #[serde(rename = "2v2")]
    #[sqlx(rename = "2v2")]
    TwoOnTwo,
}

impl Default for TrainingMode {
    fn default() -> Self {
        TrainingMode::OneOnOne
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: i64,
    pub name: String,
    /// Primary trainer. The personal-client bonus applies only to sessions
    /// this trainer delivers.
    pub trainer_id: i64,
    pub secondary_trainer_id: Option<i64>,
    pub mode: TrainingMode,
    pub price_1_12: Option<f64>,
    pub price_13_20: Option<f64>,
    pub price_21_plus: Option<f64>,
    pub mode_premium: Option<f64>,
    pub is_active: bool,
    pub is_personal_client: bool,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Per-client override price for one class out of a package of
    /// `sessions_purchased`. Returns Some only when the client carries a full
    /// override set (all three bracket prices); partial rows fall back to the
    /// global tier table at the call site. Trainer tier is ignored here.
    pub fn price_per_class(&self, sessions_purchased: i32, mode: TrainingMode) -> Option<f64> {
        let price_1_12 = self.price_1_12?;
        let price_13_20 = self.price_13_20?;
        let price_21_plus = self.price_21_plus?;

        let base = if sessions_purchased <= 12 {
            price_1_12
        } else if sessions_purchased <= 20 {
            price_13_20
        } else {
            price_21_plus
        };

        match mode {
            TrainingMode::OneOnTwo => Some(base + self.mode_premium.unwrap_or(DEFAULT_MODE_PREMIUM)),
            TrainingMode::OneOnOne | TrainingMode::TwoOnTwo => Some(base),
        }
    }

    pub fn has_price_overrides(&self) -> bool {
        self.price_1_12.is_some() && self.price_13_20.is_some() && self.price_21_plus.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub trainer_id: i64,
    pub secondary_trainer_id: Option<i64>,
    #[serde(default)]
    pub mode: TrainingMode,
    pub price_1_12: Option<f64>,
    pub price_13_20: Option<f64>,
    pub price_21_plus: Option<f64>,
    pub mode_premium: Option<f64>,
    #[serde(default)]
    pub is_personal_client: bool,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub trainer_id: Option<i64>,
    pub secondary_trainer_id: Option<i64>,
    pub mode: Option<TrainingMode>,
    pub price_1_12: Option<f64>,
    pub price_13_20: Option<f64>,
    pub price_21_plus: Option<f64>,
    pub mode_premium: Option<f64>,
    pub is_active: Option<bool>,
    pub is_personal_client: Option<bool>,
    pub location: Option<String>,
}

/// Dashboard row: compact package history for one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRow {
    pub client_id: i64,
    pub client_name: String,
    pub mode: TrainingMode,
    pub is_personal_client: bool,
    /// Capacities of the displayed packages, e.g. "10 + 5" when an old
    /// nearly-exhausted package overlaps a fresh one.
    pub purchased: String,
    pub used: i64,
    /// May go negative: rebalanced packages and drop-in-only clients surface
    /// their deficit instead of hiding it.
    pub remaining: i64,
    pub week_count: i64,
}
