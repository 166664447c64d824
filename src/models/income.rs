use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::income_rate::IncomeRateTier;

/// What a breakdown row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    /// A package purchased this week; amount is the gross package value.
    Package,
    /// Flat sales bonus credited with a purchase.
    SalesBonus,
    /// One delivered class; amount is the gross per-class price.
    Class,
    LateFee,
}

/// One line of the weekly income view. Rows are sorted by (date, client name)
/// so a client's transactions on the same day cluster together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub date: NaiveDate,
    pub client_id: i64,
    pub client_name: String,
    pub kind: BreakdownKind,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub total_classes: i64,
    /// Base commission rate for the week's class count. Personal-client
    /// sessions add 0.10 on top, per session, inside class_income.
    pub rate: f64,
    pub class_income: f64,
    pub bonus_income: f64,
    pub late_fee_income: f64,
    pub final_weekly_income: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyIncomeReport {
    pub trainer_id: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub rows: Vec<BreakdownRow>,
    pub summary: IncomeSummary,
    /// Tier the week's class count landed in, for UI highlighting.
    pub active_tier: Option<IncomeRateTier>,
}
