use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::client::TrainingMode;

/// Flat amount added to the base price for `1v2` classes when neither the
/// pricing row nor the client carries its own premium.
pub const DEFAULT_MODE_PREMIUM: f64 = 20.0;

/// One volume bracket of the global base-price table. Brackets are keyed by
/// the package's own capacity (sessions purchased in that package), not a
/// cumulative lifetime count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PricingRow {
    pub id: i64,
    pub tier: i16,
    pub sessions_min: i32,
    pub sessions_max: Option<i32>,
    pub price: f64,
    pub mode_1v2_premium: f64,
}

/// Admin edit shape: a pricing row without its generated id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRowInput {
    pub tier: i16,
    pub sessions_min: i32,
    pub sessions_max: Option<i32>,
    pub price: f64,
    #[serde(default = "default_premium")]
    pub mode_1v2_premium: f64,
}

fn default_premium() -> f64 {
    DEFAULT_MODE_PREMIUM
}

/// In-memory snapshot of the pricing table. Constructed from persisted rows
/// and swapped wholesale on reload; lookups never touch the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingTable {
    rows: Vec<PricingRow>,
}

impl PricingTable {
    pub fn new(rows: Vec<PricingRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PricingRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bracket covering `sessions_purchased` for a trainer tier.
    pub fn bracket_for(&self, tier: i16, sessions_purchased: i32) -> Option<&PricingRow> {
        self.rows.iter().find(|row| {
            row.tier == tier
                && sessions_purchased >= row.sessions_min
                && row.sessions_max.map_or(true, |max| sessions_purchased <= max)
        })
    }

    /// Base price for one class out of a package of `sessions_purchased`.
    /// `1v2` adds the bracket's flat premium; `2v2` prices like `1v1`.
    /// Returns 0.0 when no bracket is configured - seeding guarantees the
    /// three brackets exist for every tier, so a zero here means the store
    /// was edited out from under us and the read must still not fail.
    pub fn price_for(&self, tier: i16, sessions_purchased: i32, mode: TrainingMode) -> f64 {
        let Some(row) = self.bracket_for(tier, sessions_purchased) else {
            return 0.0;
        };
        match mode {
            TrainingMode::OneOnTwo => row.price + row.mode_1v2_premium,
            TrainingMode::OneOnOne | TrainingMode::TwoOnTwo => row.price,
        }
    }
}

/// Default table: three volume brackets (1-12, 13-20, 21+) per trainer tier.
pub fn default_pricing_rows() -> Vec<PricingRowInput> {
    let tiers: [(i16, [f64; 3]); 3] = [
        (1, [150.0, 140.0, 130.0]),
        (2, [130.0, 120.0, 110.0]),
        (3, [110.0, 100.0, 90.0]),
    ];

    let mut rows = Vec::with_capacity(9);
    for (tier, prices) in tiers {
        rows.push(PricingRowInput {
            tier,
            sessions_min: 1,
            sessions_max: Some(12),
            price: prices[0],
            mode_1v2_premium: DEFAULT_MODE_PREMIUM,
        });
        rows.push(PricingRowInput {
            tier,
            sessions_min: 13,
            sessions_max: Some(20),
            price: prices[1],
            mode_1v2_premium: DEFAULT_MODE_PREMIUM,
        });
        rows.push(PricingRowInput {
            tier,
            sessions_min: 21,
            sessions_max: None,
            price: prices[2],
            mode_1v2_premium: DEFAULT_MODE_PREMIUM,
        });
    }
    rows
}
