use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One commission tier of a trainer's rate schedule. Tiers sharing a
/// (trainer_id, effective_from) pair form one generation; the generation in
/// force for a week is resolved by the income-rate service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct IncomeRateTier {
    pub id: i64,
    pub trainer_id: i64,
    pub min_classes: i32,
    pub max_classes: Option<i32>,
    /// Fraction of the class price the trainer keeps, e.g. 0.46.
    pub rate: f64,
    pub effective_from: NaiveDate,
}

/// Write shape for replacing a trainer's schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTierInput {
    pub min_classes: i32,
    pub max_classes: Option<i32>,
    pub rate: f64,
}

/// Default schedule installed for every new trainer.
pub fn default_rate_tiers() -> Vec<RateTierInput> {
    vec![
        RateTierInput {
            min_classes: 1,
            max_classes: Some(12),
            rate: 0.46,
        },
        RateTierInput {
            min_classes: 13,
            max_classes: None,
            rate: 0.51,
        },
    ]
}

/// Tier the rate scan selects for `class_count`: first covering tier in
/// ascending min_classes order, falling back to the lowest tier when nothing
/// covers the count (a zero-class week against a table starting at 1). None
/// only when the schedule is empty. UI highlighting relies on this returning
/// exactly the tier `rate_for_class_count` uses.
pub fn active_tier_for(tiers: &[IncomeRateTier], class_count: i64) -> Option<&IncomeRateTier> {
    let mut ordered: Vec<&IncomeRateTier> = tiers.iter().collect();
    ordered.sort_by_key(|tier| tier.min_classes);

    ordered
        .iter()
        .find(|tier| {
            class_count >= i64::from(tier.min_classes)
                && tier
                    .max_classes
                    .map_or(true, |max| class_count <= i64::from(max))
        })
        .copied()
        .or_else(|| ordered.first().copied())
}

/// Commission rate for a week with `class_count` delivered classes.
/// An empty schedule yields 0 - the explicit "misconfigured" signal - so a
/// valid week still renders instead of erroring out.
pub fn rate_for_class_count(tiers: &[IncomeRateTier], class_count: i64) -> f64 {
    active_tier_for(tiers, class_count).map_or(0.0, |tier| tier.rate)
}

/// Write-time schedule validation: sorted by min_classes the tiers must start
/// at 1, run contiguously, and end in a single unbounded tier. Returns a
/// human-readable description of the first problem found; never panics. Read
/// paths do not re-validate.
pub fn validate_rate_tiers(tiers: &[RateTierInput]) -> Result<(), String> {
    if tiers.is_empty() {
        return Err("rate schedule must contain at least one tier".to_string());
    }

    let mut ordered: Vec<&RateTierInput> = tiers.iter().collect();
    ordered.sort_by_key(|tier| tier.min_classes);

    if ordered[0].min_classes != 1 {
        return Err(format!(
            "first tier must start at 1 class, found {}",
            ordered[0].min_classes
        ));
    }

    for pair in ordered.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        match current.max_classes {
            None => {
                return Err(format!(
                    "tier starting at {} is unbounded but is not the last tier",
                    current.min_classes
                ));
            }
            Some(max) if max < current.min_classes => {
                return Err(format!(
                    "tier {}-{} ends before it starts",
                    current.min_classes, max
                ));
            }
            // widened: max + 1 overflows i32 when a tier ends at i32::MAX
            Some(max) if i64::from(next.min_classes) != i64::from(max) + 1 => {
                return Err(format!(
                    "tier {}-{} is followed by a tier starting at {}, expected {}",
                    current.min_classes,
                    max,
                    next.min_classes,
                    i64::from(max) + 1
                ));
            }
            Some(_) => {}
        }
    }

    if let Some(last) = ordered.last() {
        match last.max_classes {
            Some(max) if max < last.min_classes => {
                return Err(format!(
                    "tier {}-{} ends before it starts",
                    last.min_classes, max
                ));
            }
            Some(_) => {
                return Err("last tier must be unbounded (no max_classes)".to_string());
            }
            None => {}
        }
    }

    Ok(())
}
