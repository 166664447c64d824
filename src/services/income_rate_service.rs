use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use crate::models::{default_rate_tiers, IncomeRateTier, RateTierInput};

/// Storage for per-trainer income-rate tables, versioned by generation.
///
/// A generation is the set of rows sharing one `effective_from` date.
/// Historical weeks keep their payouts because a new generation never
/// touches older rows; [`tiers_for_week`](Self::tiers_for_week) picks the
/// newest generation dated on or before the week being computed.
#[derive(Clone)]
pub struct IncomeRateService {
    db: PgPool,
}

impl IncomeRateService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The rate table generation governing the week starting at `week_start`:
    /// the newest generation with `effective_from <= week_start`. When every
    /// generation is dated later than the week, the oldest one applies, so a
    /// backdated week still pays out. Empty only for trainers with no rates
    /// at all.
    pub async fn tiers_for_week(
        &self,
        trainer_id: i64,
        week_start: NaiveDate,
    ) -> Result<Vec<IncomeRateTier>> {
        let mut generation = sqlx::query_scalar::<_, Option<NaiveDate>>(
            r#"
            SELECT MAX(effective_from) FROM income_rate_tiers
            WHERE trainer_id = $1 AND effective_from <= $2
            "#,
        )
        .bind(trainer_id)
        .bind(week_start)
        .fetch_one(&self.db)
        .await?;

        if generation.is_none() {
            generation = sqlx::query_scalar::<_, Option<NaiveDate>>(
                "SELECT MIN(effective_from) FROM income_rate_tiers WHERE trainer_id = $1",
            )
            .bind(trainer_id)
            .fetch_one(&self.db)
            .await?;
        }

        let Some(effective_from) = generation else {
            return Ok(Vec::new());
        };

        self.generation_rows(trainer_id, effective_from).await
    }

    /// Every rate row the trainer has, newest generation first. Used by the
    /// API to show the full history behind the current table.
    pub async fn all_tiers(&self, trainer_id: i64) -> Result<Vec<IncomeRateTier>> {
        let tiers = sqlx::query_as::<_, IncomeRateTier>(
            r#"
            SELECT * FROM income_rate_tiers
            WHERE trainer_id = $1
            ORDER BY effective_from DESC, min_classes
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;
        Ok(tiers)
    }

    /// Write a generation, replacing any rows already stored under the same
    /// `effective_from`. Callers validate the tier layout before getting
    /// here; this only persists.
    pub async fn replace_tiers(
        &self,
        trainer_id: i64,
        effective_from: NaiveDate,
        inputs: &[RateTierInput],
    ) -> Result<Vec<IncomeRateTier>> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "DELETE FROM income_rate_tiers WHERE trainer_id = $1 AND effective_from = $2",
        )
        .bind(trainer_id)
        .bind(effective_from)
        .execute(&mut *tx)
        .await?;

        for input in inputs {
            sqlx::query(
                r#"
                INSERT INTO income_rate_tiers
                    (trainer_id, min_classes, max_classes, rate, effective_from)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(trainer_id)
            .bind(input.min_classes)
            .bind(input.max_classes)
            .bind(input.rate)
            .bind(effective_from)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            trainer_id,
            %effective_from,
            tiers = inputs.len(),
            "income rate generation stored"
        );

        self.generation_rows(trainer_id, effective_from).await
    }

    /// Seed the stock 0.46 / 0.51 table for a freshly created trainer.
    pub async fn seed_default_tiers(
        &self,
        trainer_id: i64,
        effective_from: NaiveDate,
    ) -> Result<Vec<IncomeRateTier>> {
        self.replace_tiers(trainer_id, effective_from, &default_rate_tiers())
            .await
    }

    async fn generation_rows(
        &self,
        trainer_id: i64,
        effective_from: NaiveDate,
    ) -> Result<Vec<IncomeRateTier>> {
        let tiers = sqlx::query_as::<_, IncomeRateTier>(
            r#"
            SELECT * FROM income_rate_tiers
            WHERE trainer_id = $1 AND effective_from = $2
            ORDER BY min_classes
            "#,
        )
        .bind(trainer_id)
        .bind(effective_from)
        .fetch_all(&self.db)
        .await?;
        Ok(tiers)
    }
}
