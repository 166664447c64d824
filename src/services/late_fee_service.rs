use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{CreateLateFeeRequest, LateFee, WeekBounds};

#[derive(Clone)]
pub struct LateFeeService {
    db: PgPool,
}

impl LateFeeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_late_fee(&self, request: CreateLateFeeRequest) -> Result<LateFee> {
        let fee = sqlx::query_as::<_, LateFee>(
            r#"
            INSERT INTO late_fees (client_id, trainer_id, date, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.client_id)
        .bind(request.trainer_id)
        .bind(request.date)
        .bind(request.amount)
        .fetch_one(&self.db)
        .await?;

        info!(
            late_fee_id = fee.id,
            client_id = fee.client_id,
            amount = fee.amount,
            "late fee recorded"
        );
        Ok(fee)
    }

    pub async fn list_for_trainer_week(
        &self,
        trainer_id: i64,
        week: WeekBounds,
    ) -> Result<Vec<LateFee>> {
        let fees = sqlx::query_as::<_, LateFee>(
            r#"
            SELECT * FROM late_fees
            WHERE trainer_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date, id
            "#,
        )
        .bind(trainer_id)
        .bind(week.start)
        .bind(week.end)
        .fetch_all(&self.db)
        .await?;
        Ok(fees)
    }

    pub async fn delete_late_fee(&self, id: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM late_fees WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
