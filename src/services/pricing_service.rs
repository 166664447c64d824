use std::sync::{Arc, RwLock};

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::models::{PricingRow, PricingRowInput, PricingTable};

/// Serves the tier pricing table from an in-memory snapshot and keeps that
/// snapshot in sync with the `pricing_rows` table.
///
/// Pricing is read on every session priced, so handlers never hit the
/// database for it. Writes go through [`replace_rows`](Self::replace_rows)
/// which swaps the snapshot after committing, and an explicit
/// [`reload`](Self::reload) re-reads whatever is in the table.
#[derive(Clone)]
pub struct PricingService {
    db: PgPool,
    table: Arc<RwLock<PricingTable>>,
}

impl PricingService {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            table: Arc::new(RwLock::new(PricingTable::default())),
        }
    }

    /// Current snapshot. Cheap clone of the row vector; a poisoned lock is
    /// recovered by taking the inner value, since the table is plain data.
    pub fn table(&self) -> PricingTable {
        match self.table.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Re-read the pricing rows from the database and swap the snapshot.
    pub async fn reload(&self) -> Result<PricingTable> {
        let rows = self.fetch_rows().await?;
        if rows.is_empty() {
            warn!("pricing table is empty; sessions without client overrides will price at 0");
        }
        let table = PricingTable::new(rows);
        self.swap(table.clone());
        info!(rows = table.rows().len(), "pricing table reloaded");
        Ok(table)
    }

    /// Replace the whole pricing table in one transaction, then swap the
    /// snapshot. Input order is preserved as the scan order.
    pub async fn replace_rows(&self, inputs: &[PricingRowInput]) -> Result<PricingTable> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM pricing_rows")
            .execute(&mut *tx)
            .await?;

        for input in inputs {
            sqlx::query(
                r#"
                INSERT INTO pricing_rows (tier, sessions_min, sessions_max, price, mode_1v2_premium)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(input.tier)
            .bind(input.sessions_min)
            .bind(input.sessions_max)
            .bind(input.price)
            .bind(input.mode_1v2_premium)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let table = PricingTable::new(self.fetch_rows().await?);
        self.swap(table.clone());
        info!(rows = table.rows().len(), "pricing table replaced");
        Ok(table)
    }

    pub async fn fetch_rows(&self) -> Result<Vec<PricingRow>> {
        let rows = sqlx::query_as::<_, PricingRow>(
            "SELECT * FROM pricing_rows ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    pub async fn row_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pricing_rows")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    fn swap(&self, table: PricingTable) {
        match self.table.write() {
            Ok(mut guard) => *guard = table,
            Err(poisoned) => *poisoned.into_inner() = table,
        }
    }
}
