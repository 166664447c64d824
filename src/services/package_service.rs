use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{CreatePackageRequest, Package, RebalanceOutcome};
use crate::services::PackageAllocator;

#[derive(Clone)]
pub struct PackageService {
    db: PgPool,
}

impl PackageService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_package(&self, request: CreatePackageRequest) -> Result<Package> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            INSERT INTO packages
                (client_id, trainer_id, sessions_purchased, start_date,
                 sales_bonus, mode, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.client_id)
        .bind(request.trainer_id)
        .bind(request.sessions_purchased)
        .bind(request.start_date)
        .bind(request.sales_bonus)
        .bind(request.mode)
        .bind(&request.location)
        .fetch_one(&self.db)
        .await?;

        info!(
            package_id = package.id,
            client_id = package.client_id,
            sessions = package.sessions_purchased,
            "package created"
        );
        Ok(package)
    }

    pub async fn get_package(&self, id: i64) -> Result<Option<Package>> {
        let package = sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(package)
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            "SELECT * FROM packages WHERE client_id = $1 ORDER BY start_date, id",
        )
        .bind(client_id)
        .fetch_all(&self.db)
        .await?;
        Ok(packages)
    }

    pub async fn list_for_trainer(&self, trainer_id: i64) -> Result<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            "SELECT * FROM packages WHERE trainer_id = $1 ORDER BY start_date, id",
        )
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;
        Ok(packages)
    }

    /// Delete a package and rehome its sessions in one transaction.
    ///
    /// Orphaned sessions move to the newest surviving package of the same
    /// (client, trainer) pair, or become drop-ins when none is left. Either
    /// everything moves and the row is gone, or nothing changed.
    pub async fn delete_package(&self, id: i64) -> Result<Option<RebalanceOutcome>> {
        let mut tx = self.db.begin().await?;

        let Some(package) = sqlx::query_as::<_, Package>(
            "SELECT * FROM packages WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let survivors = sqlx::query_as::<_, Package>(
            r#"
            SELECT * FROM packages
            WHERE client_id = $1 AND trainer_id = $2 AND id <> $3
            "#,
        )
        .bind(package.client_id)
        .bind(package.trainer_id)
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let target =
            PackageAllocator::rebalance_target(&survivors, package.client_id, package.trainer_id)
                .map(|survivor| survivor.id);

        let moved = sqlx::query("UPDATE sessions SET package_id = $2 WHERE package_id = $1")
            .bind(id)
            .bind(target)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            package_id = id,
            reassigned_to = ?target,
            sessions_moved = moved,
            "package deleted"
        );
        Ok(Some(RebalanceOutcome {
            deleted_package_id: id,
            reassigned_to: target,
            sessions_moved: moved,
        }))
    }
}
