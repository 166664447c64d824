use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{LogSessionsRequest, Package, Session, WeekBounds};
use crate::services::PackageAllocator;

#[derive(Clone)]
pub struct SessionService {
    db: PgPool,
}

impl SessionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Log a batch of delivered sessions for one (client, trainer) pair.
    ///
    /// Each date is allocated against the pair's packages oldest-first, and
    /// every session created in the batch is folded into the in-memory ledger
    /// before the next pick, so a batch cannot double-spend a package's last
    /// slot. Dates with no eligible package are logged as drop-ins
    /// (package_id NULL). The whole batch commits or none of it does.
    pub async fn log_sessions(&self, request: LogSessionsRequest) -> Result<Vec<Session>> {
        let mut tx = self.db.begin().await?;

        let packages = sqlx::query_as::<_, Package>(
            "SELECT * FROM packages WHERE client_id = $1 AND trainer_id = $2",
        )
        .bind(request.client_id)
        .bind(request.trainer_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut ledger = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE client_id = $1 AND trainer_id = $2",
        )
        .bind(request.client_id)
        .bind(request.trainer_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(request.dates.len());
        for &date in &request.dates {
            let package_id = PackageAllocator::pick_package_for_session(
                request.client_id,
                request.trainer_id,
                date,
                &packages,
                &ledger,
            )
            .map(|package| package.id);

            let session = sqlx::query_as::<_, Session>(
                r#"
                INSERT INTO sessions
                    (date, trainer_id, client_id, package_id, mode, location_override)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(date)
            .bind(request.trainer_id)
            .bind(request.client_id)
            .bind(package_id)
            .bind(request.mode)
            .bind(&request.location_override)
            .fetch_one(&mut *tx)
            .await?;

            ledger.push(session.clone());
            created.push(session);
        }

        tx.commit().await?;

        let drop_ins = created.iter().filter(|s| s.package_id.is_none()).count();
        info!(
            client_id = request.client_id,
            trainer_id = request.trainer_id,
            logged = created.len(),
            drop_ins,
            "sessions logged"
        );
        Ok(created)
    }

    pub async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(session)
    }

    pub async fn list_for_trainer_week(
        &self,
        trainer_id: i64,
        week: WeekBounds,
    ) -> Result<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT * FROM sessions
            WHERE trainer_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date, id
            "#,
        )
        .bind(trainer_id)
        .bind(week.start)
        .bind(week.end)
        .fetch_all(&self.db)
        .await?;
        Ok(sessions)
    }

    pub async fn delete_session(&self, id: i64) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
