use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::models::{CreateTrainerRequest, Trainer, UpdateTrainerRequest};
use crate::services::IncomeRateService;

#[derive(Clone)]
pub struct TrainerService {
    db: PgPool,
    income_rates: IncomeRateService,
}

impl TrainerService {
    pub fn new(db: PgPool) -> Self {
        let income_rates = IncomeRateService::new(db.clone());
        Self { db, income_rates }
    }

    /// Create a trainer and install the stock income-rate table so weekly
    /// reports work from day one.
    pub async fn create_trainer(&self, request: CreateTrainerRequest) -> Result<Trainer> {
        let trainer = sqlx::query_as::<_, Trainer>(
            r#"
            INSERT INTO trainers (name, tier, email, location)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(request.tier)
        .bind(&request.email)
        .bind(&request.location)
        .fetch_one(&self.db)
        .await?;

        self.income_rates
            .seed_default_tiers(trainer.id, Utc::now().date_naive())
            .await?;

        info!(trainer_id = trainer.id, name = %trainer.name, "trainer created");
        Ok(trainer)
    }

    pub async fn get_trainer(&self, id: i64) -> Result<Option<Trainer>> {
        let trainer = sqlx::query_as::<_, Trainer>("SELECT * FROM trainers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(trainer)
    }

    pub async fn list_trainers(&self) -> Result<Vec<Trainer>> {
        let trainers = sqlx::query_as::<_, Trainer>("SELECT * FROM trainers ORDER BY name")
            .fetch_all(&self.db)
            .await?;
        Ok(trainers)
    }

    pub async fn update_trainer(
        &self,
        id: i64,
        request: UpdateTrainerRequest,
    ) -> Result<Option<Trainer>> {
        let trainer = sqlx::query_as::<_, Trainer>(
            r#"
            UPDATE trainers
            SET name = COALESCE($2, name),
                tier = COALESCE($3, tier),
                email = COALESCE($4, email),
                is_active = COALESCE($5, is_active),
                location = COALESCE($6, location)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.tier)
        .bind(&request.email)
        .bind(request.is_active)
        .bind(&request.location)
        .fetch_optional(&self.db)
        .await?;
        Ok(trainer)
    }
}
