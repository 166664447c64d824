use anyhow::Result;
use sqlx::PgPool;

use crate::models::{default_pricing_rows, CreateClientRequest, CreateTrainerRequest, TrainingMode};
use crate::services::{ClientService, PricingService, TrainerService};

/// Seeds the baseline data the engine assumes exists: the full pricing
/// bracket table, plus a demo trainer and clients for a fresh install.
/// Every step checks before it writes, so seeding is safe to run at boot.
pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        self.seed_pricing_rows().await?;
        self.seed_demo_trainer().await?;
        self.seed_demo_clients().await?;

        tracing::info!("Database seeding completed!");
        Ok(())
    }

    /// Pricing lookups assume the three volume brackets exist for every
    /// trainer tier; install the stock table when the store is empty.
    async fn seed_pricing_rows(&self) -> Result<()> {
        let pricing_service = PricingService::new(self.pool.clone());

        if pricing_service.row_count().await? == 0 {
            pricing_service.replace_rows(&default_pricing_rows()).await?;
            tracing::info!("Created default pricing table");
        } else {
            pricing_service.reload().await?;
        }

        Ok(())
    }

    async fn seed_demo_trainer(&self) -> Result<()> {
        let trainer_service = TrainerService::new(self.pool.clone());

        if trainer_service.list_trainers().await?.is_empty() {
            trainer_service
                .create_trainer(CreateTrainerRequest {
                    name: "Alex Reyes".to_string(),
                    tier: 1,
                    email: Some("alex.reyes@example.com".to_string()),
                    location: Some("Main Gym".to_string()),
                })
                .await?;
            tracing::info!("Created demo trainer");
        }

        Ok(())
    }

    async fn seed_demo_clients(&self) -> Result<()> {
        let trainer_service = TrainerService::new(self.pool.clone());
        let client_service = ClientService::new(self.pool.clone());

        let trainers = trainer_service.list_trainers().await?;
        let Some(trainer) = trainers.first() else {
            return Ok(());
        };

        if client_service.list_clients().await?.is_empty() {
            let demo_clients = vec![
                CreateClientRequest {
                    name: "Jordan Lee".to_string(),
                    trainer_id: trainer.id,
                    secondary_trainer_id: None,
                    mode: TrainingMode::OneOnOne,
                    price_1_12: None,
                    price_13_20: None,
                    price_21_plus: None,
                    mode_premium: None,
                    is_personal_client: true,
                    location: Some("Main Gym".to_string()),
                },
                CreateClientRequest {
                    name: "Sam Okafor".to_string(),
                    trainer_id: trainer.id,
                    secondary_trainer_id: None,
                    mode: TrainingMode::OneOnTwo,
                    price_1_12: None,
                    price_13_20: None,
                    price_21_plus: None,
                    mode_premium: None,
                    is_personal_client: false,
                    location: Some("Main Gym".to_string()),
                },
            ];

            for client_data in demo_clients {
                client_service.create_client(client_data).await?;
                tracing::info!("Created demo client");
            }
        }

        Ok(())
    }
}
