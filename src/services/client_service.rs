use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Client, CreateClientRequest, UpdateClientRequest};

#[derive(Clone)]
pub struct ClientService {
    db: PgPool,
}

impl ClientService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_client(&self, request: CreateClientRequest) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients
                (name, trainer_id, secondary_trainer_id, mode,
                 price_1_12, price_13_20, price_21_plus, mode_premium,
                 is_personal_client, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(request.trainer_id)
        .bind(request.secondary_trainer_id)
        .bind(request.mode)
        .bind(request.price_1_12)
        .bind(request.price_13_20)
        .bind(request.price_21_plus)
        .bind(request.mode_premium)
        .bind(request.is_personal_client)
        .bind(&request.location)
        .fetch_one(&self.db)
        .await?;

        info!(client_id = client.id, name = %client.name, "client created");
        Ok(client)
    }

    pub async fn get_client(&self, id: i64) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(client)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY name")
            .fetch_all(&self.db)
            .await?;
        Ok(clients)
    }

    /// Clients the trainer works with, as primary or secondary trainer.
    /// Inactive clients are hidden unless asked for.
    pub async fn list_for_trainer(
        &self,
        trainer_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE (trainer_id = $1 OR secondary_trainer_id = $1)
              AND (is_active OR $2)
            ORDER BY name
            "#,
        )
        .bind(trainer_id)
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;
        Ok(clients)
    }

    pub async fn update_client(
        &self,
        id: i64,
        request: UpdateClientRequest,
    ) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                trainer_id = COALESCE($3, trainer_id),
                secondary_trainer_id = COALESCE($4, secondary_trainer_id),
                mode = COALESCE($5, mode),
                price_1_12 = COALESCE($6, price_1_12),
                price_13_20 = COALESCE($7, price_13_20),
                price_21_plus = COALESCE($8, price_21_plus),
                mode_premium = COALESCE($9, mode_premium),
                is_active = COALESCE($10, is_active),
                is_personal_client = COALESCE($11, is_personal_client),
                location = COALESCE($12, location)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.trainer_id)
        .bind(request.secondary_trainer_id)
        .bind(request.mode)
        .bind(request.price_1_12)
        .bind(request.price_13_20)
        .bind(request.price_21_plus)
        .bind(request.mode_premium)
        .bind(request.is_active)
        .bind(request.is_personal_client)
        .bind(&request.location)
        .fetch_optional(&self.db)
        .await?;
        Ok(client)
    }
}
