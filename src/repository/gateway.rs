//! Gateway repository

use crate::domain::{CreateGatewayInput, Gateway, StringUuid, UpdateGatewayInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatewayRepository: Send + Sync {
    async fn create(&self, input: &CreateGatewayInput) -> Result<Gateway>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Gateway>>;
    async fn find_by_name_in_domain(
        &self,
        domain_id: StringUuid,
        name: &str,
    ) -> Result<Option<Gateway>>;
    async fn list_by_domain(
        &self,
        domain_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Gateway>>;
    async fn count_by_domain(&self, domain_id: StringUuid) -> Result<i64>;
    async fn update(&self, id: StringUuid, input: &UpdateGatewayInput) -> Result<Gateway>;
}

pub struct GatewayRepositoryImpl {
    pool: MySqlPool,
}

impl GatewayRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GatewayRepository for GatewayRepositoryImpl {
    async fn create(&self, input: &CreateGatewayInput) -> Result<Gateway> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO gateways (id, domain_id, name, address, port, protocol, username, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.domain_id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(input.port)
        .bind(input.protocol)
        .bind(&input.username)
        .bind(&input.comment)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create gateway")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Gateway>> {
        let gateway = sqlx::query_as::<_, Gateway>(
            r#"
            SELECT id, domain_id, name, address, port, protocol, username, comment, created_at, updated_at
            FROM gateways
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(gateway)
    }

    async fn find_by_name_in_domain(
        &self,
        domain_id: StringUuid,
        name: &str,
    ) -> Result<Option<Gateway>> {
        let gateway = sqlx::query_as::<_, Gateway>(
            r#"
            SELECT id, domain_id, name, address, port, protocol, username, comment, created_at, updated_at
            FROM gateways
            WHERE domain_id = ? AND name = ?
            "#,
        )
        .bind(domain_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(gateway)
    }

    async fn list_by_domain(
        &self,
        domain_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Gateway>> {
        let gateways = sqlx::query_as::<_, Gateway>(
            r#"
            SELECT id, domain_id, name, address, port, protocol, username, comment, created_at, updated_at
            FROM gateways
            WHERE domain_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(domain_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(gateways)
    }

    async fn count_by_domain(&self, domain_id: StringUuid) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gateways WHERE domain_id = ?")
            .bind(domain_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, id: StringUuid, input: &UpdateGatewayInput) -> Result<Gateway> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gateway {} not found", id)))?;

        let domain_id = input.domain_id.unwrap_or(existing.domain_id);
        let name = input.name.as_ref().unwrap_or(&existing.name);
        let address = input.address.as_ref().unwrap_or(&existing.address);
        let port = input.port.unwrap_or(existing.port);
        let protocol = input.protocol.unwrap_or(existing.protocol);
        let username = input.username.as_ref().or(existing.username.as_ref());
        let comment = input.comment.as_ref().or(existing.comment.as_ref());

        sqlx::query(
            r#"
            UPDATE gateways
            SET domain_id = ?, name = ?, address = ?, port = ?, protocol = ?, username = ?, comment = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(domain_id)
        .bind(name)
        .bind(address)
        .bind(port)
        .bind(protocol)
        .bind(username)
        .bind(comment)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update gateway")))
    }
}
