//! Domain repository

use crate::domain::{CreateDomainInput, Domain, StringUuid, UpdateDomainInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn create(&self, input: &CreateDomainInput) -> Result<Domain>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Domain>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Domain>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Domain>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: StringUuid, input: &UpdateDomainInput) -> Result<Domain>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct DomainRepositoryImpl {
    pool: MySqlPool,
}

impl DomainRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainRepository for DomainRepositoryImpl {
    async fn create(&self, input: &CreateDomainInput) -> Result<Domain> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO domains (id, name, comment, created_at, updated_at)
            VALUES (?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.comment)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create domain")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Domain>> {
        let domain = sqlx::query_as::<_, Domain>(
            r#"
            SELECT id, name, comment, created_at, updated_at
            FROM domains
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(domain)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Domain>> {
        let domain = sqlx::query_as::<_, Domain>(
            r#"
            SELECT id, name, comment, created_at, updated_at
            FROM domains
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(domain)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Domain>> {
        let domains = sqlx::query_as::<_, Domain>(
            r#"
            SELECT id, name, comment, created_at, updated_at
            FROM domains
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(domains)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM domains")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, id: StringUuid, input: &UpdateDomainInput) -> Result<Domain> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Domain {} not found", id)))?;

        let name = input.name.as_ref().unwrap_or(&existing.name);
        let comment = input.comment.as_ref().or(existing.comment.as_ref());

        sqlx::query(
            r#"
            UPDATE domains
            SET name = ?, comment = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(comment)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update domain")))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM domains WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Domain {} not found", id)));
        }

        Ok(())
    }
}
