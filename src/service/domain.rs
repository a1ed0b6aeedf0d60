//! Domain business logic

use crate::domain::{CreateDomainInput, Domain, StringUuid, UpdateDomainInput};
use crate::error::{AppError, Result};
use crate::repository::DomainRepository;
use std::sync::Arc;
use validator::Validate;

pub struct DomainService<R: DomainRepository> {
    repo: Arc<R>,
}

impl<R: DomainRepository> DomainService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateDomainInput) -> Result<Domain> {
        input.validate()?;

        // Check for duplicate name
        if self.repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Domain '{}' already exists",
                input.name
            )));
        }

        self.repo.create(&input).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Domain> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Domain {} not found", id)))
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Domain>, i64)> {
        let offset = (page - 1) * per_page;
        let domains = self.repo.list(offset, per_page).await?;
        let total = self.repo.count().await?;
        Ok((domains, total))
    }

    pub async fn update(&self, id: StringUuid, input: UpdateDomainInput) -> Result<Domain> {
        input.validate()?;

        let existing = self.get(id).await?;

        if let Some(name) = input.name.as_deref() {
            if name != existing.name && self.repo.find_by_name(name).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Domain '{}' already exists",
                    name
                )));
            }
        }

        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<Domain> {
        // Gateways owned by the domain are removed by the FK cascade
        let existing = self.get(id).await?;
        self.repo.delete(id).await?;
        Ok(existing)
    }
}
