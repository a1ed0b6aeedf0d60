//! Gateway business logic

use crate::domain::{CreateGatewayInput, Domain, Gateway, StringUuid, UpdateGatewayInput};
use crate::error::{AppError, Result};
use crate::repository::{DomainRepository, GatewayRepository};
use std::sync::Arc;
use validator::Validate;

pub struct GatewayService<G: GatewayRepository, D: DomainRepository> {
    repo: Arc<G>,
    domain_repo: Arc<D>,
}

impl<G: GatewayRepository, D: DomainRepository> GatewayService<G, D> {
    pub fn new(repo: Arc<G>, domain_repo: Arc<D>) -> Self {
        Self { repo, domain_repo }
    }

    pub async fn create(&self, input: CreateGatewayInput) -> Result<Gateway> {
        input.validate()?;

        // The submitted domain is authoritative; it must exist
        if self.domain_repo.find_by_id(input.domain_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Domain {} not found",
                input.domain_id
            )));
        }

        // Gateway names are unique within their domain
        if self
            .repo
            .find_by_name_in_domain(input.domain_id, &input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Gateway '{}' already exists in this domain",
                input.name
            )));
        }

        self.repo.create(&input).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Gateway> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gateway {} not found", id)))
    }

    pub async fn update(&self, id: StringUuid, input: UpdateGatewayInput) -> Result<Gateway> {
        input.validate()?;

        let existing = self.get(id).await?;

        // Moving to another domain requires the new parent to exist
        if let Some(domain_id) = input.domain_id {
            if domain_id != existing.domain_id
                && self.domain_repo.find_by_id(domain_id).await?.is_none()
            {
                return Err(AppError::NotFound(format!(
                    "Domain {} not found",
                    domain_id
                )));
            }
        }

        let target_domain = input.domain_id.unwrap_or(existing.domain_id);
        let target_name = input.name.as_deref().unwrap_or(&existing.name);

        if target_domain != existing.domain_id || target_name != existing.name {
            if let Some(other) = self
                .repo
                .find_by_name_in_domain(target_domain, target_name)
                .await?
            {
                if other.id != id {
                    return Err(AppError::Conflict(format!(
                        "Gateway '{}' already exists in this domain",
                        target_name
                    )));
                }
            }
        }

        self.repo.update(id, &input).await
    }

    /// Resolve the parent domain and its gateways for a listing page.
    ///
    /// The parent is fetched exactly once and reused for both the existence
    /// check and the page context.
    pub async fn list_for_domain(
        &self,
        domain_id: StringUuid,
        page: i64,
        per_page: i64,
    ) -> Result<(Domain, Vec<Gateway>, i64)> {
        let domain = self
            .domain_repo
            .find_by_id(domain_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Domain {} not found", domain_id)))?;

        let offset = (page - 1) * per_page;
        let gateways = self.repo.list_by_domain(domain_id, offset, per_page).await?;
        let total = self.repo.count_by_domain(domain_id).await?;

        Ok((domain, gateways, total))
    }

    /// Resolve the parent domain for form pre-population. A missing domain is
    /// not an error at form-render time; the caller just leaves the field
    /// unset.
    pub async fn form_defaults(&self, domain_id: StringUuid) -> Result<Option<Domain>> {
        self.domain_repo.find_by_id(domain_id).await
    }
}
