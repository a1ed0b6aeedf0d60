//! Application state trait for dependency injection
//!
//! This module defines the trait that abstracts the application state,
//! enabling the same handler code to work with both production
//! and test implementations.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{AuditRepository, DomainRepository, GatewayRepository};
use crate::service::{DomainService, GatewayService};

/// Trait for application state that provides access to all services.
///
/// This trait enables dependency injection by allowing handlers to work
/// with any type that provides the required services, whether that's
/// the production `AppState` or a test implementation.
pub trait ConsoleState: Clone + Send + Sync + 'static {
    /// The domain repository type
    type DomainRepo: DomainRepository;
    /// The gateway repository type
    type GatewayRepo: GatewayRepository;
    /// The audit repository type
    type AuditRepo: AuditRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the domain service
    fn domain_service(&self) -> &DomainService<Self::DomainRepo>;

    /// Get the gateway service
    fn gateway_service(&self) -> &GatewayService<Self::GatewayRepo, Self::DomainRepo>;

    /// Get the audit repository
    fn audit_repo(&self) -> &Self::AuditRepo;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Check if the system is ready (database is healthy)
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
