//! Data access layer (Repository pattern)

pub mod audit;
pub mod domain;
pub mod gateway;

pub use audit::AuditRepository;
pub use domain::DomainRepository;
pub use gateway::GatewayRepository;
