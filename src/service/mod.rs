//! Business logic layer

pub mod domain;
pub mod gateway;

pub use domain::DomainService;
pub use gateway::GatewayService;
