//! HTTP middleware for Bastion Core
//!
//! This module provides middleware components for the console API:
//! - JWT authentication and the AuthUser extractor
//! - The organization-admin gate applied to every console route

pub mod admin_gate;
pub mod auth;

pub use admin_gate::admin_gate;
pub use auth::AuthUser;
