//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware;
use crate::repository::{
    audit::AuditRepositoryImpl, domain::DomainRepositoryImpl, gateway::GatewayRepositoryImpl,
};
use crate::service::{DomainService, GatewayService};
use crate::state::ConsoleState;
use anyhow::Result;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub domain_service: Arc<DomainService<DomainRepositoryImpl>>,
    pub gateway_service: Arc<GatewayService<GatewayRepositoryImpl, DomainRepositoryImpl>>,
    pub audit_repo: Arc<AuditRepositoryImpl>,
    pub jwt_manager: JwtManager,
}

impl ConsoleState for AppState {
    type DomainRepo = DomainRepositoryImpl;
    type GatewayRepo = GatewayRepositoryImpl;
    type AuditRepo = AuditRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn domain_service(&self) -> &DomainService<Self::DomainRepo> {
        &self.domain_service
    }

    fn gateway_service(&self) -> &GatewayService<Self::GatewayRepo, Self::DomainRepo> {
        &self.gateway_service
    }

    fn audit_repo(&self) -> &Self::AuditRepo {
        &self.audit_repo
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    // Create database connection pool
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    // Create repositories
    let domain_repo = Arc::new(DomainRepositoryImpl::new(db_pool.clone()));
    let gateway_repo = Arc::new(GatewayRepositoryImpl::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditRepositoryImpl::new(db_pool.clone()));

    // Create JWT manager
    let jwt_manager = JwtManager::new(config.jwt.clone());

    // Create services
    let domain_service = Arc::new(DomainService::new(domain_repo.clone()));
    let gateway_service = Arc::new(GatewayService::new(gateway_repo, domain_repo));

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        domain_service,
        gateway_service,
        audit_repo,
        jwt_manager,
    };

    let app = build_router(state);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router with generic state type
///
/// This function is generic over the state type, allowing it to work with
/// both production `AppState` and test implementations that implement
/// `ConsoleState`. The organization-admin gate wraps every console route;
/// health probes stay outside it.
pub fn build_router<S: ConsoleState>(state: S) -> Router {
    let cors = cors_layer(state.config());

    let console = Router::new()
        // Domain endpoints
        .route("/domains", get(api::domain::list::<S>))
        .route(
            "/domains/create",
            get(api::domain::create_form).post(api::domain::create::<S>),
        )
        .route(
            "/domains/{id}/update",
            get(api::domain::update_form::<S>).post(api::domain::update::<S>),
        )
        .route("/domains/{id}", get(api::domain::detail::<S>))
        .route(
            "/domains/{id}/delete",
            get(api::domain::delete_confirm::<S>).post(api::domain::delete::<S>),
        )
        // Gateway endpoints (scoped to their domain)
        .route("/domains/{id}/gateways", get(api::gateway::list::<S>))
        .route(
            "/domains/{id}/gateways/create",
            get(api::gateway::create_form::<S>).post(api::gateway::create::<S>),
        )
        .route(
            "/gateways/{id}/update",
            get(api::gateway::update_form::<S>).post(api::gateway::update::<S>),
        )
        // Audit logs
        .route("/audit-logs", get(api::audit::list::<S>))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::admin_gate::<S>,
        ));

    Router::new()
        // Health endpoints (outside the gate)
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .merge(console)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
