//! REST API shared utilities (response types, pagination, redirects, audit helpers)

pub mod audit;
pub mod context;
pub mod domain;
pub mod gateway;
pub mod health;

use crate::domain::StringUuid;
use crate::middleware::auth::AuthUser;
use crate::repository::audit::CreateAuditLogInput;
use crate::repository::AuditRepository;
use crate::state::ConsoleState;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Maximum allowed per_page value for pagination
pub(crate) const MAX_PER_PAGE: i64 = 100;

/// Name of the cookie carrying the transient success message shown on the
/// next page after a redirect
pub(crate) const FLASH_COOKIE: &str = "console_flash";

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "limit"
    )]
    pub per_page: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_per_page() -> i64 {
    20
}

/// Reject page values less than 1
pub(crate) fn deserialize_page<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 1 {
        return Err(serde::de::Error::custom(
            "page must be a positive integer (>= 1)",
        ));
    }
    Ok(value)
}

/// Reject per_page values less than 1, clamp to MAX_PER_PAGE
pub(crate) fn deserialize_per_page<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 1 {
        return Err(serde::de::Error::custom(
            "per_page must be a positive integer (>= 1)",
        ));
    }
    Ok(value.min(MAX_PER_PAGE))
}

/// Pagination block attached to listing payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = (total as f64 / per_page as f64).ceil() as i64;
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// 303 redirect to `location` carrying a transient success message for the
/// next page in a short-lived cookie.
pub fn see_other(location: &str, message: &str) -> Response {
    let cookie = format!(
        "{}={}; Path=/; Max-Age=60; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    );

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}

/// Write an audit log entry. Best-effort: failures are logged, never
/// surfaced to the caller.
pub async fn write_audit_log<S: ConsoleState>(
    state: &S,
    auth: &AuthUser,
    headers: &HeaderMap,
    action: &str,
    resource_type: &str,
    resource_id: Option<StringUuid>,
    old_value: Option<serde_json::Value>,
    new_value: Option<serde_json::Value>,
) {
    let input = CreateAuditLogInput {
        actor_id: Some(StringUuid::from(auth.user_id)),
        action: action.to_string(),
        resource_type: resource_type.to_string(),
        resource_id,
        old_value,
        new_value,
        ip_address: extract_ip(headers),
    };

    if let Err(e) = state.audit_repo().create(&input).await {
        tracing::warn!(action = %action, "Failed to write audit log: {:?}", e);
    }
}

pub(crate) fn extract_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("x-forwarded-for") {
        if let Ok(forwarded) = value.to_str() {
            if let Some(first) = forwarded.split(',').next() {
                let trimmed = first.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    if let Some(value) = headers.get("x-real-ip") {
        if let Ok(real_ip) = value.to_str() {
            if !real_ip.trim().is_empty() {
                return Some(real_ip.trim().to_string());
            }
        }
    }

    None
}
