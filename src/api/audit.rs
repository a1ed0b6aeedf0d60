//! Audit log API handlers

use crate::api::context::{ListView, Locale, ViewContext};
use crate::api::PaginationMeta;
use crate::error::Result;
use crate::repository::audit::AuditLogQuery;
use crate::repository::AuditRepository;
use crate::state::ConsoleState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

/// List audit logs
pub async fn list<S: ConsoleState>(
    State(state): State<S>,
    Query(query): Query<AuditLogQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);
    let logs = state.audit_repo().find(&query).await?;
    let total = state.audit_repo().count(&query).await?;

    let per_page = query.limit.unwrap_or(50).clamp(1, 100);
    let page = query.offset.unwrap_or(0) / per_page + 1;

    Ok(Json(ListView {
        context: ViewContext::page(locale, "action.audit_log_list"),
        data: logs,
        pagination: PaginationMeta::new(page, per_page, total),
    }))
}
