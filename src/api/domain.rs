//! Domain API handlers

use crate::api::context::{FormMode, FormView, initial_values, DetailView, ListView, Locale, ViewContext};
use crate::api::{see_other, write_audit_log, PaginationMeta, PaginationQuery};
use crate::domain::{CreateDomainInput, StringUuid, UpdateDomainInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::ConsoleState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};

/// List domains
pub async fn list<S: ConsoleState>(
    State(state): State<S>,
    Query(pagination): Query<PaginationQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);
    let (domains, total) = state
        .domain_service()
        .list(pagination.page, pagination.per_page)
        .await?;

    Ok(Json(ListView {
        context: ViewContext::page(locale, "action.domain_list"),
        data: domains,
        pagination: PaginationMeta::new(pagination.page, pagination.per_page, total),
    }))
}

/// Domain create form
pub async fn create_form(headers: HeaderMap) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);

    Ok(Json(FormView {
        context: ViewContext::form(locale, "action.create_domain", FormMode::Create),
        initial: initial_values([]),
    }))
}

/// Create domain
pub async fn create<S: ConsoleState>(
    State(state): State<S>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(input): Json<CreateDomainInput>,
) -> Result<Response> {
    let domain = state.domain_service().create(input).await?;
    write_audit_log(
        &state,
        &auth,
        &headers,
        "domain.create",
        "domain",
        Some(domain.id),
        None,
        serde_json::to_value(&domain).ok(),
    )
    .await;

    Ok(see_other(
        "/domains",
        &format!("{} was created successfully", domain.name),
    ))
}

/// Domain update form
pub async fn update_form<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);
    let domain = state.domain_service().get(id).await?;

    Ok(Json(FormView {
        context: ViewContext::form(locale, "action.update_domain", FormMode::Update),
        initial: initial_values([
            ("name", serde_json::Value::String(domain.name)),
            (
                "comment",
                domain
                    .comment
                    .map(serde_json::Value::String)
                    .unwrap_or(serde_json::Value::Null),
            ),
        ]),
    }))
}

/// Update domain
pub async fn update<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(input): Json<UpdateDomainInput>,
) -> Result<Response> {
    let before = state.domain_service().get(id).await?;
    let domain = state.domain_service().update(id, input).await?;
    write_audit_log(
        &state,
        &auth,
        &headers,
        "domain.update",
        "domain",
        Some(domain.id),
        serde_json::to_value(&before).ok(),
        serde_json::to_value(&domain).ok(),
    )
    .await;

    Ok(see_other(
        "/domains",
        &format!("{} was updated successfully", domain.name),
    ))
}

/// Domain detail
pub async fn detail<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);
    let domain = state.domain_service().get(id).await?;

    Ok(Json(DetailView {
        context: ViewContext::page(locale, "action.domain_detail"),
        data: domain,
    }))
}

/// Domain delete confirmation page
pub async fn delete_confirm<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);
    let domain = state.domain_service().get(id).await?;

    Ok(Json(DetailView {
        context: ViewContext::page(locale, "action.delete_domain"),
        data: domain,
    }))
}

/// Delete domain
pub async fn delete<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    auth: AuthUser,
    headers: HeaderMap,
) -> Result<Response> {
    let domain = state.domain_service().delete(id).await?;
    write_audit_log(
        &state,
        &auth,
        &headers,
        "domain.delete",
        "domain",
        Some(id),
        serde_json::to_value(&domain).ok(),
        None,
    )
    .await;

    Ok(see_other(
        "/domains",
        &format!("{} was deleted successfully", domain.name),
    ))
}
