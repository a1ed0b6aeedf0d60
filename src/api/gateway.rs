//! Gateway API handlers (sub-resource of Domain)

use crate::api::context::{
    initial_values, FormMode, FormView, Locale, ViewContext,
};
use crate::api::{see_other, write_audit_log, PaginationMeta, PaginationQuery};
use crate::domain::{CreateGatewayInput, Domain, Gateway, StringUuid, UpdateGatewayInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::ConsoleState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Gateway listing page payload, scoped to its parent domain
#[derive(Debug, Serialize)]
pub struct GatewayListView {
    pub context: ViewContext,
    pub domain: Domain,
    pub data: Vec<Gateway>,
    pub pagination: PaginationMeta,
}

/// List gateways owned by a domain
pub async fn list<S: ConsoleState>(
    State(state): State<S>,
    Path(domain_id): Path<StringUuid>,
    Query(pagination): Query<PaginationQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);

    // Parent resolved once, reused for the check and the context
    let (domain, gateways, total) = state
        .gateway_service()
        .list_for_domain(domain_id, pagination.page, pagination.per_page)
        .await?;

    Ok(Json(GatewayListView {
        context: ViewContext::page(locale, "action.domain_gateway_list"),
        domain,
        data: gateways,
        pagination: PaginationMeta::new(pagination.page, pagination.per_page, total),
    }))
}

/// Gateway create form, pre-populated with the path's domain when it exists
pub async fn create_form<S: ConsoleState>(
    State(state): State<S>,
    Path(domain_id): Path<StringUuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);

    // A missing parent is tolerated here; the field is simply left unset
    let initial = match state.gateway_service().form_defaults(domain_id).await? {
        Some(domain) => initial_values([(
            "domain_id",
            serde_json::Value::String(domain.id.to_string()),
        )]),
        None => initial_values([]),
    };

    Ok(Json(FormView {
        context: ViewContext::form(locale, "action.create_gateway", FormMode::Create),
        initial,
    }))
}

/// Create gateway. The submitted domain is authoritative; the redirect
/// target follows the persisted owner, never the path parameter.
pub async fn create<S: ConsoleState>(
    State(state): State<S>,
    Path(_domain_id): Path<StringUuid>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(input): Json<CreateGatewayInput>,
) -> Result<Response> {
    let gateway = state.gateway_service().create(input).await?;
    write_audit_log(
        &state,
        &auth,
        &headers,
        "gateway.create",
        "gateway",
        Some(gateway.id),
        None,
        serde_json::to_value(&gateway).ok(),
    )
    .await;

    Ok(see_other(
        &format!("/domains/{}/gateways", gateway.domain_id),
        &format!("{} was created successfully", gateway.name),
    ))
}

/// Gateway update form
pub async fn update_form<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let locale = Locale::from_headers(&headers);
    let gateway = state.gateway_service().get(id).await?;

    Ok(Json(FormView {
        context: ViewContext::form(locale, "action.update_gateway", FormMode::Update),
        initial: initial_values([
            (
                "domain_id",
                serde_json::Value::String(gateway.domain_id.to_string()),
            ),
            ("name", serde_json::Value::String(gateway.name)),
            ("address", serde_json::Value::String(gateway.address)),
            ("port", serde_json::Value::from(gateway.port)),
            (
                "protocol",
                serde_json::Value::String(gateway.protocol.to_string()),
            ),
            (
                "username",
                gateway
                    .username
                    .map(serde_json::Value::String)
                    .unwrap_or(serde_json::Value::Null),
            ),
            (
                "comment",
                gateway
                    .comment
                    .map(serde_json::Value::String)
                    .unwrap_or(serde_json::Value::Null),
            ),
        ]),
    }))
}

/// Update gateway. The redirect target encodes the owning domain as
/// persisted by this update.
pub async fn update<S: ConsoleState>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(input): Json<UpdateGatewayInput>,
) -> Result<Response> {
    let before = state.gateway_service().get(id).await?;
    let gateway = state.gateway_service().update(id, input).await?;
    write_audit_log(
        &state,
        &auth,
        &headers,
        "gateway.update",
        "gateway",
        Some(gateway.id),
        serde_json::to_value(&before).ok(),
        serde_json::to_value(&gateway).ok(),
    )
    .await;

    Ok(see_other(
        &format!("/domains/{}/gateways", gateway.domain_id),
        &format!("{} was updated successfully", gateway.name),
    ))
}
