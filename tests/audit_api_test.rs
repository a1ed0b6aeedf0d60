//! Audit trail written by console writes

mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_domain_writes_record_audit_entries() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.post("/domains/create", Some(&token), json!({"name": "dmz"}))
        .await;
    let id = app.domain_repo.all()[0].id;

    app.post(
        &format!("/domains/{}/update", id),
        Some(&token),
        json!({"comment": "edge"}),
    )
    .await;

    app.post(&format!("/domains/{}/delete", id), Some(&token), json!({}))
        .await;

    let entries = app.audit_repo.entries();
    assert_eq!(entries.len(), 3);

    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["domain.create", "domain.update", "domain.delete"]);

    let create_entry = &entries[0];
    assert_eq!(create_entry.resource_type, "domain");
    assert_eq!(create_entry.resource_id, Some(id));
    assert!(create_entry.actor_id.is_some());
    assert!(create_entry.old_value.is_none());
    assert_eq!(create_entry.new_value.as_ref().unwrap()["name"], "dmz");

    let update_entry = &entries[1];
    assert_eq!(update_entry.old_value.as_ref().unwrap()["comment"], json!(null));
    assert_eq!(update_entry.new_value.as_ref().unwrap()["comment"], "edge");

    let delete_entry = &entries[2];
    assert!(delete_entry.new_value.is_none());
    assert_eq!(delete_entry.old_value.as_ref().unwrap()["name"], "dmz");
}

#[tokio::test]
async fn test_gateway_writes_record_audit_entries() {
    let app = TestApp::new();
    let token = app.admin_token();
    let domain = app.seed_domain("dmz").await;

    app.post(
        &format!("/domains/{}/gateways/create", domain.id),
        Some(&token),
        json!({"name": "gw1", "domain_id": domain.id, "address": "10.0.8.1"}),
    )
    .await;
    let gateway_id = app.gateway_repo.all()[0].id;

    app.post(
        &format!("/gateways/{}/update", gateway_id),
        Some(&token),
        json!({"port": 2222}),
    )
    .await;

    let entries = app.audit_repo.entries();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["gateway.create", "gateway.update"]);
    assert_eq!(entries[0].resource_type, "gateway");
    assert_eq!(entries[0].resource_id, Some(gateway_id));
}

#[tokio::test]
async fn test_audit_log_listing() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.post("/domains/create", Some(&token), json!({"name": "one"}))
        .await;
    app.post("/domains/create", Some(&token), json!({"name": "two"}))
        .await;

    let response = app.get("/audit-logs", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["context"]["action"], "Audit log list");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_audit_log_filter_by_action() {
    let app = TestApp::new();
    let token = app.admin_token();

    app.post("/domains/create", Some(&token), json!({"name": "dmz"}))
        .await;
    let id = app.domain_repo.all()[0].id;
    app.post(
        &format!("/domains/{}/update", id),
        Some(&token),
        json!({"comment": "edge"}),
    )
    .await;

    let response = app
        .get("/audit-logs?action=domain.update", Some(&token))
        .await;
    let body = body_json(response).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["action"], "domain.update");
}

#[tokio::test]
async fn test_audit_log_listing_requires_admin() {
    let app = TestApp::new();
    let token = app.member_token();

    let response = app.get("/audit-logs", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
