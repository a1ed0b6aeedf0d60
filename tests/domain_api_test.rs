//! Domain CRUD flow over the console router

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, TestApp};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_domain_crud_flow() {
    let app = TestApp::new();
    let token = app.admin_token();

    // Create
    let response = app
        .post(
            "/domains/create",
            Some(&token),
            json!({"name": "dmz", "comment": "Edge network"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/domains");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("dmz%20was%20created%20successfully"));

    // List includes the new record exactly once
    let response = app.get("/domains", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "dmz");
    assert_eq!(body["pagination"]["total"], 1);
    let id = items[0]["id"].as_str().unwrap().to_string();

    // Detail
    let response = app.get(&format!("/domains/{}", id), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "dmz");
    assert_eq!(body["data"]["comment"], "Edge network");
    assert_eq!(body["context"]["action"], "Domain detail");

    // Update
    let response = app
        .post(
            &format!("/domains/{}/update", id),
            Some(&token),
            json!({"name": "dmz-renamed"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/domains");

    let response = app.get(&format!("/domains/{}", id), Some(&token)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "dmz-renamed");
    // Comment untouched by a partial update
    assert_eq!(body["data"]["comment"], "Edge network");

    // Delete confirmation page
    let response = app
        .get(&format!("/domains/{}/delete", id), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["context"]["action"], "Delete domain");
    assert_eq!(body["data"]["name"], "dmz-renamed");

    // Delete
    let response = app
        .post(&format!("/domains/{}/delete", id), Some(&token), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Subsequent requests for the deleted record are not found
    let response = app.get(&format!("/domains/{}", id), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app
        .post(
            &format!("/domains/{}/update", id),
            Some(&token),
            json!({"name": "x"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app
        .post(&format!("/domains/{}/delete", id), Some(&token), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_domain_list_context() {
    let app = TestApp::new();
    let token = app.admin_token();

    let response = app.get("/domains", Some(&token)).await;
    let body = body_json(response).await;
    assert_eq!(body["context"]["app"], "Assets");
    assert_eq!(body["context"]["action"], "Domain list");
    assert!(body["context"].get("type").is_none());
}

#[tokio::test]
async fn test_domain_list_localized_labels() {
    let app = TestApp::new();
    let token = app.admin_token();

    let request = axum::http::Request::builder()
        .uri("/domains")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["context"]["app"], "资产管理");
    assert_eq!(body["context"]["action"], "网域列表");
}

#[tokio::test]
async fn test_domain_create_form() {
    let app = TestApp::new();
    let token = app.admin_token();

    let response = app.get("/domains/create", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["context"]["action"], "Create domain");
    assert_eq!(body["context"]["type"], "create");
    assert_eq!(body["initial"], json!({}));
}

#[tokio::test]
async fn test_domain_update_form_prefilled() {
    let app = TestApp::new();
    let token = app.admin_token();
    let domain = app.seed_domain("internal").await;

    let response = app
        .get(&format!("/domains/{}/update", domain.id), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["context"]["action"], "Update domain");
    assert_eq!(body["context"]["type"], "update");
    assert_eq!(body["initial"]["name"], "internal");
}

#[tokio::test]
async fn test_domain_create_validation_failure_persists_nothing() {
    let app = TestApp::new();
    let token = app.admin_token();

    let response = app
        .post("/domains/create", Some(&token), json!({"name": ""}))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation");
    assert!(body["details"]["name"].is_array());

    assert_eq!(app.domain_repo.len(), 0);
    assert_eq!(app.audit_repo.len(), 0);
}

#[tokio::test]
async fn test_domain_create_duplicate_name_conflict() {
    let app = TestApp::new();
    let token = app.admin_token();
    app.seed_domain("dmz").await;

    let response = app
        .post("/domains/create", Some(&token), json!({"name": "dmz"}))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.domain_repo.len(), 1);
}

#[tokio::test]
async fn test_domain_update_leaves_other_domains_untouched() {
    let app = TestApp::new();
    let token = app.admin_token();
    let target = app.seed_domain("target").await;
    let bystander = app.seed_domain("bystander").await;
    let bystander_before = serde_json::to_value(&bystander).unwrap();

    let response = app
        .post(
            &format!("/domains/{}/update", target.id),
            Some(&token),
            json!({"name": "target-renamed", "comment": "touched"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let after = app
        .domain_repo
        .all()
        .into_iter()
        .find(|d| d.id == bystander.id)
        .unwrap();
    assert_eq!(serde_json::to_value(&after).unwrap(), bystander_before);
}

#[tokio::test]
async fn test_domain_detail_not_found() {
    let app = TestApp::new();
    let token = app.admin_token();

    let response = app
        .get(
            "/domains/550e8400-e29b-41d4-a716-446655440000",
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
}
