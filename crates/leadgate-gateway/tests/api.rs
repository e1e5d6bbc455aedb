// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end gateway tests: real router, temp-file SQLite, wiremock standing
//! in for the file store and both channel providers.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use leadgate_config::model::{EmailConfig, WhatsAppConfig};
use leadgate_core::traits::DeliveryChannel;
use leadgate_core::types::{now_rfc3339, Product};
use leadgate_delivery::{Deliverer, FileFetcher};
use leadgate_email::EmailChannel;
use leadgate_gateway::{build_router, AuthSettings, GatewayState};
use leadgate_storage::queries::{events, leads, products};
use leadgate_storage::Database;
use leadgate_whatsapp::WhatsAppChannel;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEBHOOK_SECRET: &str = "hook-secret";
const API_TOKEN: &str = "api-token";

struct TestApp {
    router: Router,
    db: Database,
    _dir: TempDir,
}

async fn build_app(channels: Vec<Arc<dyn DeliveryChannel>>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("gateway.db").to_str().unwrap())
        .await
        .unwrap();

    let state = GatewayState {
        db: db.clone(),
        auth: AuthSettings {
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            api_token: Some(API_TOKEN.to_string()),
        },
        deliverer: Arc::new(Deliverer::new(
            db.clone(),
            FileFetcher::new().unwrap(),
            channels,
        )),
        start_time: Instant::now(),
    };

    TestApp {
        router: build_router(state),
        db,
        _dir: dir,
    }
}

fn email_channel(server: &MockServer) -> Arc<dyn DeliveryChannel> {
    Arc::new(
        EmailChannel::new(&EmailConfig {
            api_key: Some("re_test_key".into()),
            sender: Some("Leadgate <noreply@leadgate.dev>".into()),
            api_base_url: server.uri(),
        })
        .unwrap(),
    )
}

fn whatsapp_channel(server: &MockServer) -> Arc<dyn DeliveryChannel> {
    Arc::new(
        WhatsAppChannel::new(&WhatsAppConfig {
            api_base_url: Some(server.uri()),
            token: Some("wa-token".into()),
            country_code: "55".into(),
        })
        .unwrap(),
    )
}

async fn seed_product(db: &Database, files: &MockServer) -> Product {
    let now = now_rfc3339();
    let product = Product {
        id: "prod-1".into(),
        external_id: Some("ext-1".into()),
        name: "Pricing Guide".into(),
        product_type: "ebook".into(),
        version: "1.0".into(),
        storage_provider: "cdn".into(),
        storage_path: format!("{}/files/guide.pdf", files.uri()),
        created_at: now.clone(),
        updated_at: now,
    };
    products::insert_product(db, &product).await.unwrap();
    product
}

async fn mount_file(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/files/guide.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 guide".to_vec()))
        .mount(server)
        .await;
}

async fn request(
    app: &TestApp,
    method_name: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method_name).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn purchase_body(product_id: &str) -> Value {
    json!({
        "secret": WEBHOOK_SECRET,
        "event": "purchase_approved",
        "data": {
            "customer": {
                "name": "Ana Souza",
                "email": "ana@example.com",
                "phone": "11912345678"
            },
            "product": { "id": product_id }
        }
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(vec![]).await;
    let (status, body) = request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn lead_api_requires_bearer_token() {
    let app = build_app(vec![]).await;

    let body = json!({ "email": "ana@example.com" });
    let (status, _) = request(&app, "POST", "/v1/leads", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "POST", "/v1/leads", Some("wrong"), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_lead_and_reject_duplicate() {
    let app = build_app(vec![]).await;

    let body = json!({ "email": "ana@example.com", "name": "Ana" });
    let (status, created) =
        request(&app, "POST", "/v1/leads", Some(API_TOKEN), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["ok"], true);
    assert_eq!(created["lead"]["conversion_status"], "not_converted");
    assert_eq!(created["lead"]["user_type"], "subscriber");
    assert_eq!(created["lead"]["source"], "api");
    assert!(created.get("delivery_sent").is_none());

    let (status, conflict) =
        request(&app, "POST", "/v1/leads", Some(API_TOKEN), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["leadId"], created["lead"]["id"]);
}

#[tokio::test]
async fn create_lead_requires_contact() {
    let app = build_app(vec![]).await;
    let (status, body) = request(
        &app,
        "POST",
        "/v1/leads",
        Some(API_TOKEN),
        Some(json!({ "name": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");
    assert!(body["fields"].is_array());
}

#[tokio::test]
async fn patch_reclassifies_existing_lead() {
    let app = build_app(vec![]).await;

    let (status, _) = request(
        &app,
        "POST",
        "/v1/leads",
        Some(API_TOKEN),
        Some(json!({ "phone": "11912345678" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, updated) = request(
        &app,
        "PATCH",
        "/v1/leads",
        Some(API_TOKEN),
        Some(json!({ "phone": "11912345678", "user_type": "direct-customer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["lead"]["user_type"], "direct-customer");

    let (status, _) = request(
        &app,
        "PATCH",
        "/v1/leads",
        Some(API_TOKEN),
        Some(json!({ "email": "nobody@example.com", "user_type": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_rejects_bad_secret() {
    let app = build_app(vec![]).await;
    let (status, _) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(json!({ "secret": "wrong", "event": "purchase_approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_acknowledges_and_ignores_other_events() {
    let app = build_app(vec![]).await;
    let (status, body) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(json!({ "secret": WEBHOOK_SECRET, "event": "purchase_refunded" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["ignored"], true);
}

#[tokio::test]
async fn webhook_lists_missing_fields() {
    let app = build_app(vec![]).await;
    let (status, body) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(json!({ "secret": WEBHOOK_SECRET, "event": "purchase_approved", "data": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
}

#[tokio::test]
async fn webhook_unknown_product_is_not_found() {
    let app = build_app(vec![]).await;
    let (status, _) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(purchase_body("no-such-product")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_delivers_on_both_channels_and_logs_events() {
    let files = MockServer::start().await;
    let email = MockServer::start().await;
    let whatsapp = MockServer::start().await;
    mount_file(&files).await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em-1" })))
        .expect(1)
        .mount(&email)
        .await;
    Mock::given(method("POST"))
        .and(path("/send-document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "zaapId": "z-1" })))
        .expect(1)
        .mount(&whatsapp)
        .await;

    let app = build_app(vec![email_channel(&email), whatsapp_channel(&whatsapp)]).await;
    seed_product(&app.db, &files).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(purchase_body("ext-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["productId"], "prod-1");
    assert_eq!(body["sentVia"], "both");
    assert_eq!(body["delivery_sent"], true);
    assert!(body.get("delivery_errors").is_none());

    let lead = leads::find_by_email_or_phone(&app.db, Some("ana@example.com"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.conversion_status.to_string(), "converted");
    assert_eq!(lead.user_type, "direct-customer");
    assert_eq!(lead.product_id.as_deref(), Some("prod-1"));

    let logged = events::list_recent_events(&app.db, 10).await.unwrap();
    assert_eq!(logged.len(), 2);
}

#[tokio::test]
async fn webhook_reports_partial_failure() {
    let files = MockServer::start().await;
    let email = MockServer::start().await;
    let whatsapp = MockServer::start().await;
    mount_file(&files).await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "domain not verified" })),
        )
        .mount(&email)
        .await;
    Mock::given(method("POST"))
        .and(path("/send-document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "zaapId": "z-1" })))
        .mount(&whatsapp)
        .await;

    let app = build_app(vec![email_channel(&email), whatsapp_channel(&whatsapp)]).await;
    seed_product(&app.db, &files).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(purchase_body("ext-1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivery_sent"], true);
    let errors = body["delivery_errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["channel"], "email_delivery");
    assert!(errors[0]["error"]
        .as_str()
        .unwrap()
        .contains("domain not verified"));
}

#[tokio::test]
async fn webhook_fetch_failure_leaves_no_lead_behind() {
    let files = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/guide.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&files)
        .await;

    let app = build_app(vec![]).await;
    seed_product(&app.db, &files).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(purchase_body("ext-1")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");

    let lead = leads::find_by_email_or_phone(&app.db, Some("ana@example.com"), None)
        .await
        .unwrap();
    assert!(lead.is_none(), "failed fetch must not insert a lead");
}

#[tokio::test]
async fn webhook_retry_updates_lead_instead_of_duplicating() {
    let files = MockServer::start().await;
    let email = MockServer::start().await;
    mount_file(&files).await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em-1" })))
        .expect(2)
        .mount(&email)
        .await;

    let app = build_app(vec![email_channel(&email)]).await;
    seed_product(&app.db, &files).await;

    let (first_status, first) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(purchase_body("ext-1")),
    )
    .await;
    assert_eq!(first_status, StatusCode::OK);

    let (second_status, second) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase",
        None,
        Some(purchase_body("ext-1")),
    )
    .await;
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(second["leadId"], first["leadId"]);

    let lead = leads::find_by_email_or_phone(&app.db, Some("ana@example.com"), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.id, first["leadId"].as_str().unwrap());
}

#[tokio::test]
async fn webhook_by_internal_product_id() {
    let files = MockServer::start().await;
    let email = MockServer::start().await;
    mount_file(&files).await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em-1" })))
        .mount(&email)
        .await;

    let app = build_app(vec![email_channel(&email)]).await;
    let product = seed_product(&app.db, &files).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/webhooks/purchase/by-product-id",
        None,
        Some(purchase_body(&product.id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productId"], "prod-1");
}

#[tokio::test]
async fn lead_deliver_requires_product_id() {
    let app = build_app(vec![]).await;
    let (status, body) = request(
        &app,
        "POST",
        "/v1/leads/deliver",
        Some(API_TOKEN),
        Some(json!({ "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "product_id");
}

#[tokio::test]
async fn lead_deliver_creates_converted_lead_and_sends() {
    let files = MockServer::start().await;
    let email = MockServer::start().await;
    mount_file(&files).await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em-1" })))
        .expect(1)
        .mount(&email)
        .await;

    let app = build_app(vec![email_channel(&email)]).await;
    let product = seed_product(&app.db, &files).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/leads/deliver",
        Some(API_TOKEN),
        Some(json!({
            "email": "ana@example.com",
            "name": "Ana",
            "product_id": product.id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["lead"]["conversion_status"], "converted");
    assert_eq!(body["delivery_sent"], true);

    let logged = events::list_recent_events(&app.db, 10).await.unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].recipient, "ana@example.com");
}
