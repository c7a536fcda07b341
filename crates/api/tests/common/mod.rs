//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use claimtrack_api::config::ServerConfig;
use claimtrack_api::router::{build_app_router, build_cors_layer};
use claimtrack_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
        log_json: false,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let cors = build_cors_layer(&config).unwrap();
    let state = AppState {
        pool,
        config: Arc::new(config),
    };
    build_app_router(state, cors)
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Insert a reference row directly and return its id.
pub async fn insert_reference(pool: &PgPool, table: &str, name: &str) -> i64 {
    sqlx::query_scalar(&format!("INSERT INTO {table} (name) VALUES ($1) RETURNING id"))
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Ids of the reference rows a minimal case needs.
pub struct Seed {
    pub regional_center_id: i64,
    pub locomotive_model_id: i64,
    pub fault_discovery_place_id: i64,
    pub malfunction_id: i64,
    pub repair_type_id: i64,
    pub supplier_id: i64,
    pub component_id: i64,
}

/// Seed the reference rows for a minimal case, plus classification
/// summaries 1..=14.
pub async fn seed(pool: &PgPool) -> Seed {
    for table in ["notification_summaries", "response_summaries", "decision_summaries"] {
        for i in 1..=14 {
            insert_reference(pool, table, &format!("summary {i:02}")).await;
        }
    }
    let supplier_id = insert_reference(pool, "suppliers", "Поставщик").await;
    let component_id: i64 = sqlx::query_scalar(
        "INSERT INTO equipment (name, supplier_id) VALUES ('Тяговый двигатель', $1) RETURNING id",
    )
    .bind(supplier_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Seed {
        regional_center_id: insert_reference(pool, "regional_centers", "Центр").await,
        locomotive_model_id: insert_reference(pool, "locomotive_models", "2ЭС6").await,
        fault_discovery_place_id: insert_reference(pool, "fault_discovery_places", "Депо").await,
        malfunction_id: insert_reference(pool, "malfunctions", "Пробой").await,
        repair_type_id: insert_reference(pool, "repair_types", "ТР-1").await,
        supplier_id,
        component_id,
    }
}

/// JSON body for a minimal valid case.
pub fn case_body(seed: &Seed) -> Value {
    serde_json::json!({
        "fault_date": "2024-05-01",
        "section_mask": 1,
        "component_quantity": 1,
        "regional_center_id": seed.regional_center_id,
        "locomotive_model_id": seed.locomotive_model_id,
        "fault_discovery_place_id": seed.fault_discovery_place_id,
        "component_equipment_id": seed.component_id,
        "malfunction_id": seed.malfunction_id,
        "repair_type_id": seed.repair_type_id,
    })
}
