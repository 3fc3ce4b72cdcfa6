//! Action-boundary auditing through the full server stack.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::from_fn_with_state;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use exchange_audit::config::AuditMode;
use exchange_audit::http::handlers::{api_router, ItemStore};
use exchange_audit::{action_audit_middleware, ActionAuditor, AuditConfig, AuditServer, Auditor, MemorySink};

mod common;

fn action_config() -> AuditConfig {
    let mut config = AuditConfig::default();
    config.capture.mode = AuditMode::Action;
    config
}

#[tokio::test]
async fn get_not_found_emits_correlated_pair() {
    let sink = Arc::new(MemorySink::new());
    let (addr, shutdown) = common::start_server(action_config(), sink.clone()).await;

    let res = common::client()
        .get(format!("http://{}/items/7", addr))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["x-request-id"], "abc-123");

    let records = sink.json();
    assert_eq!(records.len(), 2);

    let request = &records[0];
    assert_eq!(request["correlationId"], "abc-123");
    assert_eq!(request["httpMethod"], "GET");
    assert_eq!(request["uriAccessed"], format!("http://{}/items/7", addr));
    assert_eq!(request["ipAddress"], "127.0.0.1");
    assert!(request.get("bodyContent").is_none());
    assert!(request.get("requestFormat").is_none());
    assert!(request.get("requestArguments").is_none());

    let response = &records[1];
    assert_eq!(response["correlationId"], "abc-123");
    assert_eq!(response["responseCode"], "404");
    assert_eq!(response["responseReasonPhrase"], "Not Found");

    shutdown.trigger();
}

#[tokio::test]
async fn post_body_reaches_handler_and_record() {
    let sink = Arc::new(MemorySink::new());
    let (addr, shutdown) = common::start_server(action_config(), sink.clone()).await;

    let res = common::client()
        .post(format!("http://{}/items?source=test", addr))
        .header("content-type", "application/json")
        .body("{\"name\":\"lamp\"}\r\n")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["name"], "lamp");

    let records = sink.json();
    let request = &records[0];
    assert_eq!(request["bodyContent"], "{\"name\":\"lamp\"}");
    assert_eq!(request["requestFormat"], "application/json");

    let arguments: serde_json::Value =
        serde_json::from_str(request["requestArguments"].as_str().unwrap()).unwrap();
    assert_eq!(arguments["source"], "test");
    assert_eq!(arguments["body"]["name"], "lamp");

    assert_eq!(records[1]["responseCode"], "201");
    assert_eq!(records[1]["correlationId"], request["correlationId"]);

    shutdown.trigger();
}

#[tokio::test]
async fn generated_request_id_joins_both_records() {
    let sink = Arc::new(MemorySink::new());
    let server = AuditServer::new(action_config(), sink.clone());

    let response = server
        .router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = response.headers()["x-request-id"].to_str().unwrap().to_string();

    let records = sink.json();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["correlationId"], id.as_str());
    assert_eq!(records[1]["correlationId"], id.as_str());
    // no connection info without a socket
    assert_eq!(records[0]["ipAddress"], "0.0.0.0");
}

#[tokio::test]
async fn unmatched_route_is_not_audited() {
    let sink = Arc::new(MemorySink::new());
    let server = AuditServer::new(action_config(), sink.clone());

    let response = server
        .router()
        .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn concurrent_exchanges_stay_paired() {
    let sink = Arc::new(MemorySink::new());
    let (addr, shutdown) = common::start_server(action_config(), sink.clone()).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        let url = format!("http://{}/items", addr);
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .header("content-type", "application/json")
                .body(format!("{{\"name\":\"item-{i}\"}}"))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::CREATED);
    }

    let mut by_id: HashMap<String, Vec<serde_json::Value>> = HashMap::new();
    for record in sink.json() {
        let id = record["correlationId"].as_str().unwrap().to_string();
        by_id.entry(id).or_default().push(record);
    }
    assert_eq!(by_id.len(), 10);
    for records in by_id.values() {
        assert_eq!(records.len(), 2);
        assert!(records[0].get("bodyContent").is_some());
        assert_eq!(records[1]["responseCode"], "201");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn request_without_correlation_token_is_not_audited() {
    let sink = Arc::new(MemorySink::new());
    // no request-id layer in front of the route middleware
    let router = api_router(ItemStore::default()).route_layer(from_fn_with_state(
        ActionAuditor::new(Auditor::with_sink(sink.clone())),
        action_audit_middleware,
    ));

    let created = router
        .clone()
        .oneshot(
            Request::post("/items")
                .header("content-type", "application/json")
                .body(Body::from("{\"name\":\"chair\"}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert!(created.headers().get("x-request-id").is_none());
    let body = axum::body::to_bytes(created.into_body(), usize::MAX).await.unwrap();
    let item: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(item["name"], "chair");

    let missing = router
        .oneshot(Request::get("/items/99").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    assert!(sink.is_empty());
}

#[tokio::test]
async fn declared_oversize_body_passes_through_uncaptured() {
    let mut config = action_config();
    config.capture.max_body_bytes = 8;
    let sink = Arc::new(MemorySink::new());
    let (addr, shutdown) = common::start_server(config, sink.clone()).await;

    let res = common::client()
        .post(format!("http://{}/items?source=bulk", addr))
        .header("content-type", "application/json")
        .body("{\"name\":\"standing lamp\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["name"], "standing lamp");

    let records = sink.json();
    assert_eq!(records.len(), 2);
    let request = &records[0];
    assert_eq!(request["requestFormat"], "application/json");
    assert!(request.get("bodyContent").is_none());
    let arguments: serde_json::Value =
        serde_json::from_str(request["requestArguments"].as_str().unwrap()).unwrap();
    assert_eq!(arguments, serde_json::json!({"source": "bulk"}));
    assert_eq!(records[1]["responseCode"], "201");

    shutdown.trigger();
}

#[tokio::test]
async fn streamed_body_over_capture_limit_reaches_handler() {
    let sink = Arc::new(MemorySink::new());
    let server = AuditServer::new(action_config(), sink.clone());
    let payload = common::item_json(200 * 1024);

    let response = server
        .router()
        .oneshot(
            Request::post("/items")
                .header("content-type", "application/json")
                .body(common::streamed_body(&payload, 4096))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let item: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(item["name"].as_str().unwrap().len(), 200 * 1024);

    let request = &sink.json()[0];
    assert_eq!(request["requestFormat"], "application/json");
    assert!(request.get("requestArguments").is_some());
    assert!(request.get("bodyContent").is_none());
}

#[tokio::test]
async fn streamed_body_over_listener_limit_is_rejected_as_too_large() {
    let mut config = action_config();
    config.listener.max_request_body_bytes = 16;
    let sink = Arc::new(MemorySink::new());
    let server = AuditServer::new(config, sink.clone());

    let response = server
        .router()
        .oneshot(
            Request::post("/items")
                .header("content-type", "application/json")
                .body(common::streamed_body(&common::item_json(64), 8))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let records = sink.json();
    assert_eq!(records.len(), 2);
    assert!(records[0].get("bodyContent").is_none());
    assert_eq!(records[1]["responseCode"], "413");
}

#[tokio::test]
async fn path_params_are_bound_as_arguments() {
    let sink = Arc::new(MemorySink::new());
    let server = AuditServer::new(action_config(), sink.clone());

    let response = server
        .router()
        .oneshot(
            Request::get("/items/7?verbose=1")
                .header("content-type", "text/plain")
                .body(Body::from("why is this here"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = &sink.json()[0];
    let arguments: serde_json::Value =
        serde_json::from_str(request["requestArguments"].as_str().unwrap()).unwrap();
    assert_eq!(
        arguments,
        serde_json::json!({"id": "7", "verbose": "1", "body": "why is this here"})
    );
}
