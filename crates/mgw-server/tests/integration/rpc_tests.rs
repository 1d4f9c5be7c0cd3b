//! JSON-RPC over `POST /mcp`

use mgw_infrastructure::config::AppConfig;
use rocket::http::{ContentType, Status};
use serde_json::{Value, json};

use crate::test_utils::{TestGateway, read_json};

#[rocket::async_test]
async fn test_ping() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "ping", "id": 1 }))
        .await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({ "jsonrpc": "2.0", "result": {}, "id": 1 }));
}

#[rocket::async_test]
async fn test_unknown_method() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "unknown_method", "id": "req-7" }))
        .await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["id"], "req-7");
    assert!(body.get("result").is_none());
}

#[rocket::async_test]
async fn test_ids_are_echoed_unchanged() {
    let gateway = TestGateway::with_defaults().await;
    for id in [json!(42), json!("abc"), json!(3.5), Value::Null] {
        let (status, body) = gateway
            .rpc(&json!({ "jsonrpc": "2.0", "method": "ping", "id": id }))
            .await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["id"], id);
    }
}

#[rocket::async_test]
async fn test_notification_gets_202_without_body() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
        .await;
    assert_eq!(status, Status::Accepted);
    assert_eq!(body, Value::Null);

    // Failures are silent too.
    let (status, body) = gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "unknown_method" }))
        .await;
    assert_eq!(status, Status::Accepted);
    assert_eq!(body, Value::Null);
}

#[rocket::async_test]
async fn test_malformed_json_is_parse_error() {
    let gateway = TestGateway::with_defaults().await;
    let response = gateway
        .client
        .post("/mcp")
        .header(ContentType::JSON)
        .body("{\"jsonrpc\": \"2.0\", ")
        .dispatch()
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[rocket::async_test]
async fn test_structural_errors_are_invalid_request() {
    let gateway = TestGateway::with_defaults().await;
    for request in [
        json!([{ "jsonrpc": "2.0", "method": "ping", "id": 1 }]),
        json!({ "jsonrpc": "1.0", "method": "ping", "id": 1 }),
        json!({ "jsonrpc": "2.0", "method": "", "id": 1 }),
        json!({ "jsonrpc": "2.0", "method": "ping", "params": [1, 2], "id": 1 }),
    ] {
        let (status, body) = gateway.rpc(&request).await;
        assert_eq!(status, Status::BadRequest, "request {request}");
        assert_eq!(body["error"]["code"], -32600, "request {request}");
    }
}

#[rocket::async_test]
async fn test_schema_violation_names_fields() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "create_task",
            "params": { "priority": "high" },
            "id": 3,
        }))
        .await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"]["code"], -32602);
    let fields: Vec<&str> = body["error"]["data"]["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"priority"));

    // Nothing reached the host.
    let (_, listed) = gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "list_tasks", "id": 4 }))
        .await;
    assert_eq!(listed["result"]["count"], 0);
}

#[rocket::async_test]
async fn test_protocol_tag_alias_is_mirrored() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({ "protocolTag": "2.0", "method": "ping", "id": 1 }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["protocolTag"], "2.0");
    assert!(body.get("jsonrpc").is_none());
}

#[rocket::async_test]
async fn test_tools_list_and_call() {
    let gateway = TestGateway::with_defaults().await;
    let (_, listed) = gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "tools/list", "id": 1 }))
        .await;
    let tools = listed["result"]["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 22);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    let (status, called) = gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": { "name": "create_project", "arguments": { "name": "Gateway" } },
            "id": 2,
        }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(called["result"]["structuredContent"]["name"], "Gateway");
}

#[rocket::async_test]
async fn test_missing_record_maps_to_404() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "delete_note",
            "params": { "id": "does-not-exist" },
            "id": 1,
        }))
        .await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error"]["code"], -32001);
}

#[rocket::async_test]
async fn test_host_rejected_input_is_400() {
    let gateway = TestGateway::with_defaults().await;
    let (status, body) = gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "create_task",
            "params": { "title": "   " },
            "id": 1,
        }))
        .await;

    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["id"], 1);
    let errors = body["error"]["data"]["errors"]
        .as_array()
        .expect("errors array");
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]["message"]
            .as_str()
            .is_some_and(|m| m.contains("title"))
    );
}

#[rocket::async_test]
async fn test_wrong_content_type_is_415() {
    let gateway = TestGateway::with_defaults().await;
    let response = gateway
        .client
        .post("/mcp")
        .header(ContentType::Plain)
        .body(json!({ "jsonrpc": "2.0", "method": "ping", "id": 1 }).to_string())
        .dispatch()
        .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, Status::UnsupportedMediaType);
    assert_eq!(body["error"], "unsupported_media_type");
}

#[rocket::async_test]
async fn test_oversized_body_is_413() {
    let mut config = AppConfig::default();
    config.server.body_limit_bytes = 64;
    let gateway = TestGateway::start(config).await;

    let (status, body) = gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "create_note",
            "params": { "title": "x".repeat(200) },
            "id": 1,
        }))
        .await;
    assert_eq!(status, Status::PayloadTooLarge);
    assert_eq!(body["error"], "payload_too_large");
}

#[rocket::async_test]
async fn test_health() {
    let gateway = TestGateway::with_defaults().await;
    let response = gateway.client.get("/health").dispatch().await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
    assert!(body["uptimeSeconds"].is_u64());
    assert!(body["version"].is_string());
}

#[rocket::async_test]
async fn test_unknown_route_renders_json() {
    let gateway = TestGateway::with_defaults().await;
    let response = gateway.client.get("/nowhere").dispatch().await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error"], "not_found");
}
